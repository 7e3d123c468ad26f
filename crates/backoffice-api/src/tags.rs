//! Tag hints declared on actions.
//!
//! An action can ask for extra schema tags or veto inherited ones. Exclusion
//! always wins over inclusion; the assembler applies descriptor-level
//! exclusions after these hints.

/// Include/exclude tag hints for a single action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagHints {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TagHints {
    /// Creates empty hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag to include.
    #[must_use]
    pub fn include(mut self, tag: impl Into<String>) -> Self {
        self.include.push(tag.into());
        self
    }

    /// Adds a tag to exclude. Exclusion beats inclusion of the same tag.
    #[must_use]
    pub fn exclude(mut self, tag: impl Into<String>) -> Self {
        self.exclude.push(tag.into());
        self
    }

    /// Returns the tags to include.
    pub fn included(&self) -> &[String] {
        &self.include
    }

    /// Returns the tags to exclude.
    pub fn excluded(&self) -> &[String] {
        &self.exclude
    }
}
