//! Path tracking for recursive validation
//!
//! Copyright (c) 2025 Benchline Team
//! Licensed under the Apache-2.0 license

/// Path literal used for the value being validated
pub const ROOT_PATH: &str = "root";

/// Validation context carrying the current value path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Current value path, e.g. `root.messages[2].role`
    pub path: String,
}

impl ValidationContext {
    /// Create a context anchored at [`ROOT_PATH`]
    pub fn root() -> Self {
        Self::at(ROOT_PATH)
    }

    /// Create a context anchored at an arbitrary path
    pub fn at<P: Into<String>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Create a child context for an object member
    pub fn child<P: AsRef<str>>(&self, key: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, key.as_ref()),
        }
    }

    /// Create a child context for an array element
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::root()
    }
}
