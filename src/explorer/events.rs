//! Notices surfaced to the user by top-level expansions
//!
//! Only user-initiated or top-level expansions produce notices; background
//! expansions stay silent.

use serde::{Deserialize, Serialize};

/// A transient user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The backend returned no neighbours at all
    NoConnections,
    /// The backend returned neighbours but none were new, or the fetch failed
    NoFurtherConnections,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoConnections => "No connections available for this company.",
            Self::NoFurtherConnections => "No further connections for this node.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_have_distinct_messages() {
        assert_ne!(Notice::NoConnections.message(), Notice::NoFurtherConnections.message());
        assert_eq!(
            Notice::NoFurtherConnections.to_string(),
            "No further connections for this node."
        );
    }
}
