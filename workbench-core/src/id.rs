use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for an isolated workspace directory.
///
/// [`WorkspaceId::parse`] accepts only the canonical hyphenated-hex
/// spelling. The `uuid` crate alone also admits simple, braced, and urn
/// forms; accepting those would give a single directory several
/// addressable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkspaceId(Uuid);

impl WorkspaceId {
    /// Creates a new random `WorkspaceId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a canonical hyphenated UUID string.
    ///
    /// Hex digits may be upper- or lowercase; hyphens must sit at
    /// positions 8, 13, 18, and 23.
    ///
    /// # Errors
    /// Returns [`ValidationError`] for any other spelling, including the
    /// 32-char simple, braced, and urn forms.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let canonical = s.len() == 36
            && s.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => b.is_ascii_hexdigit(),
            });
        if !canonical {
            return Err(ValidationError::new(
                "workspace_id",
                "must be a canonical hyphenated UUID",
            ));
        }
        let uuid = Uuid::parse_str(s).map_err(|_| {
            ValidationError::new("workspace_id", "must be a canonical hyphenated UUID")
        })?;
        Ok(Self(uuid))
    }

    /// Returns the inner `Uuid`.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WorkspaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkspaceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for WorkspaceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
