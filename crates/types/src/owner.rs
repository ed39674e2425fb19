use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur when parsing an owner identifier.
#[derive(Debug, thiserror::Error)]
pub enum OwnerIdError {
    #[error("owner identifier must not be empty")]
    Empty,
    #[error("owner identifier must not contain whitespace")]
    Whitespace,
    #[error("owner identifier must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Maximum accepted length of an owner identifier string.
pub const OWNER_ID_MAX_LENGTH: usize = 128;

/// Identifier of the party a root index belongs to.
///
/// The ledger keeps one mutable pointer slot per owner; this type is the
/// key of that slot. The string is opaque to AnchorFS beyond the basic
/// shape checks here — whatever naming scheme the ledger uses (an account
/// address, a registered handle) passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Validate and wrap an owner identifier string.
    pub fn new(owner: impl Into<String>) -> Result<Self, OwnerIdError> {
        let owner = owner.into();
        if owner.is_empty() {
            return Err(OwnerIdError::Empty);
        }
        if owner.chars().any(char::is_whitespace) {
            return Err(OwnerIdError::Whitespace);
        }
        if owner.len() > OWNER_ID_MAX_LENGTH {
            return Err(OwnerIdError::TooLong {
                max: OWNER_ID_MAX_LENGTH,
                actual: owner.len(),
            });
        }
        Ok(Self(owner))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OwnerId {
    type Error = OwnerIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OwnerId::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}
