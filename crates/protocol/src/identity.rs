//! Container identity
//!
//! `ContainerIdentity` names the origin of a log stream. The `id` is the
//! stable process/container instance id; the two name fields are display
//! and file-naming variants that may collide across identities.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a container producing log output
///
/// Equality and hashing key on `id` only. Two identities with the same
/// `short_name` but different ids are distinct streams and must keep
/// distinct color assignments downstream.
///
/// # Example
///
/// ```
/// use logmux_protocol::ContainerIdentity;
///
/// let identity = ContainerIdentity::new("abc123", "api", "deploy-api-0");
/// assert_eq!(identity.id(), "abc123");
/// assert_eq!(identity.short_name(), "api");
/// ```
#[derive(Debug, Clone, Eq)]
pub struct ContainerIdentity {
    /// Opaque stable instance id
    id: String,

    /// Display name for console labels
    short_name: String,

    /// Qualified name used when deriving file names
    qualified_name: String,
}

impl ContainerIdentity {
    /// Create a new identity
    pub fn new(
        id: impl Into<String>,
        short_name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            qualified_name: qualified_name.into(),
        }
    }

    /// Get the stable instance id
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the display name
    #[inline]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Get the file-naming variant
    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

impl PartialEq for ContainerIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for ContainerIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ContainerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name)
    }
}
