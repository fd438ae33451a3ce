use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::plugin_system::error::MetadataError;
use crate::plugin_system::traits::Plugin;

/// Name and version identifying a plugin.
///
/// Used as a delimiter by metadata based plugins: such a plugin supports
/// exactly the metadata it carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginMetadata {
    name: String,
    version: Version,
}

impl PluginMetadata {
    /// Create metadata from a name and a semver version string
    pub fn new(name: impl Into<String>, version: &str) -> Result<Self, MetadataError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MetadataError::BlankName);
        }
        let parsed = Version::parse(version.trim()).map_err(|e| MetadataError::InvalidVersion {
            name: name.clone(),
            version: version.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name,
            version: parsed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for PluginMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Components that describe themselves with [`PluginMetadata`]
pub trait MetadataProvider {
    fn metadata(&self) -> &PluginMetadata;
}

// Every metadata provider is a plugin selecting on its own metadata.
impl<T> Plugin<PluginMetadata> for T
where
    T: MetadataProvider + Send + Sync + ?Sized,
{
    fn supports(&self, delimiter: &PluginMetadata) -> bool {
        self.metadata() == delimiter
    }
}
