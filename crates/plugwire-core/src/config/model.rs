use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::config::format::ConfigFormat;
use crate::integration::handler::LookupMethod;
use crate::plugin_system::ordering::SortOrder;

/// Declarative description of the registries, lists and message activators
/// to create in an application context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    pub registries: Vec<RegistryDefinition>,
    pub lists: Vec<ListDefinition>,
    pub activators: Vec<ActivatorDefinition>,
}

/// One plugin registry bean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryDefinition {
    /// Name of a plugin type declared in the
    /// [`PluginTypeTable`](crate::config::PluginTypeTable)
    pub plugin_type: String,
    /// Bean name; derived from the plugin type when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Takes precedence over the derived name, but not over `name`
    #[serde(default)]
    pub qualifier: Option<String>,
    /// Concrete type names to leave out of the registry
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub order: SortOrder,
}

/// One sorted plugin list bean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDefinition {
    pub plugin_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

/// Routes messages on a channel to the plugins of a registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivatorDefinition {
    pub channel: String,
    /// Bean name of a registry defined in the same file
    pub registry: String,
    /// Name of a service method declared for the registry's plugin type
    pub method: String,
    #[serde(default)]
    pub lookup: LookupMethod,
    /// JSON pointer into the message (`/payload/...`, `/headers/...`).
    /// The whole payload is the delimiter when absent.
    #[serde(default)]
    pub delimiter: Option<String>,
}

impl WiringConfig {
    /// Load a wiring file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        let data = fs::read_to_string(path).map_err(|e| ConfigError::io(e, path))?;
        log::debug!("Loading {} wiring from {}", format, path.display());
        Self::from_str(&data, format)
    }

    pub fn from_str(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        format.parse(data)
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty() && self.lists.is_empty() && self.activators.is_empty()
    }
}
