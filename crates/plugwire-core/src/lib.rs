pub mod config;
pub mod integration;
pub mod kernel;
pub mod plugin_system;
pub mod support;

// Re-export key public types/traits for easier use by the binary and plugins
pub use config::{PluginRegistriesRegistrar, PluginTypeTable, WiringConfig};
pub use integration::{LookupMethod, Message, MessageHandler, ServiceMethods, SharedMessageDispatcher};
pub use kernel::error::Error as KernelError;
pub use kernel::{ApplicationContext, Exclusions, Result};
pub use plugin_system::{
    Comparator, OrderAwarePluginRegistry, Ordered, Plugin, PluginRegistry, RegistryError, SimplePluginRegistry,
    SortOrder,
};
pub use support::{BeanListFactory, BeansOfType, FactoryDescriptor, PluginRegistryFactory};
