use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::model::{ActivatorDefinition, ListDefinition, RegistryDefinition, WiringConfig};
use crate::integration::dispatcher::{HandlerId, SharedMessageDispatcher};
use crate::integration::error::IntegrationError;
use crate::integration::handler::{MessageHandler, PluginRegistryAwareMessageHandler, validate_delimiter_pointer};
use crate::integration::methods::ServiceMethods;
use crate::kernel::component::Exclusions;
use crate::kernel::context::ApplicationContext;
use crate::kernel::error::{ComponentError, Error, Result};
use crate::plugin_system::traits::Plugin;
use crate::support::bean_list::BeanListFactory;
use crate::support::registry_factory::{FactoryDescriptor, PluginRegistryFactory};

/// Type-erased constructor for the beans of one declared plugin type
trait DeclaredPluginType: Send + Sync {
    fn register_registry(
        &self,
        definition: &RegistryDefinition,
        bean_name: &str,
        context: &Arc<ApplicationContext>,
    ) -> Result<()>;

    fn register_list(&self, definition: &ListDefinition, bean_name: &str, context: &Arc<ApplicationContext>) -> Result<()>;

    fn build_activator(
        &self,
        definition: &ActivatorDefinition,
        context: &Arc<ApplicationContext>,
    ) -> Result<Box<dyn MessageHandler>>;

    /// Check an activator against the declared service methods without
    /// building it
    fn validate_activator(&self, definition: &ActivatorDefinition) -> Result<()>;

    fn method_names(&self) -> Vec<String>;
}

struct TypedDeclaration<P: ?Sized, S: ?Sized> {
    name: String,
    methods: ServiceMethods<P>,
    _delimiter: PhantomData<fn(&S)>,
}

impl<P, S> DeclaredPluginType for TypedDeclaration<P, S>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + ToOwned + 'static,
    S::Owned: DeserializeOwned,
{
    fn register_registry(
        &self,
        definition: &RegistryDefinition,
        bean_name: &str,
        context: &Arc<ApplicationContext>,
    ) -> Result<()> {
        let exclusions = Exclusions::from_type_names(definition.exclusions.iter().cloned());
        let factory = Arc::new(
            PluginRegistryFactory::<P, S>::from_context(context, exclusions)
                .with_order(definition.order)
                .with_plugin_type(self.name.clone()),
        );

        context.with_components_mut(|components| {
            components
                .register(bean_name, Arc::clone(&factory))?
                .provides(|it| -> Arc<dyn FactoryDescriptor> { it });
            Ok(())
        })?;
        context.add_listener(factory)
    }

    fn register_list(&self, definition: &ListDefinition, bean_name: &str, context: &Arc<ApplicationContext>) -> Result<()> {
        let exclusions = Exclusions::from_type_names(definition.exclusions.iter().cloned());
        let factory =
            Arc::new(BeanListFactory::<P, S>::from_context(context, exclusions).with_plugin_type(self.name.clone()));

        context.with_components_mut(|components| {
            components
                .register(bean_name, Arc::clone(&factory))?
                .provides(|it| -> Arc<dyn FactoryDescriptor> { it });
            Ok(())
        })?;
        context.add_listener(factory)
    }

    fn build_activator(
        &self,
        definition: &ActivatorDefinition,
        context: &Arc<ApplicationContext>,
    ) -> Result<Box<dyn MessageHandler>> {
        let factory = context.get::<PluginRegistryFactory<P, S>>(&definition.registry)?;
        let mut handler = PluginRegistryAwareMessageHandler::new(factory, &self.methods, definition.method.clone())?
            .with_lookup(definition.lookup);
        if let Some(pointer) = &definition.delimiter {
            handler = handler.with_delimiter_pointer(pointer.clone())?;
        }
        Ok(Box::new(handler))
    }

    fn validate_activator(&self, definition: &ActivatorDefinition) -> Result<()> {
        if !self.methods.contains(&definition.method) {
            return Err(IntegrationError::NoApplicableMethod {
                method: definition.method.clone(),
                plugin_type: self.name.clone(),
            }
            .into());
        }
        match &definition.delimiter {
            Some(pointer) => validate_delimiter_pointer(pointer),
            None => Ok(()),
        }
    }

    fn method_names(&self) -> Vec<String> {
        self.methods.names()
    }
}

/// The plugin types a wiring file may refer to, by name.
///
/// Rust cannot look a type up by its name at runtime, so the host declares
/// every plugin type (and the service methods activators may call on it)
/// up front.
#[derive(Default)]
pub struct PluginTypeTable {
    types: HashMap<String, Box<dyn DeclaredPluginType>>,
}

impl PluginTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a plugin type without service methods
    pub fn declare<P, S>(&mut self, name: impl Into<String>) -> Result<()>
    where
        P: Plugin<S> + ?Sized + 'static,
        S: ?Sized + ToOwned + 'static,
        S::Owned: DeserializeOwned,
    {
        self.declare_with_methods::<P, S>(name, ServiceMethods::new())
    }

    pub fn declare_with_methods<P, S>(&mut self, name: impl Into<String>, methods: ServiceMethods<P>) -> Result<()>
    where
        P: Plugin<S> + ?Sized + 'static,
        S: ?Sized + ToOwned + 'static,
        S::Owned: DeserializeOwned,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::precondition("Plugin type name must not be blank"));
        }
        if self.types.contains_key(&name) {
            return Err(Error::precondition(format!("Plugin type '{}' is already declared", name)));
        }

        let declaration = TypedDeclaration::<P, S> {
            name: name.clone(),
            methods,
            _delimiter: PhantomData,
        };
        self.types.insert(name, Box::new(declaration));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Declared type names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    /// Service methods declared for a type, sorted
    pub fn method_names(&self, name: &str) -> Option<Vec<String>> {
        self.types.get(name).map(|declared| declared.method_names())
    }

    fn lookup(&self, name: &str) -> Result<&dyn DeclaredPluginType> {
        self.types
            .get(name)
            .map(|declared| declared.as_ref())
            .ok_or_else(|| Error::precondition(format!("Unknown plugin type '{}'", name)))
    }
}

impl fmt::Debug for PluginTypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginTypeTable")
            .field("types", &self.names())
            .finish()
    }
}

/// What [`PluginRegistriesRegistrar::apply`] created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedWiring {
    /// Registry bean names, in definition order
    pub registries: Vec<String>,
    /// List bean names, in definition order
    pub lists: Vec<String>,
    /// Channel and handler id of every activator
    pub activators: Vec<(String, HandlerId)>,
}

/// Turns a [`WiringConfig`] into registry and list factories inside an
/// [`ApplicationContext`], plus message handlers on a dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginRegistriesRegistrar;

impl PluginRegistriesRegistrar {
    /// Apply every definition of `config`.
    ///
    /// The whole file is checked first: plugin types, bean names (blank,
    /// repeated or already taken in the context), activator registries,
    /// methods and delimiter pointers. Nothing is registered unless every
    /// definition is valid. Registries and lists are registered before
    /// activators, so activators may refer to any registry of the same file.
    pub async fn apply(
        config: &WiringConfig,
        table: &PluginTypeTable,
        context: &Arc<ApplicationContext>,
        dispatcher: &SharedMessageDispatcher,
    ) -> Result<AppliedWiring> {
        let plan = WiringPlan::check(config, table, context)?;
        let mut applied = AppliedWiring::default();

        for (definition, bean_name, declared) in plan.registries {
            declared.register_registry(definition, &bean_name, context)?;
            log::info!(
                "Registered {} plugin registry '{}' ({:?})",
                definition.plugin_type,
                bean_name,
                definition.order
            );
            applied.registries.push(bean_name);
        }

        for (definition, bean_name, declared) in plan.lists {
            declared.register_list(definition, &bean_name, context)?;
            log::info!("Registered {} plugin list '{}'", definition.plugin_type, bean_name);
            applied.lists.push(bean_name);
        }

        for (definition, declared) in plan.activators {
            let handler = declared.build_activator(definition, context)?;
            let id = dispatcher.register_handler(definition.channel.clone(), handler).await?;
            log::info!(
                "Routing channel '{}' to '{}' on registry '{}' (lookup {:?})",
                definition.channel,
                definition.method,
                definition.registry,
                definition.lookup
            );
            applied.activators.push((definition.channel.clone(), id));
        }

        Ok(applied)
    }
}

/// A wiring file resolved against the type table and checked against the
/// context, ready to be registered
struct WiringPlan<'a> {
    registries: Vec<(&'a RegistryDefinition, String, &'a dyn DeclaredPluginType)>,
    lists: Vec<(&'a ListDefinition, String, &'a dyn DeclaredPluginType)>,
    activators: Vec<(&'a ActivatorDefinition, &'a dyn DeclaredPluginType)>,
}

impl<'a> WiringPlan<'a> {
    fn check(config: &'a WiringConfig, table: &'a PluginTypeTable, context: &ApplicationContext) -> Result<Self> {
        let existing = context.component_names()?;
        let mut taken: HashSet<String> = existing.into_iter().collect();
        let mut claim = |bean_name: &str| -> Result<()> {
            if !taken.insert(bean_name.to_string()) {
                return Err(ComponentError::DuplicateName {
                    name: bean_name.to_string(),
                }
                .into());
            }
            Ok(())
        };

        let mut plan = WiringPlan {
            registries: Vec::new(),
            lists: Vec::new(),
            activators: Vec::new(),
        };
        // registry bean name -> declared plugin type
        let mut registry_types: HashMap<String, &'a dyn DeclaredPluginType> = HashMap::new();

        for definition in &config.registries {
            let declared = table.lookup(&definition.plugin_type)?;
            let bean_name = registry_bean_name(definition)?;
            claim(&bean_name)?;
            registry_types.insert(bean_name.clone(), declared);
            plan.registries.push((definition, bean_name, declared));
        }

        for definition in &config.lists {
            let declared = table.lookup(&definition.plugin_type)?;
            let bean_name = list_bean_name(definition)?;
            claim(&bean_name)?;
            plan.lists.push((definition, bean_name, declared));
        }

        for definition in &config.activators {
            if definition.channel.trim().is_empty() || definition.method.trim().is_empty() {
                return Err(Error::precondition("Activator channel and method must not be blank"));
            }
            let declared = registry_types.get(&definition.registry).copied().ok_or_else(|| {
                Error::precondition(format!(
                    "Activator on '{}' refers to unknown registry '{}'",
                    definition.channel, definition.registry
                ))
            })?;
            declared.validate_activator(definition)?;
            plan.activators.push((definition, declared));
        }

        Ok(plan)
    }
}

/// Explicit name, then qualifier, then `<pluginType>Registry`
pub fn registry_bean_name(definition: &RegistryDefinition) -> Result<String> {
    let explicit = definition.name.as_deref().or(definition.qualifier.as_deref());
    bean_name(explicit, &definition.plugin_type, "Registry")
}

/// Explicit name, then `<pluginType>List`
pub fn list_bean_name(definition: &ListDefinition) -> Result<String> {
    bean_name(definition.name.as_deref(), &definition.plugin_type, "List")
}

fn bean_name(explicit: Option<&str>, plugin_type: &str, suffix: &str) -> Result<String> {
    if plugin_type.trim().is_empty() {
        return Err(Error::precondition("Plugin type name must not be blank"));
    }
    match explicit {
        Some(name) if name.trim().is_empty() => Err(Error::precondition(format!(
            "Bean name for {} {} must not be blank",
            plugin_type,
            suffix.to_lowercase()
        ))),
        Some(name) => Ok(name.to_string()),
        None => Ok(uncapitalize(&format!("{}{}", plugin_type, suffix))),
    }
}

/// Lowercase the first character
pub fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
