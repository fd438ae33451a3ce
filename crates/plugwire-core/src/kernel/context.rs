use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::kernel::component::{ComponentRegistry, Exclusions};
use crate::kernel::error::{ComponentError, Error, Result};

/// Receives the "container fully initialized" signal.
pub trait ContextListener: Send + Sync {
    /// Called once, when [`ApplicationContext::refresh`] completes wiring
    fn on_context_refreshed(&self, context: &ApplicationContext) -> Result<()>;
}

/// Owns the component container and drives its lifecycle.
///
/// Components are registered while the context is being set up; calling
/// [`refresh`](Self::refresh) marks the setup as complete and notifies every
/// [`ContextListener`]. Factories use that signal to freeze their snapshots.
pub struct ApplicationContext {
    components: RwLock<ComponentRegistry>,
    listeners: RwLock<Vec<Arc<dyn ContextListener>>>,
    refreshed: AtomicBool,
}

impl ApplicationContext {
    /// Create a new, not yet refreshed context
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            components: RwLock::new(ComponentRegistry::new()),
            listeners: RwLock::new(Vec::new()),
            refreshed: AtomicBool::new(false),
        })
    }

    /// Run `f` with shared access to the container.
    ///
    /// Do not call back into methods that need write access from inside `f`.
    pub fn with_components<R>(&self, f: impl FnOnce(&ComponentRegistry) -> R) -> Result<R> {
        let components = self.components.read().map_err(|_| poisoned("components"))?;
        Ok(f(&components))
    }

    /// Run `f` with exclusive access to the container
    pub fn with_components_mut<R>(&self, f: impl FnOnce(&mut ComponentRegistry) -> Result<R>) -> Result<R> {
        let mut components = self.components.write().map_err(|_| poisoned("components"))?;
        f(&mut components)
    }

    /// Register a component that provides no capabilities besides itself
    pub fn register<V>(&self, name: impl Into<String>, instance: Arc<V>) -> Result<()>
    where
        V: Send + Sync + 'static,
    {
        self.with_components_mut(|components| components.register(name, instance).map(|_| ()))
    }

    pub fn get<V>(&self, name: &str) -> Result<Arc<V>>
    where
        V: Send + Sync + 'static,
    {
        self.with_components(|components| components.get::<V>(name))?
    }

    pub fn get_provided<P>(&self, name: &str) -> Result<Arc<P>>
    where
        P: ?Sized + Send + Sync + 'static,
    {
        self.with_components(|components| components.get_provided::<P>(name))?
    }

    /// All live components providing `P`, minus the excluded types
    pub fn instances_of<P>(&self, exclusions: &Exclusions) -> Result<Vec<Arc<P>>>
    where
        P: ?Sized + Send + Sync + 'static,
    {
        self.with_components(|components| components.instances_of::<P>(exclusions))
    }

    pub fn component_names(&self) -> Result<Vec<String>> {
        self.with_components(|components| components.names())
    }

    /// Add a listener for the refresh signal
    pub fn add_listener(&self, listener: Arc<dyn ContextListener>) -> Result<()> {
        let mut listeners = self.listeners.write().map_err(|_| poisoned("listeners"))?;
        listeners.push(listener);
        Ok(())
    }

    /// Mark the context as fully initialized and notify all listeners.
    ///
    /// Refreshing a context twice is a precondition violation.
    pub fn refresh(&self) -> Result<()> {
        if self.refreshed.swap(true, Ordering::SeqCst) {
            return Err(Error::precondition("Application context has already been refreshed"));
        }

        // Snapshot the listeners so callbacks can inspect the context freely
        let listeners: Vec<Arc<dyn ContextListener>> = self
            .listeners
            .read()
            .map_err(|_| poisoned("listeners"))?
            .clone();

        log::info!("Refreshing application context ({} listeners)", listeners.len());
        for listener in listeners {
            listener.on_context_refreshed(self)?;
        }
        Ok(())
    }

    pub fn is_refreshed(&self) -> bool {
        self.refreshed.load(Ordering::SeqCst)
    }
}

fn poisoned(component: &str) -> Error {
    ComponentError::Poisoned {
        component: component.to_string(),
    }
    .into()
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count = self.listeners.read().map(|l| l.len()).unwrap_or_default();
        f.debug_struct("ApplicationContext")
            .field("components", &self.components)
            .field("listeners", &listener_count)
            .field("refreshed", &self.is_refreshed())
            .finish()
    }
}
