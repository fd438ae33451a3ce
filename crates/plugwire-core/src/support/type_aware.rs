use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::kernel::component::Exclusions;
use crate::kernel::context::ApplicationContext;
use crate::kernel::error::{ComponentError, Error, Result};

/// Enumerates the live components assignable to `P`.
pub trait ComponentSource<P: ?Sized>: Send + Sync {
    /// A fresh list of all matching components
    fn components(&self) -> Result<Vec<Arc<P>>>;
}

/// Source backed by a host supplied callback
struct SupplierSource<F> {
    supplier: F,
}

impl<P, F> ComponentSource<P> for SupplierSource<F>
where
    P: ?Sized,
    F: Fn() -> Vec<Arc<P>> + Send + Sync,
{
    fn components(&self) -> Result<Vec<Arc<P>>> {
        Ok((self.supplier)())
    }
}

/// Source querying an [`ApplicationContext`] for everything providing `P`.
///
/// Only a weak reference is kept: factories registered inside the context
/// must not keep it alive.
pub struct ContextSource<P: ?Sized> {
    context: Weak<ApplicationContext>,
    exclusions: Exclusions,
    _capability: PhantomData<fn() -> Arc<P>>,
}

impl<P: ?Sized> ContextSource<P> {
    pub fn new(context: &Arc<ApplicationContext>, exclusions: Exclusions) -> Self {
        Self {
            context: Arc::downgrade(context),
            exclusions,
            _capability: PhantomData,
        }
    }
}

impl<P> ComponentSource<P> for ContextSource<P>
where
    P: ?Sized + Send + Sync + 'static,
{
    fn components(&self) -> Result<Vec<Arc<P>>> {
        match self.context.upgrade() {
            Some(context) => context.instances_of::<P>(&self.exclusions),
            None => {
                log::warn!("Application context is gone; no components to enumerate");
                Ok(Vec::new())
            }
        }
    }
}

/// Enumeration of the components of type `P` that can be frozen.
///
/// Until [`freeze`](Self::freeze) is called every [`beans`](Self::beans)
/// call queries the source again. Afterwards the first list computed is kept
/// and handed out on every subsequent call. The snapshot is computed under a
/// lock, so concurrent first calls after freezing query the source once.
///
/// [`capture`](Self::capture) freezes and takes the snapshot right away;
/// factories call it when the context is refreshed, so components
/// registered after the refresh are never part of the snapshot.
pub struct BeansOfType<P: ?Sized> {
    source: Box<dyn ComponentSource<P>>,
    frozen: AtomicBool,
    snapshot: Mutex<Option<Vec<Arc<P>>>>,
}

impl<P> BeansOfType<P>
where
    P: ?Sized + Send + Sync + 'static,
{
    pub fn new(source: impl ComponentSource<P> + 'static) -> Self {
        Self {
            source: Box::new(source),
            frozen: AtomicBool::new(false),
            snapshot: Mutex::new(None),
        }
    }

    /// Enumerate through a host supplied callback
    pub fn from_supplier<F>(supplier: F) -> Self
    where
        F: Fn() -> Vec<Arc<P>> + Send + Sync + 'static,
    {
        Self::new(SupplierSource { supplier })
    }

    /// Enumerate everything in `context` providing `P`, minus `exclusions`
    pub fn from_context(context: &Arc<ApplicationContext>, exclusions: Exclusions) -> Self {
        Self::new(ContextSource::<P>::new(context, exclusions))
    }

    /// Stop re-querying the source. Idempotent.
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::SeqCst) {
            log::debug!("Freezing component enumeration for {}", std::any::type_name::<P>());
        }
    }

    /// Freeze and take the snapshot now, returning its size.
    ///
    /// A failing source leaves the enumeration frozen without a snapshot;
    /// the next [`beans`](Self::beans) call retries.
    pub fn capture(&self) -> Result<usize> {
        self.freeze();
        self.beans().map(|beans| beans.len())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// The current list of components
    pub fn beans(&self) -> Result<Vec<Arc<P>>> {
        if !self.is_frozen() {
            return self.source.components();
        }

        let mut snapshot = self.snapshot.lock().map_err(|_| {
            Error::from(ComponentError::Poisoned {
                component: "bean snapshot".to_string(),
            })
        })?;
        if let Some(beans) = snapshot.as_ref() {
            return Ok(beans.clone());
        }

        let beans = self.source.components()?;
        log::debug!(
            "Captured snapshot of {} {} component(s)",
            beans.len(),
            std::any::type_name::<P>()
        );
        *snapshot = Some(beans.clone());
        Ok(beans)
    }
}

impl<P: ?Sized> fmt::Debug for BeansOfType<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeansOfType")
            .field("frozen", &self.frozen.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
