// Support test modules
pub mod bean_list_tests;
pub mod registry_factory_tests;

use std::sync::Arc;

use crate::kernel::context::ApplicationContext;
use crate::plugin_system::traits::{Ordered, Plugin};

/// Capability registered in test contexts
pub trait Handler: Plugin<str> {
    fn id(&self) -> &'static str;
}

#[derive(Debug)]
pub struct Prefixed {
    pub id: &'static str,
    pub prefix: &'static str,
    pub order: i32,
}

#[derive(Debug)]
pub struct CatchAll;

impl Ordered for Prefixed {
    fn order(&self) -> i32 {
        self.order
    }
}

impl Plugin<str> for Prefixed {
    fn supports(&self, delimiter: &str) -> bool {
        delimiter.starts_with(self.prefix)
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }

    fn plugin_name(&self) -> &str {
        self.id
    }
}

impl Handler for Prefixed {
    fn id(&self) -> &'static str {
        self.id
    }
}

impl Plugin<str> for CatchAll {
    fn supports(&self, _delimiter: &str) -> bool {
        true
    }
}

impl Handler for CatchAll {
    fn id(&self) -> &'static str {
        "catch-all"
    }
}

pub fn register_prefixed(context: &ApplicationContext, id: &'static str, prefix: &'static str, order: i32) {
    context
        .with_components_mut(|components| {
            components
                .register(id, Arc::new(Prefixed { id, prefix, order }))?
                .provides(|it| -> Arc<dyn Handler> { it });
            Ok(())
        })
        .unwrap();
}

pub fn register_catch_all(context: &ApplicationContext) {
    context
        .with_components_mut(|components| {
            components
                .register("catch-all", Arc::new(CatchAll))?
                .provides(|it| -> Arc<dyn Handler> { it });
            Ok(())
        })
        .unwrap();
}

pub fn ids(handlers: &[Arc<dyn Handler>]) -> Vec<&'static str> {
    handlers.iter().map(|handler| handler.id()).collect()
}
