pub mod ordering_tests;

use crate::plugin_system::traits::{Ordered, Plugin};

/// Plugin supporting a fixed set of string tags, with an optional order hint
#[derive(Debug)]
pub struct TagPlugin {
    pub name: &'static str,
    pub tags: Vec<&'static str>,
    pub order: Option<i32>,
}

impl TagPlugin {
    pub fn new(name: &'static str, tags: &[&'static str]) -> Self {
        Self {
            name,
            tags: tags.to_vec(),
            order: None,
        }
    }

    pub fn ordered(name: &'static str, tags: &[&'static str], order: i32) -> Self {
        Self {
            order: Some(order),
            ..Self::new(name, tags)
        }
    }
}

impl Ordered for TagPlugin {
    fn order(&self) -> i32 {
        self.order.unwrap_or(crate::plugin_system::LOWEST_PRECEDENCE)
    }
}

impl Plugin<str> for TagPlugin {
    fn supports(&self, delimiter: &str) -> bool {
        self.tags.iter().any(|tag| *tag == delimiter)
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        self.order.map(|_| self as &dyn Ordered)
    }

    fn plugin_name(&self) -> &str {
        self.name
    }
}
