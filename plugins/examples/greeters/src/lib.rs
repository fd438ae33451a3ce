//! Sample greeter plugins.
//!
//! Every greeter is a `Plugin<str>` selected by language tag. The crate also
//! provides the wiring the `plugwire` binary uses when no file is given.
use std::sync::Arc;

use plugwire_core::config::PluginTypeTable;
use plugwire_core::integration::ServiceMethods;
use plugwire_core::kernel::{ApplicationContext, Result};
use plugwire_core::plugin_system::{Ordered, Plugin};
use serde_json::{Value, json};

/// Name under which [`Greeter`] is declared in a [`PluginTypeTable`]
pub const GREETER_TYPE: &str = "Greeter";

/// Wiring applied when no file is given
pub const DEFAULT_WIRING: &str = r#"
[[registries]]
plugin_type = "Greeter"

[[registries]]
plugin_type = "Greeter"
name = "politeGreeters"
exclusions = ["ShoutingGreeter"]
order = "descending"

[[lists]]
plugin_type = "Greeter"

[[activators]]
channel = "greetings"
registry = "greeterRegistry"
method = "greet"
delimiter = "/headers/lang"

[[activators]]
channel = "greetings-all"
registry = "greeterRegistry"
method = "greet"
lookup = "all"
delimiter = "/headers/lang"
"#;

/// Greets someone in the language the greeter supports
pub trait Greeter: Plugin<str> {
    fn greet(&self, name: &str) -> String;
}

#[derive(Debug, Default)]
pub struct EnglishGreeter;

#[derive(Debug, Default)]
pub struct GermanGreeter;

/// Supports every language; has no order hint so it sorts last
#[derive(Debug, Default)]
pub struct FallbackGreeter;

#[derive(Debug, Default)]
pub struct ShoutingGreeter;

impl Ordered for EnglishGreeter {
    fn order(&self) -> i32 {
        5
    }
}

impl Plugin<str> for EnglishGreeter {
    fn supports(&self, delimiter: &str) -> bool {
        delimiter == "en"
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }

    fn plugin_name(&self) -> &str {
        "EnglishGreeter"
    }
}

impl Greeter for EnglishGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}!", name)
    }
}

impl Ordered for GermanGreeter {
    fn order(&self) -> i32 {
        1
    }
}

impl Plugin<str> for GermanGreeter {
    fn supports(&self, delimiter: &str) -> bool {
        delimiter == "de"
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }

    fn plugin_name(&self) -> &str {
        "GermanGreeter"
    }
}

impl Greeter for GermanGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hallo, {}!", name)
    }
}

impl Plugin<str> for FallbackGreeter {
    fn supports(&self, _delimiter: &str) -> bool {
        true
    }

    fn plugin_name(&self) -> &str {
        "FallbackGreeter"
    }
}

impl Greeter for FallbackGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hi, {}.", name)
    }
}

impl Ordered for ShoutingGreeter {
    fn order(&self) -> i32 {
        10
    }
}

impl Plugin<str> for ShoutingGreeter {
    fn supports(&self, delimiter: &str) -> bool {
        delimiter == "en"
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }

    fn plugin_name(&self) -> &str {
        "ShoutingGreeter"
    }
}

impl Greeter for ShoutingGreeter {
    fn greet(&self, name: &str) -> String {
        format!("HELLO, {}!", name.to_uppercase())
    }
}

/// Register one instance of every greeter, each providing `dyn Greeter`
pub fn register_greeters(context: &ApplicationContext) -> Result<()> {
    context.with_components_mut(|components| {
        components
            .register("englishGreeter", Arc::new(EnglishGreeter))?
            .provides(|it| -> Arc<dyn Greeter> { it });
        components
            .register("germanGreeter", Arc::new(GermanGreeter))?
            .provides(|it| -> Arc<dyn Greeter> { it });
        components
            .register("fallbackGreeter", Arc::new(FallbackGreeter))?
            .provides(|it| -> Arc<dyn Greeter> { it });
        components
            .register("shoutingGreeter", Arc::new(ShoutingGreeter))?
            .provides(|it| -> Arc<dyn Greeter> { it });
        Ok(())
    })?;
    log::debug!("Registered sample greeters");
    Ok(())
}

/// Service methods message activators may call on a greeter
pub fn greeter_methods() -> ServiceMethods<dyn Greeter> {
    ServiceMethods::<dyn Greeter>::new().method("greet", |greeter, message| {
        let name = message
            .payload
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| message.payload.as_str())
            .unwrap_or("stranger");
        Some(json!(greeter.greet(name)))
    })
}

/// Declare [`Greeter`] under [`GREETER_TYPE`]
pub fn declare(table: &mut PluginTypeTable) -> Result<()> {
    table.declare_with_methods::<dyn Greeter, str>(GREETER_TYPE, greeter_methods())
}
