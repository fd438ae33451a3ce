use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Subcommand;
use serde_json::Value;

use greeters::Greeter;
use plugwire_core::config::{ConfigFormat, PluginRegistriesRegistrar, PluginTypeTable, WiringConfig};
use plugwire_core::integration::{Message, SharedMessageDispatcher, create_dispatcher};
use plugwire_core::kernel::{ApplicationContext, Error, Result};
use plugwire_core::plugin_system::{PluginRegistry, RegistryError};
use plugwire_core::support::{FactoryDescriptor, PluginRegistryFactory};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every registry and list bean with its plugins in order
    Registries {
        /// Wiring file (.json, .yaml, .toml); the built-in wiring when absent
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Look up the greeter(s) supporting a language in a registry
    Lookup {
        /// Bean name of the registry
        registry: String,
        /// Language tag handed to every plugin's `supports`
        delimiter: String,
        /// Print every supporting plugin instead of the first
        #[arg(long)]
        all: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Send a message to a channel and print the replies as JSON
    Route {
        channel: String,
        /// Message payload as JSON; plain text is sent as a JSON string
        #[arg(long, default_value = "{}")]
        payload: String,
        /// Message header as KEY=VALUE, repeatable
        #[arg(long = "header", value_name = "KEY=VALUE")]
        headers: Vec<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// A refreshed context with the sample greeters and the applied wiring
struct Wiring {
    context: Arc<ApplicationContext>,
    dispatcher: SharedMessageDispatcher,
}

async fn bootstrap(config_path: Option<&Path>) -> Result<Wiring> {
    let config = match config_path {
        Some(path) => WiringConfig::load(path)?,
        None => WiringConfig::from_str(greeters::DEFAULT_WIRING, ConfigFormat::Toml)?,
    };

    let context = ApplicationContext::new();
    greeters::register_greeters(&context)?;
    let mut table = PluginTypeTable::new();
    greeters::declare(&mut table)?;

    let dispatcher = create_dispatcher();
    let applied = PluginRegistriesRegistrar::apply(&config, &table, &context, &dispatcher).await?;
    log::info!(
        "Applied wiring: {} registries, {} lists, {} activators",
        applied.registries.len(),
        applied.lists.len(),
        applied.activators.len()
    );
    context.refresh()?;

    Ok(Wiring { context, dispatcher })
}

pub async fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Registries { config } => {
            let wiring = bootstrap(config.as_deref()).await?;
            list_registries(&wiring.context)
        }
        Commands::Lookup {
            registry,
            delimiter,
            all,
            config,
        } => {
            let wiring = bootstrap(config.as_deref()).await?;
            lookup(&wiring.context, &registry, &delimiter, all)
        }
        Commands::Route {
            channel,
            payload,
            headers,
            config,
        } => {
            let wiring = bootstrap(config.as_deref()).await?;
            let message = build_message(&payload, &headers)?;
            let replies = wiring.dispatcher.dispatch(&channel, &message).await?;
            for reply in replies {
                println!("{}", reply);
            }
            Ok(())
        }
    }
}

fn list_registries(context: &ApplicationContext) -> Result<()> {
    let names = context.with_components(|components| components.names_providing::<dyn FactoryDescriptor>())?;
    if names.is_empty() {
        println!("No registries defined.");
        return Ok(());
    }

    for name in names {
        let descriptor = context.get_provided::<dyn FactoryDescriptor>(&name)?;
        let plugins = descriptor.plugin_names()?;
        println!(
            "{} ({} of {}): [{}]",
            name,
            descriptor.kind(),
            descriptor.plugin_type(),
            plugins.join(", ")
        );
    }
    Ok(())
}

fn lookup(context: &ApplicationContext, registry_name: &str, delimiter: &str, all: bool) -> Result<()> {
    let factory = context.get::<PluginRegistryFactory<dyn Greeter, str>>(registry_name)?;
    let registry = factory.registry()?;
    let not_found = || RegistryError::not_found(delimiter, registry.iter().map(|plugin| plugin.plugin_name()));

    let selected: Vec<Arc<dyn Greeter>> = if all {
        registry.plugins_for_or_else(delimiter, not_found)?
    } else {
        vec![registry.plugin_for_or_else(delimiter, not_found)?]
    };

    for greeter in selected {
        println!("{}", greeter.plugin_name());
    }
    Ok(())
}

fn build_message(payload: &str, headers: &[String]) -> Result<Message> {
    let payload = parse_value(payload);
    headers.iter().try_fold(Message::new(payload), |message, header| {
        let (key, value) = header
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| Error::from(format!("Invalid header '{}', expected KEY=VALUE", header)))?;
        Ok(message.with_header(key.trim(), parse_value(value)))
    })
}

/// JSON when it parses, a plain string otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
