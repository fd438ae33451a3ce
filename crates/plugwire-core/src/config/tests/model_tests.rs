use std::fs;
use std::path::Path;

use tempfile::tempdir;

use crate::config::error::ConfigError;
use crate::config::format::ConfigFormat;
use crate::config::model::WiringConfig;
use crate::integration::handler::LookupMethod;
use crate::plugin_system::ordering::SortOrder;

const TOML_WIRING: &str = r#"
[[registries]]
plugin_type = "Greeter"
qualifier = "greeters"
exclusions = ["ShoutingGreeter"]
order = "descending"

[[lists]]
plugin_type = "Greeter"

[[activators]]
channel = "greetings"
registry = "greeters"
method = "greet"
lookup = "all"
delimiter = "/headers/lang"
"#;

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("wiring.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("WIRING.TOML")), Some(ConfigFormat::Toml));
    assert_eq!(ConfigFormat::from_path(Path::new("wiring.yml")), Some(ConfigFormat::Yaml));
    assert_eq!(ConfigFormat::from_path(Path::new("wiring.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("wiring")), None);
    assert_eq!(ConfigFormat::Yaml.extension(), "yaml");
}

#[test]
fn test_parse_toml_with_defaults() {
    let config = WiringConfig::from_str(TOML_WIRING, ConfigFormat::Toml).unwrap();

    let registry = &config.registries[0];
    assert_eq!(registry.plugin_type, "Greeter");
    assert_eq!(registry.name, None);
    assert_eq!(registry.qualifier.as_deref(), Some("greeters"));
    assert_eq!(registry.exclusions, vec!["ShoutingGreeter"]);
    assert_eq!(registry.order, SortOrder::Descending);

    assert_eq!(config.lists.len(), 1);
    assert!(config.lists[0].exclusions.is_empty());

    let activator = &config.activators[0];
    assert_eq!(activator.lookup, LookupMethod::All);
    assert_eq!(activator.delimiter.as_deref(), Some("/headers/lang"));
}

#[test]
fn test_missing_sections_default_to_empty() {
    let config = WiringConfig::from_str(r#"{ "registries": [ { "plugin_type": "Greeter" } ] }"#, ConfigFormat::Json).unwrap();

    assert_eq!(config.registries[0].order, SortOrder::Ascending);
    assert!(config.lists.is_empty());
    assert!(config.activators.is_empty());
    assert!(!config.is_empty());
    assert!(WiringConfig::from_str("{}", ConfigFormat::Json).unwrap().is_empty());
}

#[test]
fn test_load_each_format_from_disk() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let expected = WiringConfig::from_str(TOML_WIRING, ConfigFormat::Toml).unwrap();

    let toml_path = dir.path().join("wiring.toml");
    fs::write(&toml_path, TOML_WIRING).unwrap();
    assert_eq!(WiringConfig::load(&toml_path).unwrap(), expected);

    let json_path = dir.path().join("wiring.json");
    fs::write(&json_path, serde_json::to_string_pretty(&expected).unwrap()).unwrap();
    assert_eq!(WiringConfig::load(&json_path).unwrap(), expected);

    let yaml_path = dir.path().join("wiring.yaml");
    fs::write(&yaml_path, serde_yaml::to_string(&expected).unwrap()).unwrap();
    assert_eq!(WiringConfig::load(&yaml_path).unwrap(), expected);
}

#[test]
fn test_load_errors() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let unsupported = WiringConfig::load(dir.path().join("wiring.ini")).unwrap_err();
    assert!(matches!(unsupported, ConfigError::UnsupportedFormat(_)));

    let missing = WiringConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    let broken_path = dir.path().join("broken.json");
    fs::write(&broken_path, "{ not json").unwrap();
    match WiringConfig::load(&broken_path).unwrap_err() {
        ConfigError::Parse { format, .. } => assert_eq!(format, "json"),
        other => panic!("Expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_unknown_lookup_method_is_a_parse_error() {
    let data = r#"{ "activators": [ { "channel": "c", "registry": "r", "method": "m", "lookup": "some" } ] }"#;

    assert!(matches!(
        WiringConfig::from_str(data, ConfigFormat::Json),
        Err(ConfigError::Parse { .. })
    ));
}
