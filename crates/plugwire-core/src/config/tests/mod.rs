// Configuration test modules
#[cfg(all(feature = "toml-config", feature = "yaml-config"))]
pub mod model_tests;
