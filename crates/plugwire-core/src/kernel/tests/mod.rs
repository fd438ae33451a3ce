// Kernel test modules
pub mod component_tests;
