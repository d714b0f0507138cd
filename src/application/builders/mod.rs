pub mod config_builder;
