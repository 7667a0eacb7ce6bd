pub mod catalog;
pub mod constants;
pub mod daily;
pub mod date_key;
pub mod env_config;
pub mod error;
pub mod file_store;
pub mod kv_store;
pub mod normalize;
pub mod server;
pub mod stats;
pub mod store;
pub mod types;
