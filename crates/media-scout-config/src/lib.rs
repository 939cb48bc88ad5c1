pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{AppwriteConfig, Config, DiscoveryOptions, TmdbConfig, default_discovery_options};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
