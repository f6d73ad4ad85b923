mod r#static;
pub use r#static::StaticKeyProvider;

mod env;
pub use env::EnvKeyProvider;

mod config;
pub use config::ConfigKeyProvider;

mod account_metadata;
pub use account_metadata::AccountMetadataKeyProvider;

mod default;
pub use default::DefaultKeyProvider;
