mod r#static;
pub use r#static::StaticCredentialProvider;

mod env;
pub use env::EnvCredentialProvider;

mod tempauth;
pub use tempauth::TempAuthCredentialProvider;

mod default;
pub use default::DefaultCredentialProvider;
