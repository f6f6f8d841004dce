pub mod api;
pub mod client_trait;
pub mod config;
pub mod error;

pub use api::client::CompletionClient;
pub use api::models::{CompletionParams, Message};
pub use client_trait::CompletionClientTrait;
pub use config::{Config, ConfigError};
pub use error::{ClientBuildError, CompletionError};
