use async_trait::async_trait;

use crate::api::models::{CompletionParams, Message};
use crate::error::CompletionError;

/// Seam between request handlers and the upstream API. Handlers hold an
/// `Arc<dyn CompletionClientTrait>` so tests can substitute a mock.
#[async_trait]
pub trait CompletionClientTrait: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        params: CompletionParams,
    ) -> Result<String, CompletionError>;
}
