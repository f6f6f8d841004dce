//! Request/response bodies for the completion endpoints.
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Body accepted by every completion endpoint. A missing or non-string
/// `text` fails JSON deserialization before a handler runs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompletionRequestBody {
    pub text: String,
}

impl CompletionRequestBody {
    /// Uniform boundary validation: whitespace-only input is rejected for
    /// every capability, not just the chatbot.
    pub fn validated(self) -> Result<String, AppError> {
        if self.text.trim().is_empty() {
            return Err(AppError::InvalidInput);
        }
        Ok(self.text)
    }
}
