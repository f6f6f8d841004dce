use completion_client::{CompletionParams, Message};

const YODA_PERSONA: &str = "You are Yoda from Star Wars. Answer questions in Yoda's style.";

/// The text-generation utilities this service relays. Each capability owns
/// its prompt template, sampling parameters and the message shown when the
/// upstream fails without an explanation of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Summary,
    Paragraph,
    Chatbot,
    JsConvert,
}

impl Capability {
    /// Builds the prompt sequence: always exactly one user message, plus a
    /// fixed persona system message for the chatbot only.
    pub fn messages(&self, text: &str) -> Vec<Message> {
        match self {
            Capability::Summary => vec![Message::user(format!("Summarize this: {text}"))],
            Capability::Paragraph => {
                vec![Message::user(format!(
                    "Write a detailed paragraph about: {text}"
                ))]
            }
            Capability::Chatbot => vec![Message::system(YODA_PERSONA), Message::user(text)],
            Capability::JsConvert => {
                vec![Message::user(format!(
                    "Convert these instructions into JavaScript code: {text}"
                ))]
            }
        }
    }

    pub fn params(&self) -> CompletionParams {
        match self {
            Capability::Summary | Capability::Paragraph => CompletionParams {
                max_tokens: 500,
                temperature: 0.5,
            },
            Capability::Chatbot => CompletionParams {
                max_tokens: 300,
                temperature: 0.7,
            },
            Capability::JsConvert => CompletionParams {
                max_tokens: 400,
                temperature: 0.25,
            },
        }
    }

    /// Shown when the upstream fails without supplying its own message.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Capability::Summary => "Failed to summarize text",
            Capability::Paragraph => "Failed to generate paragraph",
            Capability::Chatbot => "Error processing your request",
            Capability::JsConvert => "Failed to convert to JavaScript",
        }
    }
}
