pub mod issuer;
pub mod session;

pub use issuer::{FormIssuer, FormState, Tool};
pub use session::Session;

/// Entry point for the tool pages: holds the shared HTTP client, the relay
/// base URL and the (optional) session credential, and hands out one
/// `FormIssuer` per form.
#[derive(Debug, Clone)]
pub struct ToolsClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ToolsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session: None,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Render authenticated navigation iff a session object is present.
    pub fn authenticated_nav(&self) -> bool {
        self.session.is_some()
    }

    pub fn form(&self, tool: Tool) -> FormIssuer {
        FormIssuer::new(
            self.http.clone(),
            self.base_url.clone(),
            tool,
            self.session.clone(),
        )
    }
}
