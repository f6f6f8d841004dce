/// A typed session credential issued by the external auth service.
///
/// Replaces the old presence-flag-in-browser-storage approach: the UI
/// contract is "render authenticated nav iff a session object is present",
/// and the token rides along as a bearer credential on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
