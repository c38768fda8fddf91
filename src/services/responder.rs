/// Text put in front of every echoed message.
pub const ECHO_PREFIX: &str = "Echo: ";

/// Deterministic reply strategy: echoes the user's message behind a fixed prefix.
#[derive(Debug, Clone)]
pub struct EchoResponder {
    prefix: String,
}

impl Default for EchoResponder {
    fn default() -> Self {
        Self::new(ECHO_PREFIX)
    }
}

impl EchoResponder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn reply(&self, message: &str) -> String {
        format!("{}{}", self.prefix, message)
    }
}
