// src/state.rs
use std::sync::Arc;

use crate::services::responder::EchoResponder;

pub type SharedState = Arc<AppState>;

/// Read-only dependencies handed to every handler. Holds no per-request data.
#[derive(Debug, Default)]
pub struct AppState {
    pub responder: EchoResponder,
}

impl AppState {
    pub fn new(responder: EchoResponder) -> Self {
        Self { responder }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
