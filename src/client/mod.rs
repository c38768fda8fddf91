//! Chat client: the message list, the draft input and the pending flag that
//! the browser UI keeps, driven against any [`ChatTransport`].
//!
//! At most one exchange is in flight per client. A submit made while one is
//! pending, or with blank text, is refused without touching the history.

pub mod history;
pub mod transport;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

pub use history::{ChatMessage, ChatView, Sender};
pub use transport::{ChatTransport, ClientError, HttpTransport};

use crate::message::{ChatRequest, normalize_message};

/// Bot line shown when the exchange fails for any reason.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub const TYPING_INDICATOR: &str = "Bot is typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service answered and its reply was appended.
    Answered,
    /// The exchange failed; [`ERROR_REPLY`] was appended.
    Failed,
    /// Blank text or a reply still pending; nothing changed.
    Rejected,
}

pub struct ChatClient<T> {
    transport: T,
    view: Mutex<ChatView>,
}

impl<T: ChatTransport> ChatClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            view: Mutex::new(ChatView::default()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Copy of the current UI state.
    pub fn view(&self) -> ChatView {
        self.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    /// Sends `text` as a user message.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let Some(message) = self.begin(Some(text)) else {
            return SubmitOutcome::Rejected;
        };
        self.exchange(message).await
    }

    /// Sends the draft input, clearing it once the message is accepted.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let Some(message) = self.begin(None) else {
            return SubmitOutcome::Rejected;
        };
        self.exchange(message).await
    }

    /// Checks and claims the pending slot in one critical section, then
    /// appends the user message. `None` means the submit is refused.
    fn begin(&self, text: Option<&str>) -> Option<String> {
        let mut view = self.lock();
        if view.pending {
            debug!("submit refused: reply pending");
            return None;
        }

        let message = match text {
            Some(text) => normalize_message(text)?.to_string(),
            None => {
                let message = normalize_message(&view.input)?.to_string();
                view.input.clear();
                message
            }
        };

        view.messages.push(ChatMessage::user(message.clone()));
        view.pending = true;
        Some(message)
    }

    async fn exchange(&self, message: String) -> SubmitOutcome {
        let pending = PendingGuard::new(&self.view);
        let request = ChatRequest::new(message);

        match self.transport.send(&request).await {
            Ok(resp) => {
                pending.finish(resp.response);
                SubmitOutcome::Answered
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                pending.finish(ERROR_REPLY);
                SubmitOutcome::Failed
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatView> {
        lock_view(&self.view)
    }
}

fn lock_view(view: &Mutex<ChatView>) -> MutexGuard<'_, ChatView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the pending flag however the exchange ends. Dropped without
/// `finish` (the submit future was dropped or the transport panicked), it
/// appends [`ERROR_REPLY`].
struct PendingGuard<'a> {
    view: &'a Mutex<ChatView>,
    done: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(view: &'a Mutex<ChatView>) -> Self {
        Self { view, done: false }
    }

    fn finish(mut self, reply: impl Into<String>) {
        self.complete(reply.into());
    }

    fn complete(&mut self, reply: String) {
        if self.done {
            return;
        }
        self.done = true;
        let mut view = lock_view(self.view);
        view.messages.push(ChatMessage::bot(reply));
        view.pending = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.complete(ERROR_REPLY.to_string());
    }
}

/// Transcript lines for `view`, with the typing indicator last while a reply
/// is pending.
pub fn render(view: &ChatView) -> Vec<String> {
    let mut lines: Vec<String> = view
        .messages
        .iter()
        .map(|m| match m.sender {
            Sender::User => format!("You: {}", m.text),
            Sender::Bot => format!("Bot: {}", m.text),
        })
        .collect();
    if view.pending {
        lines.push(TYPING_INDICATOR.to_string());
    }
    lines
}
