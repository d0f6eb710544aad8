use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TextMessage {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Help,
    ProfileSaved,
    Profile,
    Today,
    Reset,
    Logged,
    /// Input was rejected; the text says how to fix it.
    Usage,
    /// Estimation failed; nothing was logged and the user may resend.
    Retry,
}

/// What the chat bridge should send back to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    pub fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}
