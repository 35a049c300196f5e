use serde::{Deserialize, Serialize};

use crate::session::ConversationTurn;

// === API Request Types ===

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: Vec<ApiMessage<'a>>,
    pub(crate) temperature: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiMessage<'a> {
    pub(crate) role: &'static str,
    pub(crate) content: &'a str,
}

impl<'a> ApiMessage<'a> {
    pub(crate) fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub(crate) fn from_turn(turn: &'a ConversationTurn) -> Self {
        Self {
            role: turn.role.as_str(),
            content: &turn.text,
        }
    }
}

// === API Response Types ===

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub(crate) choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub(crate) message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first completion candidate, if any.
    pub(crate) fn first_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
    }
}
