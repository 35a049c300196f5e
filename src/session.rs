//! Conversational session state.
//!
//! The [`Session`] owns everything the chat front-ends display or send: the
//! visible transcript, the API-facing turn history, the pending input line,
//! and the busy flag. All mutation goes through [`Session::submit`] and
//! [`Session::reset`], so the turn-taking contract is testable without a
//! terminal or a network.

use std::future::Future;

use anyhow::Result;

use crate::commands::{self, CommandReply};

/// Prefix for error transcript entries produced by a failed completion call.
pub const ERROR_PREFIX: &str = "WE GOT A PROBLEM: ";

/// Display category of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    System,
    User,
    Ai,
    Error,
}

/// A single displayed line of the chat transcript.
///
/// Entries are append-only and never mutated; the only way they disappear
/// is a full reset back to the seeded banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub kind: EntryKind,
    pub text: String,
}

impl TranscriptEntry {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Ai,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Error,
            text: text.into(),
        }
    }
}

/// Speaker of a conversation turn, as seen by the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the conversation history sent to the remote model.
///
/// Mirrors the subset of the transcript that is actual dialogue: system and
/// error entries never become turns, and neither do slash-command replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// The remote completion call, injected so the session is testable offline.
///
/// Implementations receive the full turn history and return the reply text.
/// All failures surface as one human-readable error; the session does not
/// branch on error subtypes.
pub trait CompletionBackend {
    fn complete(&self, turns: &[ConversationTurn]) -> impl Future<Output = Result<String>> + Send;
}

/// A single chat session: transcript, history, pending input, busy flag.
#[derive(Debug)]
pub struct Session {
    seed: TranscriptEntry,
    transcript: Vec<TranscriptEntry>,
    history: Vec<ConversationTurn>,
    input: String,
    busy: bool,
}

impl Session {
    /// Creates a session seeded with the banner as its single system entry.
    pub fn new(banner: impl Into<String>) -> Self {
        let seed = TranscriptEntry::system(banner);
        Self {
            transcript: vec![seed.clone()],
            seed,
            history: Vec::new(),
            input: String::new(),
            busy: false,
        }
    }

    /// Appends a startup error entry (e.g. missing credential).
    ///
    /// Non-fatal: the session stays usable and later submissions surface
    /// their failures through the normal error path.
    pub fn seed_error(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry::error(text));
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Replaces the pending input line.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Resets to the initial seeded state: one system entry, empty history.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.transcript.push(self.seed.clone());
        self.history.clear();
    }

    /// Submits the pending input.
    ///
    /// Blank input or a busy session is a no-op. A matched slash-command is
    /// resolved locally without touching the history. Anything else becomes
    /// a user turn and a remote completion call; the busy flag guarantees at
    /// most one in-flight call per session. Errors never escape: a failed
    /// call becomes one error entry and the user turn is dropped again, so
    /// the history is exactly what it was before the submission.
    pub async fn submit<B: CompletionBackend>(&mut self, backend: &B) {
        if self.input.trim().is_empty() || self.busy {
            return;
        }
        let raw = std::mem::take(&mut self.input);

        if let Some(cmd) = commands::lookup(&raw) {
            self.transcript.push(TranscriptEntry::user(&raw));
            match cmd.reply {
                CommandReply::Canned { kind, text } => {
                    self.transcript.push(TranscriptEntry {
                        kind,
                        text: text.to_string(),
                    });
                }
                CommandReply::Reset => self.reset(),
            }
            return;
        }

        self.transcript.push(TranscriptEntry::user(&raw));
        self.history.push(ConversationTurn::user(&raw));

        self.busy = true;
        match backend.complete(&self.history).await {
            Ok(reply) => {
                self.transcript.push(TranscriptEntry::ai(&reply));
                self.history.push(ConversationTurn::assistant(reply));
            }
            Err(e) => {
                self.transcript
                    .push(TranscriptEntry::error(format!("{ERROR_PREFIX}{e:#}")));
                self.history.pop();
            }
        }
        self.busy = false;
    }
}
