//! Slash-command table.
//!
//! A fixed mapping from literal command strings to canned replies, resolved
//! locally without a network call. Lookup is exact match on the trimmed,
//! lower-cased input; anything else (including unknown `/`-strings) falls
//! through to the remote model.

use crate::session::EntryKind;

/// What a matched command does.
#[derive(Debug, Clone, Copy)]
pub enum CommandReply {
    /// Append a canned transcript entry of the given kind.
    Canned {
        kind: EntryKind,
        text: &'static str,
    },
    /// Reset the session to its seeded state.
    Reset,
}

/// Definition of a slash-command.
#[derive(Debug, Clone, Copy)]
pub struct Command {
    /// Primary name (e.g., "clear") - without the leading slash.
    pub name: &'static str,
    /// Short description shown by /help.
    pub description: &'static str,
    pub reply: CommandReply,
}

const HELP_TEXT: &str = "COMMANDS:\n\
    /help - THIS LIST RIGHT HERE\n\
    /goat - THE GOAT REMINDS YOU WHO THE GOAT IS\n\
    /wisdom - RECEIVE THE WISDOM\n\
    /caps - THE CAPS LOCK DOCTRINE\n\
    /clear - CLEAR THE TERMINAL";

/// Available commands.
pub const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        description: "List available commands",
        reply: CommandReply::Canned {
            kind: EntryKind::System,
            text: HELP_TEXT,
        },
    },
    Command {
        name: "clear",
        description: "Clear the terminal and start over",
        reply: CommandReply::Reset,
    },
    Command {
        name: "goat",
        description: "The GOAT reminds you who the GOAT is",
        reply: CommandReply::Canned {
            kind: EntryKind::Ai,
            text: "GREATEST OF ALL TIME. OF ALL TIME!!! it is Known lol...",
        },
    },
    Command {
        name: "wisdom",
        description: "Receive the wisdom",
        reply: CommandReply::Canned {
            kind: EntryKind::Ai,
            text: "velvet wrist rests are tight yo... and vending machines are a \
                   cry for help... the GOAT's thoughts be racing sometimes...",
        },
    },
    Command {
        name: "caps",
        description: "The caps lock doctrine",
        reply: CommandReply::Canned {
            kind: EntryKind::Ai,
            text: "THE GOAT DONT TYPE IN CAPS CAUSE THE GOAT MAD... THE GOAT TYPE \
                   IN CAPS CAUSE THE GOAT LAZY!!!!!!",
        },
    },
];

/// Resolves input against the command table.
///
/// The input is trimmed and lower-cased, then matched exactly against
/// `/{name}`. Returns `None` for everything else.
pub fn lookup(input: &str) -> Option<&'static Command> {
    let key = input.trim().to_lowercase();
    let name = key.strip_prefix('/')?;
    COMMANDS.iter().find(|c| c.name == name)
}
