//! Interactive chat front-end.
//!
//! A line-oriented REPL over the session controller. Reads user input from
//! `input`, writes the transcript to `output`, and exits on `:q` or EOF.
//! All conversational behavior lives in [`crate::session`]; this module
//! only reads lines and renders entries.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::config::Config;
use crate::providers::{OpenAiClient, OpenAiConfig};
use crate::session::{CompletionBackend, EntryKind, Session, TranscriptEntry};

const QUIT_COMMAND: &str = ":q";
const PROMPT_PREFIX: &str = "> ";
const AI_PREFIX: &str = "GOAT: ";
const SYSTEM_TAG: &str = "[GOAT]";

/// Banner seeded as the session's initial system entry.
pub const BANNER: &str = "GOAT TERMINAL v1.0 - THE GOAT IS IN THE BUILDING";

/// Seeded error entry shown when no credential is configured.
pub const MISSING_KEY_MESSAGE: &str =
    "THE GOAT NEEDS AN API KEY TO SPEAK. SET OPENAI_API_KEY.";

/// Builds the seeded session for a fresh chat.
pub fn seeded_session(has_credential: bool) -> Session {
    let mut session = Session::new(BANNER);
    if !has_credential {
        session.seed_error(MISSING_KEY_MESSAGE);
    }
    session
}

fn render_entry<W: Write>(output: &mut W, entry: &TranscriptEntry) -> std::io::Result<()> {
    match entry.kind {
        EntryKind::System => writeln!(output, "{SYSTEM_TAG} {}", entry.text),
        // The typed line is already on screen in a terminal REPL.
        EntryKind::User => Ok(()),
        EntryKind::Ai => writeln!(output, "{AI_PREFIX}{}", entry.text),
        EntryKind::Error => writeln!(output, "{}", entry.text),
    }
}

/// Renders everything appended since `from`.
///
/// A reset shrinks the transcript below `from`; in that case the cleared
/// terminal is re-seeded by rendering from the top again.
fn render_new_entries<W: Write>(
    output: &mut W,
    session: &Session,
    from: usize,
) -> std::io::Result<()> {
    let from = if session.transcript().len() < from {
        0
    } else {
        from
    };
    for entry in &session.transcript()[from..] {
        render_entry(output, entry)?;
    }
    Ok(())
}

/// Runs the interactive chat loop.
///
/// Generic over input/output so tests can drive it with buffers.
pub async fn run_chat<R, W, B>(
    input: R,
    output: &mut W,
    backend: &B,
    session: &mut Session,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    B: CompletionBackend,
{
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        // Handle quit command
        if trimmed == QUIT_COMMAND {
            writeln!(output, "Goodbye!")?;
            break;
        }

        // Skip empty lines
        if trimmed.is_empty() {
            write!(output, "{PROMPT_PREFIX}")?;
            output.flush()?;
            continue;
        }

        let before = session.transcript().len();
        session.set_input(line);
        session.submit(backend).await;
        render_new_entries(output, session, before)?;

        write!(output, "{PROMPT_PREFIX}")?;
        output.flush()?;
    }

    Ok(())
}

/// Runs the chat loop on stdin/stdout with a client built from config.
pub async fn run_interactive_chat(config: &Config) -> Result<()> {
    let instruction = config.effective_persona_prompt()?;
    let api_config = OpenAiConfig::from_env(
        config.model.clone(),
        config.temperature,
        config.effective_base_url(),
    )?;
    let has_credential = api_config.has_credential();
    let client = OpenAiClient::new(api_config, instruction);
    let mut session = seeded_session(has_credential);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for entry in session.transcript() {
        render_entry(&mut stdout, entry)?;
    }
    writeln!(stdout, "(type :q to quit, /help for commands)")?;
    write!(stdout, "{PROMPT_PREFIX}")?;
    stdout.flush()?;

    run_chat(stdin.lock(), &mut stdout, &client, &mut session).await
}

/// Sends a single prompt through the session and prints the reply.
///
/// Unlike the interactive loop, a failed completion here becomes a process
/// error: there is no transcript to keep living in.
pub async fn run_exec<W: Write>(output: &mut W, config: &Config, prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        anyhow::bail!("No prompt provided");
    }

    let instruction = config.effective_persona_prompt()?;
    let api_config = OpenAiConfig::from_env(
        config.model.clone(),
        config.temperature,
        config.effective_base_url(),
    )?;
    let client = OpenAiClient::new(api_config, instruction);

    let mut session = Session::new(BANNER);
    session.set_input(prompt);
    session.submit(&client).await;

    match session.transcript().last() {
        Some(entry) if entry.kind == EntryKind::Ai => {
            writeln!(output, "{}", entry.text)?;
            Ok(())
        }
        Some(entry) if entry.kind == EntryKind::Error => {
            anyhow::bail!("{}", entry.text)
        }
        _ => Ok(()),
    }
}
