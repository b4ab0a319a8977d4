//! Interactive question loop
//!
//! Reads one question per line from any async reader and writes answers to
//! any async writer, so the loop runs the same over a terminal, a pipe or an
//! in-memory buffer.

use anyhow::Result;
use bookgraph_core::QueryEngine;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

pub const PROMPT: &str = "bookgraph> ";

const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "q"];

/// Outcome counts for one session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplStats {
    pub answered: usize,
    pub failed: usize,
}

pub fn is_exit_command(line: &str) -> bool {
    EXIT_COMMANDS
        .iter()
        .any(|command| line.eq_ignore_ascii_case(command))
}

/// Run until an exit command or end of input
///
/// A failed question or an undecodable line is reported on `output` and
/// the loop continues.
pub async fn run_repl<R, W>(engine: &QueryEngine, mut input: R, mut output: W) -> Result<ReplStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut stats = ReplStats::default();

    output
        .write_all(b"Ask for a book recommendation ('exit' to quit).\n")
        .await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            debug!("End of input");
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                stats.failed += 1;
                warn!("Skipping input line that is not UTF-8: {}", e);
                output
                    .write_all(b"Error: input is not valid UTF-8, please re-enter the question\n\n")
                    .await?;
                continue;
            }
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            break;
        }

        match engine.query(question).await {
            Ok(answer) => {
                stats.answered += 1;
                output.write_all(answer.answer.trim_end().as_bytes()).await?;
                output.write_all(b"\n\n").await?;
            }
            Err(e) => {
                stats.failed += 1;
                error!("Query failed: {}", e);
                output.write_all(format!("Error: {}\n\n", e).as_bytes()).await?;
            }
        }
    }

    output.write_all(b"\nGoodbye.\n").await?;
    output.flush().await?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands_ignore_case() {
        for line in ["exit", "QUIT", "Q", "Exit"] {
            assert!(is_exit_command(line), "{line} should exit");
        }
        assert!(!is_exit_command("quite a book"));
        assert!(!is_exit_command(""));
    }
}
