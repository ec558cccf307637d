//! Line-oriented interactive review session.

use std::io::{BufRead, Write};

use crate::cli::commands::{EXAMPLE_REVIEWS, classify};
use crate::error::Result;
use crate::pipeline::SentimentPipeline;
use crate::session::SessionHistory;

const PROMPT: &str = "review> ";

const HELP: &str = "\
Type a review and press enter to classify it.
Commands:
  :history     list analyzed reviews, newest first
  :reset       clear the history
  :examples    classify the built-in example reviews
  :example N   classify example review N
  :help        show this message
  :quit        leave the session
Start a review with :: to analyze text beginning with a colon.";

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Review text exactly as typed, minus an escaping colon.
    Review(String),
    Blank,
    History,
    Reset,
    Examples,
    /// 1-based example number.
    Example(usize),
    Help,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return SessionCommand::Blank;
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            return SessionCommand::Review(line.to_string());
        };
        if command.starts_with(':') {
            let indent = line.len() - line.trim_start().len();
            return SessionCommand::Review(format!("{}{}", &line[..indent], &line[indent + 1..]));
        }

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("history"), None, _) => SessionCommand::History,
            (Some("reset"), None, _) => SessionCommand::Reset,
            (Some("examples"), None, _) => SessionCommand::Examples,
            (Some("example"), Some(n), None) => match n.parse() {
                Ok(n) => SessionCommand::Example(n),
                Err(_) => SessionCommand::Unknown(trimmed.to_string()),
            },
            (Some("help"), None, _) => SessionCommand::Help,
            (Some("quit") | Some("exit"), None, _) => SessionCommand::Quit,
            _ => SessionCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Interactive session over a loaded pipeline, keeping an in-memory history.
pub struct InteractiveSession {
    pipeline: SentimentPipeline,
    history: SessionHistory,
}

impl InteractiveSession {
    pub fn new(pipeline: SentimentPipeline) -> Self {
        InteractiveSession {
            pipeline,
            history: SessionHistory::new(),
        }
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Read lines from `input` until end of input or `:quit`.
    ///
    /// Errors from a single review are reported and the session continues;
    /// only I/O failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "Product review sentiment analysis. Type :help for commands.")?;
        write!(out, "{PROMPT}")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            match SessionCommand::parse(&line) {
                SessionCommand::Quit => break,
                command => self.handle(command, out)?,
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }

        writeln!(out)?;
        log::info!("session ended after {} reviews", self.history.len());
        Ok(())
    }

    fn handle<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<()> {
        match command {
            SessionCommand::Review(review) => self.review(&review, out)?,
            SessionCommand::Blank => writeln!(out, "Please enter a review!")?,
            SessionCommand::History => self.show_history(out)?,
            SessionCommand::Reset => {
                self.history.clear();
                writeln!(out, "History cleared.")?;
            }
            SessionCommand::Examples => {
                for review in EXAMPLE_REVIEWS {
                    writeln!(out, "Review: {review}")?;
                    self.review(review, out)?;
                }
            }
            SessionCommand::Example(n) => {
                match n.checked_sub(1).and_then(|i| EXAMPLE_REVIEWS.get(i)) {
                    Some(review) => {
                        writeln!(out, "Review: {review}")?;
                        self.review(review, out)?;
                    }
                    None => writeln!(
                        out,
                        "Choose an example between 1 and {}.",
                        EXAMPLE_REVIEWS.len()
                    )?,
                }
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Unknown(input) => {
                writeln!(out, "Unknown command: {input}. Type :help for commands.")?
            }
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn review<W: Write>(&mut self, review: &str, out: &mut W) -> Result<()> {
        match classify(&self.pipeline, review) {
            Ok(result) => {
                writeln!(out, "{result}")?;
                self.history.record(review, &result.prediction);
            }
            Err(e) => {
                log::warn!("failed to analyze review: {e}");
                writeln!(out, "Error: {e}")?;
            }
        }
        Ok(())
    }

    fn show_history<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.history.is_empty() {
            writeln!(out, "No reviews analyzed yet.")?;
            return Ok(());
        }

        for entry in self.history.newest_first() {
            writeln!(
                out,
                "{} | {} ({:.2}) | {}",
                entry.submitted_at.format("%Y-%m-%d %H:%M:%S"),
                entry.label,
                entry.confidence,
                entry.review
            )?;
        }
        Ok(())
    }
}
