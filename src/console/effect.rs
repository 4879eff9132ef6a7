//! Dispatch output.
//!
//! A dispatch never writes to a socket itself. It collects [`ConsoleEffect`]s
//! which the caller applies in order.

use super::table::Table;
use crate::error::ConsoleError;
use std::fmt;
use tracing::debug;

/// How the process should go down after a fatal command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateKind {
    Restart,
    Shutdown,
}

/// Side effects produced by one console dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEffect {
    /// Send `text` to the caller as if it came from the query `target`.
    Reply { target: String, text: String },
    /// Send a notice to every connected client of every user.
    Broadcast { message: String },
    /// Stop the process after delivering all previous effects.
    Terminate { kind: TerminateKind, message: String },
}

/// Reply sink bound to one reply target.
#[derive(Debug)]
pub struct Output {
    target: String,
    effects: Vec<ConsoleEffect>,
}

impl Output {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            effects: Vec::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Emit one plain line.
    pub fn line(&mut self, text: impl Into<String>) {
        self.effects.push(ConsoleEffect::Reply {
            target: self.target.clone(),
            text: text.into(),
        });
    }

    pub fn success(&mut self, message: impl fmt::Display) {
        self.line(format!("Success: {}", message));
    }

    pub fn usage(&mut self, syntax: impl fmt::Display) {
        self.fail(&ConsoleError::Usage(syntax.to_string()));
    }

    /// Emit a free-form error reported by a command.
    pub fn error(&mut self, message: impl fmt::Display) {
        self.line(format!("Error: {}", message));
    }

    /// Emit a console error in its reply form.
    pub fn fail(&mut self, err: &ConsoleError) {
        debug!(code = err.error_code(), target = %self.target, "Console error");
        self.line(err.to_reply_line());
    }

    pub fn table(&mut self, table: &Table) {
        for line in table.lines() {
            self.line(line);
        }
    }

    pub fn effect(&mut self, effect: ConsoleEffect) {
        self.effects.push(effect);
    }

    pub fn into_effects(self) -> Vec<ConsoleEffect> {
        self.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(out: Output) -> Vec<String> {
        out.into_effects()
            .into_iter()
            .filter_map(|e| match e {
                ConsoleEffect::Reply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn prefixes_distinguish_outcomes() {
        let mut out = Output::new("admin");
        out.success("user 'bob' added");
        out.usage("AddUser <username> <password>");
        out.error("user 'bob' already exists");
        out.fail(&ConsoleError::UnknownCommand);
        assert_eq!(
            texts(out),
            vec![
                "Success: user 'bob' added",
                "Usage: AddUser <username> <password>",
                "Error: user 'bob' already exists",
                "Error: unknown command",
            ]
        );
    }

    #[test]
    fn replies_carry_reply_target() {
        let mut out = Output::new("**alice/freenode");
        out.line("hello");
        assert_eq!(
            out.into_effects(),
            vec![ConsoleEffect::Reply {
                target: "**alice/freenode".to_string(),
                text: "hello".to_string(),
            }]
        );
    }
}
