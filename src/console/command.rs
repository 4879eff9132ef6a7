//! Command descriptors.

use super::effect::Output;
use super::permission::Principal;
use super::scope::Scope;
use crate::state::Host;

/// Everything a command needs to run.
///
/// Commands validate their own arguments and report through `out`; nothing
/// is returned to the dispatcher.
pub struct CommandContext<'a> {
    pub host: &'a mut Host,
    pub principal: &'a Principal,
    pub out: &'a mut Output,
}

pub type Exec<S> = fn(&mut CommandContext<'_>, &<S as Scope>::Key, &str);

/// A free-form command of scope type `S`.
pub struct Command<S: Scope> {
    /// First whitespace-delimited token is the verb.
    pub syntax: &'static str,
    pub description: &'static str,
    pub exec: Exec<S>,
}

impl<S: Scope> Command<S> {
    pub fn verb(&self) -> &'static str {
        self.syntax.split_whitespace().next().unwrap_or(self.syntax)
    }
}

/// Split off the next whitespace-delimited token.
pub fn next_token(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_token_splits_on_first_whitespace() {
        assert_eq!(next_token("Set Motd hello  world"), ("Set", "Motd hello  world"));
        assert_eq!(next_token("  Help"), ("Help", ""));
        assert_eq!(next_token(""), ("", ""));
    }
}
