//! Slash-command text parsing.

use std::fmt;

use crate::error::{Error, Result};

/// Command verbs understood by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Status,
    Start,
    Stop,
    List,
    ListRetain,
    Retain,
    Drop,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Status => "status",
            Verb::Start => "start",
            Verb::Stop => "stop",
            Verb::List => "list",
            Verb::ListRetain => "list retain",
            Verb::Retain => "retain",
            Verb::Drop => "drop",
        }
    }

    /// Verbs that act on one alias and default it to the requesting user
    pub fn takes_target(&self) -> bool {
        !matches!(self, Verb::List | Verb::ListRetain)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    /// Explicit alias, when one was typed
    pub target: Option<String>,
    /// Every token after the verb, as typed
    pub args: Vec<String>,
}

impl Command {
    /// Parse command text.
    ///
    /// The first whitespace-separated token is the verb (case-insensitive).
    /// `list retain` is its own verb; `list` followed by anything else and
    /// unknown verbs are usage errors.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let first = tokens.next().ok_or(Error::Usage)?.to_lowercase();
        let args: Vec<String> = tokens.map(String::from).collect();

        let verb = match first.as_str() {
            "list" => match args.first() {
                None => Verb::List,
                Some(arg) if arg.eq_ignore_ascii_case("retain") => Verb::ListRetain,
                Some(_) => return Err(Error::Usage),
            },
            "status" => Verb::Status,
            "start" => Verb::Start,
            "stop" => Verb::Stop,
            "retain" => Verb::Retain,
            "drop" => Verb::Drop,
            _ => return Err(Error::Usage),
        };

        let target = if verb.takes_target() {
            args.first().cloned()
        } else {
            None
        };

        Ok(Self { verb, target, args })
    }

    /// Alias this command acts on: the explicit target or the user's name
    pub fn resolve_target<'a>(&'a self, user: &'a str) -> &'a str {
        self.target.as_deref().unwrap_or(user)
    }
}
