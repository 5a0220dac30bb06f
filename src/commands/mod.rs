pub mod del;
pub mod executable;
pub mod exists;
pub mod expire;
pub mod get;
pub mod ping;
pub mod set;
pub mod ttl;

use std::vec;
use strum_macros::{EnumString, IntoStaticStr};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::{Store, StoreError};

use del::Del;
use exists::Exists;
use expire::Expire;
use get::Get;
use ping::Ping;
use set::Set;
use ttl::Ttl;

#[derive(Debug, PartialEq)]
pub enum Command {
    Del(Del),
    Exists(Exists),
    Expire(Expire),
    Get(Get),
    Ping(Ping),
    Set(Set),
    Ttl(Ttl),
}

impl Executable for Command {
    fn exec(self, store: &Store) -> Result<Frame, CommandError> {
        match self {
            Command::Del(cmd) => cmd.exec(store),
            Command::Exists(cmd) => cmd.exec(store),
            Command::Expire(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Ttl(cmd) => cmd.exec(store),
        }
    }
}

/// The verbs the server understands. Matching ignores ASCII case; the lowercase name is what
/// error messages refer to.
#[derive(Debug, Clone, Copy, PartialEq, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
enum Verb {
    Del,
    Exists,
    Expire,
    Get,
    Ping,
    Set,
    Ttl,
}

impl Verb {
    /// Exact number of arguments following the verb.
    fn arity(self) -> usize {
        match self {
            Verb::Ping => 0,
            Verb::Del | Verb::Exists | Verb::Get | Verb::Ttl => 1,
            Verb::Expire | Verb::Set => 2,
        }
    }

    fn name(self) -> &'static str {
        self.into()
    }
}

impl TryFrom<Vec<String>> for Command {
    type Error = CommandError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();

        let verb = parts
            .next()
            .and_then(|name| name.parse::<Verb>().ok())
            .ok_or(CommandError::UnknownCommand)?;

        if parts.len() != verb.arity() {
            return Err(CommandError::WrongArity {
                command: verb.name().to_string(),
            });
        }

        let parser = &mut CommandParser { verb, parts };

        match verb {
            Verb::Del => Del::try_from(parser).map(Command::Del),
            Verb::Exists => Exists::try_from(parser).map(Command::Exists),
            Verb::Expire => Expire::try_from(parser).map(Command::Expire),
            Verb::Get => Get::try_from(parser).map(Command::Get),
            Verb::Ping => Ping::try_from(parser).map(Command::Ping),
            Verb::Set => Set::try_from(parser).map(Command::Set),
            Verb::Ttl => Ttl::try_from(parser).map(Command::Ttl),
        }
    }
}

/// Runs one tokenized command line against the store and renders the outcome, success or
/// failure, as the response line.
pub fn dispatch(parts: Vec<String>, store: &Store) -> Frame {
    match Command::try_from(parts).and_then(|cmd| cmd.exec(store)) {
        Ok(frame) => frame,
        Err(err) => Frame::Error(err.to_string()),
    }
}

pub(crate) struct CommandParser {
    verb: Verb,
    parts: vec::IntoIter<String>,
}

impl CommandParser {
    fn next_string(&mut self) -> Result<String, CommandError> {
        self.parts.next().ok_or_else(|| CommandError::WrongArity {
            command: self.verb.name().to_string(),
        })
    }

    fn next_integer(&mut self) -> Result<i64, CommandError> {
        self.next_string()?
            .parse::<i64>()
            .map_err(|_| CommandError::NotAnInteger)
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("wrong number of arguments for '{command}' command")]
    WrongArity { command: String },
    #[error("unknown command")]
    UnknownCommand,
    #[error("data doesn't exist")]
    KeyNotFound,
    #[error("data expired")]
    KeyExpired,
    #[error("value is not an integer or out of range")]
    NotAnInteger,
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::KeyNotFound => CommandError::KeyNotFound,
            StoreError::KeyExpired => CommandError::KeyExpired,
        }
    }
}
