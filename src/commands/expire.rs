use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Set a timeout of `seconds` on an existing `key`, replacing the current one. Zero or a negative
/// number expires the key right away.
#[derive(Debug, PartialEq)]
pub struct Expire {
    pub key: String,
    pub seconds: i64,
}

impl Executable for Expire {
    fn exec(self, store: &Store) -> Result<Frame, CommandError> {
        store.expire(&self.key, self.seconds)?;
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Expire {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let seconds = parser.next_integer()?;

        Ok(Self { key, seconds })
    }
}
