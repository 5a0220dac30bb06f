use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Set `key` to hold the string `value`, replacing any previous value. The key expires after the
/// store's default TTL unless `EXPIRE` moves it later.
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: String,
}

impl Executable for Set {
    fn exec(self, store: &Store) -> Result<Frame, CommandError> {
        store.set(self.key, self.value);
        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_string()?;

        Ok(Self { key, value })
    }
}
