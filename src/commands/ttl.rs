use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::{self, Store, StoreError};

/// TTL returns the remaining time to live of a key, in whole seconds rounded up. A missing (or
/// just expired) key answers `-1`; a key without a timeout says so.
#[derive(Debug, PartialEq)]
pub struct Ttl {
    pub key: String,
}

impl Executable for Ttl {
    fn exec(self, store: &Store) -> Result<Frame, CommandError> {
        let frame = match store.ttl(&self.key) {
            Ok(store::Ttl::Never) => Frame::Simple("Data never expires".to_string()),
            Ok(store::Ttl::Remaining(remaining)) => {
                let mut secs = remaining.as_secs();
                if remaining.subsec_nanos() > 0 {
                    secs += 1;
                }
                Frame::Integer(secs as i64)
            }
            Err(StoreError::KeyNotFound) => Frame::Integer(-1),
            Err(err) => return Err(err.into()),
        };

        Ok(frame)
    }
}

impl TryFrom<&mut CommandParser> for Ttl {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
