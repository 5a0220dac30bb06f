use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns PONG. Useful to check that the connection is still alive.
#[derive(Debug, PartialEq)]
pub struct Ping;

impl Executable for Ping {
    fn exec(self, _store: &Store) -> Result<Frame, CommandError> {
        Ok(Frame::Simple("PONG".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Ping {
    type Error = CommandError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn pong() {
        let cmd = Command::try_from(vec!["PING".to_string()]).unwrap();
        assert_eq!(cmd, Command::Ping(Ping));

        let res = cmd.exec(&Store::new()).unwrap();
        assert_eq!(res, Frame::Simple("PONG".to_string()));
    }
}
