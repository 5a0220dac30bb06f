use std::fmt;

/// A single response line. Every frame is written back terminated by `\n`.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Integer(i64),
    /// Rendered with an `ERR ` prefix.
    Error(String),
}

impl Frame {
    pub fn ok() -> Frame {
        Frame::Simple("OK".to_string())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "{}", s),
            Frame::Integer(i) => write!(f, "{}", i),
            Frame::Error(msg) => write!(f, "ERR {}", msg),
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        let mut bytes = frame.to_string().into_bytes();
        bytes.push(b'\n');
        bytes
    }
}
