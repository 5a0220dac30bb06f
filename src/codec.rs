use bytes::{BufMut, BytesMut};
use std::{io, str};
use thiserror::Error as ThisError;
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::Frame;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("line exceeds the maximum length of {0} bytes")]
    LineTooLong(usize),
    #[error("invalid UTF-8 line")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Splits the byte stream into newline-terminated command lines and every line into its
/// whitespace-separated tokens. Blank lines are swallowed.
pub struct LineCodec {
    max_length: usize,
    // Where to resume scanning for `\n`, so a partial line is not scanned twice.
    next_index: usize,
}

impl LineCodec {
    pub fn new(max_length: usize) -> LineCodec {
        LineCodec {
            max_length,
            next_index: 0,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl Decoder for LineCodec {
    type Item = Vec<String>;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

            let Some(offset) = newline else {
                // Check the size of the partial line to keep a client from growing the buffer
                // without bound. One extra byte leaves room for the `\r` of a CRLF terminator.
                if src.len() > self.max_length + 1 {
                    return Err(CodecError::LineTooLong(self.max_length));
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let end = self.next_index + offset;
            self.next_index = 0;

            let len = if end > 0 && src[end - 1] == b'\r' {
                end - 1
            } else {
                end
            };
            if len > self.max_length {
                return Err(CodecError::LineTooLong(self.max_length));
            }

            let line = src.split_to(end + 1);
            // A trailing `\r` is whitespace, so `\r\n` terminated lines need no special casing.
            let parts = tokenize(&line[..end])?;
            if !parts.is_empty() {
                return Ok(Some(parts));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(parts) = self.decode(src)? {
            return Ok(Some(parts));
        }

        // The peer closed the stream after an unterminated last line.
        self.next_index = 0;
        let line = src.split();
        let parts = tokenize(&line)?;
        Ok((!parts.is_empty()).then_some(parts))
    }
}

impl Encoder<Frame> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = frame.to_string();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

fn tokenize(line: &[u8]) -> Result<Vec<String>, CodecError> {
    let line = str::from_utf8(line)?;
    Ok(line.split_whitespace().map(String::from).collect())
}
