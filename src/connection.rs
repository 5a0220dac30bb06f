use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::{CodecError, LineCodec};
use crate::frame::Frame;

pub struct Connection {
    pub id: Uuid,
    pub client_address: SocketAddr,
    // Incoming bytes are buffered by the codec until a full line is available.
    framed: Framed<TcpStream, LineCodec>,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        client_address: SocketAddr,
        max_line_length: usize,
    ) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            client_address,
            framed: Framed::new(stream, LineCodec::new(max_line_length)),
        }
    }

    /// Reads the next non-blank command line, split into tokens. `None` means the peer closed the
    /// connection.
    pub async fn read_command(&mut self) -> Result<Option<Vec<String>>, CodecError> {
        self.framed.next().await.transpose()
    }

    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), CodecError> {
        self.framed.send(frame).await
    }
}
