use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument};

use crate::commands;
use crate::config::Config;
use crate::connection::Connection;
use crate::janitor::Janitor;
use crate::store::Store;
use crate::Result;

pub async fn run(config: Config) -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let store = Store::new();
    let janitor = Janitor::spawn(store.clone(), config.sweep_interval);

    info!("Server listening on {}", listener.local_addr()?);

    let res = serve(listener, store, config.max_line_length).await;
    janitor.abort();
    res
}

/// Accepts connections on `listener` until accepting fails, handling each one on its own task
/// against the shared `store`.
pub async fn serve(listener: TcpListener, store: Store, max_line_length: usize) -> Result<()> {
    loop {
        let (socket, client_address) = listener.accept().await?;
        let store = store.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            let res = handle_connection(socket, client_address, store, max_line_length).await;
            if let Err(e) = res {
                error!(error = %e, "Connection failed");
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, store, max_line_length),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
    max_line_length: usize,
) -> Result<()> {
    let mut conn = Connection::new(stream, client_address, max_line_length);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", conn.client_address.to_string());

    while let Some(parts) = conn.read_command().await? {
        debug!("Received command from client: {:?}", parts);
        let res = commands::dispatch(parts, &store);
        debug!("Sending response to client: {:?}", res);

        conn.write_frame(res).await?;
    }

    info!("Connection closed");
    Ok(())
}
