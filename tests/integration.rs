use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, Duration};

use kvline::codec::DEFAULT_MAX_LINE_LENGTH;
use kvline::janitor::Janitor;
use kvline::server::serve;
use kvline::store::Store;

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Client {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();

        Client {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) -> String {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
        self.lines.next_line().await.unwrap().unwrap()
    }
}

/// Starts a server on an ephemeral port backed by a store with the given default TTL.
async fn start(default_ttl: Option<Duration>) -> (std::net::SocketAddr, Store) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = Store::with_default_ttl(default_ttl);

    tokio::spawn(serve(listener, store.clone(), DEFAULT_MAX_LINE_LENGTH));

    (addr, store)
}

fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[tokio::test]
async fn test_set_get_exists_expire() {
    let (addr, _store) = start(Some(Duration::from_secs(1))).await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.send("SET name John").await, "OK");
    assert_eq!(client.send("GET name").await, "John");
    assert_eq!(client.send("EXISTS name").await, "Yes");

    sleep(Duration::from_millis(1100)).await;

    assert_eq!(client.send("GET name").await, "ERR data expired");
    assert_eq!(client.send("DEL name").await, "OK");
    assert_eq!(client.send("EXISTS name").await, "No");
}

#[tokio::test]
async fn test_errors() {
    let (addr, _store) = start(None).await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.send("GET missing").await, "ERR data doesn't exist");
    assert_eq!(client.send("BOGUS").await, "ERR unknown command");
    assert_eq!(
        client.send("SET onlykey").await,
        "ERR wrong number of arguments for 'set' command"
    );

    // Errors leave the connection usable.
    assert_eq!(client.send("PING").await, "PONG");
}

#[tokio::test]
async fn test_case_whitespace_and_blank_lines() {
    let (addr, _store) = start(None).await;
    let mut client = Client::connect(addr).await;

    // Blank lines get no response, so the next line read answers the PING.
    client.writer.write_all(b"\n  \r\n").await.unwrap();
    assert_eq!(client.send("ping").await, "PONG");

    assert_eq!(client.send("  sEt   greeting \t hello  ").await, "OK");
    assert_eq!(client.send("get greeting").await, "hello");
    assert_eq!(client.send("TTL greeting").await, "Data never expires");
}

#[tokio::test]
async fn test_expire_and_ttl() {
    let (addr, _store) = start(Some(Duration::from_secs(5))).await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.send("TTL name").await, "-1");
    assert_eq!(client.send("EXPIRE name 10").await, "ERR data doesn't exist");

    assert_eq!(client.send("SET name John").await, "OK");
    assert_eq!(client.send("TTL name").await, "5");
    assert_eq!(client.send("EXPIRE name 100").await, "OK");
    assert_eq!(client.send("TTL name").await, "100");
    assert_eq!(
        client.send("EXPIRE name soon").await,
        "ERR value is not an integer or out of range"
    );

    assert_eq!(client.send("EXPIRE name 0").await, "OK");
    assert_eq!(client.send("GET name").await, "ERR data expired");
    assert_eq!(client.send("GET name").await, "ERR data doesn't exist");
}

#[tokio::test]
async fn test_shared_store_across_connections() {
    let (addr, _store) = start(None).await;
    let mut first = Client::connect(addr).await;
    let mut second = Client::connect(addr).await;

    assert_eq!(first.send("SET shared 1").await, "OK");
    assert_eq!(second.send("GET shared").await, "1");
    assert_eq!(second.send("DEL shared").await, "OK");
    assert_eq!(first.send("EXISTS shared").await, "No");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clients_disjoint_keys() {
    let (addr, store) = start(None).await;

    let pairs: Vec<(String, String)> = (0..32)
        .map(|i| (format!("key-{i}-{}", random_string(8)), random_string(16)))
        .collect();

    let handles: Vec<_> = pairs
        .iter()
        .cloned()
        .map(|(key, value)| {
            tokio::spawn(async move {
                let mut client = Client::connect(addr).await;
                assert_eq!(client.send(&format!("SET {key} {value}")).await, "OK");
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), pairs.len());

    let mut client = Client::connect(addr).await;
    for (key, value) in &pairs {
        assert_eq!(&client.send(&format!("GET {key}")).await, value);
    }
}

#[tokio::test]
async fn test_janitor_removes_unread_keys() {
    let (addr, store) = start(Some(Duration::from_millis(200))).await;
    let janitor = Janitor::spawn(store.clone(), Duration::from_millis(100));
    let mut client = Client::connect(addr).await;

    assert_eq!(client.send("SET a 1").await, "OK");
    assert_eq!(client.send("SET b 2").await, "OK");
    assert_eq!(store.len(), 2);

    sleep(Duration::from_millis(500)).await;

    assert!(store.is_empty());
    janitor.abort();
}
