use ferrous_resolver_domain::Record;
use ferrous_resolver_infrastructure::dns::wire::{decode, encode, Message, Rcode};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proto {
    Udp,
    Tcp,
}

pub enum Reply {
    Message(Message),
    /// Sent verbatim; over UDP each entry is its own datagram.
    Raw(Vec<Vec<u8>>),
    Silence,
}

type Handler = dyn Fn(Proto, &Message) -> Reply + Send + Sync;

/// In-process name server on 127.0.0.1 answering UDP and TCP on the same
/// port from a scripted handler.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_hits: Arc<AtomicUsize>,
    tcp_hits: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl MockDnsServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(Proto, &Message) -> Reply + Send + Sync + 'static,
    {
        let handler: Arc<Handler> = Arc::new(handler);
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let listener = TcpListener::bind(addr).await.unwrap();

        let server = Self {
            addr,
            udp_hits: Arc::new(AtomicUsize::new(0)),
            tcp_hits: Arc::new(AtomicUsize::new(0)),
            shutdown: CancellationToken::new(),
        };

        tokio::spawn(serve_udp(
            socket,
            Arc::clone(&handler),
            Arc::clone(&server.udp_hits),
            server.shutdown.clone(),
        ));
        tokio::spawn(serve_tcp(
            listener,
            handler,
            Arc::clone(&server.tcp_hits),
            server.shutdown.clone(),
        ));

        server
    }

    /// Answers every question with `records`, on both protocols.
    pub async fn answering(records: Vec<Record>) -> Self {
        Self::start(move |_, request| Reply::Message(answer(request, records.clone()))).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_hits(&self) -> usize {
        self.udp_hits.load(Ordering::SeqCst)
    }

    pub fn tcp_hits(&self) -> usize {
        self.tcp_hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub fn answer(request: &Message, records: Vec<Record>) -> Message {
    let mut response = Message::response_to(request);
    response.answers = records;
    response
}

pub fn with_rcode(request: &Message, rcode: Rcode) -> Message {
    let mut response = Message::response_to(request);
    response.header.rcode = rcode;
    response
}

fn render(reply: Reply) -> Vec<Vec<u8>> {
    match reply {
        Reply::Message(message) => vec![encode(&message).unwrap()],
        Reply::Raw(datagrams) => datagrams,
        Reply::Silence => Vec::new(),
    }
}

async fn serve_udp(
    socket: UdpSocket,
    handler: Arc<Handler>,
    hits: Arc<AtomicUsize>,
    shutdown: CancellationToken,
) {
    let mut buf = vec![0u8; 65535];
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            result = socket.recv_from(&mut buf) => {
                let Ok((len, peer)) = result else { continue };
                let Ok(request) = decode(&buf[..len]) else { continue };
                hits.fetch_add(1, Ordering::SeqCst);
                for datagram in render(handler(Proto::Udp, &request)) {
                    let _ = socket.send_to(&datagram, peer).await;
                }
            }
        }
    }
}

async fn serve_tcp(
    listener: TcpListener,
    handler: Arc<Handler>,
    hits: Arc<AtomicUsize>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            result = listener.accept() => {
                let Ok((stream, _)) = result else { continue };
                tokio::spawn(serve_connection(
                    stream,
                    Arc::clone(&handler),
                    Arc::clone(&hits),
                ));
            }
        }
    }
}

async fn serve_connection(mut stream: TcpStream, handler: Arc<Handler>, hits: Arc<AtomicUsize>) {
    let mut len_buf = [0u8; 2];
    if stream.read_exact(&mut len_buf).await.is_err() {
        return;
    }
    let mut request = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    if stream.read_exact(&mut request).await.is_err() {
        return;
    }
    let Ok(request) = decode(&request) else { return };
    hits.fetch_add(1, Ordering::SeqCst);

    for message in render(handler(Proto::Tcp, &request)) {
        let mut framed = (message.len() as u16).to_be_bytes().to_vec();
        framed.extend_from_slice(&message);
        let _ = stream.write_all(&framed).await;
    }
}
