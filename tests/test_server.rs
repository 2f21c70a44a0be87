use servus::config::Config;
use servus::http::{Handler, HandlerError, Request, Response, ResponseWriter, StatusCode};
use servus::server::{Server, serve};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

struct EchoHandler;

impl Handler for EchoHandler {
    async fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        match request.target() {
            "/fail" => Err(HandlerError::new(StatusCode::InternalServerError, "nope\n")),
            "/silent" => Ok(()),
            _ => {
                let mut body = format!("{} {}\n", request.method().unwrap(), request.target());
                body.push_str(&String::from_utf8_lossy(&request.body));
                writer.write_response(&Response::ok(body)).await?;
                Ok(())
            }
        }
    }
}

async fn start() -> Server {
    let cfg = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        ..Config::default()
    };
    serve(&cfg, EchoHandler).await.unwrap()
}

async fn exchange(server: &Server, pieces: &[&[u8]]) -> String {
    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    for piece in pieces {
        stream.write_all(piece).await.unwrap();
        stream.flush().await.unwrap();
        tokio::task::yield_now().await;
    }

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_serves_a_trickled_request() {
    let server = start().await;

    let reply = exchange(
        &server,
        &[b"POST /ec", b"ho HTTP/1.1\r\nHost: loc", b"alhost\r\nContent-Length: 2\r\n\r\n", b"hi"],
    )
    .await;

    assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(reply.contains("connection: close\r\n"));
    assert!(reply.ends_with("\r\n\r\nPOST /echo\nhi"));

    server.close();
    server.wait().await.unwrap();
}

// Malformed inputs end exactly where the parser fails so the server has read
// everything before it closes the socket.
#[tokio::test]
async fn test_malformed_request_gets_400() {
    let server = start().await;

    let reply = exchange(&server, &[b"GET / HTTP/1.1\r\nHost : x\r\n"]).await;

    assert!(reply.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(reply.contains("invalid header format"));

    server.close();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_handler_error_becomes_response() {
    let server = start().await;

    let reply = exchange(&server, &[b"GET /fail HTTP/1.1\r\n\r\n"]).await;

    assert!(reply.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(reply.contains("content-length: 5\r\n"));
    assert!(reply.ends_with("\r\n\r\nnope\n"));

    server.close();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_silent_handler_gets_fallback() {
    let server = start().await;

    let reply = exchange(&server, &[b"GET /silent HTTP/1.1\r\n\r\n"]).await;

    assert!(reply.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));

    server.close();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_connections_are_independent() {
    let server = start().await;

    let (bad, good) = tokio::join!(
        exchange(&server, &[b"BREW /pot HTTP/1.1\r\n"]),
        exchange(&server, &[b"GET /ok HTTP/1.1\r\n\r\n"]),
    );

    assert!(bad.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(good.starts_with("HTTP/1.1 200 OK\r\n"));

    server.close();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_close_stops_accepting() {
    let server = start().await;
    let addr = server.local_addr();

    server.close();
    assert!(server.is_closed());
    server.wait().await.unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}
