//! Integration tests for the WebSocket transport.
//!
//! These bind a real listener on an OS-assigned port and talk to it with a
//! plain `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use gambit_transport::{
        Connection, FrameSink, FrameStream, Transport, WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    /// Binds to port 0 and returns the transport with its real address.
    async fn bind_any() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr").to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_split_halves_send_and_receive() {
        let (mut transport, addr) = bind_any().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.expect("accept task");

        assert!(conn.id().into_inner() > 0);
        let (mut sink, mut stream) = conn.split();

        sink.send_text(r#"{"type":"GameReset"}"#.to_string())
            .await
            .expect("send should succeed");
        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"GameReset"}"#);

        client
            .send(Message::text(r#"{"type":"RequestResync"}"#))
            .await
            .unwrap();
        let received = stream
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"type":"RequestResync"}"#);

        sink.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_binary_frames_are_accepted() {
        let (mut transport, addr) = bind_any().await;
        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let (_sink, mut stream) = server.await.unwrap().split();

        client
            .send(Message::Binary(b"raw".to_vec().into()))
            .await
            .unwrap();
        let received = stream.recv().await.unwrap().unwrap();
        assert_eq!(received, b"raw");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind_any().await;
        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let (_sink, mut stream) = server.await.unwrap().split();

        client.send(Message::Close(None)).await.unwrap();

        let result = stream.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (mut transport, addr) = bind_any().await;
        let server = tokio::spawn(async move {
            let a = transport.accept().await.expect("first");
            let b = transport.accept().await.expect("second");
            (a.id(), b.id())
        });
        let _c1 = connect_client(&addr).await;
        let _c2 = connect_client(&addr).await;
        let (a, b) = server.await.unwrap();
        assert_ne!(a, b);
    }
}
