
use std::time::Duration;
use loop_bench::{
    Error,
    config::{ClientConfig, ServerConfig},
    impl_async::{Client, Server},
    impl_std,
    packet::Framing,
};


fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec()).unwrap().lines().map(|s| s.to_owned()).collect()
}

#[tokio::test]
async fn end_to_end_three_iterations() {
    let server = Server::bind(ServerConfig::default().with_bind("127.0.0.1:0").with_iterations(3)).await.unwrap();
    let addr = server.local_addr().unwrap();

    let mut server_out = Vec::new();
    let mut client_out = Vec::new();

    let serving = async {
        let mut session = server.accept().await?;
        session.serve(&mut server_out).await
    };
    let requesting = async {
        let mut client = Client::connect(ClientConfig::default().with_target(addr.to_string()).with_iterations(3)).await?;
        client.run(&mut client_out).await
    };

    let (s, c) = tokio::join!(serving, requesting);
    assert_eq!(s.unwrap(), 3);
    assert_eq!(c.unwrap(), 3);

    assert_eq!(lines(&server_out), vec![
        "Received data from client: 0:Hello, Server!",
        "Received data from client: 1:Hello, Server!",
        "Received data from client: 2:Hello, Server!",
    ]);
    assert_eq!(lines(&client_out), vec![
        "Received response from server: 0:Hello from the server!",
        "Received response from server: 1:Hello from the server!",
        "Received response from server: 2:Hello from the server!",
    ]);
}

#[tokio::test]
async fn connect_without_server_fails() {
    let port = portpicker::pick_unused_port().expect("no free port");
    let r = Client::connect(ClientConfig::default().with_target(format!("127.0.0.1:{}", port))).await;
    assert!(matches!(r, Err(Error::Connect { .. })));
}

#[tokio::test]
async fn stop_future_ends_idle_session() {
    let server = Server::bind(ServerConfig::default().with_bind("127.0.0.1:0")).await.unwrap();
    let addr = server.local_addr().unwrap();
    let _client = tokio::net::TcpStream::connect(addr).await.unwrap();

    let mut session = server.accept().await.unwrap();
    let n = session
        .serve_until(&mut std::io::sink(), tokio::time::sleep(Duration::from_millis(50)))
        .await
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn peer_disconnect_is_an_error() {
    let server = Server::bind(ServerConfig::default().with_bind("127.0.0.1:0")).await.unwrap();
    let addr = server.local_addr().unwrap();
    drop(tokio::net::TcpStream::connect(addr).await.unwrap());

    let mut session = server.accept().await.unwrap();
    let r = session.serve(&mut std::io::sink()).await;
    assert!(matches!(r, Err(Error::PeerClosed)));
}

/// the wire format does not depend on the runtime
#[tokio::test]
async fn tokio_server_std_client() {
    for framing in [Framing::Raw, Framing::Length] {
        let config = ServerConfig::default().with_bind("127.0.0.1:0").with_framing(framing).with_iterations(2);
        let server = Server::bind(config).await.unwrap();
        let addr = server.local_addr().unwrap();

        let client = std::thread::spawn(move || {
            let config = ClientConfig::default().with_target(addr.to_string()).with_framing(framing);
            let mut client = impl_std::Client::connect(config).unwrap();
            let mut out = Vec::new();
            client.round_trip(&mut out).unwrap();
            client.round_trip(&mut out).unwrap();
            out
        });

        let mut session = server.accept().await.unwrap();
        assert_eq!(session.serve(&mut std::io::sink()).await.unwrap(), 2);

        let out = tokio::task::spawn_blocking(move || client.join().unwrap()).await.unwrap();
        assert_eq!(lines(&out), vec![
            "Received response from server: 0:Hello from the server!",
            "Received response from server: 1:Hello from the server!",
        ]);
    }
}

#[tokio::test]
async fn stop_future_ends_waiting_client() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut client = Client::connect(ClientConfig::default().with_target(addr.to_string())).await.unwrap();
    // accepted, the first request is never answered
    let (_peer, _) = listener.accept().await.unwrap();

    let mut out = Vec::new();
    let n = client
        .run_until(&mut out, tokio::time::sleep(Duration::from_millis(50)))
        .await
        .unwrap();
    assert_eq!(n, 0);
    assert!(out.is_empty());
}
