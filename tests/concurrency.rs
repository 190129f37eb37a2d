//! Concurrent connections and lifecycle control

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use rcon_server::core::packet::AUTH_FAILURE_ID;
use rcon_server::{Packet, RconCodec, RconServer};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::codec::Framed;

/// Route the server's tracing events through the test writer; filterable
/// with RUST_LOG.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn connect(addr: SocketAddr) -> Framed<TcpStream, RconCodec> {
    let stream = TcpStream::connect(addr).await.unwrap();
    Framed::new(stream, RconCodec::default())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposite_auth_outcomes_stay_isolated() {
    init_tracing();
    let server = Arc::new(RconServer::new("127.0.0.1", 0, "secret"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _shutdown = server.shutdown_handle();
    tokio::spawn({
        let server = server.clone();
        async move { server.serve(listener).await }
    });

    let good = tokio::spawn(async move {
        let mut conn = connect(addr).await;
        conn.send(Packet::auth(1, "secret")).await.unwrap();
        let response = conn.next().await.unwrap().unwrap();
        assert_eq!(response.id, 1);
        // Still authenticated: a re-auth echoes again.
        conn.send(Packet::auth(2, "secret")).await.unwrap();
        assert_eq!(conn.next().await.unwrap().unwrap().id, 2);
    });
    let bad = tokio::spawn(async move {
        let mut conn = connect(addr).await;
        conn.send(Packet::auth(9, "wrong")).await.unwrap();
        let response = conn.next().await.unwrap().unwrap();
        assert_eq!(response.id, AUTH_FAILURE_ID);
        assert!(conn.next().await.is_none());
    });

    good.await.unwrap();
    bad.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_concurrent_authentications() {
    init_tracing();
    let server = Arc::new(RconServer::new("127.0.0.1", 0, "secret"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn({
        let server = server.clone();
        async move { server.serve(listener).await }
    });

    let mut tasks = JoinSet::new();
    for i in 0..32i32 {
        tasks.spawn(async move {
            let mut conn = connect(addr).await;
            conn.send(Packet::auth(i, "secret")).await.unwrap();
            let response = conn.next().await.unwrap().unwrap();
            assert_eq!(response.id, i);
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }
}

#[tokio::test]
async fn shutdown_stops_accepting_but_drains_connections() {
    init_tracing();
    let (tx, mut commands) = mpsc::unbounded_channel();
    let mut server = RconServer::new("127.0.0.1", 0, "secret");
    server.on_command(move |command, _client| {
        tx.send(command.to_owned()).unwrap();
    });
    let shutdown = server.shutdown_handle();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Arc::new(server);
    let serve_task = tokio::spawn({
        let server = server.clone();
        async move { server.serve(listener).await }
    });

    // Authenticate before shutdown.
    let mut conn = connect(addr).await;
    conn.send(Packet::auth(1, "secret")).await.unwrap();
    assert_eq!(conn.next().await.unwrap().unwrap().id, 1);

    shutdown.shutdown();
    let result = tokio::time::timeout(Duration::from_secs(5), serve_task)
        .await
        .expect("serve must return after shutdown")
        .unwrap();
    assert!(result.is_ok(), "graceful shutdown is not an error");

    // The accepted connection drains independently.
    conn.send(Packet::exec(2, "status")).await.unwrap();
    let command = tokio::time::timeout(Duration::from_secs(5), commands.recv())
        .await
        .expect("command must still be dispatched")
        .unwrap();
    assert_eq!(command, "status");
}

#[tokio::test]
async fn shutdown_before_serve_is_remembered() {
    init_tracing();
    let server = RconServer::new("127.0.0.1", 0, "secret");
    server.shutdown_handle().shutdown();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), server.serve(listener))
        .await
        .expect("stored shutdown permit must stop serve");
    assert!(result.is_ok());
}
