//! End-to-end tests against an in-process shell.
//!
//! Each test binds a WebSocket server on a random loopback port, runs an
//! [`Extension`] against it, and plays the shell's side of the protocol.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use neutralino_bridge::{
    ConnectionParameters, DebugColors, Extension, HandlerResult, HandlerTable, LifecycleSignal,
    Termination,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

// ============================================================================
// Helpers
// ============================================================================

const TOKEN: &str = "access-token";
const STEP: Duration = Duration::from_secs(5);

type Shell = WebSocketStream<TcpStream>;

async fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

async fn accept(listener: &TcpListener) -> Shell {
    let (stream, _) = timeout(STEP, listener.accept()).await.unwrap().unwrap();
    tokio_tungstenite::accept_async(stream).await.unwrap()
}

fn spawn_extension(
    extension: Extension,
    port: u16,
    handlers: HandlerTable,
) -> JoinHandle<Termination> {
    let params = ConnectionParameters::new(port, TOKEN, None, "extBun");
    tokio::spawn(extension.run(params, handlers))
}

fn quiet() -> Extension {
    Extension::builder().debug_writer(io::sink()).build()
}

async fn send(shell: &mut Shell, frame: Value) {
    shell.send(Message::Text(frame.to_string().into())).await.unwrap();
}

fn call(function: &str, parameter: Value) -> Value {
    json!({ "event": "runBun", "data": { "function": function, "parameter": parameter } })
}

async fn next_envelope(shell: &mut Shell) -> Value {
    loop {
        match timeout(STEP, shell.next()).await.unwrap() {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("shell expected an envelope, got {other:?}"),
        }
    }
}

async fn finish(handle: JoinHandle<Termination>) -> Termination {
    timeout(STEP, handle).await.unwrap().unwrap()
}

async fn reject(_: Value) -> HandlerResult {
    Err("async failure".into())
}

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_ping_round_trip() {
    let (listener, port) = bind().await;
    let extension = quiet();
    let messenger = extension.messenger();

    let handlers = HandlerTable::new().handler("ping", move |parameter| {
        messenger.send_message("pingResult", format!("PONG, in reply to {parameter}"))?;
        Ok(())
    });
    let handle = spawn_extension(extension, port, handlers);
    let mut shell = accept(&listener).await;

    send(&mut shell, call("ping", json!("x"))).await;
    let envelope = next_envelope(&mut shell).await;

    assert_eq!(envelope["method"], "app.broadcast");
    assert_eq!(envelope["accessToken"], TOKEN);
    assert_eq!(envelope["data"]["event"], "pingResult");
    assert_eq!(envelope["data"]["data"], "PONG, in reply to \"x\"");
    assert!(envelope["id"].as_str().is_some_and(|id| !id.is_empty()));

    send(&mut shell, json!({ "event": "windowClose" })).await;
    assert_eq!(
        finish(handle).await,
        Termination::Lifecycle(LifecycleSignal::WindowClose)
    );
}

#[tokio::test]
async fn test_async_handler_streams_progress() {
    let (listener, port) = bind().await;
    let extension = quiet();
    let messenger = extension.messenger();

    let handlers = HandlerTable::new().async_handler("longRun", move |_| {
        let messenger = messenger.clone();
        async move {
            for i in 1..=3 {
                messenger.send_message("pingResult", format!("Long-running task {i}/3"))?;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            HandlerResult::Ok(())
        }
    });
    let handle = spawn_extension(extension, port, handlers);
    let mut shell = accept(&listener).await;

    send(&mut shell, call("longRun", Value::Null)).await;
    for i in 1..=3 {
        let envelope = next_envelope(&mut shell).await;
        assert_eq!(envelope["data"]["data"], format!("Long-running task {i}/3"));
    }

    send(&mut shell, json!({ "event": "appClose", "data": "" })).await;
    assert_eq!(
        finish(handle).await,
        Termination::Lifecycle(LifecycleSignal::AppClose)
    );
}

#[tokio::test]
async fn test_failures_and_junk_do_not_stop_the_loop() {
    let (listener, port) = bind().await;
    let extension = quiet();
    let messenger = extension.messenger();

    let handlers = HandlerTable::new()
        .handler("fail", |_| Err("sync failure".into()))
        .handler("explode", |_| panic!("sync panic"))
        .async_handler("reject", reject)
        .handler("ping", move |parameter| {
            messenger.send_message("pingResult", parameter)?;
            Ok(())
        });
    let handle = spawn_extension(extension, port, handlers);
    let mut shell = accept(&listener).await;

    send(&mut shell, call("fail", Value::Null)).await;
    send(&mut shell, call("explode", Value::Null)).await;
    send(&mut shell, call("reject", Value::Null)).await;
    send(&mut shell, call("missing", Value::Null)).await;
    shell.send(Message::Text("not json at all".into())).await.unwrap();
    shell
        .send(Message::Binary(vec![0xff, 0x00, 0x7b].into()))
        .await
        .unwrap();
    send(&mut shell, call("ping", json!({ "n": 1 }))).await;

    let envelope = next_envelope(&mut shell).await;
    assert_eq!(envelope["data"]["data"], json!({ "n": 1 }));

    send(&mut shell, json!({ "event": "windowClose" })).await;
    assert!(matches!(finish(handle).await, Termination::Lifecycle(_)));
}

#[tokio::test]
async fn test_no_frames_processed_after_window_close() {
    let (listener, port) = bind().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let handlers = HandlerTable::new().handler("ping", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let handle = spawn_extension(quiet(), port, handlers);
    let mut shell = accept(&listener).await;

    send(&mut shell, json!({ "event": "windowClose" })).await;
    send(&mut shell, call("ping", Value::Null)).await;

    assert_eq!(
        finish(handle).await,
        Termination::Lifecycle(LifecycleSignal::WindowClose)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_lifecycle_can_be_disabled() {
    let (listener, port) = bind().await;
    let extension = Extension::builder()
        .terminate_on_window_close(false)
        .debug_writer(io::sink())
        .build();
    let handle = spawn_extension(extension, port, HandlerTable::new());
    let mut shell = accept(&listener).await;

    send(&mut shell, json!({ "event": "windowClose" })).await;
    shell
        .close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "bye".into(),
        }))
        .await
        .unwrap();

    assert_eq!(
        finish(handle).await,
        Termination::Closed {
            code: Some(1000),
            reason: "bye".to_string(),
        }
    );
}

#[tokio::test]
async fn test_handshake_query_parameters() {
    let (listener, port) = bind().await;
    let uri = Arc::new(Mutex::new(String::new()));
    let seen = Arc::clone(&uri);

    let params = ConnectionParameters::new(port, TOKEN, Some("ct-123".into()), "extBun");
    let handle = tokio::spawn(quiet().run(params, HandlerTable::new()));

    let (stream, _) = timeout(STEP, listener.accept()).await.unwrap().unwrap();
    let mut shell = tokio_tungstenite::accept_hdr_async(
        stream,
        move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            *seen.lock() = request.uri().to_string();
            Ok(response)
        },
    )
    .await
    .unwrap();

    assert_eq!(*uri.lock(), "/?extensionId=extBun&connectToken=ct-123");

    send(&mut shell, json!({ "event": "appClose" })).await;
    assert!(matches!(finish(handle).await, Termination::Lifecycle(_)));
}

#[tokio::test]
async fn test_debug_lines() {
    let (listener, port) = bind().await;
    let buffer = Buffer::default();
    let extension = Extension::builder()
        .debug(true)
        .colors(DebugColors::plain())
        .debug_writer(buffer.clone())
        .build();
    let messenger = extension.messenger();

    let handlers = HandlerTable::new().handler("ping", move |_| {
        messenger.send_message("pingResult", "pong")?;
        Ok(())
    });
    let handle = spawn_extension(extension, port, handlers);
    let mut shell = accept(&listener).await;

    send(&mut shell, json!({ "event": "hello" })).await;
    send(&mut shell, call("ping", Value::Null)).await;
    next_envelope(&mut shell).await;
    send(&mut shell, json!({ "event": "windowClose" })).await;
    finish(handle).await;

    let output = String::from_utf8(buffer.0.lock().clone()).unwrap();
    let lines: Vec<_> = output.lines().collect();

    assert_eq!(lines.len(), 3, "{output}");
    assert_eq!(lines[0], r#"IN:  {"event":"hello"}"#);
    assert!(lines[1].starts_with("CALL: ") && lines[1].contains("runBun"));
    assert!(lines[2].starts_with("OUT: ") && lines[2].contains(r#""event":"pingResult""#));
    assert!(!output.contains("windowClose"));
}
