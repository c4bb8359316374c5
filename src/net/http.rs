use axum::{
    Router,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{ConnectInfo, State},
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::Registry;
use crate::error::{AppResult, InfraError};
use crate::net::AppCtx;
use crate::net::gateway::dispatch;
use crate::net::protocol::Reply;

/// Outbound frames buffered per connection before handlers start waiting.
const OUTBOUND_BUFFER: usize = 32;

const BINARY_UNSUPPORTED: &str = "binary frames are not supported";

/// Run the HTTP server: WebSocket endpoint plus static client assets
pub async fn serve(addr: SocketAddr, registry: Arc<Registry>) -> AppResult<()> {
    let listener = TcpListener::bind(&addr).await.map_err(InfraError::from)?;
    serve_on(listener, registry).await
}

/// Same as [`serve`] on an already bound listener.
pub async fn serve_on(listener: TcpListener, registry: Arc<Registry>) -> AppResult<()> {
    let app = router(registry);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(InfraError::from)?;
    Ok(())
}

pub fn router(registry: Arc<Registry>) -> Router {
    let assets = ServeDir::new(&registry.config.static_dir);

    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/health", get(health))
        .fallback_service(assets)
        .with_state(AppCtx { registry })
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

async fn health() -> &'static str {
    "ok"
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppCtx>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_handler(socket, peer, state.registry.clone()))
}

async fn ws_handler(socket: WebSocket, peer: SocketAddr, registry: Arc<Registry>) {
    tracing::info!(%peer, "client connected");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(OUTBOUND_BUFFER);

    // Single writer; event handlers only hold a sender.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = stream.next().await {
        let text = match msg {
            Message::Text(t) => t.as_str().to_owned(),
            Message::Binary(_) => {
                send_reply(&tx, peer, Reply::error(None, BINARY_UNSUPPORTED)).await;
                continue;
            }
            Message::Ping(p) => {
                let _ = tx.send(Message::Pong(p)).await;
                continue;
            }
            Message::Pong(_) => continue,
            Message::Close(_) => break,
        };

        let tx = tx.clone();
        let registry = registry.clone();
        tokio::spawn(async move {
            if let Some(reply) = dispatch(&text, &registry.services.auth).await {
                send_reply(&tx, peer, reply).await;
            }
        });
    }

    // The writer drains once every in-flight handler has dropped its sender.
    drop(tx);
    let _ = writer.await;

    tracing::info!(%peer, "client disconnected");
}

async fn send_reply(tx: &mpsc::Sender<Message>, peer: SocketAddr, reply: Reply) {
    match serde_json::to_string(&reply) {
        Ok(json) => {
            if tx.send(Message::Text(json.into())).await.is_err() {
                tracing::debug!(%peer, "connection closed before reply was sent");
            }
        }
        Err(e) => tracing::error!(error = %e, "cannot encode reply"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::repo::MemoryAccountRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::Message as WsMessage;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
    use tower::ServiceExt;

    type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

    const QUIET: Duration = Duration::from_millis(300);

    fn registry(static_dir: PathBuf) -> Arc<Registry> {
        let cfg = Config {
            http_addr: "127.0.0.1:0".into(),
            database_url: "postgres://unused".into(),
            hash_key: "http test key".into(),
            static_dir,
            db_pool_size: 1,
            db_timeout_ms: 1000,
        };
        Arc::new(Registry::new(Arc::new(MemoryAccountRepository::new()), Arc::new(cfg)).unwrap())
    }

    fn assets_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hometown-assets-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>hometown</h1>").unwrap();
        dir
    }

    async fn connect() -> Client {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_on(listener, registry(assets_dir())));

        let (ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
        ws
    }

    /// Next text frame, skipping control frames; `None` if nothing arrives in time.
    async fn next_text(ws: &mut Client) -> Option<Value> {
        loop {
            match timeout(QUIET, ws.next()).await {
                Ok(Some(Ok(WsMessage::Text(t)))) => return Some(serde_json::from_str(t.as_str()).unwrap()),
                Ok(Some(Ok(_))) => continue,
                _ => return None,
            }
        }
    }

    #[tokio::test]
    async fn health_says_ok() {
        let resp = router(registry(assets_dir()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn root_serves_index_from_static_dir() {
        let dir = assets_dir();
        let resp = router(registry(dir.clone()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>hometown</h1>");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn missing_asset_is_not_found() {
        let resp = router(registry(assets_dir()))
            .oneshot(Request::builder().uri("/nope.js").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let mut ws = connect().await;
        ws.send(WsMessage::Ping(b"tick".to_vec().into())).await.unwrap();

        let pong = timeout(Duration::from_secs(2), async {
            loop {
                match ws.next().await {
                    Some(Ok(WsMessage::Pong(p))) => return p,
                    Some(Ok(_)) => continue,
                    other => panic!("socket ended before pong: {other:?}"),
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(&pong[..], b"tick");
    }

    #[tokio::test]
    async fn one_reply_per_acked_frame() {
        let mut ws = connect().await;

        let frames = [
            json!({"event": "signup", "ack": 1, "data": {"username": "nova", "password": "pw", "email": "nova@example.org"}}),
            json!({"event": "login", "ack": 2, "data": {"username": "ghost", "password": "pw"}}),
            json!({"event": "login", "data": {"username": "ghost", "password": "pw"}}),
        ];
        for f in frames {
            ws.send(WsMessage::text(f.to_string())).await.unwrap();
        }

        let mut replies = Vec::new();
        while let Some(v) = next_text(&mut ws).await {
            replies.push(v);
        }
        replies.sort_by_key(|v| v["ack"].as_u64());

        assert_eq!(replies.len(), 2);
        assert_eq!(
            replies[0],
            json!({"ack": 1, "data": {"username": {"ok": true}, "email": {"ok": true}}})
        );
        assert_eq!(replies[1]["ack"], 2);
        assert_eq!(replies[1]["data"]["username"]["ok"], false);
    }

    #[tokio::test]
    async fn binary_frame_gets_error_reply() {
        let mut ws = connect().await;
        ws.send(WsMessage::binary(b"{\"event\":\"login\"}".to_vec())).await.unwrap();

        let reply = next_text(&mut ws).await.unwrap();
        assert_eq!(reply, json!({"ack": null, "error": BINARY_UNSUPPORTED}));
    }

    #[tokio::test]
    async fn close_ends_the_connection() {
        let mut ws = connect().await;
        ws.send(WsMessage::Close(None)).await.unwrap();

        let drained = timeout(Duration::from_secs(2), async {
            while let Some(Ok(_)) = ws.next().await {}
        })
        .await;
        assert!(drained.is_ok(), "server kept the socket open after close");
    }
}
