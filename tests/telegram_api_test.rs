use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use cvmaker_notifier::error::Error;
use cvmaker_notifier::services::telegram_service::{Notifier, TelegramService};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const TOKEN: &str = "TESTTOKEN";

#[derive(Clone)]
struct MockBotApi {
    received: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
    reply: Value,
}

async fn send_message(
    State(state): State<MockBotApi>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.received.lock().unwrap().push(body);
    (state.status, Json(state.reply.clone()))
}

async fn spawn_bot_api(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = MockBotApi {
        received: received.clone(),
        status,
        reply,
    };
    let app = Router::new()
        .route(&format!("/bot{}/sendMessage", TOKEN), post(send_message))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), received)
}

fn service(base: String) -> TelegramService {
    TelegramService::new(reqwest::Client::new(), base, TOKEN.to_string())
}

#[tokio::test]
async fn sends_html_message_to_configured_chat() {
    let (base, received) =
        spawn_bot_api(StatusCode::OK, json!({"ok": true, "result": {"message_id": 7}})).await;

    service(base)
        .send_message("-1001", "<b>🆕 NEW RESUME:</b>")
        .await
        .expect("delivery should succeed");

    let received = received.lock().unwrap().clone();
    assert_eq!(
        received,
        vec![json!({"chat_id": "-1001", "text": "<b>🆕 NEW RESUME:</b>", "parse_mode": "HTML"})]
    );
}

#[tokio::test]
async fn api_rejection_surfaces_description() {
    let (base, _) = spawn_bot_api(
        StatusCode::BAD_REQUEST,
        json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}),
    )
    .await;

    let err = service(base).send_message("-1", "hi").await.unwrap_err();
    match err {
        Error::Telegram { status, description } => {
            assert_eq!(status, 400);
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn ok_false_with_success_status_is_an_error() {
    let (base, _) = spawn_bot_api(StatusCode::OK, json!({"ok": false, "description": "odd"})).await;

    let err = service(base).send_message("-1", "hi").await.unwrap_err();
    assert!(matches!(err, Error::Telegram { status: 200, .. }));
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(format!("http://{}", addr))
        .send_message("-1", "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Reqwest(_)));
}
