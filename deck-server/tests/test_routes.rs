//! End-to-end route tests: a real listener on an ephemeral port, driven with
//! reqwest.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use deck_server::AppState;
use deck_service::DeckService;
use reqwest::StatusCode;
use serde_json::Value;

struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    _static_dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::write(static_dir.path().join("1h.png"), b"\x89PNG fake").unwrap();

        let service = DeckService::builder()
            .in_memory()
            .command_timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        let state = Arc::new(AppState {
            service,
            static_dir: static_dir.path().to_path_buf(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = deck_server::router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            _static_dir: static_dir,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(format!("http://{}{}", self.addr, path))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn new_deck(&self) -> String {
        let (status, body) = self.get("/deck/new").await;
        assert_eq!(status, StatusCode::OK);
        body[0]["deck_id"].as_str().unwrap().to_string()
    }
}

// ---------------------------------------------------------------------------
// /deck/new
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_defaults_to_one_deck() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/deck/new").await;

    assert_eq!(status, StatusCode::OK);
    let decks = body.as_array().unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0]["remaining"], 52);
    assert!(decks[0].get("cards").is_none());
}

#[tokio::test]
async fn new_with_count_and_post() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(format!("http://{}/deck/new?count=3", server.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = server.get("/deck/new?count=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn new_rejects_non_numeric_count() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/deck/new?count=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("count"));
}

#[tokio::test]
async fn new_with_empty_count_makes_one_deck() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/deck/new?count=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// /deck/draw, /deck/add, /deck/shuffle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn draw_add_draw_scenario() {
    let server = TestServer::start().await;
    let id = server.new_deck().await;

    let (status, body) = server.get(&format!("/deck/draw/{id}?nbrCarte=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deck_id"], id.as_str());
    assert_eq!(body["remaining"], 47);
    assert_eq!(body["cards"].as_array().unwrap().len(), 5);
    assert_eq!(body["cards"][0]["code"], "1h");
    assert_eq!(body["cards"][0]["image"], "/static/1h.png");
    assert_eq!(body["cards"][0]["suit"], "h");

    let (status, body) = server.get(&format!("/deck/add/{id}?cards=AS,2S")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body["message"].is_string());

    let (status, body) = server.get(&format!("/deck/draw/{id}?nbrCarte=49")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 0);
    assert_eq!(body["cards"][48]["code"], "2S");
}

#[tokio::test]
async fn draw_defaults_to_one_card() {
    let server = TestServer::start().await;
    let id = server.new_deck().await;

    let (_, body) = server.get(&format!("/deck/draw/{id}")).await;

    assert_eq!(body["remaining"], 51);
    assert_eq!(body["cards"].as_array().unwrap().len(), 1);

    let (status, body) = server.get(&format!("/deck/draw/{id}?nbrCarte=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 50);
}

#[tokio::test]
async fn draw_too_many_is_bad_request() {
    let server = TestServer::start().await;
    let id = server.new_deck().await;

    let (status, body) = server.get(&format!("/deck/draw/{id}?nbrCarte=53")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = server.get(&format!("/deck/draw/{id}?nbrCarte=0")).await;
    assert_eq!(body["remaining"], 52);
}

#[tokio::test]
async fn shuffle_returns_remaining_without_cards() {
    let server = TestServer::start().await;
    let id = server.new_deck().await;

    let (status, body) = server.get(&format!("/deck/shuffle/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 52);
    assert!(body.get("cards").is_none());
}

#[tokio::test]
async fn add_requires_cards_param() {
    let server = TestServer::start().await;
    let id = server.new_deck().await;

    let (status, _) = server.get(&format!("/deck/add/{id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.get(&format!("/deck/add/{id}?cards=ZZ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_deck_is_404() {
    let server = TestServer::start().await;

    for path in [
        "/deck/draw/nope",
        "/deck/shuffle/nope",
        "/deck/add/nope?cards=AS",
    ] {
        let (status, body) = server.get(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert!(body["error"].is_string());
    }
}

// ---------------------------------------------------------------------------
// Routing edges
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_deck_id_is_bad_request() {
    let server = TestServer::start().await;

    for path in ["/deck/draw", "/deck/draw/", "/deck/shuffle", "/deck/add/"] {
        let (status, _) = server.get(path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
    }
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let server = TestServer::start().await;

    for path in ["/deck/burn", "/nothing/here", "/"] {
        let (status, _) = server.get(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }
}

// ---------------------------------------------------------------------------
// /static
// ---------------------------------------------------------------------------

#[tokio::test]
async fn static_serves_card_png() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(format!("http://{}/static/1h", server.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"\x89PNG fake");
}

#[tokio::test]
async fn static_missing_or_unsafe_is_404() {
    let server = TestServer::start().await;

    for path in ["/static/2h", "/static/..%2Fsecret", "/static/1h.png"] {
        let (status, _) = server.get(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }
}
