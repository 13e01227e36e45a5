//! Test utilities: an in-process stand-in for the REST backend.
//!
//! [`MockBackend`] is a real axum server on a random loopback port. It
//! records every request it receives and has switches to simulate expired
//! tokens, failed refreshes and failing review submissions.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api::ApiClient;
use crate::auth::Credentials;
use crate::config;
use crate::domain::TokenResponse;
use crate::state::AppState;

pub const TEST_EMAIL: &str = "lan@example.com";
pub const TEST_PASSWORD: &str = "secret";
pub const TEST_DECK_ID: &str = "deck-1";
pub const EMPTY_DECK_ID: &str = "empty";
pub const PUBLIC_TOKEN: &str = "share-token";
const REFRESH_TOKEN: &str = "refresh-token";

/// One request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    /// Bumped to invalidate every issued access token
    generation: AtomicUsize,
    refresh_disabled: AtomicBool,
    reject_all: AtomicBool,
    review_failure: AtomicBool,
}

impl MockState {
    fn access_token(&self) -> String {
        format!("access-{}", self.generation.load(Ordering::SeqCst))
    }

    fn is_authorized(&self, authorization: Option<&str>) -> bool {
        !self.reject_all.load(Ordering::SeqCst)
            && authorization == Some(format!("Bearer {}", self.access_token()).as_str())
    }

    fn tokens(&self, with_user: bool) -> Value {
        let user = if with_user {
            json!({
                "id": "u1",
                "full_name": "Lan Tran",
                "email": TEST_EMAIL,
                "xp": 120,
                "coins": 8,
                "streak": 4,
                "level": "B2",
                "badges": ["starter"]
            })
        } else {
            Value::Null
        };
        json!({
            "access_token": self.access_token(),
            "refresh_token": REFRESH_TOKEN,
            "token_type": "bearer",
            "user": user
        })
    }
}

pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBackend {
    /// Start a mock backend on a random available port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new().fallback(handle).with_state(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        MockBackend {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url(), Duration::from_secs(5)).unwrap()
    }

    /// Currently valid access token
    pub fn access_token(&self) -> String {
        self.state.access_token()
    }

    pub fn refresh_token(&self) -> String {
        REFRESH_TOKEN.to_string()
    }

    /// Credentials as produced by a successful login
    pub fn credentials(&self) -> Credentials {
        let tokens: TokenResponse = serde_json::from_value(self.state.tokens(true)).unwrap();
        Credentials::new(tokens)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }

    /// Bodies of every review submission received
    pub fn reviews(&self) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::POST && r.path == "/vocabulary/review")
            .filter_map(|r| r.body)
            .collect()
    }

    pub fn count_path(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    /// Invalidate every access token handed out so far
    pub fn expire_tokens(&self) {
        self.state.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn set_refresh_enabled(&self, enabled: bool) {
        self.state.refresh_disabled.store(!enabled, Ordering::SeqCst);
    }

    /// Answer 401 to every authenticated request, even with a fresh token
    pub fn set_reject_all(&self, reject: bool) {
        self.state.reject_all.store(reject, Ordering::SeqCst);
    }

    pub fn set_review_failure(&self, fail: bool) {
        self.state.review_failure.store(fail, Ordering::SeqCst);
    }

    /// Poll until `condition` holds, for at most two seconds
    pub async fn wait_for(&self, condition: impl Fn(&MockBackend) -> bool) -> bool {
        for _ in 0..100 {
            if condition(self) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        condition(self)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Application wired to a fresh mock backend, with a cookie-keeping client
pub async fn test_server() -> (TestServer, MockBackend) {
    let mock = MockBackend::start().await;
    let state = AppState::with_client(mock.client(), config::DEFAULT_SESSION_EXPIRY_HOURS);
    let app = crate::build_router(state);
    let server = TestServer::builder().save_cookies().build(app).unwrap();
    (server, mock)
}

/// Same as [`test_server`] but already logged in
pub async fn logged_in_server() -> (TestServer, MockBackend) {
    let (server, mock) = test_server().await;
    server
        .post("/login")
        .form(&[("email", TEST_EMAIL), ("password", TEST_PASSWORD)])
        .await
        .assert_status(StatusCode::SEE_OTHER);
    mock.clear_requests();
    (server, mock)
}

fn word_json(id: &str, word: &str, definition: &str, example: &str) -> Value {
    json!({
        "_id": id,
        "deck_id": TEST_DECK_ID,
        "word": word,
        "phonetic": "/test/",
        "part_of_speech": "adjective",
        "definition": definition,
        "example": example,
        "tags": ["academic"],
        "created_by": "u1",
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-01T10:00:00"
    })
}

fn sample_words() -> Value {
    json!([
        word_json(
            "w1",
            "ubiquitous",
            "present everywhere",
            "Phones are ubiquitous. Ubiquitous screens shape habits."
        ),
        word_json("w2", "mitigate", "make less severe", "Trees mitigate flooding."),
        word_json("w3", "cogent", "clear and convincing", "She made a cogent case."),
    ])
}

fn sample_deck(name: &str) -> Value {
    json!({
        "id": TEST_DECK_ID,
        "name": name,
        "description": "Band 7 vocabulary",
        "owner_id": "u1",
        "member_ids": [],
        "is_public": true,
        "public_token": PUBLIC_TOKEN,
        "parent_id": null,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-01T10:00:00"
    })
}

fn reading_tests() -> Value {
    json!([{
        "_id": "reading-1",
        "title": "The Secret Life of Bees",
        "passage": "Honeybees communicate through a waggle dance that points to nectar.",
        "difficulty": "academic",
        "timer_minutes": 20,
        "questions": [
            {
                "question_id": "q1",
                "question_type": "tfng",
                "prompt": "Bees dance to share directions.",
                "options": ["True", "False", "Not Given"]
            },
            {
                "question_id": "q2",
                "question_type": "mcq",
                "prompt": "Choose TWO things bees collect.",
                "options": ["Nectar", "Pollen", "Sand"],
                "meta": {"type": "mcq", "answerFormat": "multi-select", "expectedCount": 2}
            },
            {
                "question_id": "q3",
                "question_type": "completion",
                "prompt": "Complete the notes.",
                "correct_answers": ["dance", "nectar"],
                "meta": {"answerFormat": "multi", "instructions": "ONE WORD ONLY"}
            }
        ]
    }])
}

fn listening_tests() -> Value {
    json!([{
        "_id": "listening-1",
        "title": "Booking a Bus Tour",
        "audio_url": "https://cdn.example.com/bus-tour.mp3",
        "sentences": [
            {
                "sentence_id": "s1",
                "text": "The tour leaves at nine",
                "start_ms": 0,
                "end_ms": 2500,
                "hint_word_count": 5,
                "hint_first_letters": ["T", "t", "l", "a", "n"]
            },
            {
                "sentence_id": "s2",
                "text": "Bring a packed lunch",
                "start_ms": 2500,
                "end_ms": 4750,
                "hint_word_count": 4,
                "hint_first_letters": ["B", "a", "p", "l"]
            }
        ]
    }])
}

fn writing_prompt(task_type: &str) -> Value {
    let description = if task_type == "task1" {
        "```json\n{\"description\": \"The chart shows coffee exports.\"}\n```"
    } else {
        "Some people think cities should ban cars. Discuss both views."
    };
    json!({
        "_id": "prompt-1",
        "title": "Generated prompt",
        "description": description,
        "task_type": task_type
    })
}

fn writing_feedback() -> Value {
    json!({
        "grammar": 6.0,
        "lexical": 5.5,
        "coherence": 6.5,
        "task": 6.0,
        "overall_band": 6.0,
        "feedback": "Clear position but limited range of vocabulary.",
        "improved_changes": [
            {"original": "alot", "improved": "a lot", "type": "spelling", "reason": "Two words"}
        ],
        "suggestions": ["Use more topic-specific vocabulary"],
        "lexical_suggestions": [
            {"word": "big", "suggestion": "substantial", "reason": "More formal"}
        ],
        "weak_sentences": [
            {"original": "Cars are bad.", "improved": "Private cars worsen congestion.", "reason": "Too vague"}
        ]
    })
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    let path = uri.path().to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: authorization.clone(),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let field = |name: &str| {
        body.as_ref()
            .and_then(|b| b.get(name))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => {
            if field("email") == TEST_EMAIL && field("password") == TEST_PASSWORD {
                Json(state.tokens(true)).into_response()
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid credentials"}))).into_response()
            }
        }
        ("POST", ["auth", "register"]) => {
            if field("email") == TEST_EMAIL {
                return (StatusCode::BAD_REQUEST, Json(json!({"detail": "Email already registered"}))).into_response();
            }
            let mut tokens = state.tokens(true);
            tokens["user"]["email"] = json!(field("email"));
            tokens["user"]["full_name"] = json!(field("full_name"));
            tokens["user"]["xp"] = json!(0);
            Json(tokens).into_response()
        }
        ("POST", ["auth", "refresh"]) => {
            if !state.refresh_disabled.load(Ordering::SeqCst) && field("refresh_token") == REFRESH_TOKEN {
                Json(state.tokens(false)).into_response()
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid refresh token"}))).into_response()
            }
        }
        ("GET", ["vocabulary", "public", token]) => {
            if *token == PUBLIC_TOKEN {
                Json(json!({"deck": sample_deck("Academic Words"), "words": sample_words()})).into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        _ if !state.is_authorized(authorization.as_deref()) => {
            (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Token expired"}))).into_response()
        }
        ("GET", ["dashboard"]) => Json(json!({
            "xp": 120,
            "coins": 8,
            "streak": 4,
            "level": "B2",
            "recent_words": ["cogent"],
            "heatmap": [{"date": "2024-05-01", "minutes": 25}],
            "weak_skills": [{"skill": "writing", "score": 5.5, "trend": -0.5}],
            "study_plan": ["Review 10 words"]
        }))
        .into_response(),
        ("GET", ["vocabulary", "decks"]) => Json(json!([sample_deck("Academic Words")])).into_response(),
        ("POST", ["vocabulary", "decks"]) => {
            let mut deck = sample_deck(&field("name"));
            deck["id"] = json!("deck-2");
            Json(deck).into_response()
        }
        ("PATCH", ["vocabulary", "decks", _]) | ("POST", ["vocabulary", "decks", _, "members"]) => {
            Json(sample_deck("Academic Words")).into_response()
        }
        ("GET", ["vocabulary", "decks", deck_id, "words"]) => match *deck_id {
            TEST_DECK_ID => Json(sample_words()).into_response(),
            EMPTY_DECK_ID => Json(json!([])).into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        },
        ("POST", ["vocabulary", "decks", _, "words", "bulk"]) => {
            let count = body
                .as_ref()
                .and_then(|b| b.get("words"))
                .and_then(|w| w.as_array())
                .map_or(0, Vec::len);
            Json(json!({"count": count, "status": "ok"})).into_response()
        }
        ("POST", ["vocabulary", "decks", _, "words"]) => {
            Json(word_json("w-new", &field("word"), &field("definition"), "")).into_response()
        }
        ("PUT", ["vocabulary", "decks", _, "words", word_id]) => {
            Json(word_json(word_id, &field("word"), &field("definition"), "")).into_response()
        }
        ("DELETE", ["vocabulary", "decks", _, "words", _]) => StatusCode::NO_CONTENT.into_response(),
        ("GET", ["vocabulary", "decks", deck_id, "flashcards"]) => {
            if *deck_id == TEST_DECK_ID {
                Json(json!([{
                    "_id": "w1",
                    "front": "ubiquitous",
                    "back": "present everywhere",
                    "level": "new",
                    "next_review_at": null
                }]))
                .into_response()
            } else {
                Json(json!([])).into_response()
            }
        }
        ("POST", ["vocabulary", "review"]) => {
            if state.review_failure.load(Ordering::SeqCst) {
                (StatusCode::INTERNAL_SERVER_ERROR, "review store unavailable").into_response()
            } else {
                Json(json!({"status": "ok"})).into_response()
            }
        }
        ("GET", ["gamification", "leaderboard"]) => Json(json!([
            {"rank": 1, "full_name": "Minh Pham", "xp": 900},
            {"rank": 2, "full_name": "Lan Tran", "xp": 120}
        ]))
        .into_response(),
        ("GET", ["reading", "tests"]) => Json(reading_tests()).into_response(),
        ("POST", ["reading", "attempt"]) => Json(json!({"percentage": 66.7, "awarded_xp": 15})).into_response(),
        ("POST", ["reading", "highlight"]) | ("POST", ["reading", "notes"]) | ("POST", ["notes"]) => {
            Json(json!({"status": "ok"})).into_response()
        }
        ("GET", ["listening", "tests"]) => Json(listening_tests()).into_response(),
        ("POST", ["listening", "dictation"]) => Json(json!({"accuracy": 0.8, "awarded_xp": 5})).into_response(),
        ("POST", ["writing", "generate-prompt"]) => {
            let task_type = uri
                .query()
                .and_then(|q| q.strip_prefix("task_type="))
                .unwrap_or("task2")
                .to_string();
            Json(writing_prompt(&task_type)).into_response()
        }
        ("POST", ["writing", "submit"]) => Json(writing_feedback()).into_response(),
        ("GET", ["speaking", "prompts"]) => Json(json!([
            {"topic": "Transport", "scenario": "I usually take the bus to work", "hints": ["Mention how long it takes"]},
            {"topic": "Hometown", "scenario": "My hometown is famous for its river"}
        ]))
        .into_response(),
        ("POST", ["speaking", "score"]) => Json(json!({
            "pronunciation": 82,
            "fluency": 75,
            "completeness": 90,
            "overall_band": 6.5,
            "feedback": "Stress the second syllable of 'usually'."
        }))
        .into_response(),
        ("GET", ["mock-tests"]) => Json(json!([{
            "_id": "mock-1",
            "title": "Academic Mock 1",
            "sections": ["listening", "reading", "writing", "speaking"],
            "duration_minutes": 165
        }]))
        .into_response(),
        ("POST", ["mock-tests", "submit"]) => Json(json!({"overall_band": 7.0})).into_response(),
        ("GET", ["notes"]) => Json(json!([{
            "_id": "note-1",
            "title": "Linking words",
            "blocks": [{"block_id": "body", "block_type": "paragraph", "content": "However, moreover, thus"}]
        }]))
        .into_response(),
        ("POST", ["speaking", "tts"]) => (
            [(header::CONTENT_TYPE, "audio/mpeg")],
            format!("audio:{}", field("text")).into_bytes(),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
