pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod filters;
pub mod handlers;
pub mod session;
pub mod state;
pub mod study;
#[cfg(test)]
pub mod testing;

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the application router with all routes and shared state
pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(handlers::index))
    // Auth
    .route("/login", get(auth::login_page).post(auth::login_submit))
    .route("/register", get(auth::register_page).post(auth::register_submit))
    .route("/logout", post(auth::logout))
    // Decks
    .route("/decks", post(handlers::create_deck))
    .route("/decks/{deck_id}", get(handlers::deck_page))
    .route("/decks/{deck_id}/words", post(handlers::add_word))
    .route("/decks/{deck_id}/words/{word_id}", post(handlers::update_word))
    .route("/decks/{deck_id}/words/{word_id}/delete", post(handlers::delete_word))
    .route("/decks/{deck_id}/bulk", post(handlers::bulk_import))
    .route("/decks/{deck_id}/share", post(handlers::share_deck))
    .route("/decks/{deck_id}/members", post(handlers::add_member))
    .route("/decks/{deck_id}/study", post(handlers::start_deck_study))
    .route("/public/{token}", get(handlers::public_deck_page))
    .route("/public/{token}/study", post(handlers::start_public_study))
    // Practice
    .route("/reading", get(handlers::reading_page))
    .route("/reading/{test_id}/attempt", post(handlers::submit_reading))
    .route("/reading/{test_id}/highlight", post(handlers::save_highlight))
    .route("/reading/{test_id}/notes", post(handlers::save_reading_note))
    .route("/listening", get(handlers::listening_page))
    .route("/listening/{test_id}/dictation", post(handlers::submit_dictation))
    .route("/writing", get(handlers::writing_page))
    .route("/writing/prompt", post(handlers::generate_prompt))
    .route("/writing/submit", post(handlers::submit_essay))
    .route("/writing/save-word", post(handlers::save_suggested_word))
    .route("/speaking", get(handlers::speaking_page))
    .route("/speaking/score", post(handlers::score_speaking))
    .route("/speaking/tts", get(handlers::speaking_tts))
    .route("/mock-tests", get(handlers::mock_tests_page))
    .route("/mock-tests/{test_id}/submit", post(handlers::submit_mock_test))
    .route("/notes", get(handlers::notes_page).post(handlers::save_note))
    // Study session
    .route("/study/{session_id}", get(handlers::study_page))
    .route("/study/{session_id}/reveal", post(handlers::reveal))
    .route("/study/{session_id}/answer", post(handlers::submit_answer))
    .route("/study/{session_id}/choose", post(handlers::choose))
    .route("/study/{session_id}/grade", post(handlers::grade))
    .route("/study/{session_id}/skip", post(handlers::skip))
    .route("/study/{session_id}/continue", post(handlers::continue_drill))
    .route("/study/{session_id}/tts/{index}", get(handlers::study_tts))
    .nest_service("/static", ServeDir::new("static"))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
