//! Deck, word and flashcard endpoints.

use serde::Serialize;
use urlencoding::encode;

use super::client::{ApiClient, ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{BulkImportResult, Deck, DeckUpdate, Flashcard, NewDeck, NewWord, PublicDeck, Word};
use crate::study::ReviewRequest;

#[derive(Serialize)]
struct MemberPayload<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct BulkPayload<'a> {
    words: &'a [NewWord],
}

fn deck_path(deck_id: &str) -> String {
    format!("/vocabulary/decks/{}", encode(deck_id))
}

fn word_path(deck_id: &str, word_id: &str) -> String {
    format!("{}/words/{}", deck_path(deck_id), encode(word_id))
}

pub async fn fetch_decks(api: &Authenticated<'_>) -> Result<Vec<Deck>, ApiError> {
    api.json(&ApiRequest::get("/vocabulary/decks")).await
}

pub async fn create_deck(api: &Authenticated<'_>, deck: &NewDeck) -> Result<Deck, ApiError> {
    api.json(&ApiRequest::post("/vocabulary/decks", deck)?).await
}

pub async fn update_deck(
    api: &Authenticated<'_>,
    deck_id: &str,
    update: &DeckUpdate,
) -> Result<Deck, ApiError> {
    api.json(&ApiRequest::patch(deck_path(deck_id), update)?).await
}

pub async fn add_deck_member(api: &Authenticated<'_>, deck_id: &str, email: &str) -> Result<Deck, ApiError> {
    let path = format!("{}/members", deck_path(deck_id));
    api.json(&ApiRequest::post(path, &MemberPayload { email })?).await
}

pub async fn fetch_deck_words(api: &Authenticated<'_>, deck_id: &str) -> Result<Vec<Word>, ApiError> {
    let path = format!("{}/words", deck_path(deck_id));
    api.json(&ApiRequest::get(path)).await
}

pub async fn add_deck_word(api: &Authenticated<'_>, deck_id: &str, word: &NewWord) -> Result<Word, ApiError> {
    let path = format!("{}/words", deck_path(deck_id));
    api.json(&ApiRequest::post(path, word)?).await
}

pub async fn update_deck_word(
    api: &Authenticated<'_>,
    deck_id: &str,
    word_id: &str,
    word: &NewWord,
) -> Result<Word, ApiError> {
    api.json(&ApiRequest::put(word_path(deck_id, word_id), word)?).await
}

pub async fn delete_deck_word(api: &Authenticated<'_>, deck_id: &str, word_id: &str) -> Result<(), ApiError> {
    api.send_empty(&ApiRequest::delete(word_path(deck_id, word_id))).await
}

pub async fn bulk_add_words(
    api: &Authenticated<'_>,
    deck_id: &str,
    words: &[NewWord],
) -> Result<BulkImportResult, ApiError> {
    let path = format!("{}/words/bulk", deck_path(deck_id));
    api.json(&ApiRequest::post(path, &BulkPayload { words })?).await
}

pub async fn fetch_deck_flashcards(api: &Authenticated<'_>, deck_id: &str) -> Result<Vec<Flashcard>, ApiError> {
    let path = format!("{}/flashcards", deck_path(deck_id));
    api.json(&ApiRequest::get(path)).await
}

/// Shared deck behind a public link. No login needed.
pub async fn fetch_public_deck(client: &ApiClient, token: &str) -> Result<PublicDeck, ApiError> {
    let path = format!("/vocabulary/public/{}", encode(token));
    client.json(&ApiRequest::get(path)).await
}

/// Send a flashcard rating. Scheduling is computed by the backend.
pub async fn submit_review(api: &Authenticated<'_>, review: &ReviewRequest) -> Result<(), ApiError> {
    api.send_empty(&ApiRequest::post("/vocabulary/review", review)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Grade;
    use crate::testing::MockBackend;
    use reqwest::Method;

    #[test]
    fn test_ids_are_path_encoded() {
        assert_eq!(deck_path("a b/c"), "/vocabulary/decks/a%20b%2Fc");
        assert_eq!(word_path("d1", "w 1"), "/vocabulary/decks/d1/words/w%201");
    }

    #[tokio::test]
    async fn test_fetch_deck_words() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();

        let words = fetch_deck_words(&client.authenticated(&creds), "deck-1").await.unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].word, "ubiquitous");
        assert_eq!(words[0].id, "w1");
    }

    #[tokio::test]
    async fn test_bulk_add_wraps_words() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();
        let words = vec![NewWord {
            word: "cogent".to_string(),
            definition: "clear and convincing".to_string(),
            ..Default::default()
        }];

        let result = bulk_add_words(&client.authenticated(&creds), "deck-1", &words)
            .await
            .unwrap();
        assert_eq!(result.count, 1);

        let request = mock.requests().pop().unwrap();
        assert_eq!(request.path, "/vocabulary/decks/deck-1/words/bulk");
        assert_eq!(
            request.body,
            Some(serde_json::json!({"words": [{"word": "cogent", "definition": "clear and convincing"}]}))
        );
    }

    #[tokio::test]
    async fn test_submit_review_body() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();
        let review = ReviewRequest {
            card_id: "w1".to_string(),
            grade: Grade::EASY,
        };

        submit_review(&client.authenticated(&creds), &review).await.unwrap();

        let reviews = mock.reviews();
        assert_eq!(reviews, vec![serde_json::json!({"card_id": "w1", "grade": 5})]);
    }

    #[tokio::test]
    async fn test_delete_word_uses_delete_method() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();

        delete_deck_word(&client.authenticated(&creds), "deck-1", "w2").await.unwrap();

        let request = mock.requests().pop().unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/vocabulary/decks/deck-1/words/w2");
    }

    #[tokio::test]
    async fn test_public_deck_needs_no_token() {
        let mock = MockBackend::start().await;
        let deck = fetch_public_deck(&mock.client(), "share-token").await.unwrap();
        assert_eq!(deck.deck.name, "Academic Words");
        assert_eq!(deck.words.len(), 3);
        assert!(mock.requests()[0].authorization.is_none());
    }
}
