//! Generated writing prompts and essay assessment.

use super::client::{ApiRequest, Authenticated};
use super::error::ApiError;
use crate::domain::{EssaySubmission, TaskType, WritingFeedback, WritingPrompt};

/// Ask the backend for a fresh prompt. Comes back already cleaned.
pub async fn generate_prompt(api: &Authenticated<'_>, task_type: TaskType) -> Result<WritingPrompt, ApiError> {
    let path = format!("/writing/generate-prompt?task_type={}", task_type.as_str());
    let request = ApiRequest::post(path, &serde_json::json!({}))?;
    let prompt: WritingPrompt = api.json(&request).await?;
    Ok(prompt.cleaned())
}

pub async fn submit_essay(api: &Authenticated<'_>, essay: &EssaySubmission) -> Result<WritingFeedback, ApiError> {
    api.json(&ApiRequest::post("/writing/submit", essay)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[tokio::test]
    async fn test_generate_prompt_passes_task_type() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();

        let prompt = generate_prompt(&client.authenticated(&creds), TaskType::Task1)
            .await
            .unwrap();
        assert_eq!(prompt.task_type, "task1");
        assert_eq!(prompt.description, "The chart shows coffee exports.");

        let request = &mock.requests()[0];
        assert_eq!(request.path, "/writing/generate-prompt");
        assert_eq!(request.query.as_deref(), Some("task_type=task1"));
    }

    #[tokio::test]
    async fn test_submit_sends_null_target() {
        let mock = MockBackend::start().await;
        let client = mock.client();
        let creds = mock.credentials();

        let essay = EssaySubmission {
            task_type: TaskType::Task2,
            content: "Cities are growing.".to_string(),
            prompt_content: "Discuss both views.".to_string(),
            target_band: None,
        };
        let feedback = submit_essay(&client.authenticated(&creds), &essay).await.unwrap();
        assert_eq!(feedback.overall_band, 6.0);
        assert_eq!(mock.requests()[0].body.as_ref().unwrap()["target_band"], serde_json::Value::Null);
    }
}
