use super::client::ModelClient;
use super::error::BackendError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted [`ModelClient`] that replays queued responses in order
///
/// Every prompt it receives is recorded together with the model name so
/// tests can assert on what the pipeline asked for.
pub struct MockModelClient {
    responses: Mutex<VecDeque<MockResponse>>,
    received: Mutex<Vec<(String, String)>>,
    name: String,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub content: String,
    pub error: Option<BackendError>,
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    pub fn error(error: BackendError) -> Self {
        Self {
            content: String::new(),
            error: Some(error),
        }
    }
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::with_name("MockModel")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
            name: name.into(),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }

    /// Model names requested so far, oldest first
    pub fn models(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|(model, _)| model.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        self.received
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BackendError::Other {
                message: "MockModelClient: No more responses in queue".to_string(),
            })?;

        match response.error {
            Some(error) => Err(error),
            None => Ok(response.content),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockModelClient")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_basic() {
        let client = MockModelClient::new();
        client.add_response(MockResponse::text("FROM alpine"));

        let output = client.generate("phi3", "write it").await.unwrap();

        assert_eq!(output, "FROM alpine");
        assert_eq!(client.prompts(), vec!["write it".to_string()]);
        assert_eq!(client.models(), vec!["phi3".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let client = MockModelClient::new();
        client.add_response(MockResponse::error(BackendError::TimeoutError { seconds: 5 }));

        let result = client.generate("phi3", "p").await;

        assert_eq!(result, Err(BackendError::TimeoutError { seconds: 5 }));
    }

    #[tokio::test]
    async fn test_mock_client_multiple_responses() {
        let client = MockModelClient::new();
        client.add_responses(vec![MockResponse::text("first"), MockResponse::text("second")]);
        assert_eq!(client.remaining_responses(), 2);

        assert_eq!(client.generate("m", "a").await.unwrap(), "first");
        assert_eq!(client.generate("m", "b").await.unwrap(), "second");
        assert_eq!(client.remaining_responses(), 0);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_client_empty_queue() {
        let client = MockModelClient::new();

        let result = client.generate("m", "p").await;

        assert!(matches!(result, Err(BackendError::Other { .. })));
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn test_mock_client_name() {
        assert_eq!(MockModelClient::new().name(), "MockModel");
        assert_eq!(MockModelClient::with_name("Scripted").name(), "Scripted");
    }
}
