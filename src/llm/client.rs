use super::error::BackendError;
use async_trait::async_trait;

/// Text-completion boundary to the model runtime
///
/// Implementations send `prompt` to the model named `model` and return its raw
/// text output. They do not retry; the orchestrator owns the retry policy.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoClient;

    #[async_trait]
    impl ModelClient for EchoClient {
        async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
            Ok(format!("{}:{}", model, prompt))
        }

        fn name(&self) -> &str {
            "EchoClient"
        }
    }

    #[tokio::test]
    async fn test_client_trait_object() {
        let client: Box<dyn ModelClient> = Box::new(EchoClient);
        assert_eq!(client.name(), "EchoClient");
        assert_eq!(client.generate("phi3", "hi").await.unwrap(), "phi3:hi");
    }
}
