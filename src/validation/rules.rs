use anyhow::Result;

/// Cheap textual check run before the container engine is involved
pub trait StructuralRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, content: &str) -> Result<()>;
}

/// Requires every listed literal token to appear somewhere in the file
pub struct RequiredTokensRule {
    tokens: &'static [&'static str],
}

impl RequiredTokensRule {
    pub const fn new(tokens: &'static [&'static str]) -> Self {
        Self { tokens }
    }

    pub const fn dockerfile() -> Self {
        Self::new(&["FROM", "CMD"])
    }

    pub const fn compose() -> Self {
        Self::new(&["services:"])
    }

    pub fn tokens(&self) -> &[&'static str] {
        self.tokens
    }
}

impl StructuralRule for RequiredTokensRule {
    fn name(&self) -> &'static str {
        "RequiredTokens"
    }

    fn validate(&self, content: &str) -> Result<()> {
        let missing: Vec<&str> = self
            .tokens
            .iter()
            .copied()
            .filter(|token| !content.contains(token))
            .collect();

        if !missing.is_empty() {
            anyhow::bail!("Missing required token(s): {}", missing.join(", "));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dockerfile_tokens_present() {
        let rule = RequiredTokensRule::dockerfile();
        assert!(rule
            .validate("FROM python:3.11\nCMD [\"python\", \"app.py\"]")
            .is_ok());
    }

    #[test]
    fn test_dockerfile_missing_cmd() {
        let err = RequiredTokensRule::dockerfile()
            .validate("FROM python:3.11\nRUN pip install flask")
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required token(s): CMD");
    }

    #[test]
    fn test_lists_every_missing_token() {
        let err = RequiredTokensRule::dockerfile().validate("").unwrap_err();
        assert!(err.to_string().contains("FROM, CMD"));
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert!(RequiredTokensRule::dockerfile()
            .validate("from alpine\ncmd sh")
            .is_err());
    }

    #[test]
    fn test_compose_requires_services() {
        let rule = RequiredTokensRule::compose();
        assert!(rule.validate("version: '3'\nservices:\n  app: {}").is_ok());
        assert!(rule.validate("version: '3'\n").is_err());
        assert_eq!(rule.tokens(), &["services:"]);
    }
}
