//! Login inputs: identifier/secret pairs and federated assertions.

/// Login secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier + secret as typed by the user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: Secret,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<Secret>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

/// Assertion handed back by a federated provider after its own login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedAssertion {
    /// Provider name, e.g. `google`.
    pub provider: String,
    /// Provider-scoped subject identifier.
    pub subject: String,
    /// Email asserted by the provider.
    pub email: String,
    /// Whether the provider verified the email.
    pub email_verified: bool,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_redacted() {
        let creds = Credentials::new("smith", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("smith"));
    }
}
