//! Identifier normalization.

use shared_types::{ClientId, IdentifierError};

/// Suffix appended to bare portal usernames.
pub const DEFAULT_PORTAL_DOMAIN: &str = "evans-portal.com";

/// Identity resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Domain appended to bare usernames (without the `@`).
    pub portal_domain: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            portal_domain: DEFAULT_PORTAL_DOMAIN.to_string(),
        }
    }
}

impl IdentityConfig {
    /// The `@domain` suffix.
    pub fn suffix(&self) -> String {
        format!("@{}", self.portal_domain)
    }
}

/// Turns a login identifier into a canonical identity.
///
/// `smith` becomes `smith@<portal_domain>`; anything containing `@` is kept.
/// Case is folded by `ClientId`, so `Smith` and `smith` are the same login.
pub fn normalize_identifier(
    identifier: &str,
    config: &IdentityConfig,
) -> Result<ClientId, IdentifierError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return Err(IdentifierError::Empty("identifier"));
    }
    if trimmed.contains('@') {
        ClientId::new(trimmed)
    } else {
        ClientId::new(format!("{}{}", trimmed, config.suffix()))
    }
}

/// Username shown to a portal account holder: the identity without the
/// portal suffix. Foreign identities are returned whole.
pub fn username_of<'a>(id: &'a ClientId, config: &IdentityConfig) -> &'a str {
    id.as_str()
        .strip_suffix(config.suffix().as_str())
        .unwrap_or(id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_username_gets_suffix() {
        let id = normalize_identifier("smith", &IdentityConfig::default()).unwrap();
        assert_eq!(id.as_str(), "smith@evans-portal.com");
    }

    #[test]
    fn test_qualified_identifier_unchanged() {
        let id = normalize_identifier("smith@other.com", &IdentityConfig::default()).unwrap();
        assert_eq!(id.as_str(), "smith@other.com");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let id = normalize_identifier("  smith ", &IdentityConfig::default()).unwrap();
        assert_eq!(id.as_str(), "smith@evans-portal.com");
    }

    #[test]
    fn test_case_insensitive() {
        let config = IdentityConfig::default();
        assert_eq!(
            normalize_identifier("Smith", &config).unwrap(),
            normalize_identifier("smith", &config).unwrap()
        );
        assert_eq!(
            normalize_identifier("Smith@Other.com", &config).unwrap().as_str(),
            "smith@other.com"
        );
    }

    #[test]
    fn test_empty_identifier_rejected() {
        assert!(normalize_identifier("  ", &IdentityConfig::default()).is_err());
    }

    #[test]
    fn test_custom_domain() {
        let config = IdentityConfig {
            portal_domain: "example.org".into(),
        };
        let id = normalize_identifier("jo", &config).unwrap();
        assert_eq!(id.as_str(), "jo@example.org");
    }

    #[test]
    fn test_username_of() {
        let config = IdentityConfig::default();
        let portal = ClientId::new("smith@evans-portal.com").unwrap();
        let foreign = ClientId::new("smith@other.com").unwrap();
        assert_eq!(username_of(&portal, &config), "smith");
        assert_eq!(username_of(&foreign, &config), "smith@other.com");
    }
}
