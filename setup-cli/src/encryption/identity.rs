use crate::error::{SetupError, SetupResult};
use std::fmt;

/// Key identity (GPG user id) of the player, used as signer and recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// An explicit recipient wins over the player name. Blank values count as absent.
    pub fn resolve(recipient: Option<&str>, player_name: Option<&str>) -> SetupResult<Self> {
        [recipient, player_name]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .ok_or(SetupError::MissingIdentity)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_overrides_player_name() {
        let identity = Identity::resolve(Some("ops@example.com"), Some("bot1")).unwrap();
        assert_eq!(identity.as_str(), "ops@example.com");
    }

    #[test]
    fn test_falls_back_to_player_name() {
        assert_eq!(Identity::resolve(None, Some(" bot1 ")).unwrap().as_str(), "bot1");
        assert_eq!(Identity::resolve(Some(""), Some("bot1")).unwrap().as_str(), "bot1");
    }

    #[test]
    fn test_no_identity_is_an_error() {
        assert!(matches!(
            Identity::resolve(None, None),
            Err(SetupError::MissingIdentity)
        ));
        assert!(matches!(
            Identity::resolve(Some("  "), Some("")),
            Err(SetupError::MissingIdentity)
        ));
    }
}
