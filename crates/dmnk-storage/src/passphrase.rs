//! Advisory passphrase strength
//!
//! Never enforced by the keystore. Front ends use it to warn before creating
//! an account.

/// Passphrase strength buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PassphraseStrength {
    /// Weak: < 8 characters
    Weak,
    /// Fair: 8-11 characters
    Fair,
    /// Good: 12-15 characters, or longer with little variety
    Good,
    /// Strong: 16+ characters with variety
    Strong,
}

impl PassphraseStrength {
    /// Length in characters at which a passphrase stops being weak
    pub const FAIR_LENGTH: usize = 8;

    /// Length in characters recommended for a new account
    pub const RECOMMENDED_LENGTH: usize = 12;

    /// Evaluate passphrase strength
    pub fn evaluate(passphrase: &str) -> Self {
        let len = passphrase.chars().count();
        let has_lower = passphrase.chars().any(|c| c.is_lowercase());
        let has_upper = passphrase.chars().any(|c| c.is_uppercase());
        let has_digit = passphrase.chars().any(|c| c.is_ascii_digit());
        let has_special = passphrase.chars().any(|c| !c.is_alphanumeric());

        let variety_score = [has_lower, has_upper, has_digit, has_special]
            .iter()
            .filter(|&&b| b)
            .count();

        if len < Self::FAIR_LENGTH {
            PassphraseStrength::Weak
        } else if len < Self::RECOMMENDED_LENGTH {
            PassphraseStrength::Fair
        } else if len < 16 || variety_score < 3 {
            PassphraseStrength::Good
        } else {
            PassphraseStrength::Strong
        }
    }

    /// Whether a front end should skip its warning
    pub fn is_recommended(&self) -> bool {
        matches!(self, Self::Good | Self::Strong)
    }

    /// Short warning for weak choices, `None` when no warning is due
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::Weak => Some("Passphrase is very short; anyone with this device could guess it."),
            Self::Fair => Some("Consider a passphrase of 12 or more characters."),
            Self::Good | Self::Strong => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_strength_evaluation() {
        assert_eq!(PassphraseStrength::evaluate(""), PassphraseStrength::Weak);
        assert_eq!(PassphraseStrength::evaluate("pw1"), PassphraseStrength::Weak);
        assert_eq!(PassphraseStrength::evaluate("password12"), PassphraseStrength::Fair);
        assert_eq!(PassphraseStrength::evaluate("MyPassword123"), PassphraseStrength::Good);
        assert_eq!(
            PassphraseStrength::evaluate("MySecurePass123!@#"),
            PassphraseStrength::Strong
        );
    }

    #[test]
    fn test_length_counts_characters() {
        // 8 characters, 16 bytes
        assert_eq!(PassphraseStrength::evaluate("ппппппп1"), PassphraseStrength::Fair);
    }

    #[test]
    fn test_warnings() {
        assert!(PassphraseStrength::Weak.warning().is_some());
        assert!(PassphraseStrength::Fair.warning().is_some());
        assert!(PassphraseStrength::Good.warning().is_none());
        assert!(PassphraseStrength::Strong.is_recommended());
        assert!(!PassphraseStrength::Fair.is_recommended());
    }
}
