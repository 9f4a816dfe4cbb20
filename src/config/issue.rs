//! Validation findings raised while parsing a configuration.

use tilemap_sections::{Severity, ValidationMessage};

/// A problem found in a configuration file.
///
/// Issues are recorded into the validation collector and never abort the
/// parse; [`ConfigIssue::severity`] decides whether one counts as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigIssue {
    #[error("Missing mandatory option '{key}'")]
    MissingField { key: String },

    #[error("Invalid value '{value}' for option '{key}': expected {expected}")]
    TypeMismatch {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown {kind} '{token}' in option '{key}' (allowed: {allowed})")]
    UnknownToken {
        key: String,
        kind: &'static str,
        token: String,
        allowed: String,
    },

    #[error("Invalid value '{value}' for option '{key}': {reason}")]
    OutOfRange {
        key: String,
        value: String,
        reason: String,
    },

    #[error("World '{world}' referenced by map '{map}' does not exist")]
    UnknownWorld { map: String, world: String },

    #[error("{kind} name '{name}' is already used")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{kind} section has no name")]
    EmptyName { kind: &'static str },

    #[error("Unknown option '{key}'")]
    UnknownOption { key: String },

    #[error("Option '{key}' is ignored in a global section")]
    IgnoredInGlobal { key: String },

    #[error("Unknown section type '{header}'")]
    UnknownSection { header: String },

    #[error("No worlds configured")]
    NoWorlds,

    #[error("No maps configured")]
    NoMaps,
}

impl ConfigIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownOption { .. }
            | Self::IgnoredInGlobal { .. }
            | Self::UnknownSection { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub(crate) fn missing(key: &str) -> Self {
        Self::MissingField {
            key: key.to_string(),
        }
    }

    pub(crate) fn mismatch(key: &str, value: &str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    pub(crate) fn unknown_token(key: &str, kind: &'static str, token: &str, allowed: &[&str]) -> Self {
        Self::UnknownToken {
            key: key.to_string(),
            kind,
            token: token.to_string(),
            allowed: allowed.join(", "),
        }
    }

    pub(crate) fn unknown_option(key: &str) -> Self {
        Self::UnknownOption {
            key: key.to_string(),
        }
    }
}

impl From<ConfigIssue> for ValidationMessage {
    fn from(issue: ConfigIssue) -> Self {
        ValidationMessage::new(issue.severity(), issue.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ConfigIssue::missing("world").to_string(),
            "Missing mandatory option 'world'"
        );
        assert_eq!(
            ConfigIssue::mismatch("texture_size", "big", "an integer").to_string(),
            "Invalid value 'big' for option 'texture_size': expected an integer"
        );
        assert_eq!(
            ConfigIssue::unknown_token("rendermode", "rendermode", "sepia", &["normal", "cave"])
                .to_string(),
            "Unknown rendermode 'sepia' in option 'rendermode' (allowed: normal, cave)"
        );
    }

    #[test]
    fn test_severity() {
        assert_eq!(ConfigIssue::missing("world").severity(), Severity::Error);
        assert_eq!(ConfigIssue::unknown_option("foo").severity(), Severity::Warning);
        assert_eq!(ConfigIssue::NoMaps.severity(), Severity::Error);
    }

    #[test]
    fn test_into_message() {
        let message: ValidationMessage = ConfigIssue::unknown_option("foo").into();
        assert_eq!(message.severity, Severity::Warning);
        assert_eq!(message.message, "Unknown option 'foo'");
    }
}
