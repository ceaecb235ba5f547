//! Supported languages

use serde::{Deserialize, Serialize};

/// Language offered in the editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Javascript,
    Java,
    Cpp,
    C,
    Csharp,
}

impl Language {
    /// All languages in menu order
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::Javascript,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Csharp,
    ];

    /// Identifier understood by the execution service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Csharp => "csharp",
        }
    }

    /// Label shown in the language menu
    pub fn label(&self) -> &'static str {
        match self {
            Self::Python => "Python 3",
            Self::Javascript => "Node.js",
            Self::Java => "Java",
            Self::Cpp => "C++ (GCC)",
            Self::C => "C (GCC)",
            Self::Csharp => "C#",
        }
    }

    /// Parse a language identifier
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.as_str() == s)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = crate::error::ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            crate::error::ClientError::Validation(format!("Unsupported language: {s}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_identifiers() {
        for lang in Language::ALL {
            assert_eq!(Language::parse(lang.as_str()), Some(lang));
        }
        assert_eq!(Language::parse("rust"), None);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("cobol".parse::<Language>().is_err());
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
    }
}
