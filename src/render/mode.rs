//! Page presentation mode

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presentation variant of the dashboard.
///
/// Both variants show the same data; only markup and wording differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    /// Richer layout with badges and pluralized labels
    #[default]
    Standard,
    /// Terse layout for a security-monitoring display
    Security,
}

impl PageMode {
    /// Body class that marks a page as security mode
    pub const SECURITY_CLASS: &'static str = "security-mode";

    pub fn as_str(&self) -> &'static str {
        match self {
            PageMode::Standard => "standard",
            PageMode::Security => "security",
        }
    }

    pub fn is_security(&self) -> bool {
        matches!(self, PageMode::Security)
    }

    /// Class attribute value for the page body
    pub fn body_class(&self) -> &'static str {
        match self {
            PageMode::Standard => "",
            PageMode::Security => Self::SECURITY_CLASS,
        }
    }
}

impl fmt::Display for PageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(PageMode::Standard),
            "security" => Ok(PageMode::Security),
            other => Err(format!("Unknown page mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("security".parse::<PageMode>().unwrap(), PageMode::Security);
        assert_eq!(" Standard ".parse::<PageMode>().unwrap(), PageMode::Standard);
        assert!("kiosk".parse::<PageMode>().is_err());
    }

    #[test]
    fn test_body_class() {
        assert_eq!(PageMode::Security.body_class(), "security-mode");
        assert_eq!(PageMode::Standard.body_class(), "");
    }
}
