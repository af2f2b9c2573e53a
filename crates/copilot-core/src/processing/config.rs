use serde::{Deserialize, Serialize};

/// How personally identifiable information is treated in extracted output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PiiMode {
    /// Replace PII with partially masked values (e.g. `***-**-1234`).
    #[default]
    Mask,
    /// Remove PII entirely.
    Redact,
    /// Leave PII untouched.
    None,
}

impl PiiMode {
    /// Returns the lowercase wire name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiMode::Mask => "mask",
            PiiMode::Redact => "redact",
            PiiMode::None => "none",
        }
    }
}

impl std::fmt::Display for PiiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PiiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mask" => Ok(PiiMode::Mask),
            "redact" => Ok(PiiMode::Redact),
            "none" => Ok(PiiMode::None),
            other => Err(format!("unknown PII mode '{}'", other)),
        }
    }
}

/// Processing options chosen by the user. Replaced wholesale on update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingConfig {
    /// Run Azure Document Intelligence extraction.
    pub enable_azure: bool,
    /// Run Gemini enrichment.
    pub enable_gemini: bool,
    /// PII handling mode.
    pub pii_mode: PiiMode,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enable_azure: true,
            enable_gemini: true,
            pii_mode: PiiMode::Mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProcessingConfig::default();
        assert!(config.enable_azure);
        assert!(config.enable_gemini);
        assert_eq!(config.pii_mode, PiiMode::Mask);
    }

    #[test]
    fn test_pii_mode_parse() {
        assert_eq!("Redact".parse::<PiiMode>(), Ok(PiiMode::Redact));
        assert!("scramble".parse::<PiiMode>().is_err());
    }

    #[test]
    fn test_config_json_shape() {
        let json = serde_json::to_string(&ProcessingConfig::default()).unwrap();
        assert_eq!(
            json,
            r#"{"enableAzure":true,"enableGemini":true,"piiMode":"mask"}"#
        );
    }
}
