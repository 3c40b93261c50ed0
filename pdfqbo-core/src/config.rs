//! Institution and output settings.
//!
//! These values identify the bank to the importing software. They are specific
//! to one institution, so they live in `~/.pdfqbo/config.toml` rather than in code;
//! the defaults match the statements this tool was written for.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub institution: InstitutionConfig,
    #[serde(default)]
    pub statement: StatementConfig,
}

/// Financial institution identity written to the sign-on and account blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionConfig {
    /// `<ORG>` in the sign-on response.
    pub org: String,
    /// `<FID>` in the sign-on response.
    pub fid: String,
    /// Routing number, `<BANKID>` in the account descriptor.
    pub bank_id: String,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            org: "CommerceBank".to_string(),
            fid: "1002".to_string(),
            bank_id: "0111030".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementConfig {
    pub currency: String,
    pub language: String,
    /// IANA zone name used for statement dates. Only the calendar date matters
    /// to importers, so the default is GMT.
    pub timezone: String,
    pub account_type: String,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            language: "ENG".to_string(),
            timezone: "GMT".to_string(),
            account_type: "CHECKING".to_string(),
        }
    }
}
