/// Business-rule parameters
///
/// Amounts and the referral allow-list are injected at startup rather than
/// compiled into the transition code. `RulesConfig::default()` carries the
/// production values.

use serde::{Deserialize, Serialize};

/// Referral codes accepted at registration when none are configured
pub const DEFAULT_REFERRAL_CODES: [&str; 8] = [
    "PRIME2023",
    "EARN800",
    "NIGERIA1",
    "REF888",
    "BONUS777",
    "WELCOME100",
    "EARNMORE",
    "GETPAID",
];

/// Business-rule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Accepted referral codes, uppercase
    pub referral_codes: Vec<String>,

    /// Credit applied to every new account
    pub welcome_bonus: i64,

    /// Credit applied on premium upgrade
    pub premium_bonus: i64,

    /// Fee recorded on the premium upgrade transaction
    pub premium_fee: i64,

    /// Length of the paid premium period
    pub premium_period_days: i64,

    /// Smallest amount that can be withdrawn
    pub min_withdrawal: i64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            referral_codes: DEFAULT_REFERRAL_CODES.iter().map(|c| c.to_string()).collect(),
            welcome_bonus: 800,
            premium_bonus: 1000,
            premium_fee: 5000,
            premium_period_days: 30,
            min_withdrawal: 10_000,
        }
    }
}

impl RulesConfig {
    /// Replaces the referral allow-list
    ///
    /// Codes are trimmed and uppercased; blank entries are dropped.
    pub fn with_referral_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.referral_codes = codes
            .into_iter()
            .map(|code| code.as_ref().trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect();
        self
    }

    /// Case-insensitive allow-list check
    pub fn is_valid_referral_code(&self, code: &str) -> bool {
        let normalized = code.trim().to_uppercase();
        self.referral_codes.iter().any(|valid| *valid == normalized)
    }
}
