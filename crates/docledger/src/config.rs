//! Ledger configuration.

/// Environment variable enabling strict verification.
pub const STRICT_VERIFICATION_ENV: &str = "DOCLEDGER_STRICT_VERIFICATION";

/// Environment variable enabling verification before each append.
pub const VERIFY_BEFORE_APPEND_ENV: &str = "DOCLEDGER_VERIFY_BEFORE_APPEND";

/// Configuration for the Ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Also check the genesis block and index continuity in `verify`.
    pub strict_verification: bool,
    /// Walk the chain before each append and warn if it is already broken.
    /// The append still happens.
    pub verify_before_append: bool,
}

impl LedgerConfig {
    /// Build a config from `DOCLEDGER_*` environment variables, falling back
    /// to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            strict_verification: env_flag(STRICT_VERIFICATION_ENV)
                .unwrap_or(defaults.strict_verification),
            verify_before_append: env_flag(VERIFY_BEFORE_APPEND_ENV)
                .unwrap_or(defaults.verify_before_append),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|s| parse_flag(&s))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
