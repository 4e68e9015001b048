//! Structured Logging with Redaction
//!
//! Log lines go to stderr as `[timestamp] LEVEL [module] message | k=v ...`.
//! Each field is passed through a [`Redaction`] picked from its key, so
//! callers can log transaction ids, addresses and key material without
//! deciding at every call site what is safe to print.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Redaction
// =============================================================================

/// How much of a field value may appear in a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redaction {
    /// Printed as is
    Clear,
    /// Only the length survives (PINs, passphrases, signatures)
    Hidden,
    /// First 8 and last 4 characters (addresses, reward accounts)
    Address,
    /// First 10 and last 6 characters (tx ids, aux data hashes, xpubs)
    Digest,
}

const HIDDEN_KEYS: &[&str] = &["pin", "passphrase", "password", "secret", "signature", "mnemonic"];
const ADDRESS_KEYS: &[&str] = &["address", "destination", "reward_account"];
const DIGEST_KEYS: &[&str] = &["tx_id", "tx_hash", "hash", "xpub", "key"];

impl Redaction {
    /// Policy for a field key; the first matching class wins
    pub fn for_key(key: &str) -> Self {
        let key = key.to_ascii_lowercase();
        let matches = |set: &[&str]| set.iter().any(|k| key.contains(k));
        if matches(HIDDEN_KEYS) {
            Redaction::Hidden
        } else if matches(ADDRESS_KEYS) {
            Redaction::Address
        } else if matches(DIGEST_KEYS) {
            Redaction::Digest
        } else {
            Redaction::Clear
        }
    }

    pub fn apply(&self, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            return "[EMPTY]".to_string();
        }
        match self {
            Redaction::Clear => value.to_string(),
            Redaction::Hidden => hide(value),
            Redaction::Address => keep_ends(value, 8, 4),
            Redaction::Digest => keep_ends(value, 10, 6),
        }
    }
}

fn hide(value: &str) -> String {
    if value.len() <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", value.len())
    }
}

/// Short values are returned whole; they carry too little to shorten
fn keep_ends(value: &str, prefix: usize, suffix: usize) -> String {
    if value.len() <= prefix + suffix + 3 || !value.is_ascii() {
        return value.to_string();
    }
    format!("{}...{}", &value[..prefix], &value[value.len() - suffix..])
}

// =============================================================================
// Entries
// =============================================================================

#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field, redacted according to its key
    pub fn field(self, key: &'static str, value: impl fmt::Display) -> Self {
        self.field_with(key, value, Redaction::for_key(key))
    }

    pub fn field_with(mut self, key: &'static str, value: impl fmt::Display, redaction: Redaction) -> Self {
        self.fields.push((key, redaction.apply(&value.to_string())));
        self
    }

    fn enabled(&self) -> bool {
        self.level > LogLevel::Debug || is_debug_enabled()
    }

    /// Render the entry without the timestamp
    pub fn render(&self) -> String {
        let mut line = format!("{} [{}] {}", self.level, self.module, self.message);
        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push_str(if i == 0 { " | " } else { " " });
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }
        line
    }

    pub fn log(self) {
        if !self.enabled() {
            return;
        }
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        eprintln!("[{}] {}", timestamp, self.render());
    }
}

/// Shared body of the level macros
#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:ident, $module:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::$level,
            $module,
            $msg,
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($args:tt)*) => { $crate::__log_at!(Debug, $($args)*) };
}

#[macro_export]
macro_rules! log_info {
    ($($args:tt)*) => { $crate::__log_at!(Info, $($args)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($args:tt)*) => { $crate::__log_at!(Warn, $($args)*) };
}

#[macro_export]
macro_rules! log_error {
    ($($args:tt)*) => { $crate::__log_at!(Error, $($args)*) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_by_key() {
        assert_eq!(Redaction::for_key("pin"), Redaction::Hidden);
        assert_eq!(Redaction::for_key("voting_registration_signature"), Redaction::Hidden);
        assert_eq!(Redaction::for_key("reward_address"), Redaction::Address);
        assert_eq!(Redaction::for_key("expected_tx_id"), Redaction::Digest);
        assert_eq!(Redaction::for_key("stake_xpub"), Redaction::Digest);
        assert_eq!(Redaction::for_key("inputs"), Redaction::Clear);
    }

    #[test]
    fn test_hidden() {
        assert_eq!(Redaction::Hidden.apply(""), "[EMPTY]");
        assert_eq!(Redaction::Hidden.apply("1234"), "[REDACTED]");
        assert_eq!(Redaction::Hidden.apply("correct horse"), "[REDACTED:13chars]");
    }

    #[test]
    fn test_address_and_digest() {
        let addr = "addr1vxq0nckg3ekgzuqg7w5p9mvgnd9ym28qh5grlph8xd2z92sj922xh";
        assert_eq!(Redaction::Address.apply(addr), "addr1vxq...22xh");

        let tx_id = "3b40265111d8bb3c3c608d95b3a0bf83461ace32d79336579a1939b3aad1c0b7";
        assert_eq!(Redaction::Digest.apply(tx_id), "3b40265111...d1c0b7");
        assert_eq!(Redaction::Digest.apply("abcd"), "abcd");
    }

    #[test]
    fn test_render() {
        let entry = LogEntry::new(LogLevel::Info, "signer", "request sent")
            .field("inputs", 2)
            .field("passphrase", "hunter22")
            .field_with("path", "1852H/1815H/0H/0/0", Redaction::Clear);
        assert_eq!(
            entry.render(),
            "INFO [signer] request sent | inputs=2 passphrase=[REDACTED:8chars] path=1852H/1815H/0H/0/0"
        );
    }

    #[test]
    fn test_levels_above_debug_always_log() {
        for level in [LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
            assert!(LogEntry::new(level, "signer", "loud").enabled());
        }
    }
}
