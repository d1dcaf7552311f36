// Accounts, principals and amounts

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ledger quantity (bounties, balances, allowances)
pub type Amount = u64;

/// Largest amount the store can represent (balances are signed 64-bit columns)
pub const MAX_AMOUNT: Amount = i64::MAX as Amount;

const MAX_ADDRESS_LEN: usize = 64;

/// Ledger account address
///
/// 1-64 ASCII characters from `[A-Za-z0-9_.:-]`, which admits both hex
/// addresses (`0xabc...`) and symbolic names (`escrow`, `alice`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();

        if s.is_empty() {
            return Err(DomainError::InvalidAddress("address is empty".to_string()));
        }
        if s.len() > MAX_ADDRESS_LEN {
            return Err(DomainError::InvalidAddress(format!(
                "address too long ({} > {} chars)",
                s.len(),
                MAX_ADDRESS_LEN
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'))
        {
            return Err(DomainError::InvalidAddress(format!(
                "'{}' must be alphanumeric (plus _ . : -)",
                s
            )));
        }

        Ok(Self(canonical_hex(s)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hex addresses (`0x` + hex digits) are case-insensitive; store them lower-cased
fn canonical_hex(s: String) -> String {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
            s.to_ascii_lowercase()
        }
        _ => s,
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Authenticated caller identity
///
/// Every lifecycle operation takes the caller explicitly; authentication
/// happens at the boundary that constructs the principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(Address);

impl Principal {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> &Address {
        &self.0
    }

    pub fn is(&self, address: &Address) -> bool {
        &self.0 == address
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Address> for Principal {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_hex_and_names() {
        assert!(Address::parse("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").is_ok());
        assert!(Address::parse("escrow").is_ok());
        assert!(Address::parse("team:alice-01.dev").is_ok());
    }

    #[test]
    fn test_hex_addresses_ignore_case() {
        let mixed = Address::parse("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        let lower = Address::parse("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(mixed.as_str(), "0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
        assert_eq!(Address::parse("0XABC").unwrap().as_str(), "0xabc");

        // Symbolic names keep their case
        assert_eq!(Address::parse("Alice").unwrap().as_str(), "Alice");
        assert_eq!(Address::parse("0xZoe").unwrap().as_str(), "0xZoe");
    }

    #[test]
    fn test_parse_rejects_empty_and_long() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("a".repeat(65)).is_err());
        assert!(Address::parse("a".repeat(64)).is_ok());
    }

    #[test]
    fn test_parse_rejects_invalid_chars() {
        let err = Address::parse("alice bob").unwrap_err();
        assert!(err.to_string().contains("alphanumeric"));
        assert!(Address::parse("drop;table").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let ok: Address = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<Address>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"alice\"");
    }

    #[test]
    fn test_principal_identity() {
        let alice = Address::parse("alice").unwrap();
        let bob = Address::parse("bob").unwrap();
        let caller = Principal::new(alice.clone());
        assert!(caller.is(&alice));
        assert!(!caller.is(&bob));
    }
}
