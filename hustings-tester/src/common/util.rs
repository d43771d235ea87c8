use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds. Negative values fold to their magnitude.
pub fn parse_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<i64>()
                .map(i64::unsigned_abs)
                .or_else(|_| token.parse::<u64>())
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect()
}

/// XxHash64 of the canonical JSON encoding, as 16 hex digits.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value).context("serializing output for fingerprint")?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Ok(format!("{:016x}", hasher.finish()))
}

pub fn report_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" fptp, ,mmp,  sntv ");
        assert_eq!(parts, vec!["fptp", "mmp", "sntv"]);
    }

    #[test]
    fn seeds_accept_signed_values() {
        let seeds = parse_seeds(&["7".to_string(), "-3".to_string()]).unwrap();
        assert_eq!(seeds, vec![7, 3]);
        assert!(parse_seeds(&["seven".to_string()]).is_err());
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = fingerprint(&json!({ "id": "a", "polling": 50.0 })).unwrap();
        let b = fingerprint(&json!({ "id": "a", "polling": 50.0 })).unwrap();
        let c = fingerprint(&json!({ "id": "b", "polling": 50.0 })).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }
}
