//! Exchange rate table: loading the base rates and applying overrides

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Base rates keyed by `"{SOURCE}_TO_{TARGET}"`, as read from the rates file.
pub type BaseRates = HashMap<String, Decimal>;

#[derive(Debug, Error)]
pub enum RateSourceError {
    #[error("Failed to read rates file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse rates file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Rate for {key} is not a valid decimal: {value}")]
    InvalidRate { key: String, value: String },
}

/// Immutable mapping from pair key to rate. Built once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.rates.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rates.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries ordered by pair key.
    pub fn sorted(&self) -> BTreeMap<&str, Decimal> {
        self.rates.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }
}

/// Merges `base` with overrides returned by `lookup_env`.
///
/// Only keys already present in `base` are looked up, so an override can
/// replace an existing rate but never add a pair. Values that do not parse
/// as a decimal are ignored and the base rate is kept.
pub fn build_rate_table<F>(base: BaseRates, lookup_env: F) -> RateTable
where
    F: Fn(&str) -> Option<String>,
{
    let mut rates = base;

    for (key, rate) in rates.iter_mut() {
        let Some(raw) = lookup_env(key.as_str()) else {
            continue;
        };
        match parse_override(&raw) {
            Some(value) => {
                debug!(pair = %key, base = %rate, overridden = %value, "Applying rate override");
                *rate = value;
            }
            None => warn!(pair = %key, "Ignoring unparsable rate override"),
        }
    }

    RateTable { rates }
}

/// Parses an override value in plain decimal notation.
///
/// Accepts surrounding whitespace, a leading or trailing sign and `,` group
/// separators in the integer part. Exponents and `_` separators are rejected.
fn parse_override(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(['e', 'E', '_']) {
        return None;
    }

    // A trailing sign is only allowed when there is no leading one
    let (negative, unsigned) = if let Some(rest) = trimmed.strip_suffix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_suffix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };
    if unsigned.len() != trimmed.len() && unsigned.starts_with(['-', '+']) {
        return None;
    }

    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if fraction.is_some_and(|f| f.contains(','))
        || integer.trim_start_matches(['-', '+']).starts_with(',')
    {
        return None;
    }

    let mut digits = integer.replace(',', "");
    if let Some(fraction) = fraction {
        digits.push('.');
        digits.push_str(fraction);
    }
    let value = Decimal::from_str(&digits).ok()?;
    Some(if negative { -value } else { value })
}

/// Converts a JSON number, which may use exponent notation, to a decimal.
pub(crate) fn decimal_from_json(number: &serde_json::Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Reads the flat JSON rates file at `path`.
///
/// Loading is all-or-nothing: a single entry that is not a number, or whose
/// value does not fit a `Decimal` (e.g. `1e40` or `1e-40`), fails the whole
/// file with [`RateSourceError::InvalidRate`] and no pairs are loaded.
pub fn load_base_rates<P: AsRef<Path>>(path: P) -> Result<BaseRates, RateSourceError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| RateSourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: HashMap<String, serde_json::Number> =
        serde_json::from_str(&content).map_err(|source| RateSourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let rates = raw
        .into_iter()
        .map(|(key, number)| match decimal_from_json(&number) {
            Some(rate) => Ok((key, rate)),
            None => Err(RateSourceError::InvalidRate {
                key,
                value: number.to_string(),
            }),
        })
        .collect::<Result<BaseRates, _>>()?;
    debug!(count = rates.len(), "Loaded base rates from {}", path.display());
    Ok(rates)
}

/// Loads the rates file and applies overrides from the process environment.
///
/// A missing or malformed rates file yields an empty table; the failure is
/// logged rather than returned so the service can still start.
pub fn load_rate_table<P: AsRef<Path>>(path: P) -> RateTable {
    let base = match load_base_rates(path) {
        Ok(base) => base,
        Err(e) => {
            error!(error = %e, "Exception occurred while loading the exchange rates");
            BaseRates::new()
        }
    };

    let table = build_rate_table(base, |key| std::env::var(key).ok());
    info!(pairs = table.len(), "Exchange rate table ready");
    table
}
