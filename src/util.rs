//! Grab-bag helpers (§4.C14): endian swap, shortest-roundtrip float
//! printing, the option-list mini-parser, and a sorted string list.

use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// True if this machine is little-endian. The wire format (§6) is always
/// little-endian; this is only used to decide whether a read needs a byte
/// swap.
pub const fn is_little_endian() -> bool {
    cfg!(target_endian = "little")
}

pub fn swap_bytes_u32(val: u32) -> u32 {
    val.swap_bytes()
}

pub fn swap_bytes_u64(val: u64) -> u64 {
    val.swap_bytes()
}

pub fn swap_bytes_f64(val: f64) -> f64 {
    f64::from_bits(val.to_bits().swap_bytes())
}

/// Below this magnitude a value prints as `"0"` regardless of precision —
/// mirrors the C original collapsing `nextafter(0, 1)` to `"0"`.
const PRINT_ZERO_TOLERANCE: f64 = 1e-300;

/// Shortest-roundtrip decimal print of `val`, clipped to at most
/// `max_digits` significant digits.
///
/// Rust's own `{}` formatting for `f64` already produces the shortest
/// string that parses back to the same value (Ryu-style), so this wraps
/// that rather than hand-rolling digit generation, then re-applies the
/// spec's two observable behaviors: a magnitude-based "flush to zero" and
/// a hard cap on significant digits for callers that pass a tighter bound
/// than Rust's natural shortest form.
pub fn print_double(val: f64, max_digits: usize) -> String {
    if val == 0.0 || val.abs() < PRINT_ZERO_TOLERANCE {
        return "0".to_string();
    }
    if !val.is_finite() {
        return val.to_string();
    }
    let shortest = format!("{val}");
    if significant_digits(&shortest) <= max_digits {
        return shortest;
    }
    let rounded = format!("{val:.*e}", max_digits.saturating_sub(1));
    // Re-parse and reformat through the shortest-roundtrip path so we never
    // emit more digits than `val` actually carries.
    let reparsed: f64 = rounded.parse().unwrap_or(val);
    format!("{reparsed}")
}

fn significant_digits(s: &str) -> usize {
    s.chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .trim_start_matches('0')
        .len()
        .max(1)
}

/// A parsed `key=value` option list (§6). Unknown keys are rejected at
/// parse time so callers never silently ignore a typo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    pairs: Vec<(String, String)>,
}

impl OptionList {
    /// Parses a space-separated list of `key=value` tokens, validating
    /// against the recognized keys from §6: `method` in
    /// `{linework, structure}`, `keepcollapsed` in `{true, false}`.
    pub fn parse(input: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for token in input.split_whitespace() {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| Error::InvalidOption(token.to_string()))?;
            let key = key.to_ascii_lowercase();
            match key.as_str() {
                "method" => {
                    if value != "linework" && value != "structure" {
                        return Err(Error::InvalidOption(token.to_string()));
                    }
                }
                "keepcollapsed" => {
                    if value != "true" && value != "false" {
                        return Err(Error::InvalidOption(token.to_string()));
                    }
                }
                _ => return Err(Error::InvalidOption(token.to_string())),
            }
            pairs.push((key, value.to_string()));
        }
        Ok(OptionList { pairs })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A sorted, deduplicated set of strings, used where the original keeps a
/// `stringlist_t` to collect and look up identifiers (e.g. collaborator
/// option echoing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList {
    data: BTreeSet<String>,
}

impl StringList {
    pub fn new() -> Self {
        StringList::default()
    }

    pub fn add_string(&mut self, s: impl Into<String>) {
        self.data.insert(s.into());
    }

    pub fn find(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_double_shortest_roundtrip() {
        assert_eq!(print_double(0.3, 15), "0.3");
    }

    #[test]
    fn print_double_zero_tolerance() {
        let tiny = f64::from_bits(1); // nextafter(0, 1)
        assert_eq!(print_double(tiny, 15), "0");
        assert_eq!(print_double(0.0, 15), "0");
    }

    #[test]
    fn option_list_parses_known_keys() {
        let opts = OptionList::parse("method=linework keepcollapsed=true").unwrap();
        assert_eq!(opts.get("method"), Some("linework"));
        assert_eq!(opts.get("keepcollapsed"), Some("true"));
        assert_eq!(opts.len(), 2);
    }

    #[test]
    fn option_list_rejects_unknown_key() {
        assert!(OptionList::parse("bogus=1").is_err());
    }

    #[test]
    fn option_list_rejects_bad_value() {
        assert!(OptionList::parse("method=overlay").is_err());
    }

    #[test]
    fn string_list_dedupes_and_sorts() {
        let mut sl = StringList::new();
        sl.add_string("b");
        sl.add_string("a");
        sl.add_string("a");
        assert_eq!(sl.len(), 2);
        assert_eq!(sl.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(sl.find("a"), Some("a"));
        assert_eq!(sl.find("z"), None);
    }

    #[test]
    fn endian_swap_round_trips() {
        let v = 0x1122_3344_5566_7788u64;
        assert_eq!(swap_bytes_u64(swap_bytes_u64(v)), v);
        let f = 1.5f64;
        assert_eq!(swap_bytes_f64(swap_bytes_f64(f)), f);
    }
}
