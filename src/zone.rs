//! Parsing for the `zoneN` designator convention.
//!
//! Section layouts with several columns address each column as a zone:
//! `zone1` is the first column, `zone2` the second, and so on. A layout cell
//! that holds a sequence of styles is indexed by this number.
//!
//! ## Parsing rules
//!
//! - `"zone2"` → `Zone::Index(1)` (zero-based)
//! - `"zone0"` and numbers too large to index → [`Zone::OutOfRange`], never
//!   matches a sequence position
//! - `"zone 2"` → `Zone::Index(1)`; whitespace around the number is ignored
//! - `""` → [`Zone::Unset`], same as no zone at all
//! - `"zoneabc"`, `"column2"`, `"zone-1"` → [`Zone::Unparsed`], which callers
//!   treat as no zone

/// A parsed zone designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// No zone given (absent or empty).
    Unset,
    /// Zero-based position into a style sequence.
    Index(usize),
    /// Parsed, but can never address a position (`zone0`).
    OutOfRange,
    /// Present but not of the form `zone<N>`.
    Unparsed,
}

impl Zone {
    /// Pick the style for this zone from a sequence of column variants.
    ///
    /// `Unset` and `Unparsed` both take the first element.
    pub fn select<'a>(&self, styles: &'a [String]) -> Option<&'a str> {
        match self {
            Zone::Unset | Zone::Unparsed => styles.first().map(String::as_str),
            Zone::Index(n) => styles.get(*n).map(String::as_str),
            Zone::OutOfRange => None,
        }
    }
}

/// Parse an optional zone designator.
pub fn parse_zone(zone: Option<&str>) -> Zone {
    let raw = match zone.map(str::trim) {
        None | Some("") => return Zone::Unset,
        Some(raw) => raw,
    };
    let Some(number) = raw.strip_prefix("zone") else {
        return Zone::Unparsed;
    };
    let number = number.trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Zone::Unparsed;
    }
    match number.parse::<usize>() {
        Ok(0) => Zone::OutOfRange,
        Ok(n) => Zone::Index(n - 1),
        // All digits, just too large for any sequence.
        Err(_) => Zone::OutOfRange,
    }
}
