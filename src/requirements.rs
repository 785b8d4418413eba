//! Fixed placements supplied by the user, e.g. `a:0,b:3`.

use std::collections::BTreeMap;
use std::num::IntErrorKind;
use std::str::FromStr;

use crate::errors::{RequirementError, RequirementResult};

/// Symbol to required tape location. Locations are kept signed until the
/// variable count is known, so negative input is reported as out of range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingRequirement {
    locations: BTreeMap<char, i64>,
}

impl MappingRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a requirement. A symbol may only be required once.
    pub fn require(&mut self, symbol: char, location: i64) -> RequirementResult<()> {
        if self.locations.contains_key(&symbol) {
            return Err(RequirementError::Duplicate { symbol });
        }
        self.locations.insert(symbol, location);
        Ok(())
    }

    pub fn get(&self, symbol: char) -> Option<i64> {
        self.locations.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.locations.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, i64)> + '_ {
        self.locations.iter().map(|(&symbol, &location)| (symbol, location))
    }
}

impl FromStr for MappingRequirement {
    type Err = RequirementError;

    fn from_str(spec: &str) -> RequirementResult<Self> {
        let mut requirements = MappingRequirement::new();
        for token in spec.split(',') {
            let (symbol, location) = parse_token(token)?;
            requirements.require(symbol, location)?;
        }
        Ok(requirements)
    }
}

fn parse_token(token: &str) -> RequirementResult<(char, i64)> {
    let malformed = |reason| RequirementError::Malformed {
        token: token.to_string(),
        reason,
    };

    let parts: Vec<&str> = token.split(':').collect();
    let [symbol, location] = parts[..] else {
        return Err(malformed("expected <symbol>:<location>"));
    };

    let mut chars = symbol.chars();
    let symbol = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(malformed("symbol must be exactly one character")),
    };

    let location =
        parse_location(location).ok_or_else(|| malformed("location is not an integer"))?;

    Ok((symbol, location))
}

// Integer with optional sign, surrounding whitespace and single underscores
// between digits. Values past the i64 range saturate so they are later
// reported as out of range rather than malformed.
fn parse_location(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    match cleaned.parse::<i64>() {
        Ok(location) => Some(location),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Parses a comma-separated list of `symbol:location` pairs.
pub fn parse_requirements(spec: &str) -> RequirementResult<MappingRequirement> {
    spec.parse()
}
