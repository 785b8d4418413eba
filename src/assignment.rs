//! Variable placements: the partially fixed template and complete maps.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::errors::{RequirementError, RequirementResult};
use crate::requirements::MappingRequirement;

/// Assignment array of length N with required variables pre-placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    slots: Vec<Option<char>>,
    free: Vec<char>,
}

impl Template {
    /// Places each required variable at its location; the remaining
    /// variables become the free set, in code point order.
    pub fn resolve(
        variables: &BTreeSet<char>,
        requirements: &MappingRequirement,
    ) -> RequirementResult<Self> {
        let count = variables.len();
        let mut slots = vec![None; count];

        for (symbol, location) in requirements.iter() {
            let index = usize::try_from(location)
                .ok()
                .filter(|&index| index < count)
                .ok_or(RequirementError::OutOfRange {
                    symbol,
                    location,
                    count,
                })?;
            if !variables.contains(&symbol) {
                return Err(RequirementError::UnknownVariable { symbol });
            }
            if let Some(first) = slots[index] {
                return Err(RequirementError::Conflict {
                    location: index,
                    first,
                    second: symbol,
                });
            }
            slots[index] = Some(symbol);
        }

        let free = variables
            .iter()
            .copied()
            .filter(|&v| !requirements.contains(v))
            .collect();

        Ok(Template { slots, free })
    }

    /// Total variable count N.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    /// Variables without a required location.
    pub fn free(&self) -> &[char] {
        &self.free
    }

    /// Fills the holes left to right with `ordering`, one variable per hole.
    pub fn fill(&self, ordering: &[char]) -> VariableMap {
        debug_assert_eq!(ordering.len(), self.free.len());
        let mut next = ordering.iter().copied();
        let by_location: Vec<char> = self
            .slots
            .iter()
            .filter_map(|slot| slot.or_else(|| next.next()))
            .collect();
        VariableMap::from_locations(by_location)
    }
}

/// A complete, injective placement of every variable onto `0..N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMap {
    by_location: Vec<char>,
    locations: HashMap<char, usize>,
}

impl VariableMap {
    /// Builds a map where `by_location[i]` lives at location `i`.
    pub fn from_locations(by_location: Vec<char>) -> Self {
        let locations = by_location
            .iter()
            .enumerate()
            .map(|(location, &symbol)| (symbol, location))
            .collect();
        VariableMap {
            by_location,
            locations,
        }
    }

    pub fn get(&self, symbol: char) -> Option<usize> {
        self.locations.get(&symbol).copied()
    }

    pub fn symbol_at(&self, location: usize) -> Option<char> {
        self.by_location.get(location).copied()
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }

    /// `(symbol, location)` pairs in location order.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.by_location
            .iter()
            .enumerate()
            .map(|(location, &symbol)| (symbol, location))
    }
}

/// Writes a quoted symbol, escaping `'` and `\`.
pub(crate) fn write_symbol(f: &mut impl fmt::Write, symbol: char) -> fmt::Result {
    match symbol {
        '\'' | '\\' => write!(f, "'\\{}'", symbol),
        _ => write!(f, "'{}'", symbol),
    }
}

/// `{'a': 0, 'b': 1}`, pairs in location order.
impl fmt::Display for VariableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (symbol, location)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_symbol(f, symbol)?;
            write!(f, ": {}", location)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::parse_requirements;
    use pretty_assertions::assert_eq;

    fn vars(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    #[test]
    fn test_template_places_required() {
        let reqs = parse_requirements("c:0,a:2").unwrap();
        let template = Template::resolve(&vars("abcd"), &reqs).unwrap();
        assert_eq!(template.len(), 4);
        assert_eq!(template.slots(), &[Some('c'), None, Some('a'), None]);
        assert_eq!(template.free(), &['b', 'd']);
    }

    #[test]
    fn test_fill_holes_left_to_right() {
        let reqs = parse_requirements("c:0,a:2").unwrap();
        let template = Template::resolve(&vars("abcd"), &reqs).unwrap();
        let map = template.fill(&['d', 'b']);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![('c', 0), ('d', 1), ('a', 2), ('b', 3)]);
        assert_eq!(map.get('a'), Some(2));
        assert_eq!(map.symbol_at(1), Some('d'));
    }

    #[test]
    fn test_location_out_of_range() {
        let reqs = parse_requirements("a:0,b:5").unwrap();
        assert_eq!(
            Template::resolve(&vars("ab"), &reqs),
            Err(RequirementError::OutOfRange {
                symbol: 'b',
                location: 5,
                count: 2
            })
        );

        let reqs = parse_requirements("a:-1").unwrap();
        assert!(matches!(
            Template::resolve(&vars("ab"), &reqs),
            Err(RequirementError::OutOfRange { location: -1, .. })
        ));
    }

    #[test]
    fn test_conflicting_locations() {
        let reqs = parse_requirements("a:1,b:1").unwrap();
        assert_eq!(
            Template::resolve(&vars("abc"), &reqs),
            Err(RequirementError::Conflict {
                location: 1,
                first: 'a',
                second: 'b'
            })
        );
    }

    #[test]
    fn test_unknown_variable() {
        let reqs = parse_requirements("z:0").unwrap();
        assert_eq!(
            Template::resolve(&vars("ab"), &reqs),
            Err(RequirementError::UnknownVariable { symbol: 'z' })
        );
    }

    #[test]
    fn test_empty_program() {
        let template = Template::resolve(&BTreeSet::new(), &MappingRequirement::new()).unwrap();
        assert!(template.is_empty());
        assert_eq!(template.len(), 0);
        assert!(template.fill(&[]).is_empty());
    }

    #[test]
    fn test_display() {
        let map = VariableMap::from_locations(vec!['b', '\'', 'a']);
        assert_eq!(map.to_string(), r"{'b': 0, '\'': 1, 'a': 2}");
        assert_eq!(VariableMap::from_locations(vec![]).to_string(), "{}");
    }
}
