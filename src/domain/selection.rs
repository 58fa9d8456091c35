//! Selection filter: dedup by name, canonicalize locations, drop invalid records.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::domain::entities::{Character, NONE};
use crate::domain::locations::{LocationCanonicalizer, EXCLUDED};

/// Genders that disqualify a record from the selection.
pub const EXCLUDED_GENDERS: [&str; 2] = [NONE, "Radiant"];

/// Counters gathered while selecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    pub input: usize,
    pub duplicates: usize,
    pub unmatched_locations: usize,
    pub invalid_gender: usize,
    pub selected: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionFilter {
    canonicalizer: LocationCanonicalizer,
}

impl SelectionFilter {
    pub fn new(canonicalizer: LocationCanonicalizer) -> Self {
        Self { canonicalizer }
    }

    pub fn canonicalizer(&self) -> &LocationCanonicalizer {
        &self.canonicalizer
    }

    pub fn select(&self, characters: Vec<Character>) -> Vec<Character> {
        self.select_with_stats(characters).0
    }

    /// Runs the three selection steps in order; survivors keep their
    /// original relative order.
    pub fn select_with_stats(
        &self,
        mut characters: Vec<Character>,
    ) -> (Vec<Character>, SelectionStats) {
        let mut stats = SelectionStats {
            input: characters.len(),
            ..SelectionStats::default()
        };

        stats.duplicates = mark_duplicates(&mut characters);

        for c in characters.iter_mut() {
            let was_marked = c.location == EXCLUDED;
            c.location = self.canonicalizer.canonicalize(&c.name, &c.location);
            if !was_marked && c.location == EXCLUDED {
                trace!("unmatched location for {:?}", c.name);
                stats.unmatched_locations += 1;
            }
        }

        let selected: Vec<Character> = characters
            .into_iter()
            .filter(|c| {
                if c.location == EXCLUDED {
                    return false;
                }
                let keep = is_selectable(c);
                if !keep {
                    stats.invalid_gender += 1;
                }
                keep
            })
            .collect();
        stats.selected = selected.len();

        debug!(
            "selection: input={} duplicates={} unmatched={} invalid_gender={} selected={}",
            stats.input,
            stats.duplicates,
            stats.unmatched_locations,
            stats.invalid_gender,
            stats.selected
        );
        (selected, stats)
    }
}

/// Marks every repeated name as excluded; the first occurrence is untouched.
/// Sequence length is unchanged. Returns the number of marked records.
pub fn mark_duplicates(characters: &mut [Character]) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut marked = 0;
    for c in characters.iter_mut() {
        if !seen.insert(c.name.clone()) {
            trace!("duplicate name {:?}", c.name);
            c.location = EXCLUDED.to_string();
            marked += 1;
        }
    }
    marked
}

/// Final selection predicate, applied after canonicalization.
pub fn is_selectable(character: &Character) -> bool {
    character.location != EXCLUDED && !EXCLUDED_GENDERS.contains(&character.gender.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalizer::normalize;
    use crate::domain::RawRecord;

    fn character(name: &str, location: &str, gender: &str) -> Character {
        normalize(
            &RawRecord::new()
                .with("Name", name)
                .with("Location", location)
                .with("Gender", gender),
        )
    }

    #[test]
    fn given_duplicates_when_marking_then_length_is_unchanged_and_later_ones_excluded() {
        let mut characters = vec![
            character("Lydia", "Whiterun", "Female"),
            character("Lydia", "Solitude", "Female"),
            character("Lydia", "Riften", "Female"),
        ];

        let marked = mark_duplicates(&mut characters);

        assert_eq!(marked, 2);
        assert_eq!(characters.len(), 3);
        assert_eq!(characters[0].location, "Whiterun");
        assert_eq!(characters[1].location, EXCLUDED);
        assert_eq!(characters[2].location, EXCLUDED);
    }

    #[test]
    fn given_mixed_records_when_selecting_then_counts_every_exclusion() {
        let filter = SelectionFilter::default();
        let characters = vec![
            character("Lydia", "Whiterun", "Female"),
            character("Lydia", "Whiterun", "Female"),
            character("Wanderer", "Atmora", "Male"),
            character("Spirit", "Riften", "Radiant"),
            character("Ghost", "Riften", ""),
            character("Brynjolf", "The Ratway", "Male"),
        ];

        let (selected, stats) = filter.select_with_stats(characters);

        let names: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Lydia", "Brynjolf"]);
        assert_eq!(
            stats,
            SelectionStats {
                input: 6,
                duplicates: 1,
                unmatched_locations: 1,
                invalid_gender: 2,
                selected: 2,
            }
        );
        assert_eq!(selected[1].location, "Riften");
    }

    #[test]
    fn given_duplicate_nazeem_when_selecting_then_override_does_not_resurrect_it() {
        let filter = SelectionFilter::default();
        let characters = vec![
            character("Nazeem", "Whiterun", "Male"),
            character("Nazeem", "Whiterun", "Male"),
        ];

        let selected = filter.select(characters);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].location, "The Cloud District");
    }

    #[test]
    fn given_selected_character_when_checking_predicate_then_selectable() {
        let mut c = character("Ysolda", "Whiterun", "Female");
        c.location = "Whiterun".to_string();
        assert!(is_selectable(&c));

        c.gender = "Radiant".to_string();
        assert!(!is_selectable(&c));
    }
}
