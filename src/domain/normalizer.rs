//! Record normalizer: raw source record → canonical [`Character`].
//!
//! Never fails. Missing text fields become [`NONE`], missing or
//! non-numeric stats become `None`.

use crate::domain::entities::{Character, RawRecord, RawValue, NONE};

/// Source field names the normalizer reads.
pub mod keys {
    pub const NAME: &str = "Name";
    pub const HOME_CITY: &str = "Home City";
    pub const HOME_TOWN: &str = "Home Town";
    pub const LOCATION: &str = "Location";
    pub const RACE: &str = "Race";
    pub const GENDER: &str = "Gender";
    pub const CLASS: &str = "Class";
    pub const MORALITY: &str = "Morality";
    pub const AGGRESSION: &str = "Aggression";
    pub const FACTIONS: &str = "Faction(s)";
    pub const PRIMARY_SKILLS: &str = "Primary Skills";
    pub const HEALTH: &str = "Health";
    pub const MAGICKA: &str = "Magicka";
    pub const STAMINA: &str = "Stamina";
}

/// Location fields in order of preference.
const LOCATION_PRECEDENCE: [&str; 3] = [keys::HOME_CITY, keys::HOME_TOWN, keys::LOCATION];

const SUB_LOCATION_SEPARATOR: &str = ", ";
const FACTION_SEPARATOR: &str = "; ";
const SKILL_SEPARATOR: &str = ", ";

pub fn normalize(raw: &RawRecord) -> Character {
    Character {
        name: text_field(raw, keys::NAME),
        location: resolve_location(raw),
        race: text_field(raw, keys::RACE),
        gender: text_field(raw, keys::GENDER),
        class: text_field(raw, keys::CLASS),
        morality: text_field(raw, keys::MORALITY),
        aggression: text_field(raw, keys::AGGRESSION),
        faction: factions(raw),
        skill: primary_skill(raw),
        health: stat(raw, keys::HEALTH),
        magicka: stat(raw, keys::MAGICKA),
        stamina: stat(raw, keys::STAMINA),
    }
}

/// First present location field, cut before any sub-location detail.
///
/// Presence decides, not content: an empty `Home City` still shadows `Location`.
pub fn resolve_location(raw: &RawRecord) -> String {
    let location = LOCATION_PRECEDENCE
        .iter()
        .find_map(|key| raw.get(key))
        .map(RawValue::to_text)
        .unwrap_or_else(|| NONE.to_string());

    location
        .split(SUB_LOCATION_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn truthy<'a>(raw: &'a RawRecord, key: &str) -> Option<&'a RawValue> {
    raw.get(key).filter(|v| v.is_truthy())
}

fn text_field(raw: &RawRecord, key: &str) -> String {
    truthy(raw, key)
        .map(|v| v.to_text().trim().to_string())
        .unwrap_or_else(|| NONE.to_string())
}

fn factions(raw: &RawRecord) -> Option<Vec<String>> {
    truthy(raw, keys::FACTIONS).map(|v| {
        v.to_text()
            .split(FACTION_SEPARATOR)
            .map(|f| f.trim().to_string())
            .collect()
    })
}

/// Only the first listed skill is kept.
fn primary_skill(raw: &RawRecord) -> String {
    truthy(raw, keys::PRIMARY_SKILLS)
        .map(|v| {
            v.to_text()
                .split(SKILL_SEPARATOR)
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| NONE.to_string())
}

fn stat(raw: &RawRecord, key: &str) -> Option<i64> {
    raw.get(key).and_then(RawValue::as_int)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_record_when_normalizing_then_every_field_falls_back() {
        let c = normalize(&RawRecord::new());

        assert_eq!(c.name, NONE);
        assert_eq!(c.location, NONE);
        assert_eq!(c.gender, NONE);
        assert_eq!(c.skill, NONE);
        assert_eq!(c.faction, None);
        assert_eq!((c.health, c.magicka, c.stamina), (None, None, None));
    }

    #[test]
    fn given_all_location_fields_when_resolving_then_home_city_wins() {
        let raw = RawRecord::new()
            .with("Location", "Dragonsreach")
            .with("Home Town", "Riverwood")
            .with("Home City", "Whiterun");
        assert_eq!(resolve_location(&raw), "Whiterun");

        let raw = RawRecord::new()
            .with("Location", "Dragonsreach")
            .with("Home Town", "Riverwood");
        assert_eq!(resolve_location(&raw), "Riverwood");
    }

    #[test]
    fn given_empty_home_city_when_resolving_then_it_still_shadows_location() {
        let raw = RawRecord::new()
            .with("Home City", "")
            .with("Location", "Whiterun");
        assert_eq!(resolve_location(&raw), "");
    }

    #[test]
    fn given_sub_location_when_resolving_then_detail_is_dropped() {
        let raw = RawRecord::new().with("Location", "  Left Hand Mine, Cell 3, Upper");
        assert_eq!(resolve_location(&raw), "Left Hand Mine");
    }

    #[test]
    fn given_comma_without_space_when_resolving_then_location_is_kept_whole() {
        let raw = RawRecord::new().with("Location", "Markarth,Ruins");
        assert_eq!(resolve_location(&raw), "Markarth,Ruins");
    }

    #[test]
    fn given_padded_text_when_normalizing_then_fields_are_trimmed() {
        let raw = RawRecord::new()
            .with("Name", "  Ulfric Stormcloak ")
            .with("Race", "Nord\t")
            .with("Class", "   ");
        let c = normalize(&raw);

        assert_eq!(c.name, "Ulfric Stormcloak");
        assert_eq!(c.race, "Nord");
        // whitespace-only is provided, so it trims to empty rather than "none"
        assert_eq!(c.class, "");
    }

    #[test]
    fn given_faction_list_when_normalizing_then_splits_on_semicolon() {
        let raw = RawRecord::new().with(
            "Faction(s)",
            "Stormcloaks; Windhelm Faction ; Jarl Faction",
        );
        let c = normalize(&raw);

        assert_eq!(
            c.faction,
            Some(vec![
                "Stormcloaks".to_string(),
                "Windhelm Faction".to_string(),
                "Jarl Faction".to_string(),
            ])
        );
    }

    #[test]
    fn given_primary_skills_when_normalizing_then_keeps_first_only() {
        let raw = RawRecord::new().with("Primary Skills", " Two-handed , Heavy Armor, Block");
        assert_eq!(normalize(&raw).skill, "Two-handed");
    }

    #[test]
    fn given_numeric_fields_when_normalizing_then_stats_are_parsed() {
        let raw = RawRecord::new()
            .with("Health", "100")
            .with("Magicka", 50_i64)
            .with("Stamina", "n/a");
        let c = normalize(&raw);

        assert_eq!(c.health, Some(100));
        assert_eq!(c.magicka, Some(50));
        assert_eq!(c.stamina, None);
    }

    #[test]
    fn given_zero_stat_when_normalizing_then_zero_is_kept() {
        let raw = RawRecord::new().with("Health", 0_i64);
        assert_eq!(normalize(&raw).health, Some(0));
    }

    #[test]
    fn given_numeric_name_when_normalizing_then_renders_as_text() {
        let raw = RawRecord::new().with("Name", 42_i64).with("Gender", 0_i64);
        let c = normalize(&raw);

        assert_eq!(c.name, "42");
        assert_eq!(c.gender, NONE);
    }
}
