//! Location canonicalizer: free-text locations → canonical settlements.
//!
//! One ordered lookup table, exact string match, first hit wins.
//! Anything unmatched resolves to [`EXCLUDED`].

use std::fmt;

use serde::Serialize;

/// Location marker meaning "drop this record from the selection".
pub const EXCLUDED: &str = "x";

/// Settlement assigned to [`OVERRIDE_NAME`] regardless of location text.
pub const CLOUD_DISTRICT: &str = "The Cloud District";

/// Character whose location is keyed by identity instead of location text.
pub const OVERRIDE_NAME: &str = "Nazeem";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Settlement {
    Solitude,
    Helgen,
    Rorikstead,
    Morthal,
    Kynesgrove,
    Riverwood,
    Karthwasten,
    Ivarstead,
    DragonBridge,
    Dawnstar,
    FalkreathSanctuary,
    Riften,
    Windhelm,
    Winterhold,
    Whiterun,
    Markarth,
    Stonehills,
    ShorsStone,
}

impl Settlement {
    pub const ALL: [Settlement; 18] = [
        Settlement::Solitude,
        Settlement::Helgen,
        Settlement::Rorikstead,
        Settlement::Morthal,
        Settlement::Kynesgrove,
        Settlement::Riverwood,
        Settlement::Karthwasten,
        Settlement::Ivarstead,
        Settlement::DragonBridge,
        Settlement::Dawnstar,
        Settlement::FalkreathSanctuary,
        Settlement::Riften,
        Settlement::Windhelm,
        Settlement::Winterhold,
        Settlement::Whiterun,
        Settlement::Markarth,
        Settlement::Stonehills,
        Settlement::ShorsStone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Settlement::Solitude => "Solitude",
            Settlement::Helgen => "Helgen",
            Settlement::Rorikstead => "Rorikstead",
            Settlement::Morthal => "Morthal",
            Settlement::Kynesgrove => "Kynesgrove",
            Settlement::Riverwood => "Riverwood",
            Settlement::Karthwasten => "Karthwasten",
            Settlement::Ivarstead => "Ivarstead",
            Settlement::DragonBridge => "Dragon Bridge",
            Settlement::Dawnstar => "Dawnstar",
            Settlement::FalkreathSanctuary => "Falkreath Sanctuary",
            Settlement::Riften => "Riften",
            Settlement::Windhelm => "Windhelm",
            Settlement::Winterhold => "Winterhold",
            Settlement::Whiterun => "Whiterun",
            Settlement::Markarth => "Markarth",
            Settlement::Stonehills => "Stonehills",
            Settlement::ShorsStone => "Shor's Stone",
        }
    }

    /// Settlements whose mapping the data owner has not confirmed.
    /// They resolve to [`EXCLUDED`] unless explicitly enabled.
    pub fn is_confirmed(self) -> bool {
        !matches!(self, Settlement::Stonehills | Settlement::ShorsStone)
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed location variants. Falkreath entries map to Dawnstar as in the
/// published charts.
const LOCATION_TABLE: &[(&str, Settlement)] = &[
    ("Solitude", Settlement::Solitude),
    ("Castle Dour", Settlement::Solitude),
    ("Solitude Sewers", Settlement::Solitude),
    ("Solitude then Windhelm", Settlement::Solitude),
    ("Wandering the streets near the Bards College", Settlement::Solitude),
    ("Helgen", Settlement::Helgen),
    ("Helgen Keep", Settlement::Helgen),
    ("Helgen/Helgen Keep", Settlement::Helgen),
    ("Rorikstead", Settlement::Rorikstead),
    ("Morthal", Settlement::Morthal),
    ("Kynesgrove", Settlement::Kynesgrove),
    ("Riverwood", Settlement::Riverwood),
    ("Karthwasten", Settlement::Karthwasten),
    ("Ivarstead", Settlement::Ivarstead),
    ("Falkreath", Settlement::Dawnstar),
    ("Falkreath Jail", Settlement::Dawnstar),
    ("Dragon Bridge", Settlement::DragonBridge),
    ("Dawnstar", Settlement::Dawnstar),
    ("Outside Dawnstar or Riften", Settlement::Dawnstar),
    ("Dark Brotherhood Sanctuary", Settlement::FalkreathSanctuary),
    ("Dawnstar Sanctuary", Settlement::FalkreathSanctuary),
    ("Riften", Settlement::Riften),
    ("Riften (After his quest)", Settlement::Riften),
    ("Riften Docks", Settlement::Riften),
    ("Riften Jail", Settlement::Riften),
    ("The Ragged Flagon - Cistern", Settlement::Riften),
    ("The Ratway", Settlement::Riften),
    ("Windhelm", Settlement::Windhelm),
    ("Northern Maiden (Windhelm)", Settlement::Windhelm),
    ("Outside Windhelm or Solitude", Settlement::Windhelm),
    ("Winterhold", Settlement::Winterhold),
    ("The Midden", Settlement::Winterhold),
    ("The Midden Dark", Settlement::Winterhold),
    ("Whiterun", Settlement::Whiterun),
    ("The Bannered Mare", Settlement::Whiterun),
    ("Stonehills", Settlement::Stonehills),
    ("Shor's Stone", Settlement::ShorsStone),
    ("Markarth", Settlement::Markarth),
    ("Markarth Ruins", Settlement::Markarth),
    ("Outside Whiterun or Markarth", Settlement::Markarth),
    ("Silver-Blood Inn", Settlement::Markarth),
    ("Temple of Dibella", Settlement::Markarth),
    ("Understone Keep", Settlement::Markarth),
    ("Left Hand Mine", Settlement::Markarth),
    ("Left Hand Miner's Barracks", Settlement::Markarth),
];

/// Total mapping from (name, location) to a canonical location string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationCanonicalizer {
    include_unconfirmed: bool,
}

impl LocationCanonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map Stonehills and Shor's Stone to themselves instead of excluding them.
    pub fn with_unconfirmed(include_unconfirmed: bool) -> Self {
        Self { include_unconfirmed }
    }

    pub fn includes_unconfirmed(&self) -> bool {
        self.include_unconfirmed
    }

    /// Table lookup only, without the identity override.
    pub fn lookup(&self, location: &str) -> Option<Settlement> {
        LOCATION_TABLE
            .iter()
            .find(|(variant, _)| *variant == location)
            .map(|(_, settlement)| *settlement)
            .filter(|s| self.include_unconfirmed || s.is_confirmed())
    }

    /// Canonical location for a record.
    ///
    /// An already excluded location stays excluded, so duplicates marked
    /// during selection are never resurrected by the identity override.
    pub fn canonicalize(&self, name: &str, location: &str) -> String {
        if location == EXCLUDED {
            return EXCLUDED.to_string();
        }
        if name == OVERRIDE_NAME {
            return CLOUD_DISTRICT.to_string();
        }
        self.lookup(location)
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| EXCLUDED.to_string())
    }
}
