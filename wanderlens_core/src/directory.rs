//! Region directory - the two compiled-in content sets.
//!
//! The base game ships twelve regions; the expansion adds eight more.
//! Codes are stable save-file tags, display names are what the HUD shows.

use serde::{Deserialize, Serialize};
use wanderlens_world::RegionCode;

/// Base content set: (code, display name).
pub const BASE_REGIONS: [(&str, &str); 12] = [
    ("VH", "Verdant Hollows"),
    ("DK", "The Dockyards"),
    ("CS", "Cinder Steppe"),
    ("TW", "Tideworks"),
    ("MB", "Mirror Basin"),
    ("FG", "Fog Gantries"),
    ("HV", "The Hive"),
    ("RS", "Rust Spires"),
    ("LW", "Lantern Ways"),
    ("PM", "Pale Meadow"),
    ("OB", "The Observatory"),
    ("UC", "Undercroft"),
];

/// Expansion content set: (code, display name).
pub const EXPANSION_REGIONS: [(&str, &str); 8] = [
    ("GL", "Glasslands"),
    ("EM", "Ember Mills"),
    ("SN", "Sunken Nave"),
    ("BW", "Breakwater"),
    ("AW", "Aviary Walks"),
    ("CV", "Cold Vaults"),
    ("TH", "Thornholt"),
    ("SP", "Signal Peak"),
];

/// Which content set a region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSet {
    Base,
    Expansion,
}

/// All region codes, base first, in table order.
pub fn all_regions(include_expansion: bool) -> Vec<RegionCode> {
    let mut regions: Vec<RegionCode> = BASE_REGIONS
        .iter()
        .map(|(code, _)| RegionCode::new(code))
        .collect();
    if include_expansion {
        regions.extend(EXPANSION_REGIONS.iter().map(|(code, _)| RegionCode::new(code)));
    }
    regions
}

/// Display name for a known region code.
pub fn display_name(code: &RegionCode) -> Option<&'static str> {
    BASE_REGIONS
        .iter()
        .chain(EXPANSION_REGIONS.iter())
        .find(|(c, _)| *c == code.as_str())
        .map(|(_, name)| *name)
}

/// Content set for a known region code.
pub fn content_set(code: &RegionCode) -> Option<ContentSet> {
    if BASE_REGIONS.iter().any(|(c, _)| *c == code.as_str()) {
        Some(ContentSet::Base)
    } else if EXPANSION_REGIONS.iter().any(|(c, _)| *c == code.as_str()) {
        Some(ContentSet::Expansion)
    } else {
        None
    }
}
