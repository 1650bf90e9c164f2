//! Region identifiers.

use serde::{Deserialize, Serialize};

/// Identifier for one region of the partitioned world.
///
/// Codes are short uppercase tags (`"VH"`, `"DK"`). Construction
/// normalizes case and whitespace so that lookups coming from config
/// files or host commands compare reliably.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionCode(String);

impl RegionCode {
    /// Creates a normalized region code.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the conventional entry room for this region.
    ///
    /// Worlds that don't report an explicit start room fall back to the
    /// `<CODE>_A01` naming convention.
    pub fn default_start_room(&self) -> String {
        format!("{}_A01", self.0)
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_code_normalization() {
        assert_eq!(RegionCode::new("vh"), RegionCode::new("VH"));
        assert_eq!(RegionCode::new("  dk "), RegionCode::new("DK"));
        assert_eq!(RegionCode::new("vh").as_str(), "VH");
    }

    #[test]
    fn test_default_start_room() {
        assert_eq!(RegionCode::new("vh").default_start_room(), "VH_A01");
    }
}
