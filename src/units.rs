//! Fixed three-category unit taxonomy for sales normalization.
//!
//! Free-text unit labels ("กล่อง", "Pack of 6", "ซอง") are classified by
//! case-insensitive substring containment against a keyword table. The
//! substring semantics are intentional and preserved as-is: "box" matches
//! "boxed". Labels matching no keyword are reported as unclassified and
//! the caller decides what to skip.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Box,
    Pack,
    Piece,
}

impl UnitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Pack => "pack",
            Self::Piece => "piece",
        }
    }
}

/// Keyword table backing unit classification. Hosts may extend it with
/// their own vocabulary; matching is first-category-wins in Box → Pack →
/// Piece order.
#[derive(Debug, Clone)]
pub struct UnitKeywords {
    pub box_terms: Vec<String>,
    pub pack_terms: Vec<String>,
    pub piece_terms: Vec<String>,
}

impl Default for UnitKeywords {
    fn default() -> Self {
        let terms = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            box_terms: terms(&["box", "carton", "crate", "กล่อง", "ลัง"]),
            pack_terms: terms(&["pack", "bundle", "dozen", "แพ็ค", "แพค", "โหล", "มัด"]),
            piece_terms: terms(&["piece", "sachet", "unit", "ชิ้น", "ซอง", "อัน", "ขวด", "ถุง"]),
        }
    }
}

impl UnitKeywords {
    /// Classify a free-text unit label, or `None` when no keyword matches.
    pub fn classify(&self, label: &str) -> Option<UnitCategory> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let matches = |terms: &[String]| terms.iter().any(|term| needle.contains(term.as_str()));
        if matches(&self.box_terms) {
            Some(UnitCategory::Box)
        } else if matches(&self.pack_terms) {
            Some(UnitCategory::Pack)
        } else if matches(&self.piece_terms) {
            Some(UnitCategory::Piece)
        } else {
            None
        }
    }
}
