use serde::{Deserialize, Serialize};

/// Lowest normalized score classified as [`HarmonyLabel::High`].
pub const HIGH_HARMONY_THRESHOLD: f64 = 75.0;
/// Lowest normalized score classified as [`HarmonyLabel::Moderate`].
pub const MODERATE_HARMONY_THRESHOLD: f64 = 45.0;

/// Qualitative band attached to a normalized harmony score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HarmonyLabel {
    #[serde(rename = "Growth Opportunity")]
    GrowthOpportunity,
    #[serde(rename = "Moderate Harmony")]
    Moderate,
    #[serde(rename = "High Harmony")]
    High,
}

impl HarmonyLabel {
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Moderate, Self::GrowthOpportunity]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High Harmony",
            Self::Moderate => "Moderate Harmony",
            Self::GrowthOpportunity => "Growth Opportunity",
        }
    }

    /// Classifies an already rounded normalized score, checking thresholds high to low.
    pub fn from_normalized(score: f64) -> Self {
        if score >= HIGH_HARMONY_THRESHOLD {
            Self::High
        } else if score >= MODERATE_HARMONY_THRESHOLD {
            Self::Moderate
        } else {
            Self::GrowthOpportunity
        }
    }
}

impl std::fmt::Display for HarmonyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
