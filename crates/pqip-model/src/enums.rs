//! Type-safe enumerations for the categorical audit fields.
//!
//! The export and the report both carry these values as strings; the enums
//! keep the label spelling in one place and give the ordinal fields their
//! natural sort order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pain score label as recorded at triage and on reassessment.
///
/// Labels are ordinal and map to 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PainScore {
    /// "No Pain" (0).
    NoPain,
    /// "Mild Pain" (1).
    Mild,
    /// "Mod Pain" (2).
    Moderate,
    /// "Sev Pain" (3).
    Severe,
}

impl PainScore {
    /// Parse an export label. Unknown labels yield `None`, never an error.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "No Pain" => Some(PainScore::NoPain),
            "Mild Pain" => Some(PainScore::Mild),
            "Mod Pain" => Some(PainScore::Moderate),
            "Sev Pain" => Some(PainScore::Severe),
            _ => None,
        }
    }

    /// Returns the label exactly as the export spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            PainScore::NoPain => "No Pain",
            PainScore::Mild => "Mild Pain",
            PainScore::Moderate => "Mod Pain",
            PainScore::Severe => "Sev Pain",
        }
    }

    /// Numeric score on the 0-3 scale.
    pub fn score(&self) -> i64 {
        match self {
            PainScore::NoPain => 0,
            PainScore::Mild => 1,
            PainScore::Moderate => 2,
            PainScore::Severe => 3,
        }
    }
}

impl fmt::Display for PainScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Age band used for demographic breakdowns.
///
/// Bands are right-open with an inclusive lower bound over
/// `[0, 15, 25, 35, 45, 55, 65, 75, 85, 95, 150]`. The top band also takes
/// the upper edge itself, so an age of exactly 150 is `95+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Under15,
    From15To25,
    From25To35,
    From35To45,
    From45To55,
    From55To65,
    From65To75,
    From75To85,
    From85To95,
    From95,
}

impl AgeGroup {
    /// Bin edges; band `i` covers `EDGES[i] <= age < EDGES[i + 1]`.
    /// The last band is closed at 150.
    pub const EDGES: [f64; 11] = [
        0.0, 15.0, 25.0, 35.0, 45.0, 55.0, 65.0, 75.0, 85.0, 95.0, 150.0,
    ];

    /// All bands in ascending order.
    pub const ALL: [AgeGroup; 10] = [
        AgeGroup::Under15,
        AgeGroup::From15To25,
        AgeGroup::From25To35,
        AgeGroup::From35To45,
        AgeGroup::From45To55,
        AgeGroup::From55To65,
        AgeGroup::From65To75,
        AgeGroup::From75To85,
        AgeGroup::From85To95,
        AgeGroup::From95,
    ];

    /// Bucket an age. Values outside `[0, 150]` and NaN stay unbucketed.
    pub fn from_age(age: f64) -> Option<Self> {
        if !(Self::EDGES[0]..=Self::EDGES[10]).contains(&age) {
            return None;
        }
        if age == Self::EDGES[10] {
            return Some(AgeGroup::From95);
        }
        Self::EDGES
            .windows(2)
            .position(|edge| age >= edge[0] && age < edge[1])
            .map(|idx| Self::ALL[idx])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Under15 => "0-15",
            AgeGroup::From15To25 => "15-25",
            AgeGroup::From25To35 => "25-35",
            AgeGroup::From35To45 => "35-45",
            AgeGroup::From45To55 => "45-55",
            AgeGroup::From55To65 => "55-65",
            AgeGroup::From65To75 => "65-75",
            AgeGroup::From75To85 => "75-85",
            AgeGroup::From85To95 => "85-95",
            AgeGroup::From95 => "95+",
        }
    }

    /// Parse a band label back into its band.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|group| group.as_str() == label)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deprivation quintile derived from the 1-10 IMD decile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImdQuintile {
    MostDeprived,
    Second,
    Third,
    Fourth,
    LeastDeprived,
    /// No reference match, or reference data unavailable.
    Unknown,
}

impl ImdQuintile {
    /// All labels in ordinal order, `Unknown` last.
    pub const ALL: [ImdQuintile; 6] = [
        ImdQuintile::MostDeprived,
        ImdQuintile::Second,
        ImdQuintile::Third,
        ImdQuintile::Fourth,
        ImdQuintile::LeastDeprived,
        ImdQuintile::Unknown,
    ];

    /// Map a decile to its quintile; a missing decile is `Unknown`.
    pub fn from_decile(decile: Option<i64>) -> Self {
        match decile {
            None => ImdQuintile::Unknown,
            Some(d) if d <= 2 => ImdQuintile::MostDeprived,
            Some(d) if d <= 4 => ImdQuintile::Second,
            Some(d) if d <= 6 => ImdQuintile::Third,
            Some(d) if d <= 8 => ImdQuintile::Fourth,
            Some(_) => ImdQuintile::LeastDeprived,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImdQuintile::MostDeprived => "1 - Most Deprived",
            ImdQuintile::Second => "2",
            ImdQuintile::Third => "3",
            ImdQuintile::Fourth => "4",
            ImdQuintile::LeastDeprived => "5 - Least Deprived",
            ImdQuintile::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|q| q.as_str() == label)
    }
}

impl fmt::Display for ImdQuintile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compliance outcome against the pain management standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BestPractice {
    Yes,
    No,
}

impl BestPractice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BestPractice::Yes => "Yes",
            BestPractice::No => "No",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Yes" => Some(BestPractice::Yes),
            "No" => Some(BestPractice::No),
            _ => None,
        }
    }
}

impl From<bool> for BestPractice {
    fn from(value: bool) -> Self {
        if value {
            BestPractice::Yes
        } else {
            BestPractice::No
        }
    }
}

impl fmt::Display for BestPractice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
