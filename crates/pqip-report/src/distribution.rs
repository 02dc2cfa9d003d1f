//! Demographic distributions.

use std::collections::HashMap;
use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use pqip_ingest::column_strings;
use pqip_model::columns::{AGE_GROUP, ETHNICITY, GENDER, IMD_QUINTILE};
use pqip_model::{AgeGroup, ImdQuintile};

/// Demographic column a distribution or equity view is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    AgeGroup,
    Gender,
    Ethnicity,
    Deprivation,
}

impl GroupDimension {
    pub fn column(&self) -> &'static str {
        match self {
            GroupDimension::AgeGroup => AGE_GROUP,
            GroupDimension::Gender => GENDER,
            GroupDimension::Ethnicity => ETHNICITY,
            GroupDimension::Deprivation => IMD_QUINTILE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupDimension::AgeGroup => "Age Group",
            GroupDimension::Gender => "Gender",
            GroupDimension::Ethnicity => "Ethnicity",
            GroupDimension::Deprivation => "Deprivation (IMD)",
        }
    }

    /// Ordinal dimensions sort by their natural order rather than by count.
    pub fn is_ordinal(&self) -> bool {
        matches!(self, GroupDimension::AgeGroup | GroupDimension::Deprivation)
    }

    /// Natural position of a label; unrecognised labels sort last.
    pub(crate) fn rank(&self, label: &str) -> usize {
        let position = match self {
            GroupDimension::AgeGroup => {
                AgeGroup::from_label(label).and_then(|g| AgeGroup::ALL.iter().position(|a| *a == g))
            }
            GroupDimension::Deprivation => ImdQuintile::from_label(label)
                .and_then(|q| ImdQuintile::ALL.iter().position(|a| *a == q)),
            GroupDimension::Gender | GroupDimension::Ethnicity => None,
        };
        position.unwrap_or(usize::MAX)
    }
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
}

/// Orders groups: ordinal dimensions by natural order then label, nominal
/// dimensions by count descending then label.
fn sort_counts(dimension: GroupDimension, counts: &mut [GroupCount]) {
    if dimension.is_ordinal() {
        counts.sort_by(|a, b| {
            dimension
                .rank(&a.label)
                .cmp(&dimension.rank(&b.label))
                .then_with(|| a.label.cmp(&b.label))
        });
    } else {
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    }
}

/// Value counts of a demographic column. Null values are not counted.
pub fn group_distribution(
    df: &DataFrame,
    dimension: GroupDimension,
) -> PolarsResult<Vec<GroupCount>> {
    let mut tally: HashMap<String, usize> = HashMap::new();
    for label in column_strings(df, dimension.column())?.into_iter().flatten() {
        *tally.entry(label).or_default() += 1;
    }
    let mut counts: Vec<GroupCount> = tally
        .into_iter()
        .map(|(label, count)| GroupCount { label, count })
        .collect();
    sort_counts(dimension, &mut counts);
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(counts: &[GroupCount]) -> Vec<&str> {
        counts.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_age_groups_sort_naturally() {
        let df = DataFrame::new(vec![Column::new(
            AGE_GROUP.into(),
            vec![Some("95+"), Some("15-25"), Some("0-15"), Some("15-25"), None],
        )])
        .unwrap();
        let counts = group_distribution(&df, GroupDimension::AgeGroup).unwrap();
        assert_eq!(labels(&counts), vec!["0-15", "15-25", "95+"]);
        assert_eq!(counts[1].count, 2);
    }

    #[test]
    fn test_deprivation_puts_unknown_last() {
        let df = DataFrame::new(vec![Column::new(
            IMD_QUINTILE.into(),
            vec!["Unknown", "5 - Least Deprived", "1 - Most Deprived", "Unknown"],
        )])
        .unwrap();
        let counts = group_distribution(&df, GroupDimension::Deprivation).unwrap();
        assert_eq!(
            labels(&counts),
            vec!["1 - Most Deprived", "5 - Least Deprived", "Unknown"]
        );
    }

    #[test]
    fn test_nominal_groups_sort_by_count() {
        let df = DataFrame::new(vec![Column::new(
            GENDER.into(),
            vec!["Male", "Female", "Female", "Other", "Male", "Female"],
        )])
        .unwrap();
        let counts = group_distribution(&df, GroupDimension::Gender).unwrap();
        assert_eq!(labels(&counts), vec!["Female", "Male", "Other"]);
    }
}
