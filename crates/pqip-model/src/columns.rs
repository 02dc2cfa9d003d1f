//! Column names used across the pipeline.
//!
//! Source names match the ED export headers exactly (after whitespace
//! stripping). Derived names are the ones the report layer reads.

// === Export columns ===
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const ETHNICITY: &str = "Ethnicity";
pub const POSTCODE: &str = "Postcode";
pub const SURNAME: &str = "Surname";
pub const FORENAME: &str = "Forename";

pub const ARRIVAL_DTTM: &str = "Arrival DTTM";
pub const TRIAGE_DTTM: &str = "Triage DTTM";
pub const FIRST_PAIN_SCORE_DTTM: &str = "First Pain Score DTTM";
pub const FIRST_ANALGESIA_DTTM: &str = "First Analgesia DTTM";
pub const SECOND_PAIN_SCORE_DTTM: &str = "Second Pain Score DTTM";

pub const FIRST_PAIN_SCORE: &str = "First Pain Score";
pub const SECOND_PAIN_SCORE: &str = "Second Pain Score";

/// The five event timestamps, in event order.
pub const TIMESTAMP_COLUMNS: [&str; 5] = [
    ARRIVAL_DTTM,
    TRIAGE_DTTM,
    FIRST_PAIN_SCORE_DTTM,
    FIRST_ANALGESIA_DTTM,
    SECOND_PAIN_SCORE_DTTM,
];

// === Scaffolding (never survives the enrichment stage) ===
pub const JOIN_KEY: &str = "Join_Key";
pub const IMD_DECILE: &str = "IMD_Decile";

// === Derived columns ===
pub const IMD_QUINTILE: &str = "IMD_Quintile";
pub const REPORT_MONTH: &str = "Report_Month";

pub const TIME_TO_TRIAGE_MINS: &str = "Time_to_Triage_Mins";
pub const TIME_TO_PS1_MINS: &str = "Time_to_PS1_Mins";
pub const TIME_TO_A1_MINS: &str = "Time_to_A1_Mins";
pub const TIME_TO_PS2_MINS: &str = "Time_to_PS2_Mins";
pub const A1_TO_PS2_MINS: &str = "A1_to_PS2_Mins";
pub const PS2_TO_A1_MINS: &str = "PS2_to_A1_Mins";

/// Every interval column, in derivation order.
pub const INTERVAL_COLUMNS: [&str; 6] = [
    TIME_TO_TRIAGE_MINS,
    TIME_TO_PS1_MINS,
    TIME_TO_A1_MINS,
    TIME_TO_PS2_MINS,
    A1_TO_PS2_MINS,
    PS2_TO_A1_MINS,
];

pub const FIRST_SCORE_NUM: &str = "First_Score_Num";
pub const SECOND_SCORE_NUM: &str = "Second_Score_Num";
pub const PAIN_SCORE_IMPROVEMENT: &str = "Pain_Score_Improvement";
pub const AGE_GROUP: &str = "Age_Group";
pub const BEST_PRACTICE: &str = "Best_Practice";
