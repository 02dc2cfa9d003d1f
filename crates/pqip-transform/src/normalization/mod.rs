//! Cell-level parsing used by the derivation stages.

pub mod datetime;
