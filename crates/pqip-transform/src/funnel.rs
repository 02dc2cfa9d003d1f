//! Compliance funnel.
//!
//! Every node count is an independent mask over the full record set. The
//! masks are conjunctions of the named predicates on
//! [`ComplianceRecord`], chosen so that siblings partition their parent;
//! [`FunnelData::verify`] then checks additivity and monotonicity on the
//! numbers themselves.

use tracing::debug;

use pqip_model::{FunnelData, FunnelNode};

use crate::compliance::ComplianceRecord;
use crate::error::Result;

type Predicate = fn(&ComplianceRecord) -> bool;

fn everyone(_: &ComplianceRecord) -> bool {
    true
}

fn ps1_late(r: &ComplianceRecord) -> bool {
    !r.ps1_within_target()
}

fn ps1_severe(r: &ComplianceRecord) -> bool {
    r.ps1_within_target() && r.is_severe()
}

fn ps1_moderate(r: &ComplianceRecord) -> bool {
    r.ps1_within_target() && r.is_moderate()
}

fn ps1_other(r: &ComplianceRecord) -> bool {
    r.ps1_within_target() && r.is_other_pain()
}

fn severe_a1_on_time(r: &ComplianceRecord) -> bool {
    ps1_severe(r) && r.a1_within_target()
}

fn moderate_a1_on_time(r: &ComplianceRecord) -> bool {
    ps1_moderate(r) && r.a1_within_target()
}

fn severe_a1_late(r: &ComplianceRecord) -> bool {
    ps1_severe(r) && !r.a1_within_target()
}

fn moderate_a1_late(r: &ComplianceRecord) -> bool {
    ps1_moderate(r) && !r.a1_within_target()
}

fn severe_compliant(r: &ComplianceRecord) -> bool {
    severe_a1_on_time(r) && r.is_compliant()
}

fn moderate_compliant(r: &ComplianceRecord) -> bool {
    moderate_a1_on_time(r) && r.is_compliant()
}

fn severe_not_compliant(r: &ComplianceRecord) -> bool {
    severe_a1_on_time(r) && !r.is_compliant()
}

fn moderate_not_compliant(r: &ComplianceRecord) -> bool {
    moderate_a1_on_time(r) && !r.is_compliant()
}

/// Node names and masks, in label order.
pub const NODES: [(&str, Predicate); 14] = [
    ("Total Patients", everyone),
    ("PS1 <= 15 Mins", ComplianceRecord::ps1_within_target),
    ("PS1 > 15 Mins", ps1_late),
    ("Severe Pain (PS1 <= 15 Mins)", ps1_severe),
    ("Moderate Pain (PS1 <= 15 Mins)", ps1_moderate),
    ("Sev Pain (PS1 & A1 <= 15 Mins)", severe_a1_on_time),
    ("Mod Pain (PS1 & A1 <= 15 Mins)", moderate_a1_on_time),
    ("Sev Pain (PS1&A1>15Mins)", severe_a1_late),
    ("Mod Pain (PS1&A1>15Mins)", moderate_a1_late),
    ("Severe Pain Best Practice", severe_compliant),
    ("Moderate Pain Best Practice", moderate_compliant),
    ("Sev Pain (No Best Practice)", severe_not_compliant),
    ("Mod Pain (No Best Practice)", moderate_not_compliant),
    ("Other Pain Levels (PS1 <= 15 Mins)", ps1_other),
];

/// Edges as `(source, target)` node indices.
pub const LINKS: [(usize, usize); 13] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (1, 4),
    (3, 5),
    (3, 7),
    (4, 6),
    (4, 8),
    (5, 9),
    (5, 11),
    (6, 10),
    (6, 12),
    (1, 13),
];

/// Counts every funnel node and checks the result.
pub fn build_funnel(records: &[ComplianceRecord]) -> Result<FunnelData> {
    let nodes: Vec<FunnelNode> = NODES
        .iter()
        .map(|&(name, predicate)| {
            FunnelNode::new(name, records.iter().filter(|&r| predicate(r)).count())
        })
        .collect();
    let yes = records.iter().filter(|r| r.is_compliant()).count();
    let funnel = FunnelData::from_tree(&nodes, &LINKS, yes, records.len() - yes);
    funnel.verify()?;
    debug!(
        nodes = funnel.node_count(),
        edges = funnel.edge_count(),
        "funnel built"
    );
    Ok(funnel)
}
