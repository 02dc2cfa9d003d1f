//! Deprivation enrichment.
//!
//! Patient rows are matched to the reference table on the normalized
//! postcode key. The reference index keeps the first row per key, so the
//! join is many-to-one and the row count never changes. Only the quintile
//! label survives; the postcode and all join scaffolding are dropped.

use polars::prelude::*;
use tracing::{debug, info, info_span};

use pqip_ingest::{ReferenceData, ReferenceLookup, add_join_key, has_column};
use pqip_model::columns::{IMD_DECILE, IMD_QUINTILE, JOIN_KEY, POSTCODE};
use pqip_model::{ImdQuintile, PipelineWarning};

use crate::error::Result;
use crate::stage::Staged;

/// Adds `IMD_Quintile` and removes `Postcode`.
///
/// Without reference data, or without a postcode column, every record is
/// `Unknown` and a warning is recorded.
pub fn enrich_with_deprivation(df: DataFrame, reference: &ReferenceLookup) -> Result<Staged> {
    let _span = info_span!("enrichment", rows = df.height()).entered();
    let mut warnings = Vec::new();

    if let ReferenceLookup::Unavailable { reason } = reference {
        warnings.push(PipelineWarning::ReferenceUnavailable {
            reason: reason.clone(),
        });
    }
    let has_postcode = has_column(&df, POSTCODE);
    if !has_postcode {
        warnings.push(PipelineWarning::MissingPostcode);
    }

    let mut df = match reference.data() {
        Some(data) if has_postcode => join_deciles(df, data)?,
        _ => {
            let mut df = df;
            let unknown = vec![ImdQuintile::Unknown.as_str(); df.height()];
            df.with_column(Column::new(IMD_QUINTILE.into(), unknown))?;
            df
        }
    };

    for scaffold in [POSTCODE, JOIN_KEY, IMD_DECILE] {
        if has_column(&df, scaffold) {
            df.drop_in_place(scaffold)?;
        }
    }
    debug!("postcode and join scaffolding dropped");
    Ok(Staged::with_warnings(df, warnings))
}

/// Looks up a decile per row and maps it to its quintile label.
fn join_deciles(df: DataFrame, reference: &ReferenceData) -> Result<DataFrame> {
    let mut df = add_join_key(df, POSTCODE)?;

    let deciles: Vec<Option<i64>> = df
        .column(JOIN_KEY)?
        .str()?
        .into_iter()
        .map(|key| key.and_then(|k| reference.decile_for(k)))
        .collect();
    let matched = df
        .column(JOIN_KEY)?
        .str()?
        .into_iter()
        .filter(|key| key.is_some_and(|k| reference.contains_key(k)))
        .count();

    let quintiles: Vec<&str> = deciles
        .iter()
        .map(|decile| ImdQuintile::from_decile(*decile).as_str())
        .collect();
    df.with_column(Column::new(IMD_DECILE.into(), deciles))?;
    df.with_column(Column::new(IMD_QUINTILE.into(), quintiles))?;

    info!(
        rows = df.height(),
        matched,
        unmatched = df.height() - matched,
        "deprivation reference joined"
    );
    Ok(df)
}
