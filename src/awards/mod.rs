//! Award catalog and evaluation.
//!
//! The catalog is a static, read-only resource embedded at build time and
//! parsed once per process. Evaluation recomputes aggregate counts on
//! every call so results always reflect the current store; nothing is
//! cached between calls.

use crate::error::Result;
use crate::model::EntityKind;
use crate::storage::TrackerStore;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const AWARDS_JSON: &str = include_str!("awards.json");

static CATALOG: Lazy<Vec<Award>> = Lazy::new(|| {
    serde_json::from_str(AWARDS_JSON).unwrap_or_else(|err| {
        // A broken catalog means no awards, not a crashed process
        tracing::warn!(error = %err, "award catalog failed to parse");
        vec![]
    })
});

/// The aggregate count an award threshold is evaluated against.
///
/// Closed enumeration with an explicit fallback: a criterion value the
/// catalog spells differently is a data anomaly, never a runtime fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Issues,
    Closed,
    Tags,
    #[serde(untagged)]
    Unknown(String),
}

/// A static catalog entry. Identity is the name; never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub name: String,
    pub description: String,
    pub color: String,
    pub criterion: Criterion,
    pub value: i64,
    pub image: String,
}

impl Award {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.name
    }
}

/// The full catalog, in file order.
#[must_use]
pub fn all_awards() -> &'static [Award] {
    &CATALOG
}

/// Whether the store's current aggregate counts meet the award threshold.
///
/// Never fails: count errors degrade to not-earned after a warning, and
/// unknown criteria are simply never earned.
#[must_use]
pub fn has_earned(store: &TrackerStore, award: &Award) -> bool {
    match &award.criterion {
        Criterion::Issues => meets(award, store.count(EntityKind::Issue)),
        Criterion::Closed => meets(award, store.count_completed_issues()),
        Criterion::Tags => meets(award, store.count(EntityKind::Tag)),
        Criterion::Unknown(value) => {
            tracing::debug!(award = %award.name, criterion = %value, "unknown award criterion");
            false
        }
    }
}

fn meets(award: &Award, count: Result<usize>) -> bool {
    match count {
        Ok(n) => i64::try_from(n).unwrap_or(i64::MAX) >= award.value,
        Err(err) => {
            tracing::warn!(award = %award.name, error = %err, "award count query failed");
            false
        }
    }
}
