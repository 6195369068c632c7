use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

// User-supplied irrigation application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationEvent {
    pub date: String,   // Calendar day, matched exactly against weather dates
    pub amount_mm: f64, // Applied depth [mm], expected > 0
}

impl IrrigationEvent {
    pub fn new(date: impl Into<String>, amount_mm: f64) -> Self {
        IrrigationEvent {
            date: date.into(),
            amount_mm,
        }
    }
}

/// Date-keyed total of irrigation applied per day.
///
/// Built once per run, read-only afterwards. Events on the same date are
/// summed. Amounts are taken as supplied, so a negative entry reduces the
/// day's total.
#[derive(Debug, Clone, Default)]
pub struct IrrigationLedger {
    by_date: FxHashMap<String, f64>,
}

impl IrrigationLedger {
    pub fn from_events(events: &[IrrigationEvent]) -> Self {
        let mut by_date: FxHashMap<String, f64> = FxHashMap::default();
        for event in events {
            *by_date.entry(event.date.clone()).or_insert(0.0) += event.amount_mm;
        }

        for (date, total) in &by_date {
            if *total <= 0.0 {
                warn!(%date, total, "non-positive irrigation total");
            }
        }

        IrrigationLedger { by_date }
    }

    // Amount applied on `date` [mm], 0 when nothing was recorded
    pub fn applied_on(&self, date: &str) -> f64 {
        self.by_date.get(date).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.by_date.values().sum()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
