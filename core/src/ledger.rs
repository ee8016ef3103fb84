use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{DayRecord, FoodItem};

/// Date-keyed map of day records. Serializes transparently as a plain JSON
/// object: `{"2026-08-06": {...}, ...}`.
///
/// Invariant: every record's four running sums equal the sums over its
/// items, after every call — including a failed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    days: BTreeMap<String, DayRecord>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.days.values().map(|d| d.items.len()).sum()
    }

    /// The record for `date`, or a zero-valued record if the date has never
    /// been written. Never fails.
    #[must_use]
    pub fn day(&self, date: &str) -> DayRecord {
        self.days
            .get(date)
            .cloned()
            .unwrap_or_else(|| DayRecord::zero(date))
    }

    /// Append `item` to `date` and bump all four running sums.
    pub fn add_item(&mut self, date: &str, item: FoodItem) -> &DayRecord {
        let record = self
            .days
            .entry(date.to_string())
            .or_insert_with(|| DayRecord::zero(date));
        record.calories += item.calories;
        record.protein += item.protein;
        record.carbs += item.carbs;
        record.fat += item.fat;
        record.items.push(item);
        &*record
    }

    /// Remove the item at `index` on `date` and decrement the sums by its
    /// fields. Sums may go negative through this path and are never clamped.
    /// An invalid index fails without touching the record.
    pub fn remove_item(&mut self, date: &str, index: usize) -> Result<&DayRecord, CoreError> {
        let record = self
            .days
            .get_mut(date)
            .ok_or_else(|| CoreError::IndexOutOfRange {
                date: date.to_string(),
                index,
            })?;
        if index >= record.items.len() {
            return Err(CoreError::IndexOutOfRange {
                date: date.to_string(),
                index,
            });
        }
        let item = record.items.remove(index);
        record.calories -= item.calories;
        record.protein -= item.protein;
        record.carbs -= item.carbs;
        record.fat -= item.fat;
        Ok(&*record)
    }

    /// Fill each record's `date` field from its map key. Legacy payloads
    /// store the date only as the key.
    pub fn normalize(&mut self) {
        for (date, record) in &mut self.days {
            if record.date.is_empty() {
                record.date.clone_from(date);
            }
        }
    }
}
