// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Per-message field number bookkeeping.

use std::collections::{HashMap, HashSet, VecDeque};

/// A proto field number. Always positive once handed out.
pub type FieldNumber = u32;

/// Field numbers held by a single message.
///
/// New numbers come from the front of the released queue first (oldest
/// release first), then from one past the highest number ever seen for the
/// message. The mark only grows, so a snapshot with gaps (`1`, `3`) mints `4`
/// next, never `2` or `3`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberLedger {
    high_water_mark: FieldNumber,
    dropped: VecDeque<FieldNumber>,
    assigned: HashMap<String, FieldNumber>,
}

impl NumberLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger holding the given numbers, with the mark set to their
    /// maximum and nothing released.
    pub fn from_assigned<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldNumber)>,
        S: Into<String>,
    {
        let mut ledger = Self::new();
        for (name, number) in fields {
            ledger.high_water_mark = ledger.high_water_mark.max(number);
            ledger.assigned.insert(name.into(), number);
        }
        ledger
    }

    /// Return the number held by `field`, handing one out if it has none.
    pub fn assign(&mut self, field: &str) -> FieldNumber {
        if let Some(&number) = self.assigned.get(field) {
            return number;
        }

        let number = match self.dropped.pop_front() {
            Some(reused) => reused,
            None => {
                self.high_water_mark += 1;
                self.high_water_mark
            }
        };
        self.assigned.insert(field.to_string(), number);
        number
    }

    /// Give up the number held by `field` so a later `assign` can reuse it.
    ///
    /// Does nothing if the field holds no number.
    pub fn release(&mut self, field: &str) {
        if let Some(number) = self.assigned.remove(field) {
            self.dropped.push_back(number);
        }
    }

    /// Release every field not in `keep`, lowest number first.
    ///
    /// Returns the released field names in release order.
    pub fn release_except(&mut self, keep: &HashSet<String>) -> Vec<String> {
        let mut stale: Vec<(FieldNumber, String)> = self
            .assigned
            .iter()
            .filter(|(name, _)| !keep.contains(name.as_str()))
            .map(|(name, &number)| (number, name.clone()))
            .collect();
        stale.sort();

        stale
            .into_iter()
            .map(|(_, name)| {
                self.release(&name);
                name
            })
            .collect()
    }

    /// Highest number ever handed out or seeded.
    pub fn high_water_mark(&self) -> FieldNumber {
        self.high_water_mark
    }

    /// Number currently held by `field`.
    pub fn number_of(&self, field: &str) -> Option<FieldNumber> {
        self.assigned.get(field).copied()
    }

    /// Released numbers awaiting reuse, oldest first.
    pub fn dropped(&self) -> impl Iterator<Item = FieldNumber> + '_ {
        self.dropped.iter().copied()
    }

    /// Number of fields currently holding a number.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Whether no field currently holds a number.
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
