// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Field number registry for all messages of one generation run.

use std::collections::{HashMap, HashSet};

use crate::ledger::{FieldNumber, NumberLedger};
use crate::snapshot::ProtoSnapshot;

/// Number ledgers keyed by message name.
///
/// Built once per run (empty, or seeded from the previous schema), mutated
/// by the resolver, then dropped. Ledgers are created on first use and never
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    ledgers: HashMap<String, NumberLedger>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded from a previous schema.
    pub fn from_snapshot(snapshot: &ProtoSnapshot) -> Self {
        let mut registry = Self::new();
        registry.seed(snapshot);
        registry
    }

    /// Record the numbers held in a previous schema.
    ///
    /// Only normal and map fields count. Each message gets a fresh ledger
    /// whose mark is the largest number seen and whose released queue is
    /// empty.
    pub fn seed(&mut self, snapshot: &ProtoSnapshot) {
        for message in &snapshot.messages {
            let ledger = NumberLedger::from_assigned(message.numbered_fields());
            tracing::debug!(
                "Seeded '{}' with {} fields (high-water mark {})",
                message.name,
                ledger.len(),
                ledger.high_water_mark()
            );
            if self.ledgers.insert(message.name.clone(), ledger).is_some() {
                tracing::warn!(
                    "Previous schema declares message '{}' more than once, using the last one",
                    message.name
                );
            }
        }
    }

    /// Number for `field` in `message`, creating the ledger if needed.
    pub fn assign_field_number(&mut self, message: &str, field: &str) -> FieldNumber {
        let ledger = self.ledgers.entry(message.to_string()).or_default();
        let number = ledger.assign(field);
        tracing::trace!("{}.{} = {}", message, field, number);
        number
    }

    /// Release the number held by `field` in `message`. Unknown messages and
    /// fields are ignored.
    pub fn release_field_number(&mut self, message: &str, field: &str) {
        if let Some(ledger) = self.ledgers.get_mut(message) {
            ledger.release(field);
        }
    }

    /// Release every field of `message` not in `keep`, lowest number first.
    pub fn release_fields_except(&mut self, message: &str, keep: &HashSet<String>) -> Vec<String> {
        match self.ledgers.get_mut(message) {
            Some(ledger) => ledger.release_except(keep),
            None => Vec::new(),
        }
    }

    /// Ledger for `message`, if one exists.
    pub fn ledger(&self, message: &str) -> Option<&NumberLedger> {
        self.ledgers.get(message)
    }

    /// Number of messages with a ledger.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// Whether no message has a ledger yet.
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}
