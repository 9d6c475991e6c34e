//! Record store - cell listings and record relation values
//!
//! The store is the single owner of cell sequences. Other layers only go
//! through its mutation methods; every mutation is broadcast to subscribers
//! so views can re-render, and is visible to reads in the same tick.

use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use super::board::{CellKey, RecordId, RelationDetail, RelationValue};

/// Relation values a record held before a write, per key; `None` when absent
pub type PriorValues = Vec<(String, Option<RelationValue>)>;

/// A record (card) with its relation values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    /// Relation key → value
    #[serde(default)]
    pub values: BTreeMap<String, RelationValue>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<RelationValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> &RelationValue {
        static NONE: RelationValue = RelationValue::None;
        self.values.get(key).unwrap_or(&NONE)
    }
}

/// Listing of one cell: the loaded ids in order plus the server-side total
#[derive(Debug, Clone, Default, PartialEq)]
struct CellListing {
    ids: Vec<RecordId>,
    total: usize,
}

/// Notification sent to store subscribers after every mutation
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    SequenceSet { cell: CellKey },
    Removed { cell: CellKey, record: RecordId, index: usize },
    Inserted { cell: CellKey, record: RecordId, index: usize },
    ValuesChanged { record: RecordId },
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<RecordId, Record>,
    cells: HashMap<CellKey, CellListing>,
    subscribers: Vec<Sender<StoreChange>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; dropped receivers are pruned on the next change
    pub fn subscribe(&mut self) -> Receiver<StoreChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, change: StoreChange) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    // ------------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------------

    pub fn upsert_record(&mut self, record: Record) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Write relation values onto a record. Returns what each written key
    /// held before (`None` for keys the record did not have), or `None` if
    /// the record is unknown.
    pub fn set_relation_values(
        &mut self,
        id: &RecordId,
        details: &[RelationDetail],
    ) -> Option<PriorValues> {
        let record = self.records.get_mut(id)?;
        let previous = details
            .iter()
            .map(|d| (d.key.clone(), record.values.get(&d.key).cloned()))
            .collect();
        for detail in details {
            record.values.insert(detail.key.clone(), detail.value.clone());
        }
        self.notify(StoreChange::ValuesChanged { record: id.clone() });
        Some(previous)
    }

    /// Put back values returned by [`Self::set_relation_values`]. Keys that
    /// were absent are removed again.
    pub fn restore_relation_values(
        &mut self,
        id: &RecordId,
        previous: &[(String, Option<RelationValue>)],
    ) {
        let Some(record) = self.records.get_mut(id) else {
            return;
        };
        for (key, value) in previous {
            match value {
                Some(value) => {
                    record.values.insert(key.clone(), value.clone());
                }
                None => {
                    record.values.remove(key);
                }
            }
        }
        self.notify(StoreChange::ValuesChanged { record: id.clone() });
    }

    // ------------------------------------------------------------------------
    // Cell sequences
    // ------------------------------------------------------------------------

    /// Ordered record ids of a cell (empty for unknown cells)
    pub fn sequence(&self, cell: &CellKey) -> &[RecordId] {
        self.cells.get(cell).map(|c| c.ids.as_slice()).unwrap_or(&[])
    }

    /// Replace a cell's sequence. The total tracks the sequence when the
    /// listing was fully loaded, otherwise it is kept.
    pub fn set_sequence(&mut self, cell: &CellKey, ids: Vec<RecordId>) {
        let listing = self.cells.entry(cell.clone()).or_default();
        listing.total = listing.total.max(ids.len());
        listing.ids = ids;
        self.notify(StoreChange::SequenceSet { cell: cell.clone() });
    }

    /// Set the server-side total of a cell (may exceed the loaded ids)
    pub fn set_total(&mut self, cell: &CellKey, total: usize) {
        let listing = self.cells.entry(cell.clone()).or_default();
        listing.total = total.max(listing.ids.len());
    }

    pub fn position(&self, cell: &CellKey, id: &RecordId) -> Option<usize> {
        self.sequence(cell).iter().position(|r| r == id)
    }

    /// Cell currently listing `id`, if any
    pub fn cell_of(&self, id: &RecordId) -> Option<&CellKey> {
        self.cells
            .iter()
            .find(|(_, listing)| listing.ids.contains(id))
            .map(|(key, _)| key)
    }

    /// Remove a record from a cell, returning its former index
    pub fn remove_from_cell(&mut self, cell: &CellKey, id: &RecordId) -> Option<usize> {
        let listing = self.cells.get_mut(cell)?;
        let index = listing.ids.iter().position(|r| r == id)?;
        listing.ids.remove(index);
        listing.total = listing.total.saturating_sub(1);
        self.notify(StoreChange::Removed {
            cell: cell.clone(),
            record: id.clone(),
            index,
        });
        Some(index)
    }

    /// Insert a record into a cell; the index clamps to the sequence length.
    /// Returns the index actually used.
    pub fn insert_into_cell(&mut self, cell: &CellKey, id: RecordId, index: usize) -> usize {
        let listing = self.cells.entry(cell.clone()).or_default();
        let index = index.min(listing.ids.len());
        listing.ids.insert(index, id.clone());
        listing.total += 1;
        self.notify(StoreChange::Inserted {
            cell: cell.clone(),
            record: id,
            index,
        });
        index
    }

    /// Total number of records in a cell
    pub fn count(&self, cell: &CellKey) -> usize {
        self.cells.get(cell).map(|c| c.total).unwrap_or(0)
    }

    pub fn cell_keys(&self) -> impl Iterator<Item = &CellKey> {
        self.cells.keys()
    }
}
