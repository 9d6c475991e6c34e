//! Custom swimlane order and hidden set, persisted per view
//!
//! Order and hidden set are two independent entries per view. A hidden id
//! keeps its slot in the stored order, so showing it again puts it back
//! where it was.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DragError;
use crate::model::{array_move, SubGroup, SubGroupId, ViewId};

/// Key-value backend holding id lists
pub trait SettingsStorage: fmt::Debug {
    fn get(&self, key: &str) -> Option<Vec<String>>;
    fn set(&mut self, key: &str, ids: Vec<String>) -> Result<(), DragError>;
}

/// Storage keys used by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsKey<'a> {
    SubGroupOrder(&'a ViewId),
    SubGroupHidden(&'a ViewId),
}

impl fmt::Display for SettingsKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsKey::SubGroupOrder(view) => write!(f, "{}:sub_group_order", view),
            SettingsKey::SubGroupHidden(view) => write!(f, "{}:sub_group_hidden", view),
        }
    }
}

/// In-process storage, lost on exit
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    entries: BTreeMap<String, Vec<String>>,
    /// Number of successful writes, for tests
    pub writes: usize,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStorage for MemorySettings {
    fn get(&self, key: &str) -> Option<Vec<String>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, ids: Vec<String>) -> Result<(), DragError> {
        self.entries.insert(key.to_string(), ids);
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, Vec<String>>,
}

/// JSON file storage; every write rewrites the whole file
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
    file: SettingsFile,
}

impl JsonFileSettings {
    const CURRENT_VERSION: u32 = 1;

    /// Open `path`, starting empty when it is missing or malformed
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "malformed view settings, starting empty");
                SettingsFile::default()
            }),
            Err(_) => SettingsFile::default(),
        };
        Self { path, file }
    }

    /// Open `view-settings.json` in the config directory, creating the
    /// directory if needed
    pub fn open_default() -> Result<Self, String> {
        let path = crate::config_paths::view_settings_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
        Ok(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), DragError> {
        let contents = serde_json::to_string_pretty(&self.file)
            .map_err(|e| DragError::PersistenceFailure(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| {
            DragError::PersistenceFailure(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl SettingsStorage for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Vec<String>> {
        self.file.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, ids: Vec<String>) -> Result<(), DragError> {
        let previous = self.file.entries.insert(key.to_string(), ids);
        self.file.version = Self::CURRENT_VERSION;
        if let Err(e) = self.save() {
            match previous {
                Some(ids) => self.file.entries.insert(key.to_string(), ids),
                None => self.file.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct SubGroupOrderStore {
    storage: Box<dyn SettingsStorage>,
}

impl Default for SubGroupOrderStore {
    fn default() -> Self {
        Self::new(MemorySettings::new())
    }
}

impl SubGroupOrderStore {
    pub fn new(storage: impl SettingsStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    pub fn get_order(&self, view: &ViewId) -> Vec<SubGroupId> {
        self.storage
            .get(&SettingsKey::SubGroupOrder(view).to_string())
            .unwrap_or_default()
            .into_iter()
            .map(SubGroupId)
            .collect()
    }

    pub fn set_order(&mut self, view: &ViewId, ids: &[SubGroupId]) -> Result<(), DragError> {
        self.storage.set(
            &SettingsKey::SubGroupOrder(view).to_string(),
            ids.iter().map(|id| id.0.clone()).collect(),
        )
    }

    pub fn get_hidden(&self, view: &ViewId) -> BTreeSet<SubGroupId> {
        self.storage
            .get(&SettingsKey::SubGroupHidden(view).to_string())
            .unwrap_or_default()
            .into_iter()
            .map(SubGroupId)
            .collect()
    }

    pub fn set_hidden(
        &mut self,
        view: &ViewId,
        ids: &BTreeSet<SubGroupId>,
    ) -> Result<(), DragError> {
        self.storage.set(
            &SettingsKey::SubGroupHidden(view).to_string(),
            ids.iter().map(|id| id.0.clone()).collect(),
        )
    }

    /// Stored order merged with the live set, hidden ids included
    ///
    /// Stored ids keep their relative order, live ids missing from storage
    /// follow in load order, ids that are no longer live are dropped.
    pub fn full_order(&self, view: &ViewId, live: &[SubGroup]) -> Vec<SubGroupId> {
        let live_ids: HashSet<&SubGroupId> = live.iter().map(|s| &s.id).collect();
        let mut seen = HashSet::new();

        let mut order: Vec<SubGroupId> = self
            .get_order(view)
            .into_iter()
            .filter(|id| live_ids.contains(id) && seen.insert(id.clone()))
            .collect();
        order.extend(
            live.iter()
                .filter(|s| seen.insert(s.id.clone()))
                .map(|s| s.id.clone()),
        );
        order
    }

    /// Visible swimlanes in display order
    pub fn effective_order(&self, view: &ViewId, live: &[SubGroup]) -> Vec<SubGroupId> {
        let hidden = self.get_hidden(view);
        self.full_order(view, live)
            .into_iter()
            .filter(|id| !hidden.contains(id))
            .collect()
    }

    /// Swap with the previous visible swimlane. Returns `false` at the top.
    pub fn move_up(
        &mut self,
        view: &ViewId,
        id: &SubGroupId,
        live: &[SubGroup],
    ) -> Result<bool, DragError> {
        let mut visible = self.effective_order(view, live);
        match visible.iter().position(|s| s == id) {
            Some(pos) if pos > 0 => {
                visible.swap(pos - 1, pos);
                self.persist_visible(view, &visible, live)?;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DragError::not_found(format!("sub-group {}", id))),
        }
    }

    /// Swap with the next visible swimlane. Returns `false` at the bottom.
    pub fn move_down(
        &mut self,
        view: &ViewId,
        id: &SubGroupId,
        live: &[SubGroup],
    ) -> Result<bool, DragError> {
        let mut visible = self.effective_order(view, live);
        match visible.iter().position(|s| s == id) {
            Some(pos) if pos + 1 < visible.len() => {
                visible.swap(pos, pos + 1);
                self.persist_visible(view, &visible, live)?;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DragError::not_found(format!("sub-group {}", id))),
        }
    }

    /// Relocate within the visible order (swimlane drag)
    pub fn move_to(
        &mut self,
        view: &ViewId,
        id: &SubGroupId,
        new_index: usize,
        live: &[SubGroup],
    ) -> Result<bool, DragError> {
        let mut visible = self.effective_order(view, live);
        let from = visible
            .iter()
            .position(|s| s == id)
            .ok_or_else(|| DragError::not_found(format!("sub-group {}", id)))?;
        let to = new_index.min(visible.len().saturating_sub(1));
        if from == to {
            return Ok(false);
        }
        array_move(&mut visible, from, to);
        self.persist_visible(view, &visible, live)?;
        Ok(true)
    }

    /// Write a complete order: visible slots take the new visible sequence,
    /// hidden ids stay in their slots
    fn persist_visible(
        &mut self,
        view: &ViewId,
        visible: &[SubGroupId],
        live: &[SubGroup],
    ) -> Result<(), DragError> {
        let hidden = self.get_hidden(view);
        let mut next = visible.iter();
        let order: Vec<SubGroupId> = self
            .full_order(view, live)
            .into_iter()
            .map(|id| {
                if hidden.contains(&id) {
                    id
                } else {
                    next.next().cloned().unwrap_or(id)
                }
            })
            .collect();

        tracing::debug!(view = %view, order = ?order, "sub-group order persisted");
        self.set_order(view, &order)
    }

    pub fn hide(&mut self, view: &ViewId, id: &SubGroupId) -> Result<(), DragError> {
        self.set_visible(view, id, false)
    }

    pub fn show(&mut self, view: &ViewId, id: &SubGroupId) -> Result<(), DragError> {
        self.set_visible(view, id, true)
    }

    /// Toggle membership in the hidden set; the stored order is untouched
    pub fn set_visible(
        &mut self,
        view: &ViewId,
        id: &SubGroupId,
        visible: bool,
    ) -> Result<(), DragError> {
        let mut hidden = self.get_hidden(view);
        let changed = if visible {
            hidden.remove(id)
        } else {
            hidden.insert(id.clone())
        };
        if !changed {
            return Ok(());
        }
        tracing::debug!(view = %view, sub_group = %id, visible, "sub-group visibility changed");
        self.set_hidden(view, &hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(ids: &[&str]) -> Vec<SubGroup> {
        ids.iter().map(|id| SubGroup::new(*id, *id)).collect()
    }

    fn ids(v: &[&str]) -> Vec<SubGroupId> {
        v.iter().map(|s| SubGroupId::new(*s)).collect()
    }

    #[test]
    fn test_move_down_without_stored_order() {
        let view = ViewId::new("v");
        let live = lanes(&["S1", "S2", "S3"]);
        let mut store = SubGroupOrderStore::default();

        assert!(store.move_down(&view, &"S1".into(), &live).unwrap());
        assert_eq!(store.get_order(&view), ids(&["S2", "S1", "S3"]));
    }

    #[test]
    fn test_effective_order_appends_missing_ids() {
        let view = ViewId::new("v");
        let mut store = SubGroupOrderStore::default();
        store.set_order(&view, &ids(&["S3", "S1"])).unwrap();

        let live = lanes(&["S1", "S2", "S3"]);
        assert_eq!(store.effective_order(&view, &live), ids(&["S3", "S1", "S2"]));
    }

    #[test]
    fn test_effective_order_drops_absent_and_hidden() {
        let view = ViewId::new("v");
        let mut store = SubGroupOrderStore::default();
        store.set_order(&view, &ids(&["gone", "S2", "S1", "S2"])).unwrap();
        store.hide(&view, &"S1".into()).unwrap();

        let live = lanes(&["S1", "S2", "S3"]);
        assert_eq!(store.effective_order(&view, &live), ids(&["S2", "S3"]));
    }

    #[test]
    fn test_move_keeps_hidden_slot() {
        let view = ViewId::new("v");
        let live = lanes(&["S1", "S2", "S3", "S4"]);
        let mut store = SubGroupOrderStore::default();
        store.hide(&view, &"S2".into()).unwrap();

        // Visible [S1, S3, S4]; S3 moves above S1
        assert!(store.move_up(&view, &"S3".into(), &live).unwrap());
        assert_eq!(store.get_order(&view), ids(&["S3", "S2", "S1", "S4"]));

        store.show(&view, &"S2".into()).unwrap();
        assert_eq!(
            store.effective_order(&view, &live),
            ids(&["S3", "S2", "S1", "S4"])
        );
    }

    #[test]
    fn test_move_at_edges_is_noop() {
        let view = ViewId::new("v");
        let live = lanes(&["S1", "S2"]);
        let mut store = SubGroupOrderStore::default();

        assert!(!store.move_up(&view, &"S1".into(), &live).unwrap());
        assert!(!store.move_down(&view, &"S2".into(), &live).unwrap());
        assert!(store.get_order(&view).is_empty());
    }

    #[test]
    fn test_move_unknown_is_not_found() {
        let view = ViewId::new("v");
        let mut store = SubGroupOrderStore::default();
        let result = store.move_up(&view, &"nope".into(), &lanes(&["S1"]));
        assert!(matches!(result, Err(DragError::NotFound(_))));
    }

    #[test]
    fn test_move_to_relocates_and_clamps() {
        let view = ViewId::new("v");
        let live = lanes(&["S1", "S2", "S3"]);
        let mut store = SubGroupOrderStore::default();

        assert!(store.move_to(&view, &"S1".into(), 99, &live).unwrap());
        assert_eq!(store.get_order(&view), ids(&["S2", "S3", "S1"]));
        assert!(!store.move_to(&view, &"S1".into(), 2, &live).unwrap());
    }

    #[test]
    fn test_hide_is_idempotent_and_leaves_order() {
        let view = ViewId::new("v");
        let mut store = SubGroupOrderStore::default();
        store.set_order(&view, &ids(&["S2", "S1"])).unwrap();

        store.hide(&view, &"S1".into()).unwrap();
        store.hide(&view, &"S1".into()).unwrap();

        assert_eq!(store.get_hidden(&view).len(), 1);
        assert_eq!(store.get_order(&view), ids(&["S2", "S1"]));
    }

    #[test]
    fn test_views_are_independent() {
        let mut store = SubGroupOrderStore::default();
        store.hide(&"a".into(), &"S1".into()).unwrap();
        assert!(store.get_hidden(&"b".into()).is_empty());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view-settings.json");
        let view = ViewId::new("v");

        let mut store = SubGroupOrderStore::new(JsonFileSettings::open(&path));
        store.set_order(&view, &ids(&["S2", "S1"])).unwrap();
        store.hide(&view, &"S2".into()).unwrap();

        let reopened = SubGroupOrderStore::new(JsonFileSettings::open(&path));
        assert_eq!(reopened.get_order(&view), ids(&["S2", "S1"]));
        assert!(reopened.get_hidden(&view).contains(&SubGroupId::new("S2")));
    }

    #[test]
    fn test_json_file_malformed_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view-settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let settings = JsonFileSettings::open(&path);
        assert!(settings.get("v:sub_group_order").is_none());
    }
}
