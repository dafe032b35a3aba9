//! User-ordered list of active datasets with per-dataset opacity.
//!
//! Position in the list is the draw order the user sees in the layer drawer.
//! The list never holds two entries for the same dataset id.

use catalog::{DatasetDescriptor, VisualizationType};
use serde::Serialize;

pub const DEFAULT_OPACITY: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveDatasetEntry {
    pub dataset_id: String,
    pub name: String,
    pub visualization_type: VisualizationType,
    /// Percent, 0..=100.
    pub opacity: u8,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    entries: Vec<ActiveDatasetEntry>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ActiveDatasetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, dataset_id: &str) -> Option<&ActiveDatasetEntry> {
        self.entries.iter().find(|e| e.dataset_id == dataset_id)
    }

    pub fn contains(&self, dataset_id: &str) -> bool {
        self.get(dataset_id).is_some()
    }

    /// Adds the dataset at the end, or refreshes its metadata in place while
    /// keeping the user's opacity. Returns true when a new entry was added.
    pub fn upsert(&mut self, dataset: &DatasetDescriptor) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.dataset_id == dataset.id) {
            existing.name = dataset.name.clone();
            existing.visualization_type = dataset.visualization_type;
            return false;
        }
        self.entries.push(ActiveDatasetEntry {
            dataset_id: dataset.id.clone(),
            name: dataset.name.clone(),
            visualization_type: dataset.visualization_type,
            opacity: DEFAULT_OPACITY,
        });
        true
    }

    /// Sets one entry's opacity (clamped to 100). Returns false when the id
    /// is not listed.
    pub fn set_opacity(&mut self, dataset_id: &str, opacity: u8) -> bool {
        match self.entries.iter_mut().find(|e| e.dataset_id == dataset_id) {
            Some(entry) => {
                entry.opacity = opacity.min(100);
                true
            }
            None => false,
        }
    }

    /// Remove-then-insert. Out-of-range indices leave the list untouched.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        true
    }

    /// Drops the entry. The caller must also deactivate the dataset in the
    /// layer manager.
    pub fn remove(&mut self, dataset_id: &str) -> Option<ActiveDatasetEntry> {
        let at = self.entries.iter().position(|e| e.dataset_id == dataset_id)?;
        Some(self.entries.remove(at))
    }
}
