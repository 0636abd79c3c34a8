//! The set of listings picked for the promo sheet.

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

/// Most listings a promo sheet can show.
pub const DEFAULT_MAX_SELECTED: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Ordered, capped set of selected listing ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<i64>,
    max: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self::with_max(DEFAULT_MAX_SELECTED)
    }
}

impl Selection {
    pub fn with_max(max: usize) -> Self {
        Self {
            ids: Vec::new(),
            max,
        }
    }

    /// Select every id in order, stopping with an error at the cap.
    /// Repeated ids are selected once.
    pub fn from_ids(ids: impl IntoIterator<Item = i64>, max: usize) -> Result<Self, SelectionError> {
        let mut selection = Self::with_max(max);
        for id in ids {
            if !selection.contains(id) {
                selection.add(id)?;
            }
        }
        Ok(selection)
    }

    pub fn toggle(&mut self, id: i64) -> Result<Toggle, SelectionError> {
        if self.remove(id) {
            return Ok(Toggle::Removed);
        }
        self.add(id)?;
        Ok(Toggle::Added)
    }

    fn add(&mut self, id: i64) -> Result<(), SelectionError> {
        if self.ids.len() >= self.max {
            return Err(SelectionError::Full { max: self.max });
        }
        self.ids.push(id);
        Ok(())
    }

    /// Returns whether the id was selected.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&selected| selected != id);
        self.ids.len() != before
    }

    /// Drop ids no longer present in the store.
    pub fn retain_existing(&mut self, existing: &[i64]) {
        self.ids.retain(|id| existing.contains(id));
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }
}
