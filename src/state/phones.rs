//! Dynamic list of additional phone entries

use crate::rules::{sync, RuleSet};
use crate::state::field::FieldState;
use serde::{Deserialize, Serialize};

/// Phone entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TipoTelefono {
    #[default]
    #[serde(rename = "movil")]
    Movil,
    #[serde(rename = "fijo")]
    Fijo,
}

/// One repeated phone entry: a kind plus a validated number field.
#[derive(Debug)]
pub struct TelefonoEntry {
    pub tipo: TipoTelefono,
    pub numero: FieldState,
}

impl TelefonoEntry {
    fn new() -> Self {
        Self {
            tipo: TipoTelefono::default(),
            numero: FieldState::new(RuleSet::new().with(sync::required).with(sync::telefono)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.numero.is_valid()
    }
}

/// Ordered, capped list of additional phone entries.
///
/// Order is insertion order and matters only for display. List validity is
/// the AND over entries; an empty list is valid.
#[derive(Debug)]
pub struct TelefonoList {
    entries: Vec<TelefonoEntry>,
    cap: usize,
}

impl TelefonoList {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    /// Append a fresh entry. A no-op returning false once the cap is hit.
    pub fn add(&mut self) -> bool {
        if self.entries.len() >= self.cap {
            tracing::debug!(cap = self.cap, "telefono list at capacity, add ignored");
            return false;
        }
        self.entries.push(TelefonoEntry::new());
        true
    }

    /// Remove the entry at `index`, shifting later entries down. A no-op
    /// returning false when out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TelefonoEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TelefonoEntry> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelefonoEntry> {
        self.entries.iter()
    }

    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(TelefonoEntry::is_valid)
    }

    pub fn mark_all_touched(&mut self) {
        for entry in &mut self.entries {
            entry.numero.touch();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
