//! In-memory store of named transcoding presets.

use parking_lot::RwLock;
use sw_core::TranscodingPreset;

/// What [`PresetStore::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Ordered, thread-safe list of presets keyed by `id`.
pub struct PresetStore {
    presets: RwLock<Vec<TranscodingPreset>>,
}

impl PresetStore {
    /// Create a store holding the built-in presets.
    pub fn new() -> Self {
        Self::with_presets(TranscodingPreset::builtin())
    }

    /// Create a store from an explicit list. Later duplicates of an id win
    /// and move to the end, exactly as if upserted in order.
    pub fn with_presets(presets: impl IntoIterator<Item = TranscodingPreset>) -> Self {
        let store = Self {
            presets: RwLock::new(Vec::new()),
        };
        for preset in presets {
            store.upsert(preset);
        }
        store
    }

    /// All presets in insertion order.
    pub fn list(&self) -> Vec<TranscodingPreset> {
        self.presets.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<TranscodingPreset> {
        self.presets.read().iter().find(|p| p.id == id).cloned()
    }

    /// Insert `preset`, replacing any preset with the same id.
    ///
    /// A replaced preset is removed and the new value appended, so it moves
    /// to the end of [`list`](Self::list).
    pub fn upsert(&self, preset: TranscodingPreset) -> UpsertOutcome {
        let mut presets = self.presets.write();
        let before = presets.len();
        presets.retain(|p| p.id != preset.id);
        let outcome = if presets.len() < before {
            UpsertOutcome::Replaced
        } else {
            UpsertOutcome::Inserted
        };
        tracing::debug!(preset_id = %preset.id, outcome = ?outcome, "preset upserted");
        presets.push(preset);
        outcome
    }

    pub fn len(&self) -> usize {
        self.presets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.read().is_empty()
    }
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::new()
    }
}
