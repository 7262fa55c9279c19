use std::collections::HashMap;
use serde::Serialize;
use crate::assets::manifest::AssetManifest;

/// Index of a texture in the registry (and in the renderer's texture array).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureSlot(pub u32);

/// Load state of a single texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
struct TextureEntry {
    key: String,
    url: String,
    state: AssetState,
}

/// A load request handed to the host.
#[derive(Debug, Clone, Serialize)]
pub struct TextureRequest<'a> {
    pub slot: u32,
    pub key: &'a str,
    pub url: &'a str,
}

/// Registry of named textures with a `Pending | Ready | Failed` state per slot.
///
/// Slots are requested when a scene is built; the host loads the URLs and
/// reports back through `mark_ready` / `mark_failed`. A failed slot never
/// recovers, and the renderer falls back to the mesh's flat color.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
    by_key: HashMap<String, TextureSlot>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with one pending slot per manifest texture.
    /// Keys are sorted so slot numbers are stable across runs.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut keys: Vec<&String> = manifest.textures.keys().collect();
        keys.sort();
        let mut registry = Self::new();
        for key in keys {
            registry.request(key, &manifest.textures[key].url);
        }
        registry
    }

    /// Return the slot for `key`, registering a pending one if needed.
    pub fn request(&mut self, key: &str, url: &str) -> TextureSlot {
        if let Some(&slot) = self.by_key.get(key) {
            return slot;
        }
        let slot = TextureSlot(self.entries.len() as u32);
        self.entries.push(TextureEntry {
            key: key.to_string(),
            url: url.to_string(),
            state: AssetState::Pending,
        });
        self.by_key.insert(key.to_string(), slot);
        slot
    }

    pub fn slot(&self, key: &str) -> Option<TextureSlot> {
        self.by_key.get(key).copied()
    }

    pub fn state(&self, slot: TextureSlot) -> Option<AssetState> {
        self.entries.get(slot.0 as usize).map(|e| e.state)
    }

    pub fn url(&self, slot: TextureSlot) -> Option<&str> {
        self.entries.get(slot.0 as usize).map(|e| e.url.as_str())
    }

    /// Pending → Ready. Returns false for unknown or already-settled slots.
    pub fn mark_ready(&mut self, slot: TextureSlot) -> bool {
        match self.entries.get_mut(slot.0 as usize) {
            Some(entry) if entry.state == AssetState::Pending => {
                entry.state = AssetState::Ready;
                log::debug!("texture '{}' ready", entry.key);
                true
            }
            _ => false,
        }
    }

    /// Pending → Failed. Returns false for unknown or already-settled slots.
    pub fn mark_failed(&mut self, slot: TextureSlot) -> bool {
        match self.entries.get_mut(slot.0 as usize) {
            Some(entry) if entry.state == AssetState::Pending => {
                entry.state = AssetState::Failed;
                log::warn!("texture '{}' failed to load from {}, using flat color", entry.key, entry.url);
                true
            }
            _ => false,
        }
    }

    /// Slots still waiting on the host.
    pub fn pending_requests(&self) -> Vec<TextureRequest<'_>> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.state == AssetState::Pending)
            .map(|(i, e)| TextureRequest { slot: i as u32, key: &e.key, url: &e.url })
            .collect()
    }

    /// `pending_requests` as a JSON array for the host.
    pub fn pending_requests_json(&self) -> String {
        serde_json::to_string(&self.pending_requests()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
