//! Process-wide mapping from slide id to rendered HTML.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;

/// In-memory store of finished slide sets.
///
/// Entries are only ever inserted whole, so a key is either absent or maps to
/// a complete document. Concurrent writers to the same id race; whichever
/// write lands last wins. Nothing is evicted and nothing survives a restart.
#[derive(Default)]
pub struct SlideRegistry {
    slides: RwLock<HashMap<String, Bytes>>,
}

impl std::fmt::Debug for SlideRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SlideRegistry({} slide sets)", self.len())
    }
}

impl SlideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `html` under `id`. Returns `true` if an earlier entry was replaced.
    pub fn put(&self, id: impl Into<String>, html: Bytes) -> bool {
        // A poisoned lock can only hold whole values, so keep using it.
        let mut map = self.slides.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(id.into(), html).is_some()
    }

    pub fn get(&self, id: &str) -> Option<Bytes> {
        let map = self.slides.read().unwrap_or_else(PoisonError::into_inner);
        map.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.slides.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
