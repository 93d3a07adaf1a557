//! Local registry for fetched image payloads.
//!
//! Each fetched image is stored once and referenced by an [`ImageHandle`].
//! Handles own their entry: dropping the handle removes the bytes from the
//! store, so replacing a page of rows (or discarding a stale load) releases
//! everything that page fetched.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct StoreInner {
    next_id: u64,
    images: HashMap<u64, Arc<[u8]>>,
}

/// Shared image registry
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and return the owning handle.
    pub fn insert(&self, bytes: Vec<u8>) -> ImageHandle {
        let len = bytes.len();
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.images.insert(id, Arc::from(bytes));

        ImageHandle {
            id,
            len,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn get(&self, handle: &ImageHandle) -> Option<Arc<[u8]>> {
        self.inner.lock().images.get(&handle.id).cloned()
    }

    /// Number of live images
    pub fn len(&self) -> usize {
        self.inner.lock().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_bytes(&self) -> usize {
        self.inner.lock().images.values().map(|b| b.len()).sum()
    }
}

/// Owning reference to one stored image
pub struct ImageHandle {
    id: u64,
    len: usize,
    store: Weak<Mutex<StoreInner>>,
}

impl ImageHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Locally resolvable reference, stable for the lifetime of the handle
    pub fn url(&self) -> String {
        format!("local-image:{}", self.id)
    }

    pub fn bytes(&self) -> Option<Arc<[u8]>> {
        let store = self.store.upgrade()?;
        let inner = store.lock();
        inner.images.get(&self.id).cloned()
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("id", &self.id)
            .field("len", &self.len)
            .finish()
    }
}

impl Drop for ImageHandle {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.lock().images.remove(&self.id);
        }
    }
}
