use bytes::Bytes;
use std::collections::HashMap;
use std::future::{ready, Future};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    error::StorageError,
    storage::{PhotoStorage, PhotoUpload},
};

/// `PhotoStorage` keeping objects in a map keyed by `directory/filename`
#[derive(Debug, Clone)]
pub struct InMemoryPhotoStorage {
    base_url: String,
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl InMemoryPhotoStorage {
    /// Create a storage whose URLs start with `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::default(),
        }
    }

    /// Get the stored bytes for a key such as `image/user/user-1.png`
    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PhotoStorage for InMemoryPhotoStorage {
    fn save(
        &self,
        photo: &PhotoUpload,
        directory: &str,
        filename: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send {
        let key = format!("{}/{}", directory.trim_matches('/'), filename);
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), photo.content().clone());
        ready(Ok(format!("{}/{}", self.base_url, key)))
    }
}
