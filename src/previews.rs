// src/previews.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::models::ImageUpload;

/// Lokalne podglądy obrazków wybranych w edytorze. Odpowiednik `URL.createObjectURL`:
/// plik nie trafia do API, dopóki formularz nie zostanie wysłany.
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    inner: Arc<Mutex<HashMap<Uuid, ImageUpload>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, ImageUpload>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, upload: &ImageUpload) -> Uuid {
        let id = Uuid::new_v4();
        self.entries().insert(id, upload.clone());
        tracing::debug!(
            "Zarejestrowano podgląd {} dla pliku '{}' ({} bajtów)",
            id,
            upload.file_name,
            upload.bytes.len()
        );
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<ImageUpload> {
        self.entries().get(id).cloned()
    }

    pub fn discard(&self, id: &Uuid) {
        if self.entries().remove(id).is_some() {
            tracing::debug!("Usunięto podgląd {}", id);
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn url_for(id: &Uuid) -> String {
        format!("/previews/{}", id)
    }
}
