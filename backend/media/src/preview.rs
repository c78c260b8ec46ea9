//! Revocable preview references for the selected image.
//!
//! A [`Preview`] is the display-side handle (a `blob:` style URL) for an
//! [`ImageHandle`]. It is revoked when dropped, so it can never outlive the
//! image it was derived from.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;
use vizassist_core::ImageHandle;

const URL_PREFIX: &str = "blob:vizassist/";

#[derive(Default)]
struct Entries {
    live: HashMap<String, (String, Bytes)>,
    high_water: usize,
}

/// In-memory store resolving preview URLs to image bytes.
#[derive(Default)]
pub struct PreviewRegistry {
    entries: Mutex<Entries>,
}

impl PreviewRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a preview for `image`.
    pub fn create(self: &Arc<Self>, image: &ImageHandle) -> Preview {
        let url = format!("{URL_PREFIX}{}", Uuid::new_v4());
        let mut entries = self.entries();
        entries
            .live
            .insert(url.clone(), (image.mime_type.clone(), image.data.clone()));
        let live = entries.live.len();
        entries.high_water = entries.high_water.max(live);
        debug!(url = %url, name = %image.name, "Preview created");
        Preview {
            url,
            registry: Arc::clone(self),
        }
    }

    /// Look up the MIME type and bytes behind a live preview URL.
    pub fn resolve(&self, url: &str) -> Option<(String, Bytes)> {
        self.entries().live.get(url).cloned()
    }

    fn revoke(&self, url: &str) {
        if self.entries().live.remove(url).is_some() {
            debug!(url = %url, "Preview revoked");
        }
    }

    /// Number of previews currently live.
    pub fn live_count(&self) -> usize {
        self.entries().live.len()
    }

    /// The most previews that were ever live at the same time.
    pub fn high_water(&self) -> usize {
        self.entries().high_water
    }
}

/// Scoped preview URL; revoked on drop.
pub struct Preview {
    url: String,
    registry: Arc<PreviewRegistry>,
}

impl Preview {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Preview").field(&self.url).finish()
    }
}
