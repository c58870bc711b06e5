use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::id::FieldElementId;

/// What the form needs to know about the rendered UI: how many elements
/// currently carry a given field identifier.
pub trait ElementSurface: Send + Sync {
    fn count(&self, id: &FieldElementId) -> usize;

    /// Called when a field component renders its element.
    fn mount(&self, id: &FieldElementId);

    /// Called when a field component's element goes away.
    fn unmount(&self, id: &FieldElementId);
}

/// In-memory element bookkeeping used when the host UI does not expose its
/// own element tree.
#[derive(Default)]
pub struct MountedElements {
    counts: RwLock<HashMap<FieldElementId, usize>>,
}

impl MountedElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn ElementSurface> {
        Arc::new(Self::new())
    }
}

impl ElementSurface for MountedElements {
    fn count(&self, id: &FieldElementId) -> usize {
        let counts = match self.counts.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        counts.get(id).copied().unwrap_or(0)
    }

    fn mount(&self, id: &FieldElementId) {
        let mut counts = match self.counts.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let count = counts.entry(id.clone()).or_insert(0);
        *count += 1;
        trace!(element = %id, count = *count, "element mounted");
    }

    fn unmount(&self, id: &FieldElementId) {
        let mut counts = match self.counts.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(count) = counts.get_mut(id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                counts.remove(id);
            }
        }
        trace!(element = %id, "element unmounted");
    }
}

/// Mounts an element on creation and unmounts it on drop.
pub struct MountGuard {
    surface: Arc<dyn ElementSurface>,
    id: FieldElementId,
}

impl MountGuard {
    pub fn new(surface: Arc<dyn ElementSurface>, id: FieldElementId) -> Self {
        surface.mount(&id);
        Self { surface, id }
    }

    pub fn id(&self) -> &FieldElementId {
        &self.id
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.surface.unmount(&self.id);
    }
}
