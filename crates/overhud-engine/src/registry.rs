//! Surface registry: the authoritative name → surface mapping.
//!
//! Owns surface lifetime. The compositor session holds only the integer id
//! back to each entry, so every removal here must be paired with a
//! `close_window` by the caller while the entry's `composited` flag is set.

use std::{collections::HashMap, sync::Arc};

use overhud_protocol::SurfaceId;

use crate::{
    Result,
    deps::SurfaceHandle,
    error::Error,
};

/// Chrome parameters fixed at registration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayParams {
    /// Drag border width in logical pixels.
    pub drag_border: i32,
    /// Caption height in logical pixels.
    pub caption_height: i32,
    /// Whether the surface background is transparent.
    pub transparent: bool,
}

/// One registered surface.
pub(crate) struct SurfaceEntry {
    /// Compositor-side identity, valid while this entry exists.
    pub id: SurfaceId,
    /// Handle to the underlying UI surface.
    pub handle: Arc<dyn SurfaceHandle>,
    /// Registration-time chrome parameters.
    pub params: OverlayParams,
    /// Set once the surface has reported it is paintable.
    pub ready: bool,
    /// Set once the surface has been registered with the compositor.
    pub composited: bool,
}

/// Name-keyed surface store with an id inverse map.
pub(crate) struct SurfaceRegistry {
    /// Live entries keyed by logical name.
    entries: HashMap<String, SurfaceEntry>,
    /// Inverse map from compositor id to name, maintained alongside
    /// `entries` so inbound compositor events resolve without a scan.
    names: HashMap<SurfaceId, String>,
    /// Next id to hand out. Monotonic; ids are never reissued while live.
    next_id: SurfaceId,
}

impl SurfaceRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            names: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a surface under a unique live name.
    pub(crate) fn register(
        &mut self,
        name: String,
        handle: Arc<dyn SurfaceHandle>,
        params: OverlayParams,
    ) -> Result<SurfaceId> {
        if self.entries.contains_key(&name) {
            return Err(Error::DuplicateName(name));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.names.insert(id, name.clone());
        self.entries.insert(
            name,
            SurfaceEntry {
                id,
                handle,
                params,
                ready: false,
                composited: false,
            },
        );
        Ok(id)
    }

    /// Remove a surface by name. Idempotent; absent names are a no-op.
    pub(crate) fn unregister(&mut self, name: &str) -> Option<SurfaceEntry> {
        let entry = self.entries.remove(name)?;
        self.names.remove(&entry.id);
        Some(entry)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&SurfaceEntry> {
        self.entries.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut SurfaceEntry> {
        self.entries.get_mut(name)
    }

    /// Resolve an inbound compositor id to its entry.
    pub(crate) fn by_id(&self, id: SurfaceId) -> Option<&SurfaceEntry> {
        self.entries.get(self.names.get(&id)?)
    }

    /// Iterate all live entries. Order is arbitrary.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&String, &SurfaceEntry)> {
        self.entries.iter()
    }

    /// Remove and return every entry.
    pub(crate) fn drain(&mut self) -> Vec<(String, SurfaceEntry)> {
        self.names.clear();
        self.entries.drain().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use overhud_protocol::Rect;

    use super::*;
    use crate::test_support::MockSurface;

    fn registry_with(names: &[&str]) -> SurfaceRegistry {
        let mut reg = SurfaceRegistry::new();
        for name in names {
            reg.register(
                (*name).to_string(),
                MockSurface::fixed(Rect::new(0, 0, 100, 100)),
                OverlayParams::default(),
            )
            .unwrap();
        }
        reg
    }

    #[test]
    fn register_assigns_distinct_ids() {
        let reg = registry_with(&["a", "b", "c"]);
        let mut ids: Vec<_> = reg.entries().map(|(_, e)| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut reg = registry_with(&["tip"]);
        let err = reg
            .register(
                "tip".to_string(),
                MockSurface::fixed(Rect::new(0, 0, 10, 10)),
                OverlayParams::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName(name) if name == "tip"));
        // The original registration is untouched.
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn name_is_reusable_after_unregister() {
        let mut reg = registry_with(&["tip"]);
        let first = reg.get("tip").unwrap().id;
        assert!(reg.unregister("tip").is_some());
        let second = reg
            .register(
                "tip".to_string(),
                MockSurface::fixed(Rect::new(0, 0, 10, 10)),
                OverlayParams::default(),
            )
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut reg = registry_with(&["tip"]);
        assert!(reg.unregister("tip").is_some());
        assert!(reg.unregister("tip").is_none());
        assert!(reg.unregister("never-registered").is_none());
    }

    #[test]
    fn id_lookup_follows_lifetime() {
        let mut reg = registry_with(&["tip"]);
        let id = reg.get("tip").unwrap().id;
        assert!(reg.by_id(id).is_some());
        reg.unregister("tip");
        assert!(reg.by_id(id).is_none());
    }
}
