//! In-memory selection store.
//!
//! Holds the registered surfaces with their selection/visibility flags.
//! Every mutation batch runs under one mutex and sends its
//! [`SelectionEvent`] before the mutex is released, so events arrive in
//! batch order and each one reflects exactly its own batch.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use super::{SelectionEvent, SelectionStore};
use crate::core::types::{SurfaceId, SurfaceMesh};

/// A registered surface and its operator flags.
#[derive(Debug, Clone)]
pub struct SurfaceState {
    pub id: SurfaceId,
    pub mesh: SurfaceMesh,
    pub selected: bool,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct Inner {
    surfaces: Vec<SurfaceState>,
    next_index: u32,
}

impl Inner {
    fn selected(&self) -> Vec<SurfaceId> {
        self.surfaces
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.id.clone())
            .collect()
    }
}

/// Selection store backed by a vector of surfaces.
#[derive(Debug)]
pub struct SurfaceServer {
    inner: Mutex<Inner>,
    events: Sender<SelectionEvent>,
}

impl SurfaceServer {
    /// Create the store and the receiving end of its event channel.
    pub fn new() -> (Arc<Self>, Receiver<SelectionEvent>) {
        let (events, rx) = unbounded();
        let server = Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            events,
        });
        (server, rx)
    }

    /// Copy of all registered surfaces.
    pub fn surfaces(&self) -> Vec<SurfaceState> {
        self.inner.lock().surfaces.clone()
    }

    /// Run one mutation batch and report it.
    fn batch<F: FnOnce(&mut Inner)>(&self, mutate: F) {
        let mut inner = self.inner.lock();
        mutate(&mut inner);
        let event = SelectionEvent {
            selected: inner.selected(),
        };
        // Receiver gone means nobody listens for changes any more
        if self.events.send(event).is_err() {
            tracing::trace!("Selection event dropped, no listener");
        }
    }
}

impl SelectionStore for SurfaceServer {
    fn remove_all_surfaces(&self) {
        let mut inner = self.inner.lock();
        inner.surfaces.clear();
    }

    fn add_surface(&self, mesh: SurfaceMesh) -> SurfaceId {
        let mut inner = self.inner.lock();
        let id = SurfaceId(format!("surface_{}", inner.next_index));
        inner.next_index += 1;
        inner.surfaces.push(SurfaceState {
            id: id.clone(),
            mesh,
            selected: false,
            visible: true,
        });
        id
    }

    fn set_selection_flags(&self, ids: &[SurfaceId], selected: bool) {
        self.batch(|inner| {
            for id in ids {
                match inner.surfaces.iter_mut().find(|s| &s.id == id) {
                    Some(surface) => surface.selected = selected,
                    None => tracing::warn!("Unknown surface id {}", id),
                }
            }
        });
    }

    fn select_all(&self, selected: bool) {
        self.batch(|inner| {
            for surface in &mut inner.surfaces {
                surface.selected = selected;
            }
        });
    }

    fn show_all(&self, visible: bool) {
        self.batch(|inner| {
            for surface in &mut inner.surfaces {
                surface.visible = visible;
            }
        });
    }

    fn selected_list(&self) -> Vec<SurfaceId> {
        self.inner.lock().selected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_with(n: usize) -> (Arc<SurfaceServer>, Receiver<SelectionEvent>, Vec<SurfaceId>) {
        let (server, rx) = SurfaceServer::new();
        let ids = (0..n)
            .map(|i| {
                let x = i as f32;
                server.add_surface(SurfaceMesh::rectangle([x, 0.0], [x + 0.5, 0.5], 0.0))
            })
            .collect();
        (server, rx, ids)
    }

    #[test]
    fn test_ids_unique() {
        let (_server, _rx, ids) = server_with(5);
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
    }

    #[test]
    fn test_registration_emits_no_event() {
        let (server, rx, _ids) = server_with(3);
        server.remove_all_surfaces();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_replacing_surfaces_clears_selection_silently() {
        let (server, rx, _ids) = server_with(3);
        server.select_all(true);
        let _ = rx.try_recv().unwrap();

        server.remove_all_surfaces();
        let fresh = server.add_surface(SurfaceMesh::rectangle([0.0, 0.0], [1.0, 1.0], 0.0));

        assert!(server.selected_list().is_empty());
        assert!(rx.try_recv().is_err());

        server.set_selection_flags(&[fresh.clone()], true);
        assert_eq!(rx.try_recv().unwrap().selected, vec![fresh]);
    }

    #[test]
    fn test_select_all_single_event() {
        let (server, rx, ids) = server_with(4);
        server.select_all(true);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.selected, ids);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_select_list_visits_each_target_once() {
        let (server, rx, ids) = server_with(4);
        server.set_selection_flags(&[ids[1].clone(), ids[3].clone()], true);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.selected, vec![ids[1].clone(), ids[3].clone()]);
        assert!(rx.try_recv().is_err());
        assert_eq!(server.selected_list(), event.selected);
    }

    #[test]
    fn test_empty_target_list_still_one_batch() {
        let (server, rx, _ids) = server_with(2);
        server.set_selection_flags(&[], true);

        assert!(rx.try_recv().unwrap().selected.is_empty());
    }

    #[test]
    fn test_unknown_id_ignored() {
        let (server, rx, ids) = server_with(2);
        server.set_selection_flags(&[SurfaceId::from("surface_99"), ids[0].clone()], true);

        assert_eq!(rx.try_recv().unwrap().selected, vec![ids[0].clone()]);
    }

    #[test]
    fn test_hide_keeps_selection() {
        let (server, rx, ids) = server_with(2);
        server.select_all(true);
        server.show_all(false);

        let _ = rx.try_recv().unwrap();
        assert_eq!(rx.try_recv().unwrap().selected, ids);
        assert!(server.surfaces().iter().all(|s| !s.visible && s.selected));
    }
}
