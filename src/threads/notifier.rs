//! Selection change notifier.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, select};
use tracing::{debug, warn};

use crate::error::Result;
use crate::stages::SelectionEvent;
use crate::streaming::{SelectedSurfacesChanged, Topic};

/// Background thread publishing one notification per selection batch.
pub struct ChangeNotifier {
    handle: JoinHandle<()>,
}

impl ChangeNotifier {
    /// Spawn the notifier. It runs until `shutdown` or the event channel
    /// disconnects.
    pub fn spawn(
        events: Receiver<SelectionEvent>,
        topic: Arc<Topic<SelectedSurfacesChanged>>,
        shutdown: Receiver<()>,
    ) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("selection-notifier".into())
            .spawn(move || {
                loop {
                    select! {
                        recv(events) -> event => match event {
                            Ok(event) => notify(&topic, event),
                            Err(_) => break,
                        },
                        recv(shutdown) -> _ => break,
                    }
                }
                debug!("Selection notifier stopped");
            })?;
        Ok(Self { handle })
    }

    /// Wait for the thread to finish.
    pub fn join(self) {
        if self.handle.join().is_err() {
            warn!("Selection notifier panicked");
        }
    }
}

fn notify(topic: &Topic<SelectedSurfacesChanged>, event: SelectionEvent) {
    debug!("Selection changed: {} selected", event.selected.len());
    topic.publish(SelectedSurfacesChanged {
        selected_surfaces: event.selected,
    });
}
