//! Coordinates headless surfaces: create, registry, dispose.

use crate::worker::spawn_worker;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;
use tracing::{info, warn};
use veil_surface::{
    HeadlessSurface, LogicalSize, RenderView, SurfaceError, SurfaceRegistry, ViewHost,
};
use veil_transport::{SurfaceChannel, SurfaceEvent, SurfaceId};

/// Errors from surface creation.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("a surface with id {0} is already live")]
    Duplicate(SurfaceId),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Owns the live-surface registry and one worker thread per surface.
///
/// Surfaces enter the registry on create and leave it when their
/// dispose command runs; the manager only ever observes the registry,
/// it does not mutate it on the dispose path.
pub struct HeadlessSurfaceManager {
    registry: Arc<SurfaceRegistry>,
    workers: HashMap<SurfaceId, JoinHandle<()>>,
    events_tx: Sender<SurfaceEvent>,
}

impl HeadlessSurfaceManager {
    /// Create a manager plus the receiver for surface events
    /// (`WebViewCreated`, `Disposed`).
    pub fn new() -> (Self, Receiver<SurfaceEvent>) {
        let (events_tx, events_rx) = unbounded();
        (
            Self {
                registry: Arc::new(SurfaceRegistry::new()),
                workers: HashMap::new(),
                events_tx,
            },
            events_rx,
        )
    }

    /// The process-wide live-surface registry.
    pub fn registry(&self) -> Arc<SurfaceRegistry> {
        self.registry.clone()
    }

    /// Create a surface: attach its view invisibly with the optional
    /// initial size (fill-parent when absent), register it, and start
    /// its worker. The `WebViewCreated` event fires on the event
    /// channel before this returns.
    pub fn create(
        &mut self,
        id: SurfaceId,
        view: Box<dyn RenderView>,
        host: Box<dyn ViewHost>,
        initial_size: Option<LogicalSize>,
    ) -> Result<SurfaceChannel, ManagerError> {
        if self.registry.contains(&id) {
            return Err(ManagerError::Duplicate(id));
        }

        let mut surface = HeadlessSurface::new(id.clone(), view, host, self.events_tx.clone());
        surface.bind_registry(self.registry.clone());
        surface.attach(initial_size)?;

        let (channel, rx) = SurfaceChannel::open(&id);
        self.registry.insert(id.clone(), channel.clone());
        let worker = spawn_worker(surface, rx);
        self.workers.insert(id.clone(), worker);

        info!("Created headless surface {}", id);
        Ok(channel)
    }

    /// Command channel of a live surface.
    pub fn channel(&self, id: &SurfaceId) -> Option<SurfaceChannel> {
        self.registry.channel(id)
    }

    /// Dispose a surface through its own command channel and wait for
    /// its worker to finish. Returns `false` when the id is not live.
    pub fn dispose(&mut self, id: &SurfaceId) -> bool {
        let Some(channel) = self.registry.channel(id) else {
            // Make sure a finished worker does not linger either way.
            self.join_worker(id);
            return false;
        };
        if let Err(err) = channel.invoke("dispose", Value::Null) {
            warn!("{} dispose over closed channel: {}", id, err);
        }
        self.join_worker(id);
        true
    }

    /// Dispose every live surface.
    pub fn shutdown(&mut self) {
        for id in self.registry.ids() {
            self.dispose(&id);
        }
        // Workers whose channels closed without a dispose command.
        let remaining: Vec<SurfaceId> = self.workers.keys().cloned().collect();
        for id in remaining {
            self.join_worker(&id);
        }
    }

    fn join_worker(&mut self, id: &SurfaceId) {
        if let Some(worker) = self.workers.remove(id) {
            if worker.join().is_err() {
                warn!("{} worker exited by panic", id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use veil_surface::{FrameHost, SoftwareRenderView};
    use veil_transport::FrameReply;

    fn manager_with_surface(id: &str) -> (HeadlessSurfaceManager, Receiver<SurfaceEvent>, SurfaceChannel)
    {
        let (mut manager, events) = HeadlessSurfaceManager::new();
        let channel = manager
            .create(
                SurfaceId::new(id),
                Box::new(SoftwareRenderView::new()),
                Box::new(FrameHost::new(2.0, 1280, 800)),
                None,
            )
            .unwrap();
        (manager, events, channel)
    }

    #[test]
    fn test_create_fires_ready_event_and_registers() {
        let (manager, events, _channel) = manager_with_surface("w1");

        let event = events.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(event, SurfaceEvent::WebViewCreated { surface } if surface.as_str() == "w1"));
        assert!(manager.registry().contains(&SurfaceId::new("w1")));
    }

    #[test]
    fn test_create_duplicate_id_fails() {
        let (mut manager, _events, _channel) = manager_with_surface("w1");
        let err = manager
            .create(
                SurfaceId::new("w1"),
                Box::new(SoftwareRenderView::new()),
                Box::new(FrameHost::new(1.0, 800, 600)),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ManagerError::Duplicate(_)));
        manager.shutdown();
    }

    #[test]
    fn test_fill_parent_size_over_channel() {
        let (mut manager, _events, channel) = manager_with_surface("w1");

        let reply = channel.invoke("getSize", Value::Null).unwrap();
        // 1280x800 px parent at density 2.0
        assert_eq!(
            reply,
            FrameReply::Success(json!({"width": 640.0, "height": 400.0}))
        );
        manager.shutdown();
    }

    #[test]
    fn test_full_scenario_over_channel() {
        let (mut manager, _events, channel) = manager_with_surface("w1");

        let reply = channel
            .invoke("setSize", json!({"size": {"width": 320.0, "height": 480.0}}))
            .unwrap();
        assert_eq!(reply, FrameReply::Success(json!(true)));

        let reply = channel.invoke("getSize", Value::Null).unwrap();
        assert_eq!(
            reply,
            FrameReply::Success(json!({"width": 320.0, "height": 480.0}))
        );

        let reply = channel
            .invoke(
                "loadData",
                json!({
                    "data": "<html>\n<body>hello</body>\n</html>",
                    "mimeType": "text/html",
                    "encoding": "UTF-8",
                    "baseUrl": null,
                    "historyUrl": null,
                }),
            )
            .unwrap();
        assert_eq!(reply, FrameReply::Success(json!(true)));

        match channel.invoke("capture", Value::Null).unwrap() {
            FrameReply::Binary(bytes) => {
                assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
            }
            other => panic!("expected capture bytes, got {:?}", other),
        }

        manager.shutdown();
    }

    #[test]
    fn test_dispose_removes_from_registry() {
        let (mut manager, _events, _channel) = manager_with_surface("w1");
        let id = SurfaceId::new("w1");

        assert!(manager.dispose(&id));
        assert!(!manager.registry().contains(&id));
        // A second dispose finds nothing live.
        assert!(!manager.dispose(&id));
    }

    #[test]
    fn test_commands_after_dispose_do_not_silently_succeed() {
        let (mut manager, _events, channel) = manager_with_surface("w1");
        manager.dispose(&SurfaceId::new("w1"));

        // The worker is gone; a retained handle cannot reach anything.
        assert!(channel.invoke("getSize", Value::Null).is_err());
        assert!(manager.channel(&SurfaceId::new("w1")).is_none());
    }
}
