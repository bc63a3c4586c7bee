//! Per-surface worker thread with panic isolation.

use crate::dispatcher::serve_frame;
use crossbeam_channel::Receiver;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tracing::{debug, error, info};
use veil_surface::{HeadlessSurface, SurfaceState};
use veil_transport::CommandFrame;

/// Spawn the thread that serves a surface's command frames.
///
/// Frames are served one at a time in arrival order. A panic while
/// serving is caught and logged; the caller sees a closed reply slot
/// instead of a crashed process. The worker exits once the surface is
/// disposed or its channel closes.
pub fn spawn_worker(
    mut surface: HeadlessSurface,
    rx: Receiver<CommandFrame>,
) -> thread::JoinHandle<()> {
    let name = format!("surface-{}", surface.id().as_str());
    thread::Builder::new()
        .name(name)
        .spawn(move || {
            info!("Worker for {} started", surface.id());
            run_worker_loop(&mut surface, rx);
            info!("Worker for {} stopped", surface.id());
        })
        .expect("Failed to spawn surface worker thread")
}

fn run_worker_loop(surface: &mut HeadlessSurface, rx: Receiver<CommandFrame>) {
    loop {
        let frame = match rx.recv() {
            Ok(frame) => frame,
            Err(_) => {
                debug!("{} channel closed, shutting down", surface.id());
                // The surface must not outlive its channel in limbo.
                surface.dispose();
                break;
            }
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| serve_frame(surface, frame)));
        if let Err(panic_info) = result {
            let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            error!("{} panicked serving a command: {}", surface.id(), message);
        }

        if surface.state() == SurfaceState::Disposed {
            debug!("{} disposed, worker exiting", surface.id());
            break;
        }
    }
}
