//! veil-wv: headless web-surface bridge.
//!
//! Entry point for the bridge. Initializes the global allocator, sets
//! up logging, and drives one headless surface through its whole
//! lifecycle over the command transport: attach, resize, load an
//! inline document, capture it, dispose.

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use veil_dispatch::HeadlessSurfaceManager;
use veil_surface::{FrameHost, SoftwareRenderView};
use veil_transport::{FrameReply, SurfaceEvent, SurfaceId};

// Use mimalloc as the global allocator for reduced memory fragmentation
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    info!("veil-wv starting...");

    let (mut manager, events) = HeadlessSurfaceManager::new();

    // A 1280x800 px host frame at 2x density; the surface fills it.
    let id = SurfaceId::new("w1");
    let channel = manager.create(
        id.clone(),
        Box::new(SoftwareRenderView::new()),
        Box::new(FrameHost::new(2.0, 1280, 800)),
        None,
    )?;

    match events.recv()? {
        SurfaceEvent::WebViewCreated { surface } => info!("{} ready", surface),
        other => info!("unexpected event before ready: {:?}", other),
    }

    let reply = channel.invoke("getSize", Value::Null)?;
    info!("initial size: {:?}", reply);

    channel.invoke("setSize", json!({"size": {"width": 320.0, "height": 480.0}}))?;
    let reply = channel.invoke("getSize", Value::Null)?;
    info!("resized to: {:?}", reply);

    channel.invoke(
        "loadData",
        json!({
            "data": "<html>\n<body>\n<h1>veil</h1>\n</body>\n</html>",
            "mimeType": "text/html",
            "encoding": "UTF-8",
            "baseUrl": null,
            "historyUrl": null,
        }),
    )?;

    match channel.invoke("capture", Value::Null)? {
        FrameReply::Binary(bytes) => info!("captured {} PNG bytes", bytes.len()),
        FrameReply::NotImplemented => info!("capture not supported on this platform"),
        other => info!("capture reply: {:?}", other),
    }

    manager.dispose(&id);
    info!("veil-wv shutting down");
    Ok(())
}
