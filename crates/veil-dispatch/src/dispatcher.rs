//! Maps validated commands onto surface operations.

use crate::command::{Command, CommandReply};
use tracing::{debug, warn};
use veil_surface::{HeadlessSurface, SurfaceError, SurfaceState};
use veil_transport::{CommandFrame, FrameReply};

/// Execute one command against a surface.
///
/// Each command is handled synchronously and independently; nothing is
/// queued or retried.
pub fn dispatch(
    surface: &mut HeadlessSurface,
    command: Command,
) -> Result<CommandReply, SurfaceError> {
    debug!("{} <- {}", surface.id(), command.method());
    match command {
        Command::Dispose => {
            // Idempotent: a repeat dispose still answers true.
            surface.dispose();
            Ok(CommandReply::Ack)
        }
        Command::SetSize { size } => {
            surface.set_size(size)?;
            Ok(CommandReply::Ack)
        }
        Command::GetSize => match surface.state() {
            // Never attached: the wire contract answers null rather
            // than an error.
            SurfaceState::Uninitialized => Ok(CommandReply::Size(None)),
            _ => surface.size().map(|size| CommandReply::Size(Some(size))),
        },
        Command::LoadData(params) => {
            surface.load_data(&params)?;
            Ok(CommandReply::Ack)
        }
        Command::Capture => surface.capture().map(|captured| match captured {
            Some(bytes) => CommandReply::Image(bytes),
            None => CommandReply::NotImplemented,
        }),
    }
}

fn error_code(err: &SurfaceError) -> &'static str {
    match err {
        SurfaceError::InvalidState { .. } => "invalid_state",
        SurfaceError::InvalidSize { .. } => "invalid_size",
        SurfaceError::HostUnavailable(_) => "host_unavailable",
        SurfaceError::Capture(_) => "capture_failed",
    }
}

/// Serve one raw frame: decode, dispatch, and answer its reply slot.
pub fn serve_frame(surface: &mut HeadlessSurface, frame: CommandFrame) {
    let reply = match Command::parse(&frame.method, &frame.args) {
        Ok(Some(command)) => match dispatch(surface, command) {
            Ok(reply) => reply.into_frame_reply(),
            Err(err) => FrameReply::Error {
                code: error_code(&err).to_string(),
                message: err.to_string(),
            },
        },
        Ok(None) => {
            debug!("{}: method {} not implemented", surface.id(), frame.method);
            FrameReply::NotImplemented
        }
        Err(err) => FrameReply::Error {
            code: "invalid_argument".to_string(),
            message: err.to_string(),
        },
    };
    if frame.reply.send(reply).is_err() {
        warn!("{}: caller went away before the reply", surface.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use serde_json::{json, Value};
    use veil_surface::{FrameHost, LogicalSize, SoftwareRenderView};
    use veil_transport::SurfaceId;

    fn attached_surface() -> HeadlessSurface {
        let (tx, _rx) = unbounded();
        let mut surface = HeadlessSurface::new(
            SurfaceId::new("w1"),
            Box::new(SoftwareRenderView::new()),
            Box::new(FrameHost::new(2.0, 1280, 800)),
            tx,
        );
        surface.attach(None).unwrap();
        surface
    }

    #[test]
    fn test_set_then_get_size() {
        let mut surface = attached_surface();

        let reply = dispatch(
            &mut surface,
            Command::SetSize {
                size: LogicalSize::new(320.0, 480.0),
            },
        )
        .unwrap();
        assert_eq!(reply, CommandReply::Ack);

        let reply = dispatch(&mut surface, Command::GetSize).unwrap();
        assert_eq!(reply, CommandReply::Size(Some(LogicalSize::new(320.0, 480.0))));
    }

    #[test]
    fn test_get_size_without_attach_is_null() {
        let (tx, _rx) = unbounded();
        let mut surface = HeadlessSurface::new(
            SurfaceId::new("w1"),
            Box::new(SoftwareRenderView::new()),
            Box::new(FrameHost::new(1.0, 800, 600)),
            tx,
        );

        let reply = dispatch(&mut surface, Command::GetSize).unwrap();
        assert_eq!(reply, CommandReply::Size(None));
    }

    #[test]
    fn test_get_size_after_dispose_is_invalid_state() {
        let mut surface = attached_surface();
        dispatch(&mut surface, Command::Dispose).unwrap();

        let err = dispatch(&mut surface, Command::GetSize).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidState { .. }));
    }

    #[test]
    fn test_dispose_twice_still_acks() {
        let mut surface = attached_surface();
        assert_eq!(dispatch(&mut surface, Command::Dispose).unwrap(), CommandReply::Ack);
        assert_eq!(dispatch(&mut surface, Command::Dispose).unwrap(), CommandReply::Ack);
    }

    #[test]
    fn test_load_then_capture_returns_image() {
        let mut surface = attached_surface();

        let args = json!({"data": "<html>\n<body>x</body>\n</html>", "mimeType": "text/html"});
        let command = Command::parse("loadData", &args).unwrap().unwrap();
        assert_eq!(dispatch(&mut surface, command).unwrap(), CommandReply::Ack);

        match dispatch(&mut surface, Command::Capture).unwrap() {
            CommandReply::Image(bytes) => assert!(!bytes.is_empty()),
            other => panic!("expected image bytes, got {:?}", other),
        }
    }

    #[test]
    fn test_capture_unsupported_platform() {
        let (tx, _rx) = unbounded();
        let mut surface = HeadlessSurface::new(
            SurfaceId::new("w1"),
            Box::new(SoftwareRenderView::without_capture()),
            Box::new(FrameHost::new(1.0, 800, 600)),
            tx,
        );
        surface.attach(None).unwrap();

        assert_eq!(
            dispatch(&mut surface, Command::Capture).unwrap(),
            CommandReply::NotImplemented
        );
        assert_eq!(
            dispatch(&mut surface, Command::Capture).unwrap(),
            CommandReply::NotImplemented
        );
    }

    #[test]
    fn test_serve_frame_unknown_method() {
        let mut surface = attached_surface();
        let (reply_tx, reply_rx) = unbounded();
        serve_frame(
            &mut surface,
            CommandFrame {
                method: "reload".to_string(),
                args: Value::Null,
                reply: reply_tx,
            },
        );
        assert_eq!(reply_rx.try_recv().unwrap(), FrameReply::NotImplemented);
    }

    #[test]
    fn test_serve_frame_bad_arguments() {
        let mut surface = attached_surface();
        let (reply_tx, reply_rx) = unbounded();
        serve_frame(
            &mut surface,
            CommandFrame {
                method: "setSize".to_string(),
                args: json!({"size": "big"}),
                reply: reply_tx,
            },
        );
        match reply_rx.try_recv().unwrap() {
            FrameReply::Error { code, .. } => assert_eq!(code, "invalid_argument"),
            other => panic!("expected error reply, got {:?}", other),
        }
    }

    #[test]
    fn test_serve_frame_invalid_state_names_surface() {
        let mut surface = attached_surface();
        dispatch(&mut surface, Command::Dispose).unwrap();

        let (reply_tx, reply_rx) = unbounded();
        serve_frame(
            &mut surface,
            CommandFrame {
                method: "getSize".to_string(),
                args: Value::Null,
                reply: reply_tx,
            },
        );
        match reply_rx.try_recv().unwrap() {
            FrameReply::Error { code, message } => {
                assert_eq!(code, "invalid_state");
                assert!(message.contains("w1"));
            }
            other => panic!("expected error reply, got {:?}", other),
        }
    }
}
