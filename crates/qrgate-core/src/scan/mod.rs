// ── Live camera scanning ──
//
// A `Scanner` owns at most one scan session. Opening acquires a camera
// stream and spawns a poll task that captures a frame every `interval`,
// runs the decode strategy, and stops on the first non-empty payload.
//
// State is published through a `watch` channel. Every published value
// carries the session id it belongs to; a poll task whose session has been
// replaced can never overwrite the newer session's state.
//
// Capture and decode run on the blocking pool so a slow decode never stalls
// the runtime. Ticks stay strictly sequential: the loop awaits each one, a
// slow decode delays the next tick, and `MissedTickBehavior::Skip` drops the
// ticks that fell due meanwhile instead of queueing them. An unreadable
// frame or a failed decode is recorded in `last_error` and polling goes on;
// only a stream failure ends the session.

mod camera;
mod frames;
mod state;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_SCAN_INTERVAL;
use crate::decode::DecodeStrategy;
use crate::error::CoreError;

pub use camera::{CameraError, CameraProvider, Facing, StreamConstraints, VideoStream};
pub use frames::FrameDirectoryCamera;
pub use state::ScanState;

use camera::StreamSlot;

/// Snapshot published to scanner subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStatus {
    /// Increments on every `open`; 0 before the first session.
    pub session: u64,
    pub state: ScanState,
    /// Last camera or decode failure in this session.
    pub last_error: Option<String>,
}

struct ActiveSession {
    id: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    stream: Arc<StreamSlot>,
}

/// Camera scan session owner.
pub struct Scanner {
    camera: Arc<dyn CameraProvider>,
    decoder: Arc<dyn DecodeStrategy>,
    interval: Duration,
    constraints: StreamConstraints,
    status: watch::Sender<ScanStatus>,
    next_session: u64,
    active: Option<ActiveSession>,
}

impl Scanner {
    pub fn new(camera: Arc<dyn CameraProvider>, decoder: Arc<dyn DecodeStrategy>) -> Self {
        let (status, _) = watch::channel(ScanStatus {
            session: 0,
            state: ScanState::Closed,
            last_error: None,
        });
        Self {
            camera,
            decoder,
            interval: DEFAULT_SCAN_INTERVAL,
            constraints: StreamConstraints::default(),
            status,
            next_session: 0,
            active: None,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: StreamConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn state(&self) -> ScanState {
        self.status.borrow().state.clone()
    }

    pub fn status(&self) -> ScanStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanStatus> {
        self.status.subscribe()
    }

    /// Start a new scan session, tearing down any previous one first.
    ///
    /// Must be called from within a Tokio runtime. If the camera cannot be
    /// acquired the scanner stays `Closed`, `last_error` is set, and
    /// [`CoreError::CameraUnavailable`] is returned. No retry happens.
    pub fn open(&mut self) -> Result<(), CoreError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::Internal(format!("scanner needs a Tokio runtime: {e}")))?;

        self.close();

        self.next_session += 1;
        let id = self.next_session;
        self.status.send_modify(|s| {
            s.session = id;
            s.last_error = None;
            if let Err(e) = s.state.transition(ScanState::Requesting) {
                warn!(error = %e, "forcing scanner into requesting");
                s.state = ScanState::Requesting;
            }
        });
        debug!(session = id, facing = ?self.constraints.facing, "requesting camera");

        let stream = match self.camera.acquire(&self.constraints) {
            Ok(stream) => Arc::new(StreamSlot::new(stream)),
            Err(e) => {
                let reason = e.to_string();
                warn!(session = id, error = %reason, "camera unavailable");
                publish(&self.status, id, ScanState::Closed, Some(reason.clone()));
                return Err(CoreError::CameraUnavailable { reason });
            }
        };

        publish(&self.status, id, ScanState::Streaming, None);
        info!(session = id, interval = ?self.interval, "scanner streaming");

        let cancel = CancellationToken::new();
        let task = runtime.spawn(poll_task(
            PollContext {
                session: id,
                stream: Arc::clone(&stream),
                decoder: Arc::clone(&self.decoder),
                status: self.status.clone(),
                period: self.interval,
            },
            cancel.clone(),
        ));

        self.active = Some(ActiveSession {
            id,
            cancel,
            task,
            stream,
        });
        Ok(())
    }

    /// Stop the poll loop and release the camera before returning.
    ///
    /// No-op when nothing is open.
    pub fn close(&mut self) {
        let Some(session) = self.active.take() else {
            return;
        };
        session.cancel.cancel();
        session.task.abort();
        let released = session.stream.release();

        let id = session.id;
        let changed = self.status.send_if_modified(|s| {
            s.session == id && s.state.transition(ScanState::Closed).is_ok()
        });
        debug!(session = id, released, changed, "scanner closed");
    }

    /// Wait until the current session decodes a payload or closes.
    pub async fn wait_for_code(&self) -> Result<String, CoreError> {
        let mut rx = self.status.subscribe();
        let status = rx
            .wait_for(|s| matches!(s.state, ScanState::Decoded(_) | ScanState::Closed))
            .await
            .map_err(|_| CoreError::ScanClosed)?
            .clone();

        match status.state {
            ScanState::Decoded(code) => Ok(code),
            _ => Err(match status.last_error {
                Some(reason) => CoreError::CameraUnavailable { reason },
                None => CoreError::ScanClosed,
            }),
        }
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.close();
    }
}

/// Apply `next` if `session` is still current and the transition is legal.
fn publish(
    status: &watch::Sender<ScanStatus>,
    session: u64,
    next: ScanState,
    error: Option<String>,
) -> bool {
    status.send_if_modified(|s| {
        if s.session != session {
            return false;
        }
        match s.state.transition(next) {
            Ok(()) => {
                if error.is_some() {
                    s.last_error = error;
                }
                true
            }
            Err(e) => {
                debug!(session, error = %e, "dropping scanner update");
                false
            }
        }
    })
}

struct PollContext {
    session: u64,
    stream: Arc<StreamSlot>,
    decoder: Arc<dyn DecodeStrategy>,
    status: watch::Sender<ScanStatus>,
    period: Duration,
}

enum Tick {
    Pending,
    Decoded(String),
    Failed(String),
}

impl PollContext {
    /// Capture one frame and decode it. Blocking.
    fn tick(&self) -> Tick {
        let frame = match self.stream.capture() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Tick::Pending,
            Err(CameraError::Frame(message)) => {
                self.record_error(message);
                return Tick::Pending;
            }
            Err(e) => return Tick::Failed(e.to_string()),
        };

        match self.decoder.decode(&frame) {
            Ok(Some(code)) if !code.trim().is_empty() => Tick::Decoded(code),
            Ok(_) => Tick::Pending,
            Err(e) => {
                self.record_error(e.to_string());
                Tick::Pending
            }
        }
    }

    /// Remember a per-frame failure without leaving `Streaming`.
    fn record_error(&self, message: String) {
        debug!(session = self.session, error = %message, "frame skipped");
        let session = self.session;
        self.status.send_if_modified(|s| {
            if s.session != session {
                return false;
            }
            s.last_error = Some(message);
            true
        });
    }
}

async fn poll_task(ctx: PollContext, cancel: CancellationToken) {
    let ctx = Arc::new(ctx);
    let mut interval = tokio::time::interval(ctx.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let worker = Arc::clone(&ctx);
                let outcome = tokio::task::spawn_blocking(move || worker.tick())
                    .await
                    .unwrap_or_else(|e| Tick::Failed(format!("frame worker failed: {e}")));
                if cancel.is_cancelled() {
                    break;
                }
                match outcome {
                    Tick::Pending => {}
                    Tick::Decoded(code) => {
                        ctx.stream.release();
                        info!(session = ctx.session, "code decoded from camera");
                        publish(&ctx.status, ctx.session, ScanState::Decoded(code), None);
                        break;
                    }
                    Tick::Failed(reason) => {
                        ctx.stream.release();
                        warn!(session = ctx.session, error = %reason, "camera stream failed");
                        publish(&ctx.status, ctx.session, ScanState::Closed, Some(reason));
                        break;
                    }
                }
            }
        }
    }
}
