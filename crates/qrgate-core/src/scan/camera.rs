// Camera capability seam.
//
// `CameraProvider::acquire` is the platform's "get user media" call; the
// returned `VideoStream` is owned by exactly one scan session and must be
// stopped when that session ends. `StreamSlot` makes the stop happen once.

use std::sync::Mutex;

use image::DynamicImage;
use thiserror::Error;
use tracing::debug;

/// Preferred camera direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    #[default]
    Rear,
    Front,
}

/// What the scanner asks the platform for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub audio: bool,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::Rear,
            audio: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera available")]
    NotFound,

    #[error("video stream ended")]
    Ended,

    /// One frame could not be read; the stream itself is still usable.
    #[error("unreadable frame: {0}")]
    Frame(String),

    #[error("{0}")]
    Device(String),
}

/// Source of live video streams.
pub trait CameraProvider: Send + Sync {
    fn acquire(&self, constraints: &StreamConstraints) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// A live video stream.
pub trait VideoStream: Send {
    /// Current frame, or `None` if the stream has not produced one yet.
    fn capture_frame(&mut self) -> Result<Option<DynamicImage>, CameraError>;

    /// Stop every underlying track. Called exactly once per stream.
    fn stop(&mut self);
}

/// Shared holder that releases its stream exactly once.
///
/// Both the poll task and the owning session hold it; whichever exit path
/// runs first stops the stream and the rest become no-ops. Dropping the last
/// reference releases too.
pub(crate) struct StreamSlot {
    stream: Mutex<Option<Box<dyn VideoStream>>>,
}

impl StreamSlot {
    pub(crate) fn new(stream: Box<dyn VideoStream>) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
        }
    }

    /// Capture from the stream, `Err(Ended)` once released.
    pub(crate) fn capture(&self) -> Result<Option<DynamicImage>, CameraError> {
        let mut guard = self
            .stream
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match guard.as_mut() {
            Some(stream) => stream.capture_frame(),
            None => Err(CameraError::Ended),
        }
    }

    /// Stop the stream if still held. Returns whether this call stopped it.
    pub(crate) fn release(&self) -> bool {
        let taken = self
            .stream
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        match taken {
            Some(mut stream) => {
                stream.stop();
                debug!("camera stream released");
                true
            }
            None => false,
        }
    }
}

impl Drop for StreamSlot {
    fn drop(&mut self) {
        self.release();
    }
}
