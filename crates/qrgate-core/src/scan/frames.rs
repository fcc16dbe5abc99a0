// Camera backed by a directory of still frames.
//
// Used by the CLI and by tests in place of a real device: each capture
// returns the next image file in file-name order, and the stream ends after
// the last one. A file that fails to load is reported for that capture only.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, trace};

use super::camera::{CameraError, CameraProvider, StreamConstraints, VideoStream};
use crate::decode::load_bitmap;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

#[derive(Debug, Clone)]
pub struct FrameDirectoryCamera {
    dir: PathBuf,
}

impl FrameDirectoryCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Image files in the directory, sorted by name.
    pub fn frame_paths(&self) -> Result<Vec<PathBuf>, CameraError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CameraError::NotFound,
            std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied,
            _ => CameraError::Device(format!("{}: {e}", self.dir.display())),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_frame(path))
            .collect();
        paths.sort();
        Ok(paths)
    }
}

fn is_frame(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}

impl CameraProvider for FrameDirectoryCamera {
    fn acquire(&self, constraints: &StreamConstraints) -> Result<Box<dyn VideoStream>, CameraError> {
        let frames = self.frame_paths()?;
        if frames.is_empty() {
            return Err(CameraError::NotFound);
        }
        debug!(
            dir = %self.dir.display(),
            frames = frames.len(),
            facing = ?constraints.facing,
            "frame directory opened"
        );
        Ok(Box::new(FrameStream {
            frames: frames.into_iter(),
            stopped: false,
        }))
    }
}

struct FrameStream {
    frames: std::vec::IntoIter<PathBuf>,
    stopped: bool,
}

impl VideoStream for FrameStream {
    fn capture_frame(&mut self) -> Result<Option<DynamicImage>, CameraError> {
        if self.stopped {
            return Err(CameraError::Ended);
        }
        let path = self.frames.next().ok_or(CameraError::Ended)?;
        trace!(frame = %path.display(), "capturing frame");
        load_bitmap(&path)
            .map(Some)
            .map_err(|e| CameraError::Frame(format!("{}: {e}", path.display())))
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
