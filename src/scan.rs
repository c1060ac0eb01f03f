//! Scanning drivers: camera polling and still-image upload.
//!
//! The camera path polls a [`VideoSource`] at a fixed cadence, running the
//! full pipeline against the most recent frame each tick. Per-frame decode
//! failures are absorbed and scanning continues; the capture device is
//! released on every exit path. The upload path runs the pipeline exactly
//! once against a decoded image file and collapses failures into the two
//! user-facing categories.

use std::time::Duration;

use crate::error::ScanFailure;
use crate::models::{Decoded, PixelBuffer};
use crate::pipeline::{decode_with_options, DecodeOptions};

/// Default interval between camera polls. A product default, not an
/// algorithmic constraint; override via [`ScanOptions::poll_interval`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A live video frame source.
///
/// Implementations wrap the actual capture device (which is out of scope
/// here). The scanner owns the device exclusively between [`start`] and
/// [`stop`]; `stop` is guaranteed to be called on every exit path,
/// including panics inside a decode pass.
///
/// [`start`]: VideoSource::start
/// [`stop`]: VideoSource::stop
pub trait VideoSource {
    /// Acquire the capture device.
    fn start(&mut self) -> std::io::Result<()>;

    /// The most recent frame, or `None` if no frame is available yet.
    fn grab_frame(&mut self) -> Option<PixelBuffer>;

    /// Release the capture device.
    fn stop(&mut self);
}

/// Failure to run a camera scan at all
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The capture device could not be acquired.
    #[error("unable to access the camera")]
    CameraUnavailable(#[from] std::io::Error),
}

/// Why a camera scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A symbol was decoded
    Decoded(Decoded),
    /// The caller's cancel signal fired
    Cancelled,
    /// The configured frame budget ran out without a decode
    FrameBudgetExhausted,
}

/// Camera-path configuration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Interval between polls of the video source
    pub poll_interval: Duration,
    /// Stop after this many frames without a decode; `None` polls until
    /// cancelled
    pub max_frames: Option<usize>,
    /// Pipeline options applied to every frame
    pub decode: DecodeOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_frames: None,
            decode: DecodeOptions::default(),
        }
    }
}

/// Releases the capture device when the scan exits, whatever the path
struct ReleaseOnExit<'a, S: VideoSource> {
    source: &'a mut S,
}

impl<S: VideoSource> Drop for ReleaseOnExit<'_, S> {
    fn drop(&mut self) {
        self.source.stop();
    }
}

/// Poll `source` until a symbol decodes, `cancel` fires, or the frame
/// budget is exhausted.
///
/// Frame decode failures are absorbed silently (traced, not surfaced);
/// scanning simply continues at the next tick.
pub fn scan<S: VideoSource>(
    source: &mut S,
    options: &ScanOptions,
    mut cancel: impl FnMut() -> bool,
) -> Result<ScanOutcome, ScanError> {
    source.start()?;
    let guard = ReleaseOnExit { source };

    let mut frames = 0usize;
    loop {
        if cancel() {
            tracing::debug!(frames, "scan cancelled");
            return Ok(ScanOutcome::Cancelled);
        }

        if let Some(frame) = guard.source.grab_frame() {
            frames += 1;
            match decode_with_options(&frame, &options.decode) {
                Ok(decoded) => {
                    tracing::debug!(frames, "scan succeeded");
                    return Ok(ScanOutcome::Decoded(decoded));
                }
                Err(err) => {
                    tracing::trace!(?err, frames, "frame absorbed, continuing");
                }
            }
        }

        if let Some(max) = options.max_frames {
            if frames >= max {
                tracing::debug!(frames, "frame budget exhausted");
                return Ok(ScanOutcome::FrameBudgetExhausted);
            }
        }

        std::thread::sleep(options.poll_interval);
    }
}

/// Decode an uploaded image file (container bytes) exactly once.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<Decoded, ScanFailure> {
    let image = image::load_from_memory(bytes).map_err(|err| {
        tracing::debug!(%err, "uploaded image could not be decoded");
        ScanFailure::ImageUnreadable
    })?;
    decode_image(&image)
}

/// Decode an already-loaded image exactly once.
pub fn decode_image(image: &image::DynamicImage) -> Result<Decoded, ScanFailure> {
    let luma = image.to_luma8();
    let (width, height) = (luma.width() as usize, luma.height() as usize);
    let buffer = PixelBuffer::from_luma(luma.into_raw(), width, height)?;
    Ok(crate::pipeline::decode(&buffer)?)
}
