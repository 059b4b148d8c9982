//! Texture atlas extraction.
//!
//! The world atlas lives in GPU-managed memory and can only be read back at
//! a safe point in the host's render loop, never on the exporter's thread.
//! The handoff is an explicit one-shot channel: the provider queues a
//! readback and holds the [`AtlasRequest`]; the exporter blocks on the
//! paired [`PendingAtlas`] with a bounded wait. The wait cannot complete
//! before the host's next frame renders, so it must never run on the thread
//! that drives rendering.

use std::io::Cursor;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use image::{ImageEncoder, RgbaImage};

use crate::error::{Result, VcapError};

/// Host-side half of an atlas readback. The render loop fulfills it once
/// the image has been copied out of GPU memory.
pub struct AtlasRequest {
    tx: mpsc::Sender<RgbaImage>,
}

impl AtlasRequest {
    /// Deliver the atlas image. Delivery after the exporter gave up is
    /// silently dropped.
    pub fn fulfill(self, atlas: RgbaImage) {
        let _ = self.tx.send(atlas);
    }
}

/// Exporter-side half of an atlas readback.
pub struct PendingAtlas {
    rx: mpsc::Receiver<RgbaImage>,
}

impl PendingAtlas {
    /// Block until the host delivers the atlas, up to `timeout`.
    ///
    /// A timeout maps to [`VcapError::AtlasTimeout`]; the provider dropping
    /// its request without fulfilling it maps to
    /// [`VcapError::AtlasUnavailable`].
    pub fn wait(self, timeout: Duration) -> Result<RgbaImage> {
        match self.rx.recv_timeout(timeout) {
            Ok(atlas) => Ok(atlas),
            Err(RecvTimeoutError::Timeout) => Err(VcapError::AtlasTimeout),
            Err(err @ RecvTimeoutError::Disconnected) => Err(VcapError::AtlasUnavailable(err)),
        }
    }
}

/// Create a connected request/handle pair for one readback.
pub fn atlas_channel() -> (AtlasRequest, PendingAtlas) {
    let (tx, rx) = mpsc::channel();
    (AtlasRequest { tx }, PendingAtlas { rx })
}

/// The texture-provider collaborator.
///
/// `request_atlas` must schedule a readback on the host's own cadence and
/// return immediately; the returned handle completes when the host executes
/// the queued work. At most one request is made per finalize pass.
pub trait TextureProvider {
    fn request_atlas(&self) -> PendingAtlas;
}

/// Encode an atlas image as PNG bytes.
///
/// The PNG encoder needs addressable storage, so the image is staged through
/// an in-memory buffer before being streamed into the archive.
pub fn encode_png(atlas: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes));
    encoder.write_image(
        atlas.as_raw(),
        atlas.width(),
        atlas.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}
