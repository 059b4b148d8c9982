//! Error types for the capture/export engine.

use thiserror::Error;

/// Result type alias using VcapError.
pub type Result<T> = std::result::Result<T, VcapError>;

/// Main error type for capture and export operations.
#[derive(Error, Debug)]
pub enum VcapError {
    /// I/O error while writing the archive or an entry payload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the ZIP container.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to serialize a JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode the texture atlas image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed while writing a specific archive entry.
    #[error("failed to write archive entry '{name}': {source}")]
    Entry {
        /// Name of the archive entry that failed.
        name: String,
        /// Underlying failure.
        #[source]
        source: Box<VcapError>,
    },

    /// The texture atlas was not delivered within the configured bound.
    ///
    /// Distinct from the I/O category so callers can choose to retry the
    /// whole export.
    #[error("texture atlas retrieval timed out")]
    AtlasTimeout,

    /// The atlas provider went away before delivering the image.
    #[error("unable to retrieve texture atlas: {0}")]
    AtlasUnavailable(#[source] std::sync::mpsc::RecvTimeoutError),

    /// A frame references a mesh id that was never registered.
    #[error("frame references unregistered mesh '{0}'")]
    MissingMesh(String),

    /// Frame timestamps must be non-decreasing within a session.
    #[error("frame timestamp {next} precedes previous frame at {prev}")]
    FrameOrder {
        /// Timestamp of the last captured frame.
        prev: f64,
        /// Rejected timestamp.
        next: f64,
    },

    /// A predictive frame was captured with no intra frame to delta against.
    #[error("a predictive frame requires a preceding intra frame")]
    MissingKeyframe,
}

impl VcapError {
    /// Wrap an error with the name of the archive entry being written.
    pub(crate) fn for_entry(name: &str, source: VcapError) -> Self {
        VcapError::Entry {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}
