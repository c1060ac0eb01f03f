//! Failure taxonomy for the decoding pipeline.
//!
//! Every failure is a returned value; no stage panics on bad input. The
//! pipeline fails fast: the first stage that cannot proceed produces the
//! error the caller sees.

/// Typed failure reasons, one per pipeline stage that can reject a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Pixel buffer dimensions do not match the supplied data length.
    #[error("pixel buffer dimensions do not match data length")]
    InvalidBuffer,

    /// Binarization could not establish a usable threshold.
    #[error("image contrast too low to binarize")]
    InsufficientContrast,

    /// No consistent set of three finder patterns was located.
    #[error("no QR finder patterns found")]
    NotFound,

    /// Derived version or perspective transform is out of range or degenerate.
    #[error("symbol geometry is invalid")]
    GeometryInvalid,

    /// Both redundant format-info copies are beyond correction capacity.
    #[error("format information is unrecoverable")]
    FormatInfoUnrecoverable,

    /// Both redundant version-info copies are beyond correction capacity.
    #[error("version information is unrecoverable")]
    VersionInfoUnrecoverable,

    /// A Reed-Solomon block has more byte errors than it can correct.
    #[error("error correction capacity exceeded")]
    UncorrectableBlock,

    /// The corrected bitstream does not parse as a valid segment sequence.
    #[error("payload bitstream is malformed")]
    MalformedPayload,
}

impl DecodeError {
    /// How far through the pipeline a frame got before this failure.
    ///
    /// Used to pick the most informative error when several candidate
    /// finder-pattern triples all fail at different stages.
    pub(crate) fn stage_depth(&self) -> u8 {
        match self {
            DecodeError::InvalidBuffer => 0,
            DecodeError::InsufficientContrast => 1,
            DecodeError::NotFound => 2,
            DecodeError::GeometryInvalid => 3,
            DecodeError::FormatInfoUnrecoverable => 4,
            DecodeError::VersionInfoUnrecoverable => 5,
            DecodeError::UncorrectableBlock => 6,
            DecodeError::MalformedPayload => 7,
        }
    }
}

/// User-facing failure categories for the upload path.
///
/// The fine-grained [`DecodeError`] taxonomy collapses to two messages: a
/// buffer we could not read at all, versus a readable image with no
/// decodable symbol in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanFailure {
    /// The image could not be processed (unreadable container or contrast).
    #[error("unable to process the image")]
    ImageUnreadable,

    /// The image was readable but contained no decodable QR code.
    #[error("no QR code detected in the image")]
    NoCodeDetected,
}

impl From<DecodeError> for ScanFailure {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidBuffer | DecodeError::InsufficientContrast => {
                ScanFailure::ImageUnreadable
            }
            _ => ScanFailure::NoCodeDetected,
        }
    }
}
