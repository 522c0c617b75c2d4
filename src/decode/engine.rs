//! The external decoding engine seam.
//!
//! The engine turns a compressed bitstream into packed v210 rows. How it is
//! located, loaded or versioned is the caller's business; the pipeline only
//! uses this capability set.

use crate::error::EngineError;

/// Arguments for one engine decode call.
#[derive(Debug)]
pub struct DecodeRequest<'a> {
    pub bitstream: &'a [u8],
    /// Receives `height` packed rows, `stride` bytes apart.
    pub destination: &'a mut [u8],
    pub stride: usize,
    pub width: u32,
    pub height: u32,
    /// Whether the engine may decode on several threads internally.
    pub threaded: bool,
}

/// A decoding engine producing packed v210 output.
pub trait DecodeEngine {
    /// Per-stream decoder state owned by the caller between `open` and `close`.
    type Session;

    fn open(&self) -> Result<Self::Session, EngineError>;

    /// Minimum packed row size in bytes the engine needs for `width` pixels.
    ///
    /// Values <= 0 are passed through and rejected by the caller.
    fn minimum_stride(&self, width: u32) -> i64;

    fn decode(
        &self,
        session: &mut Self::Session,
        request: DecodeRequest<'_>,
    ) -> Result<(), EngineError>;

    fn close(&self, session: Self::Session);
}
