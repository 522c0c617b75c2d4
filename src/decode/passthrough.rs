//! Engine for uncompressed v210 input.
//!
//! The bitstream is a sequence of tightly packed v210 rows, each padded to
//! the standard 128 bytes per 48 pixels. Decoding copies every row into the
//! pipeline's buffer at the requested stride.

use tracing::debug;

use crate::decode::engine::{DecodeEngine, DecodeRequest};
use crate::error::EngineError;

/// Standard v210 row size: 48 pixels per 128 bytes.
pub fn v210_row_bytes(width: u32) -> usize {
    (width as usize).div_ceil(48) * 128
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughEngine;

/// Frames copied by one passthrough session.
#[derive(Debug, Default)]
pub struct PassthroughSession {
    pub frames: u64,
}

impl DecodeEngine for PassthroughEngine {
    type Session = PassthroughSession;

    fn open(&self) -> Result<Self::Session, EngineError> {
        Ok(PassthroughSession::default())
    }

    fn minimum_stride(&self, width: u32) -> i64 {
        i64::try_from(v210_row_bytes(width)).unwrap_or(-1)
    }

    fn decode(
        &self,
        session: &mut Self::Session,
        request: DecodeRequest<'_>,
    ) -> Result<(), EngineError> {
        if request.width == 0 || request.height == 0 {
            return Err(EngineError::Rejected("empty frame".into()));
        }
        let row_bytes = v210_row_bytes(request.width);
        let rows = request.height as usize;
        let needed = row_bytes
            .checked_mul(rows)
            .ok_or_else(|| EngineError::Rejected("frame size overflows".into()))?;
        if request.bitstream.len() < needed {
            return Err(EngineError::Rejected(format!(
                "bitstream holds {} bytes, {} required",
                request.bitstream.len(),
                needed
            )));
        }
        if request.stride < row_bytes {
            return Err(EngineError::Rejected(format!(
                "destination stride {} below row size {}",
                request.stride, row_bytes
            )));
        }
        let dst_needed = request
            .stride
            .checked_mul(rows)
            .ok_or_else(|| EngineError::Rejected("destination size overflows".into()))?;
        if request.destination.len() < dst_needed {
            return Err(EngineError::Rejected(format!(
                "destination holds {} bytes, {} required",
                request.destination.len(),
                dst_needed
            )));
        }

        let src_rows = request.bitstream[..needed].chunks_exact(row_bytes);
        let dst_rows = request.destination.chunks_exact_mut(request.stride);
        for (src, dst) in src_rows.zip(dst_rows) {
            dst[..row_bytes].copy_from_slice(src);
        }

        session.frames += 1;
        debug!(
            frame = session.frames,
            width = request.width,
            height = request.height,
            "copied v210 frame"
        );
        Ok(())
    }

    fn close(&self, session: Self::Session) {
        debug!(frames = session.frames, "passthrough session closed");
    }
}
