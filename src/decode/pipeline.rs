//! Frame decode pipeline: engine decode into a packed buffer, then per-row unpack.

use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, error, info, instrument, trace};

use crate::decode::engine::{DecodeEngine, DecodeRequest};
use crate::decode::frame::{PlanarDestination, PlanarFrame};
use crate::error::{BoundsError, DecodeError, EngineError};
use crate::format::geometry::{row_span, FrameGeometry};
use crate::format::v210::unpack_row_into;
use crate::DecoderConfig;

fn alloc_decode_buffer(bytes: usize) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| DecodeError::Allocation { bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}

/// Decode one frame into caller-owned planes.
///
/// Either every row of `dst` is written or none is: all sizing checks run
/// before the engine is called, and the engine's output is only unpacked
/// once it reports success.
#[instrument(skip(engine, session, bitstream, dst, config), fields(len = bitstream.len()))]
pub fn decode_frame<E: DecodeEngine + ?Sized>(
    engine: &E,
    session: &mut E::Session,
    bitstream: &[u8],
    width: u32,
    height: u32,
    dst: &mut PlanarDestination<'_>,
    config: &DecoderConfig,
) -> Result<FrameGeometry, DecodeError> {
    if bitstream.is_empty() {
        error!("invalid packet received");
        return Err(DecodeError::InvalidPacket);
    }

    let geometry = FrameGeometry::compute(width, height, engine.minimum_stride(width))?;
    let luma_width = geometry.luma_width();
    let chroma_width = geometry.chroma_width();
    let rows = height as usize;

    dst.validate(luma_width, rows)?;
    if geometry.packed_row_stride < row_span(luma_width) {
        return Err(BoundsError {
            what: "packed row stride",
            needed: row_span(luma_width),
            available: geometry.packed_row_stride,
        }
        .into());
    }

    let mut packed = alloc_decode_buffer(geometry.packed_buffer_size)?;

    let decode_start = Instant::now();
    engine
        .decode(
            session,
            DecodeRequest {
                bitstream,
                destination: &mut packed,
                stride: geometry.packed_row_stride,
                width,
                height,
                threaded: config.threaded,
            },
        )
        .map_err(|e| {
            error!("external decode failed: {}", e);
            metrics::counter!("v210_decode_failures").increment(1);
            DecodeError::ExternalDecode(e)
        })?;
    metrics::histogram!("v210_decode_time_us")
        .record(decode_start.elapsed().as_micros() as f64);

    let unpack_start = Instant::now();
    for y in 0..rows {
        let src = geometry.packed_row(&packed, y);
        if config.log_rows {
            trace!(
                row = y,
                width,
                blocks = geometry.block_count(),
                offset = y * geometry.packed_row_stride,
                "unpack row"
            );
        }
        unpack_row_into(
            src,
            luma_width,
            dst.y.row_mut(y, luma_width),
            dst.u.row_mut(y, chroma_width),
            dst.v.row_mut(y, chroma_width),
        )?;
    }
    metrics::histogram!("v210_unpack_time_us")
        .record(unpack_start.elapsed().as_micros() as f64);
    metrics::counter!("v210_frames_decoded").increment(1);

    debug!(
        stride = geometry.packed_row_stride,
        buffer = geometry.packed_buffer_size,
        "frame decoded"
    );
    Ok(geometry)
}

/// An open engine handle plus the settings used to decode with it.
///
/// The handle is returned to the engine when the session is dropped.
pub struct DecoderSession<E: DecodeEngine> {
    engine: E,
    handle: Option<E::Session>,
    config: DecoderConfig,
    frames_decoded: u64,
}

impl<E: DecodeEngine> DecoderSession<E> {
    pub fn open(engine: E, config: DecoderConfig) -> Result<Self, DecodeError> {
        let handle = engine.open().map_err(|e| {
            error!("failed to open decoding engine: {}", e);
            DecodeError::EngineOpen(e)
        })?;
        info!(threaded = config.threaded, "v210 decoder initialized");
        Ok(Self {
            engine,
            handle: Some(handle),
            config,
            frames_decoded: 0,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Decode `packet` into caller-owned planes.
    pub fn decode_into(
        &mut self,
        packet: &[u8],
        width: u32,
        height: u32,
        dst: &mut PlanarDestination<'_>,
    ) -> Result<FrameGeometry, DecodeError> {
        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| DecodeError::EngineOpen(EngineError::Open("session closed".into())))?;
        let geometry = decode_frame(
            &self.engine,
            handle,
            packet,
            width,
            height,
            dst,
            &self.config,
        )?;
        self.frames_decoded += 1;
        Ok(geometry)
    }

    /// Decode `packet` into a newly allocated frame.
    ///
    /// The frame is only allocated once the packet and geometry are known good.
    pub fn decode(
        &mut self,
        packet: &Bytes,
        width: u32,
        height: u32,
    ) -> Result<PlanarFrame, DecodeError> {
        if packet.is_empty() {
            return Err(DecodeError::InvalidPacket);
        }
        FrameGeometry::compute(width, height, self.engine.minimum_stride(width))?;
        let mut frame = PlanarFrame::new(width, height, self.config.frame_alignment)?;
        self.decode_into(packet, width, height, &mut frame.as_destination())?;
        Ok(frame)
    }
}

impl<E: DecodeEngine> Drop for DecoderSession<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.close(handle);
            debug!(frames = self.frames_decoded, "v210 decoder closed");
        }
    }
}
