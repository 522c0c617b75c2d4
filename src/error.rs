//! Error types for geometry, unpacking and frame decoding.

use thiserror::Error;

/// Invalid frame dimensions or an unusable stride reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("engine reported invalid minimum row stride {stride} for width {width}")]
    InvalidStride { width: u32, stride: i64 },

    #[error("packed buffer size overflows for stride {stride} x {height} rows")]
    Overflow { stride: usize, height: u32 },
}

/// A packed row or destination slice is too short for the requested width.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} holds {available} elements, {needed} required")]
pub struct BoundsError {
    pub what: &'static str,
    pub needed: usize,
    pub available: usize,
}

/// Failure reported by the external decoding engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine could not be opened: {0}")]
    Open(String),

    #[error("engine decode failed with status {0}")]
    Status(i32),

    #[error("engine rejected the bitstream: {0}")]
    Rejected(String),
}

/// Errors surfaced by [`decode_frame`](crate::decode::decode_frame).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid packet: empty bitstream")]
    InvalidPacket,

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("failed to allocate {bytes} byte decode buffer")]
    Allocation { bytes: usize },

    #[error("destination {plane} plane holds {available} samples, {needed} required")]
    Destination {
        plane: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("failed to open decoding engine: {0}")]
    EngineOpen(EngineError),

    #[error("external decode failed: {0}")]
    ExternalDecode(EngineError),

    #[error(transparent)]
    Bounds(#[from] BoundsError),
}
