pub mod geometry;
pub mod v210;

pub use geometry::{block_count, chroma_width, row_span, FrameGeometry};
pub use v210::{pack_row, unpack_row, unpack_row_into, PlanarRow};
