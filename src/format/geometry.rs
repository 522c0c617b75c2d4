//! Packed-row stride and buffer sizing for v210 frames.

use crate::error::GeometryError;

/// Row strides handed to the engine are aligned to this many bytes.
pub const STRIDE_ALIGNMENT: usize = 16;

/// Bytes in one v210 block (four 32-bit words).
pub const BLOCK_BYTES: usize = 16;

/// Luma samples carried by one block.
pub const PIXELS_PER_BLOCK: usize = 6;

/// Number of 16-byte blocks covering `width` pixels.
#[inline]
pub fn block_count(width: usize) -> usize {
    width.div_ceil(PIXELS_PER_BLOCK)
}

/// Bytes a packed row must hold to cover `width` pixels.
#[inline]
pub fn row_span(width: usize) -> usize {
    block_count(width) * BLOCK_BYTES
}

/// Samples per row in each of the U and V planes.
#[inline]
pub fn chroma_width(width: usize) -> usize {
    width / 2
}

#[inline]
pub(crate) fn align_up(value: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    value
        .checked_add(alignment - 1)
        .map(|v| v & !(alignment - 1))
}

/// Sizing contract for one packed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    /// Byte distance between packed rows; a multiple of [`STRIDE_ALIGNMENT`].
    pub packed_row_stride: usize,
    /// `packed_row_stride * height`.
    pub packed_buffer_size: usize,
}

impl FrameGeometry {
    /// Compute the geometry for a `width` x `height` frame.
    ///
    /// `reported_minimum_stride` is the engine's own answer to "how many bytes
    /// does a row of this width need"; it is rounded up, never corrected.
    pub fn compute(
        width: u32,
        height: u32,
        reported_minimum_stride: i64,
    ) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        let invalid_stride = GeometryError::InvalidStride {
            width,
            stride: reported_minimum_stride,
        };
        if reported_minimum_stride <= 0 {
            return Err(invalid_stride);
        }
        let minimum = usize::try_from(reported_minimum_stride).map_err(|_| invalid_stride)?;
        let packed_row_stride =
            align_up(minimum, STRIDE_ALIGNMENT).ok_or(GeometryError::Overflow {
                stride: minimum,
                height,
            })?;
        let packed_buffer_size = packed_row_stride
            .checked_mul(height as usize)
            .ok_or(GeometryError::Overflow {
                stride: packed_row_stride,
                height,
            })?;

        Ok(Self {
            width,
            height,
            packed_row_stride,
            packed_buffer_size,
        })
    }

    pub fn luma_width(&self) -> usize {
        self.width as usize
    }

    pub fn chroma_width(&self) -> usize {
        chroma_width(self.width as usize)
    }

    pub fn block_count(&self) -> usize {
        block_count(self.width as usize)
    }

    /// Packed bytes of row `y`, bounded by the row stride.
    pub fn packed_row<'a>(&self, buffer: &'a [u8], y: usize) -> &'a [u8] {
        let start = y * self.packed_row_stride;
        let end = (start + self.packed_row_stride).min(buffer.len());
        &buffer[start.min(end)..end]
    }
}
