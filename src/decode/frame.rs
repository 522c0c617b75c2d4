use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::format::geometry::{align_up, chroma_width};

/// Planar output formats produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 10-bit 4:2:2, three planes of 16-bit little-endian words.
    Yuv422p10,
}

impl PixelFormat {
    pub fn plane_count(self) -> usize {
        match self {
            PixelFormat::Yuv422p10 => 3,
        }
    }

    pub fn bit_depth(self) -> u32 {
        match self {
            PixelFormat::Yuv422p10 => 10,
        }
    }
}

/// A mutable plane of 16-bit samples with a row stride in samples.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    pub data: &'a mut [u16],
    pub stride: usize,
}

impl<'a> PlaneMut<'a> {
    pub fn new(data: &'a mut [u16], stride: usize) -> Self {
        Self { data, stride }
    }

    /// Samples needed to hold `rows` rows of `row_len` samples.
    fn required(&self, rows: usize, row_len: usize) -> Option<usize> {
        if rows == 0 {
            return Some(0);
        }
        self.stride.checked_mul(rows - 1)?.checked_add(row_len)
    }

    pub(crate) fn row_mut(&mut self, y: usize, row_len: usize) -> &mut [u16] {
        let start = y * self.stride;
        &mut self.data[start..start + row_len]
    }
}

/// Caller-owned luma and chroma planes a frame is decoded into.
///
/// Strides are in samples and may differ from the packed row stride.
#[derive(Debug)]
pub struct PlanarDestination<'a> {
    pub y: PlaneMut<'a>,
    pub u: PlaneMut<'a>,
    pub v: PlaneMut<'a>,
}

impl<'a> PlanarDestination<'a> {
    pub fn new(y: PlaneMut<'a>, u: PlaneMut<'a>, v: PlaneMut<'a>) -> Self {
        Self { y, u, v }
    }

    /// Check every plane can hold `height` rows of a `width` pixel frame.
    pub fn validate(&self, width: usize, height: usize) -> Result<(), DecodeError> {
        let chroma = chroma_width(width);
        let planes = [
            ("luma", &self.y, width),
            ("u", &self.u, chroma),
            ("v", &self.v, chroma),
        ];
        for (plane, dst, row_len) in planes {
            if dst.stride < row_len {
                return Err(DecodeError::Destination {
                    plane,
                    needed: row_len,
                    available: dst.stride,
                });
            }
            let needed = dst
                .required(height, row_len)
                .ok_or(DecodeError::Destination {
                    plane,
                    needed: usize::MAX,
                    available: dst.data.len(),
                })?;
            if dst.data.len() < needed {
                return Err(DecodeError::Destination {
                    plane,
                    needed,
                    available: dst.data.len(),
                });
            }
        }
        Ok(())
    }
}

/// An owned yuv422p10 frame with row-aligned planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarFrame {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub y: Vec<u16>,
    pub u: Vec<u16>,
    pub v: Vec<u16>,
    pub luma_stride: usize,
    pub chroma_stride: usize,
}

impl PlanarFrame {
    /// Allocate a zeroed frame whose rows start on `alignment`-byte boundaries.
    pub fn new(width: u32, height: u32, alignment: usize) -> Result<Self, DecodeError> {
        let alignment = alignment
            .max(2)
            .checked_next_power_of_two()
            .ok_or(DecodeError::Allocation { bytes: usize::MAX })?;
        let stride_for = |samples: usize| -> Result<usize, DecodeError> {
            let bytes = samples
                .checked_mul(2)
                .and_then(|b| align_up(b, alignment))
                .ok_or(DecodeError::Allocation { bytes: usize::MAX })?;
            Ok(bytes / 2)
        };
        let luma_stride = stride_for(width as usize)?;
        let chroma_stride = stride_for(chroma_width(width as usize))?;
        let rows = height as usize;

        Ok(Self {
            format: PixelFormat::Yuv422p10,
            width,
            height,
            y: alloc_plane(luma_stride, rows)?,
            u: alloc_plane(chroma_stride, rows)?,
            v: alloc_plane(chroma_stride, rows)?,
            luma_stride,
            chroma_stride,
        })
    }

    /// Borrow the frame as a decode destination.
    pub fn as_destination(&mut self) -> PlanarDestination<'_> {
        PlanarDestination {
            y: PlaneMut::new(&mut self.y, self.luma_stride),
            u: PlaneMut::new(&mut self.u, self.chroma_stride),
            v: PlaneMut::new(&mut self.v, self.chroma_stride),
        }
    }

    /// Visible luma samples of row `y`.
    pub fn luma_row(&self, y: usize) -> &[u16] {
        let start = y * self.luma_stride;
        &self.y[start..start + self.width as usize]
    }

    /// Visible U and V samples of row `y`.
    pub fn chroma_rows(&self, y: usize) -> (&[u16], &[u16]) {
        let start = y * self.chroma_stride;
        let len = chroma_width(self.width as usize);
        (&self.u[start..start + len], &self.v[start..start + len])
    }
}

fn alloc_plane(stride: usize, rows: usize) -> Result<Vec<u16>, DecodeError> {
    let len = stride
        .checked_mul(rows)
        .ok_or(DecodeError::Allocation { bytes: usize::MAX })?;
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(len)
        .map_err(|_| DecodeError::Allocation {
            bytes: len.saturating_mul(2),
        })?;
    plane.resize(len, 0);
    Ok(plane)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rows_are_aligned() {
        let frame = PlanarFrame::new(1920, 4, 32).unwrap();
        assert_eq!(frame.luma_stride, 1920);
        assert_eq!(frame.chroma_stride, 960);

        let frame = PlanarFrame::new(10, 2, 32).unwrap();
        assert_eq!(frame.luma_stride * 2 % 32, 0);
        assert_eq!(frame.luma_stride, 16);
        assert_eq!(frame.chroma_stride, 16);
        assert_eq!(frame.y.len(), 32);
        assert_eq!(frame.luma_row(1).len(), 10);
        assert_eq!(frame.chroma_rows(1).0.len(), 5);
    }

    #[test]
    fn oversized_alignment_is_an_allocation_error() {
        let err = PlanarFrame::new(6, 1, usize::MAX / 2 + 2).unwrap_err();
        assert!(matches!(err, DecodeError::Allocation { .. }));

        let frame = PlanarFrame::new(6, 1, 24).unwrap();
        assert_eq!(frame.luma_stride, 16);
    }

    #[test]
    fn destination_too_small_is_rejected() {
        let mut y = vec![0u16; 11];
        let mut u = vec![0u16; 8];
        let mut v = vec![0u16; 8];
        let dst = PlanarDestination::new(
            PlaneMut::new(&mut y, 6),
            PlaneMut::new(&mut u, 4),
            PlaneMut::new(&mut v, 4),
        );
        let err = dst.validate(6, 2).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Destination {
                plane: "luma",
                needed: 12,
                available: 11
            }
        ));
        assert!(dst.validate(6, 1).is_ok());
    }

    #[test]
    fn stride_narrower_than_row_is_rejected() {
        let mut y = vec![0u16; 64];
        let mut u = vec![0u16; 64];
        let mut v = vec![0u16; 64];
        let dst = PlanarDestination::new(
            PlaneMut::new(&mut y, 8),
            PlaneMut::new(&mut u, 2),
            PlaneMut::new(&mut v, 4),
        );
        assert!(matches!(
            dst.validate(8, 2),
            Err(DecodeError::Destination { plane: "u", .. })
        ));
    }

    #[test]
    fn yuv422p10_descriptor() {
        assert_eq!(PixelFormat::Yuv422p10.plane_count(), 3);
        assert_eq!(PixelFormat::Yuv422p10.bit_depth(), 10);
    }
}
