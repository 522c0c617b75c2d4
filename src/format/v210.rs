//! v210 row packing and unpacking.
//!
//! Each 16-byte block holds four little-endian 32-bit words, each carrying
//! three 10-bit fields at bit offsets 0, 10 and 20:
//!
//! | word | bits 0-9 | bits 10-19 | bits 20-29 |
//! |------|----------|------------|------------|
//! | w0   | U0       | Y0         | V0         |
//! | w1   | Y1       | U1         | Y2         |
//! | w2   | V1       | Y3         | U2         |
//! | w3   | Y4       | V2         | Y5         |
//!
//! One block yields six luma samples and three U/V pairs.

use crate::error::BoundsError;
use crate::format::geometry::{block_count, chroma_width, row_span, BLOCK_BYTES};

const MASK: u32 = 0x3FF;

/// One row of planar samples, each in the low 10 bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanarRow {
    pub y: Vec<u16>,
    pub u: Vec<u16>,
    pub v: Vec<u16>,
}

/// Samples decoded from a single block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Block {
    y: [u16; 6],
    u: [u16; 3],
    v: [u16; 3],
}

#[inline(always)]
fn field(word: u32, shift: u32) -> u16 {
    ((word >> shift) & MASK) as u16
}

#[inline(always)]
fn read_block(bytes: &[u8]) -> Block {
    let word = |i: usize| {
        u32::from_le_bytes([
            bytes[i * 4],
            bytes[i * 4 + 1],
            bytes[i * 4 + 2],
            bytes[i * 4 + 3],
        ])
    };
    let (w0, w1, w2, w3) = (word(0), word(1), word(2), word(3));
    Block {
        y: [
            field(w0, 10),
            field(w1, 0),
            field(w1, 20),
            field(w2, 10),
            field(w3, 0),
            field(w3, 20),
        ],
        u: [field(w0, 0), field(w1, 10), field(w2, 20)],
        v: [field(w0, 20), field(w2, 0), field(w3, 10)],
    }
}

fn check_len(what: &'static str, needed: usize, available: usize) -> Result<(), BoundsError> {
    if available < needed {
        return Err(BoundsError {
            what,
            needed,
            available,
        });
    }
    Ok(())
}

/// Unpack `width` pixels of `packed` into freshly allocated planar samples.
pub fn unpack_row(packed: &[u8], width: usize) -> Result<PlanarRow, BoundsError> {
    let chroma = chroma_width(width);
    let mut row = PlanarRow {
        y: vec![0; width],
        u: vec![0; chroma],
        v: vec![0; chroma],
    };
    unpack_row_into(packed, width, &mut row.y, &mut row.u, &mut row.v)?;
    Ok(row)
}

/// Unpack `width` pixels of `packed` directly into destination slices.
///
/// Writes exactly `width` luma samples and `width / 2` samples to each chroma
/// slice. Every block is read in full; samples of a partial final block past
/// those counts are dropped. Nothing is read or written if any slice is too
/// short.
pub fn unpack_row_into(
    packed: &[u8],
    width: usize,
    dst_y: &mut [u16],
    dst_u: &mut [u16],
    dst_v: &mut [u16],
) -> Result<(), BoundsError> {
    let chroma = chroma_width(width);
    check_len("packed row", row_span(width), packed.len())?;
    check_len("luma row", width, dst_y.len())?;
    check_len("u row", chroma, dst_u.len())?;
    check_len("v row", chroma, dst_v.len())?;

    let dst_y = &mut dst_y[..width];
    let dst_u = &mut dst_u[..chroma];
    let dst_v = &mut dst_v[..chroma];

    let blocks = packed[..row_span(width)].chunks_exact(BLOCK_BYTES);
    for (i, bytes) in blocks.enumerate() {
        let block = read_block(bytes);

        let y_start = i * 6;
        let y_take = (width - y_start).min(6);
        dst_y[y_start..y_start + y_take].copy_from_slice(&block.y[..y_take]);

        let c_start = i * 3;
        if c_start < chroma {
            let c_take = (chroma - c_start).min(3);
            dst_u[c_start..c_start + c_take].copy_from_slice(&block.u[..c_take]);
            dst_v[c_start..c_start + c_take].copy_from_slice(&block.v[..c_take]);
        }
    }
    Ok(())
}

/// Pack planar samples into v210 blocks.
///
/// Samples are masked to 10 bits. Fields of a partial final block past
/// `width` luma / `width / 2` chroma samples are written as zero.
pub fn pack_row(
    src_y: &[u16],
    src_u: &[u16],
    src_v: &[u16],
    width: usize,
    packed: &mut [u8],
) -> Result<(), BoundsError> {
    let chroma = chroma_width(width);
    check_len("packed row", row_span(width), packed.len())?;
    check_len("luma row", width, src_y.len())?;
    check_len("u row", chroma, src_u.len())?;
    check_len("v row", chroma, src_v.len())?;

    let at = |plane: &[u16], len: usize, idx: usize| -> u32 {
        if idx < len {
            u32::from(plane[idx]) & MASK
        } else {
            0
        }
    };

    for i in 0..block_count(width) {
        let y = |k: usize| at(src_y, width, i * 6 + k);
        let u = |k: usize| at(src_u, chroma, i * 3 + k);
        let v = |k: usize| at(src_v, chroma, i * 3 + k);

        let words = [
            u(0) | (y(0) << 10) | (v(0) << 20),
            y(1) | (u(1) << 10) | (y(2) << 20),
            v(1) | (y(3) << 10) | (u(2) << 20),
            y(4) | (v(2) << 10) | (y(5) << 20),
        ];
        let block = &mut packed[i * BLOCK_BYTES..(i + 1) * BLOCK_BYTES];
        for (dst, word) in block.chunks_exact_mut(4).zip(words) {
            dst.copy_from_slice(&word.to_le_bytes());
        }
    }
    Ok(())
}
