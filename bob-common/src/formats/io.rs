//! Little-endian read helpers over a byte cursor
//!
//! Every short read is reported as [`MeshError::Truncated`] with the byte count
//! the read needed and the buffer's actual length.

use std::io::{Cursor, Read};

use crate::error::MeshError;

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N], MeshError> {
    let start = cursor.position() as usize;
    let mut buf = [0u8; N];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| MeshError::Truncated {
            expected: start + N,
            actual: cursor.get_ref().len(),
        })?;
    Ok(buf)
}

pub(crate) fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, MeshError> {
    Ok(read_array::<1>(cursor)?[0])
}

pub(crate) fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, MeshError> {
    Ok(u16::from_le_bytes(read_array(cursor)?))
}

pub(crate) fn read_i16(cursor: &mut Cursor<&[u8]>) -> Result<i16, MeshError> {
    Ok(i16::from_le_bytes(read_array(cursor)?))
}

pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, MeshError> {
    Ok(u32::from_le_bytes(read_array(cursor)?))
}

pub(crate) fn read_f32(cursor: &mut Cursor<&[u8]>) -> Result<f32, MeshError> {
    Ok(f32::from_le_bytes(read_array(cursor)?))
}

pub(crate) fn read_f32x3(cursor: &mut Cursor<&[u8]>) -> Result<[f32; 3], MeshError> {
    Ok([read_f32(cursor)?, read_f32(cursor)?, read_f32(cursor)?])
}

pub(crate) fn skip(cursor: &mut Cursor<&[u8]>, count: usize) -> Result<(), MeshError> {
    let start = cursor.position() as usize;
    let end = start + count;
    if end > cursor.get_ref().len() {
        return Err(MeshError::Truncated {
            expected: end,
            actual: cursor.get_ref().len(),
        });
    }
    cursor.set_position(end as u64);
    Ok(())
}

/// Fail unless `data` holds at least `header + counts.map(count * size)` bytes
///
/// Checked before allocating so bogus counts cannot trigger huge allocations.
pub(crate) fn ensure_len(
    data: &[u8],
    header: usize,
    counts: &[(u32, usize)],
) -> Result<(), MeshError> {
    let expected = counts
        .iter()
        .try_fold(header, |total, &(count, size)| {
            (count as usize)
                .checked_mul(size)
                .and_then(|bytes| total.checked_add(bytes))
        })
        .unwrap_or(usize::MAX);

    if data.len() < expected {
        return Err(MeshError::Truncated {
            expected,
            actual: data.len(),
        });
    }
    if data.len() > expected {
        tracing::debug!("ignoring {} trailing bytes", data.len() - expected);
    }
    Ok(())
}

/// Append a position or normal as three little-endian f32s
pub(crate) fn put_f32x3(out: &mut Vec<u8>, value: [f32; 3]) {
    for component in value {
        out.extend_from_slice(&component.to_le_bytes());
    }
}
