//! Byte-string bitmap helpers shared by the backends.

use crate::error::{Result, StoreError};

/// Highest addressable bit offset (a 512 MiB string).
pub const MAX_BIT_OFFSET: u64 = (1 << 32) - 1;

/// Largest bitmap, in bits, a value can hold.
pub const MAX_BITS: u64 = MAX_BIT_OFFSET + 1;

/// Byte index and mask for an offset.
pub fn locate(offset: u64) -> Result<(usize, u8)> {
    if offset > MAX_BIT_OFFSET {
        return Err(StoreError::OffsetOutOfRange {
            offset,
            max: MAX_BIT_OFFSET,
        });
    }
    let byte = usize::try_from(offset / 8).map_err(|_| StoreError::OffsetOutOfRange {
        offset,
        max: MAX_BIT_OFFSET,
    })?;
    Ok((byte, 0x80 >> (offset % 8)))
}

/// Check every offset before touching a value, so a batch fails whole.
pub fn locate_all(offsets: &[u64]) -> Result<Vec<(usize, u8)>> {
    offsets.iter().map(|&o| locate(o)).collect()
}

/// Set located bits, zero-extending the value as needed.
pub fn set_located(value: &mut Vec<u8>, located: &[(usize, u8)]) {
    if let Some(max_byte) = located.iter().map(|(byte, _)| *byte).max() {
        if value.len() <= max_byte {
            value.resize(max_byte + 1, 0);
        }
    }
    for &(byte, mask) in located {
        value[byte] |= mask;
    }
}

/// Read one bit; bytes past the end read as zero.
pub fn get(value: &[u8], offset: u64) -> Result<bool> {
    let (byte, mask) = locate(offset)?;
    Ok(value.get(byte).is_some_and(|b| b & mask != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_layout() {
        let mut value = Vec::new();
        set_located(&mut value, &locate_all(&[0, 7, 9]).unwrap());
        assert_eq!(value, vec![0b1000_0001, 0b0100_0000]);
    }

    #[test]
    fn test_get_past_end_is_zero() {
        assert!(!get(&[0xff], 8).unwrap());
        assert!(get(&[0xff], 7).unwrap());
        assert!(!get(&[], 0).unwrap());
    }

    #[test]
    fn test_offset_limit() {
        assert!(locate(MAX_BIT_OFFSET).is_ok());
        assert!(matches!(
            locate(MAX_BIT_OFFSET + 1),
            Err(StoreError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn test_existing_bytes_preserved() {
        let mut value = b"ab".to_vec();
        set_located(&mut value, &locate_all(&[31]).unwrap());
        assert_eq!(value, vec![b'a', b'b', 0, 1]);
    }
}
