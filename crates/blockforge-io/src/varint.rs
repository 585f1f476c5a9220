//! LEB128-style unsigned varints as stored in schematic `BlockData`.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VarIntError {
    #[error("varint starting at byte {offset} is truncated")]
    Truncated { offset: usize },
    #[error("varint starting at byte {offset} does not fit in 32 bits")]
    Overflow { offset: usize },
}

/// Appends `value` as 7-bit groups, low group first; high bit set on all but the last.
pub fn encode_varint(mut value: u32, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

pub fn encode_varints(values: impl IntoIterator<Item = u32>) -> Vec<u8> {
    let mut out = Vec::new();
    for v in values {
        encode_varint(v, &mut out);
    }
    out
}

/// Reinterprets each byte as two's-complement `i8` (NBT byte arrays are signed).
pub fn to_signed_bytes(bytes: Vec<u8>) -> Vec<i8> {
    bytes.into_iter().map(|b| b as i8).collect()
}

pub fn decode_varints(data: &[i8]) -> Result<Vec<u32>, VarIntError> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let offset = i;
        let mut acc: u64 = 0;
        let mut shift = 0u32;
        loop {
            let Some(&b) = data.get(i) else {
                return Err(VarIntError::Truncated { offset });
            };
            let b = b as u8;
            i += 1;
            acc |= u64::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(VarIntError::Overflow { offset });
            }
        }
        let v = u32::try_from(acc).map_err(|_| VarIntError::Overflow { offset })?;
        out.push(v);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_take_one_byte() {
        assert_eq!(encode_varints([0, 1, 127]), vec![0, 1, 127]);
    }

    #[test]
    fn three_hundred() {
        let bytes = encode_varints([300]);
        assert_eq!(bytes, vec![0xAC, 0x02]);
        assert_eq!(to_signed_bytes(bytes), vec![-84, 2]);
        assert_eq!(decode_varints(&[-84, 2]), Ok(vec![300]));
    }

    #[test]
    fn max_u32_uses_five_bytes() {
        let bytes = encode_varints([u32::MAX]);
        assert_eq!(bytes.len(), 5);
        assert_eq!(decode_varints(&to_signed_bytes(bytes)), Ok(vec![u32::MAX]));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(
            decode_varints(&[5, -128]),
            Err(VarIntError::Truncated { offset: 1 })
        );
        // Fifth byte carries bits above 32.
        assert_eq!(
            decode_varints(&[-1, -1, -1, -1, 0x1F]),
            Err(VarIntError::Overflow { offset: 0 })
        );
        assert_eq!(
            decode_varints(&[-1, -1, -1, -1, -1, 1]),
            Err(VarIntError::Overflow { offset: 0 })
        );
    }
}
