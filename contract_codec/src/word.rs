use alloy::primitives::{Address, U256};

use crate::error::CodecError;

/// Size of one ABI word in bytes
pub const WORD_LEN: usize = 32;

const ADDRESS_OFFSET: usize = WORD_LEN - 20;

/// A single argument word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word {
    Address(Address),
    Uint(U256),
}

impl Word {
    pub fn encode(&self) -> [u8; WORD_LEN] {
        match self {
            Self::Address(address) => encode_address(address),
            Self::Uint(value) => encode_uint(*value),
        }
    }
}

impl From<Address> for Word {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<U256> for Word {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

/// Address right-aligned in the low 20 bytes
pub fn encode_address(address: &Address) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[ADDRESS_OFFSET..].copy_from_slice(address.as_slice());
    word
}

/// Big-endian magnitude, right-aligned
pub fn encode_uint(value: U256) -> [u8; WORD_LEN] {
    value.to_be_bytes::<WORD_LEN>()
}

/// A single 32-byte word borrowed out of call output
pub type WordRef<'a> = &'a [u8; WORD_LEN];

/// Borrow the `index`-th word of `data`.
pub fn word_at(data: &[u8], index: usize) -> Result<WordRef<'_>, CodecError> {
    let start = index
        .checked_mul(WORD_LEN)
        .ok_or(CodecError::ValueOverflow { field: "word index" })?;
    word_at_offset(data, start)
}

/// Borrow the word that starts at byte `start`.
pub fn word_at_offset(data: &[u8], start: usize) -> Result<WordRef<'_>, CodecError> {
    let end = start
        .checked_add(WORD_LEN)
        .ok_or(CodecError::ValueOverflow { field: "word offset" })?;
    data.get(start..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(CodecError::OutputTooShort {
            expected: end,
            actual: data.len(),
        })
}

pub fn decode_uint(word: WordRef<'_>) -> U256 {
    U256::from_be_bytes(*word)
}

pub fn decode_u64(word: WordRef<'_>, field: &'static str) -> Result<u64, CodecError> {
    u64::try_from(decode_uint(word)).map_err(|_| CodecError::ValueOverflow { field })
}

pub fn decode_address(word: WordRef<'_>) -> Address {
    Address::from_slice(&word[ADDRESS_OFFSET..])
}

/// Any nonzero low byte reads as `true`; bits above it are malformed.
pub fn decode_bool(word: WordRef<'_>) -> Result<bool, CodecError> {
    if word[..WORD_LEN - 1].iter().any(|byte| *byte != 0) {
        return Err(CodecError::InvalidBool);
    }
    Ok(word[WORD_LEN - 1] != 0)
}

/// Split a static tuple into its first `N` words.
pub fn split_words<const N: usize>(data: &[u8]) -> Result<[U256; N], CodecError> {
    let expected = N * WORD_LEN;
    if data.len() < expected {
        return Err(CodecError::OutputTooShort {
            expected,
            actual: data.len(),
        });
    }

    let mut words = [U256::ZERO; N];
    for (index, slot) in words.iter_mut().enumerate() {
        *slot = decode_uint(word_at(data, index)?);
    }
    Ok(words)
}

/// Read a dynamic-array offset out of the head word at `index`.
pub fn read_offset(data: &[u8], index: usize) -> Result<usize, CodecError> {
    let value = decode_uint(word_at(data, index)?);
    let offset = u64::try_from(value).map_err(|_| CodecError::ValueOverflow { field: "offset" })?;
    let start = usize::try_from(offset).map_err(|_| CodecError::ValueOverflow { field: "offset" })?;
    if start.checked_add(WORD_LEN).map_or(true, |end| end > data.len()) {
        return Err(CodecError::OffsetOutOfBounds {
            offset,
            len: data.len(),
        });
    }
    Ok(start)
}

/// Decode a `uint256[]` whose length word starts at byte `offset`.
pub fn decode_uint_array(data: &[u8], offset: usize) -> Result<Vec<U256>, CodecError> {
    let length_word = word_at_offset(data, offset).map_err(|_| CodecError::OffsetOutOfBounds {
        offset: offset as u64,
        len: data.len(),
    })?;
    let length = u64::try_from(decode_uint(length_word))
        .map_err(|_| CodecError::ValueOverflow { field: "array length" })?;

    let out_of_bounds = CodecError::ArrayOutOfBounds {
        length,
        len: data.len(),
    };
    let body_start = offset + WORD_LEN;
    let end = usize::try_from(length)
        .ok()
        .and_then(|count| count.checked_mul(WORD_LEN))
        .and_then(|body| body.checked_add(body_start))
        .ok_or_else(|| out_of_bounds.clone())?;
    if end > data.len() {
        return Err(out_of_bounds);
    }

    (body_start..end)
        .step_by(WORD_LEN)
        .map(|start| word_at_offset(data, start).map(decode_uint))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint_word(value: u64) -> [u8; WORD_LEN] {
        encode_uint(U256::from(value))
    }

    #[test]
    fn test_address_is_right_aligned() {
        let address: Address = "0x8def68408bc96553003094180e5c90d9fe5b88c1".parse().unwrap();
        let word = encode_address(&address);
        assert!(word[..12].iter().all(|b| *b == 0));
        assert_eq!(&word[12..], address.as_slice());
        assert_eq!(decode_address(&word), address);
    }

    #[test]
    fn test_uint_is_big_endian() {
        let word = uint_word(0x0102);
        assert_eq!(word[30], 0x01);
        assert_eq!(word[31], 0x02);
        assert!(word[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_split_words_rejects_short_output() {
        let data = [0u8; 95];
        assert_eq!(
            split_words::<3>(&data),
            Err(CodecError::OutputTooShort {
                expected: 96,
                actual: 95
            })
        );
        for len in 0..96 {
            assert!(split_words::<3>(&vec![0xff; len]).is_err());
        }
    }

    #[test]
    fn test_split_words_ignores_trailing_bytes() {
        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(7));
        data.extend_from_slice(&uint_word(9));
        data.push(0xaa);
        assert_eq!(split_words::<2>(&data).unwrap(), [U256::from(7), U256::from(9)]);
    }

    #[test]
    fn test_decode_bool() {
        assert_eq!(decode_bool(&uint_word(1)), Ok(true));
        assert_eq!(decode_bool(&uint_word(0)), Ok(false));
        assert_eq!(decode_bool(&uint_word(2)), Ok(true));
        assert_eq!(decode_bool(&uint_word(0x100)), Err(CodecError::InvalidBool));
    }

    #[test]
    fn test_word_at_handles_odd_buffers() {
        for len in [0usize, 5, 12, 31] {
            assert_eq!(
                word_at(&vec![0x01; len], 0),
                Err(CodecError::OutputTooShort {
                    expected: 32,
                    actual: len
                })
            );
        }

        // extra bytes past the word are left alone
        let long = [0x01u8; 33];
        let word = word_at(&long, 0).unwrap();
        assert_eq!(decode_uint(word), U256::from_be_bytes([0x01; WORD_LEN]));
        assert_eq!(decode_bool(word), Err(CodecError::InvalidBool));
        assert_eq!(decode_address(word), Address::new([0x01; 20]));
        assert!(word_at(&long, 1).is_err());
    }

    #[test]
    fn test_decode_u64_overflow() {
        let word = encode_uint(U256::from(u64::MAX) + U256::from(1));
        assert_eq!(
            decode_u64(&word, "startTime"),
            Err(CodecError::ValueOverflow { field: "startTime" })
        );
        assert_eq!(decode_u64(&uint_word(42), "startTime"), Ok(42));
    }

    fn array_buffer(offset: u64, elements: &[u64]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&uint_word(offset));
        while (data.len() as u64) < offset {
            data.push(0);
        }
        data.extend_from_slice(&uint_word(elements.len() as u64));
        for element in elements {
            data.extend_from_slice(&uint_word(*element));
        }
        data
    }

    #[test]
    fn test_dynamic_array_exact_length() {
        for offset in [32u64, 64, 96] {
            let elements = [5u64, 1, 9, 3];
            let data = array_buffer(offset, &elements);
            assert_eq!(data.len() as u64, offset + 32 + 32 * elements.len() as u64);

            let start = read_offset(&data, 0).unwrap();
            let decoded = decode_uint_array(&data, start).unwrap();
            let expected: Vec<U256> = elements.iter().map(|e| U256::from(*e)).collect();
            assert_eq!(decoded, expected);
        }
    }

    #[test]
    fn test_dynamic_array_one_byte_short() {
        let data = array_buffer(32, &[1, 2, 3]);
        let truncated = &data[..data.len() - 1];
        let start = read_offset(truncated, 0).unwrap();
        assert_eq!(
            decode_uint_array(truncated, start),
            Err(CodecError::ArrayOutOfBounds { length: 3, len: 159 })
        );
    }

    #[test]
    fn test_empty_dynamic_array() {
        let data = array_buffer(32, &[]);
        assert_eq!(decode_uint_array(&data, 32).unwrap(), Vec::<U256>::new());
    }

    #[test]
    fn test_offset_outside_buffer() {
        let data = array_buffer(32, &[1]);
        let mut bad = data.clone();
        bad[..32].copy_from_slice(&uint_word(4096));
        assert_eq!(
            read_offset(&bad, 0),
            Err(CodecError::OffsetOutOfBounds {
                offset: 4096,
                len: bad.len()
            })
        );

        bad[..32].copy_from_slice(&encode_uint(U256::MAX));
        assert_eq!(
            read_offset(&bad, 0),
            Err(CodecError::ValueOverflow { field: "offset" })
        );
    }

    #[test]
    fn test_overflowing_array_length() {
        let mut data = array_buffer(32, &[1]);
        data[32..64].copy_from_slice(&encode_uint(U256::from(u64::MAX)));
        assert!(matches!(
            decode_uint_array(&data, 32),
            Err(CodecError::ArrayOutOfBounds { .. })
        ));

        data[32..64].copy_from_slice(&encode_uint(U256::MAX));
        assert_eq!(
            decode_uint_array(&data, 32),
            Err(CodecError::ValueOverflow { field: "array length" })
        );
    }
}
