//! Compact printable codes for sequences of small integers.
//!
//! ## Format
//!
//! `"<N>-<payload>"` where every value is below `N` and the payload is:
//!
//! 1. each value as a fixed-width, most-significant-bit-first field of
//!    [`field_width`]`(N)` bits, concatenated in order;
//! 2. zero bits appended up to a whole number of bytes;
//! 3. those bytes in unpadded URL-safe base64.
//!
//! The field count is not stored: callers know it from `N` (an instance has
//! `2N²` fields, a matching `3N`), so decoding takes it as a function of the
//! size read from the prefix.
//!
//! ## Example
//!
//! ```
//! use stable_marriage::codec::Codec;
//!
//! let code = Codec::new(5).encode(&[4, 0, 3, 1, 2]);
//! assert_eq!(code, "5-gZQ");
//!
//! let (codec, values) = Codec::decode(&code, |n| n).unwrap();
//! assert_eq!(codec.size(), 5);
//! assert_eq!(values, vec![4, 0, 3, 1, 2]);
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::{MatchError, Result};

/// Separator between the size prefix and the payload.
pub const SEPARATOR: char = '-';

/// Minimal number of bits `w` such that `2^w >= size`.
pub fn field_width(size: usize) -> u32 {
    if size <= 1 {
        0
    } else {
        usize::BITS - (size - 1).leading_zeros()
    }
}

/// Encoder/decoder bound to one size `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    size: usize,
    width: u32,
}

impl Codec {
    /// Codec for values in `[0, size)`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            width: field_width(size),
        }
    }

    /// The `N` this codec was built for.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bits per field.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Encode `values` as `"<N>-<payload>"`.
    ///
    /// Values must be below `N`; higher bits of larger values are dropped.
    pub fn encode(&self, values: &[usize]) -> String {
        let mut bits = BitWriter::with_capacity(values.len() * self.width as usize);
        for &value in values {
            debug_assert!(value < self.size.max(1), "value {value} does not fit size {}", self.size);
            bits.push(value, self.width);
        }
        format!("{}{}{}", self.size, SEPARATOR, URL_SAFE_NO_PAD.encode(bits.finish()))
    }

    /// Decode a code produced by [`Codec::encode`].
    ///
    /// `fields` maps the size read from the prefix to the number of values the
    /// payload must hold. Fails with [`MatchError::MalformedCode`] when the
    /// prefix is not a number, the separator is missing, the payload is not
    /// unpadded base64url, its byte length does not match the field count, or
    /// a value is not below `N`.
    pub fn decode<F>(code: &str, fields: F) -> Result<(Codec, Vec<usize>)>
    where
        F: FnOnce(usize) -> usize,
    {
        let (prefix, payload) = code
            .split_once(SEPARATOR)
            .ok_or_else(|| MatchError::malformed(code, "missing `-` separator"))?;
        let size: usize = prefix
            .parse()
            .map_err(|_| MatchError::malformed(code, format!("size `{prefix}` is not a number")))?;
        let codec = Codec::new(size);
        let count = fields(size);

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| MatchError::malformed(code, format!("bad payload: {e}")))?;
        let expected = count
            .checked_mul(codec.width as usize)
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(|| MatchError::malformed(code, "size too large"))?;
        if bytes.len() != expected {
            return Err(MatchError::malformed(
                code,
                format!("payload holds {} bytes, expected {expected}", bytes.len()),
            ));
        }

        let mut reader = BitReader::new(&bytes);
        let mut values = Vec::with_capacity(count);
        for position in 0..count {
            let value = reader.read(codec.width);
            if value >= size {
                return Err(MatchError::malformed(
                    code,
                    format!("value {value} at position {position} is not below {size}"),
                ));
            }
            values.push(value);
        }

        Ok((codec, values))
    }
}

// ============================================================================
// Bit packing
// ============================================================================

/// MSB-first bit accumulator.
struct BitWriter {
    bytes: Vec<u8>,
    used: u32,
}

impl BitWriter {
    fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            used: 8,
        }
    }

    fn push(&mut self, value: usize, width: u32) {
        for bit in (0..width).rev() {
            if self.used == 8 {
                self.bytes.push(0);
                self.used = 0;
            }
            if (value >> bit) & 1 == 1 {
                if let Some(last) = self.bytes.last_mut() {
                    *last |= 0x80 >> self.used;
                }
            }
            self.used += 1;
        }
    }

    /// The packed bytes; the last one is zero-padded on the right.
    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Next `width` bits as an integer. Reads past the end yield zero bits.
    fn read(&mut self, width: u32) -> usize {
        let mut value = 0usize;
        for _ in 0..width {
            let byte = self.bytes.get(self.position / 8).copied().unwrap_or(0);
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | usize::from(bit);
            self.position += 1;
        }
        value
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
