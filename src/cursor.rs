//! Bounds-checked cursor over a packet buffer.
//!
//! Every field read in this crate goes through [`ByteCursor`], which couples
//! each little-endian extraction to an explicit bounds check. Manual offset
//! bookkeeping with repeated `offset += width` is how silent over-reads creep
//! into packed-format parsers; the cursor keeps the check and the advance in
//! one place.
//!
//! A failed read leaves the cursor where it was, so the reported offset in
//! the error names the exact field that fell off the end of the buffer.

use crate::{DecodeError, Result};

/// Cursor over a byte slice providing bounds-checked little-endian reads.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Create a cursor positioned at `offset` within `bytes`.
    ///
    /// The offset may point past the end of the buffer; the first read will
    /// then fail with the out-of-range position in its error.
    pub fn at(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    /// Current absolute offset within the buffer.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Number of bytes remaining from the cursor position to the end.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.offset.checked_add(N).ok_or_else(|| {
            DecodeError::out_of_bounds(self.offset, N, self.bytes.len())
        })?;
        if end > self.bytes.len() {
            return Err(DecodeError::out_of_bounds(self.offset, N, self.bytes.len()));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..end]);
        self.offset = end;
        Ok(out)
    }

    /// Read a `u8` and advance by 1.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    /// Read a little-endian `u16` and advance by 2.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    /// Read a little-endian `u32` and advance by 4.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    /// Read a little-endian `u64` and advance by 8.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take::<8>()?))
    }

    /// Read a little-endian `f32` and advance by 4.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take::<4>()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reads_advance_in_field_order() {
        let data = [0x34, 0x12, 0xFF, 0x78, 0x56, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.len(), 7);
        assert!(!cursor.is_empty());

        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read_u8().unwrap(), 0xFF);
        assert_eq!(cursor.read_u32().unwrap(), 0x12345678);
        assert_eq!(cursor.position(), 7);
        assert_eq!(cursor.remaining(), 0);
        // Consuming the cursor never shrinks the underlying buffer length
        assert_eq!(cursor.len(), 7);
    }

    #[test]
    fn empty_buffer_reports_empty_and_fails_every_read() {
        let mut cursor = ByteCursor::new(&[]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.len(), 0);
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.read_u8().is_err());
    }

    #[test]
    fn failed_read_does_not_advance() {
        let data = [0xAB, 0xCD];
        let mut cursor = ByteCursor::new(&data);

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(err, DecodeError::OutOfBounds { offset: 0, needed: 4, available: 2 });
        assert_eq!(cursor.position(), 0);

        // The shorter read at the same position still succeeds
        assert_eq!(cursor.read_u16().unwrap(), 0xCDAB);
    }

    #[test]
    fn cursor_at_offset_past_end_fails_with_that_offset() {
        let data = [0u8; 4];
        let mut cursor = ByteCursor::at(&data, 10);

        match cursor.read_u8().unwrap_err() {
            DecodeError::OutOfBounds { offset, needed, available } => {
                assert_eq!(offset, 10);
                assert_eq!(needed, 1);
                assert_eq!(available, 4);
            }
        }
    }

    #[test]
    fn f32_round_trips_through_le_bytes() {
        let bytes = 42.5f32.to_le_bytes();
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_f32().unwrap(), 42.5);
    }

    #[test]
    fn u64_reads_little_endian() {
        let bytes = 0x0102_0304_0506_0708u64.to_le_bytes();
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_u64().unwrap(), 0x0102_0304_0506_0708);
    }

    proptest! {
        #[test]
        fn read_succeeds_iff_width_fits(
            data in prop::collection::vec(any::<u8>(), 0..32),
            offset in 0usize..40usize
        ) {
            let mut cursor = ByteCursor::at(&data, offset);
            let result = cursor.read_u32();

            if offset + 4 <= data.len() {
                prop_assert!(result.is_ok());
                prop_assert_eq!(cursor.position(), offset + 4);
            } else {
                prop_assert_eq!(
                    result.unwrap_err(),
                    DecodeError::OutOfBounds { offset, needed: 4, available: data.len() }
                );
                prop_assert_eq!(cursor.position(), offset);
            }
        }

        #[test]
        fn decoded_values_match_from_le_bytes(value in any::<u32>()) {
            let bytes = value.to_le_bytes();
            let mut cursor = ByteCursor::new(&bytes);
            prop_assert_eq!(cursor.read_u32().unwrap(), value);
        }
    }
}
