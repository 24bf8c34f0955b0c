//! CRC-16-CCITT used for the optional H5 Data Integrity Check (DIC).
//!
//! The DIC is computed over the 4 header bytes followed by the payload, using the CCITT polynomial
//! `x^16 + x^12 + x^5 + 1` in its bit-reflected form, an initial value of `0xFFFF`, and no final
//! XOR (the `CRC-16/MCRF4XX` parameters). The resulting register is bit-reversed and appended to
//! the payload MSB first.

use crc::{Crc, Digest, CRC_16_MCRF4XX};

static DIC: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Incremental Data Integrity Check computation.
pub struct Crc16 {
    digest: Digest<'static, u16>,
}

impl Crc16 {
    /// Starts a new computation.
    pub fn new() -> Self {
        Self {
            digest: DIC.digest(),
        }
    }

    /// Feeds `data` into the computation.
    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    /// Returns the DIC value to put on the wire.
    pub fn finish(self) -> u16 {
        self.digest.finalize().reverse_bits()
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the Data Integrity Check over a frame's header and payload.
pub fn data_integrity_check(header: &[u8], payload: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(header);
    crc.update(payload);
    crc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitwise(data: &[u8]) -> u16 {
        let mut crc = 0xffff_u16;
        for &byte in data {
            crc ^= u16::from(byte);
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ 0x8408
                } else {
                    crc >> 1
                };
            }
        }
        crc.reverse_bits()
    }

    #[test]
    fn check_value() {
        assert_eq!(data_integrity_check(b"1234", b"56789"), 0x89f6);
        assert_eq!(data_integrity_check(&[], &[]), 0xffff);
    }

    #[test]
    fn matches_bitwise_register() {
        let data = [0xc0, 0xdb, 0x00, 0xff, 0x01, 0x7e, 0x55, 0xaa];
        for len in 0..=data.len() {
            assert_eq!(data_integrity_check(&data[..len], &[]), bitwise(&data[..len]));
        }
    }

    #[test]
    fn split_is_irrelevant() {
        let data = b"\x81\xa4\x00\xda0123456789";
        let whole = data_integrity_check(data, &[]);
        for split in 0..=data.len() {
            let (header, payload) = data.split_at(split);
            assert_eq!(data_integrity_check(header, payload), whole);
        }
    }
}
