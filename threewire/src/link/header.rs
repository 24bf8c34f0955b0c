//! The 4-byte H5 packet header.

use crate::link::SeqNum;
use byteorder::{ByteOrder, LittleEndian};
use core::fmt;

/// Size of an encoded [`Header`] in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest payload length representable in the 12-bit `Length` field.
pub const MAX_PAYLOAD_LEN: usize = 0xfff;

/// 4-byte header preceding every H5 payload.
///
/// The first 3 bytes are a little-endian bitfield, the 4th byte is a checksum:
///
/// ```notrust
/// LSB                                                                        MSB
/// +----------+----------+----------+----------+----------+-----------+------------+
/// |   Seq    |   Ack    |   DIC    |   Rel    |   Type   |  Length   |  Checksum  |
/// | (3 bits) | (3 bits) | (1 bit)  | (1 bit)  | (4 bits) | (12 bits) |  (8 bits)  |
/// +----------+----------+----------+----------+----------+-----------+------------+
/// ```
///
/// The checksum is chosen so that all 4 header bytes add up to `0xFF` (mod 256). A header with a
/// bad checksum means the whole frame is discarded without any response.
///
/// `Seq` is the sequence number of a reliable packet, and is 0 for unreliable ones. `Ack` is the
/// sequence number the sender expects to receive next, and is valid in every packet.
///
/// `DIC` indicates that the payload is followed by a 2-byte Data Integrity Check (see
/// [`crc`](../../crc/index.html)).
///
/// `Length` is the number of payload bytes, not counting the DIC.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Header(u32);

impl Header {
    /// Creates an unreliable header with the given packet type and all other fields set to 0
    /// (including the payload length).
    pub fn new(packet_type: PacketType) -> Self {
        let mut header = Header(0);
        header.set_packet_type(packet_type);
        header
    }

    /// Parses a header from raw bytes.
    ///
    /// The checksum byte is not checked, use [`Header::checksum_ok`] for that.
    ///
    /// Panics when `raw` contains less than 3 Bytes.
    pub fn parse(raw: &[u8]) -> Self {
        Header(LittleEndian::read_u24(raw))
    }

    /// Returns whether the 4 bytes at the start of `raw` form a header with a valid checksum.
    ///
    /// Returns `false` if `raw` is shorter than a header.
    pub fn checksum_ok(raw: &[u8]) -> bool {
        raw.len() >= HEADER_LEN
            && raw[..HEADER_LEN]
                .iter()
                .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
                == 0xff
    }

    /// Returns the header in wire format, including the checksum byte.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0; HEADER_LEN];
        LittleEndian::write_u24(&mut bytes[..3], self.0);
        let sum = bytes[..3]
            .iter()
            .fold(0u8, |sum, byte| sum.wrapping_add(*byte));
        bytes[3] = 0xff - sum;
        bytes
    }

    /// Returns the `Seq` field.
    pub fn seq(&self) -> SeqNum {
        SeqNum::new(self.0 as u8)
    }

    /// Sets the `Seq` field.
    pub fn set_seq(&mut self, seq: SeqNum) {
        self.0 = (self.0 & !0b111) | u32::from(seq.to_u8());
    }

    /// Returns the `Ack` field.
    pub fn ack(&self) -> SeqNum {
        SeqNum::new((self.0 >> 3) as u8)
    }

    /// Sets the `Ack` field.
    pub fn set_ack(&mut self, ack: SeqNum) {
        self.0 = (self.0 & !(0b111 << 3)) | (u32::from(ack.to_u8()) << 3);
    }

    /// Returns whether the payload is followed by a Data Integrity Check.
    pub fn data_integrity_check(&self) -> bool {
        self.0 & (1 << 6) != 0
    }

    /// Sets the DIC-present flag.
    pub fn set_data_integrity_check(&mut self, present: bool) {
        if present {
            self.0 |= 1 << 6;
        } else {
            self.0 &= !(1 << 6);
        }
    }

    /// Returns whether this is a reliable packet that has to be acknowledged.
    pub fn reliable(&self) -> bool {
        self.0 & (1 << 7) != 0
    }

    /// Sets the reliable flag.
    pub fn set_reliable(&mut self, reliable: bool) {
        if reliable {
            self.0 |= 1 << 7;
        } else {
            self.0 &= !(1 << 7);
        }
    }

    /// Returns the `Type` field.
    pub fn packet_type(&self) -> PacketType {
        PacketType::from(((self.0 >> 8) & 0x0f) as u8)
    }

    /// Sets the `Type` field.
    ///
    /// Only the low 4 bits of unknown packet types are used.
    pub fn set_packet_type(&mut self, packet_type: PacketType) {
        let raw = u8::from(packet_type) & 0x0f;
        self.0 = (self.0 & !(0x0f << 8)) | (u32::from(raw) << 8);
    }

    /// Returns the length of the payload in octets as specified in the `Length` field.
    pub fn payload_length(&self) -> u16 {
        (self.0 >> 12) as u16
    }

    /// Sets the payload length field to `len`.
    ///
    /// Only the low 12 bits of `len` are stored. Callers have to reject longer payloads.
    pub fn set_payload_length(&mut self, len: u16) {
        let len = u32::from(len) & MAX_PAYLOAD_LEN as u32;
        self.0 = (self.0 & 0x000fff) | (len << 12);
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("Seq", &self.seq())
            .field("Ack", &self.ack())
            .field("DIC", &self.data_integrity_check())
            .field("Rel", &self.reliable())
            .field("Type", &self.packet_type())
            .field("Length", &self.payload_length())
            .finish()
    }
}

enum_with_unknown! {
    /// Values of the 4-bit `Type` field in [`Header`].
    ///
    /// Types 0 to 4 are the HCI packet types of the UART transport (H4) plus the acknowledgement
    /// type, 14 and 15 are H5-specific.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum PacketType(u8) {
        /// Pure acknowledgement without payload.
        Acknowledgement = 0,
        /// HCI Command packet.
        Command = 1,
        /// HCI ACL Data packet.
        AclData = 2,
        /// HCI Synchronous (SCO) Data packet.
        ScoData = 3,
        /// HCI Event packet.
        Event = 4,
        /// Vendor-specific packet.
        Vendor = 14,
        /// Link control message (link establishment and low power).
        LinkControl = 15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_header() {
        let mut header = Header::new(PacketType::Event);
        header.set_seq(SeqNum::ONE);
        header.set_reliable(true);
        header.set_payload_length(10);
        assert_eq!(header.to_bytes(), [0x81, 0xa4, 0x00, 0xda]);
        assert!(Header::checksum_ok(&header.to_bytes()));
    }

    #[test]
    fn sync_frame_header() {
        let mut header = Header::new(PacketType::LinkControl);
        header.set_payload_length(2);
        assert_eq!(header.to_bytes(), [0x00, 0x2f, 0x00, 0xd0]);
    }

    #[test]
    fn round_trip() {
        for &len in &[0u16, 1, 15, 16, 255, 256, 1018, 4095] {
            for raw_type in 0..16u8 {
                for seq in 0..8 {
                    for &(reliable, dic) in &[(false, false), (true, false), (true, true)] {
                        let ack = SeqNum::new(7 - seq);
                        let mut header = Header::new(PacketType::from(raw_type));
                        header.set_seq(SeqNum::new(seq));
                        header.set_ack(ack);
                        header.set_reliable(reliable);
                        header.set_data_integrity_check(dic);
                        header.set_payload_length(len);

                        let bytes = header.to_bytes();
                        assert!(Header::checksum_ok(&bytes));
                        let parsed = Header::parse(&bytes);
                        assert_eq!(parsed, header);
                        assert_eq!(parsed.seq(), SeqNum::new(seq));
                        assert_eq!(parsed.ack(), ack);
                        assert_eq!(parsed.reliable(), reliable);
                        assert_eq!(parsed.data_integrity_check(), dic);
                        assert_eq!(u8::from(parsed.packet_type()), raw_type);
                        assert_eq!(parsed.payload_length(), len);
                    }
                }
            }
        }
    }

    #[test]
    fn single_bit_flip_breaks_checksum() {
        let mut header = Header::new(PacketType::AclData);
        header.set_seq(SeqNum::new(5));
        header.set_ack(SeqNum::new(2));
        header.set_reliable(true);
        header.set_payload_length(300);
        let bytes = header.to_bytes();

        for byte in 0..HEADER_LEN {
            for bit in 0..8 {
                let mut corrupted = bytes;
                corrupted[byte] ^= 1 << bit;
                assert!(!Header::checksum_ok(&corrupted), "byte {} bit {}", byte, bit);
            }
        }
    }

    #[test]
    fn short_input_is_not_a_header() {
        assert!(!Header::checksum_ok(&[0xff]));
        assert!(!Header::checksum_ok(&[]));
    }
}
