//! Chunked output of SLIP-framed H5 frames.

use crate::crc::Crc16;
use crate::link::header::Header;
use crate::slip::{Encoder, END};
use crate::uart::Uart;
use crate::utils::HexSlice;

/// Maximum number of encoded bytes handed to the UART at once.
pub const TX_CHUNK_LEN: usize = 64;

/// Room for a full chunk, the escaped 2-byte integrity check, and the closing delimiter.
const TX_BUF_LEN: usize = TX_CHUNK_LEN + 4 + 1;

/// Writes one frame at a time to a [`Uart`], in chunks of at most [`TX_CHUNK_LEN`] bytes.
///
/// The first chunk holds the opening delimiter, the header and any inline payload. The borrowed
/// payload is encoded lazily, one chunk per completed UART write. The last chunk is followed by
/// the integrity check (if any) and the closing delimiter.
pub struct FrameWriter<'a> {
    encoder: Encoder<'a>,
    buf: [u8; TX_BUF_LEN],
    dic: Option<u16>,
    active: bool,
}

impl<'a> FrameWriter<'a> {
    pub fn new() -> Self {
        Self {
            encoder: Encoder::default(),
            buf: [0; TX_BUF_LEN],
            dic: None,
            active: false,
        }
    }

    /// Returns whether a frame is still being written.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Forgets the frame being written, if any.
    pub fn abort(&mut self) {
        self.encoder.start(&[]);
        self.dic = None;
        self.active = false;
    }

    /// Starts writing a frame.
    ///
    /// The payload is the concatenation of `inline` (copied right away, at most a few bytes) and
    /// `payload` (encoded on demand, so it has to stay around until the frame is written). If the
    /// header's DIC flag is set, the integrity check is computed and appended.
    ///
    /// Must not be called while [`is_active`](#method.is_active) returns `true`.
    pub fn send<U: Uart>(&mut self, uart: &mut U, header: Header, inline: &[u8], payload: &'a [u8]) {
        debug_assert!(!self.active, "frame write already in progress");
        let with_dic = header.data_integrity_check();
        let header = header.to_bytes();

        self.dic = if with_dic {
            let mut crc = Crc16::new();
            crc.update(&header);
            crc.update(inline);
            crc.update(payload);
            Some(crc.finish())
        } else {
            None
        };

        let mut pos = 0;
        self.buf[pos] = END;
        pos += 1;
        for byte in Encoder::new(&header).chain(Encoder::new(inline)) {
            self.buf[pos] = byte;
            pos += 1;
        }
        self.encoder.start(payload);
        self.encode_chunk_and_send(uart, pos);
    }

    /// Handles completion of the last chunk handed to the UART.
    ///
    /// Writes the next chunk if there is one. Returns `true` once the whole frame has been
    /// written.
    pub fn block_sent<U: Uart>(&mut self, uart: &mut U) -> bool {
        if !self.active {
            return false;
        }

        if self.encoder.has_data() {
            self.encode_chunk_and_send(uart, 0);
            false
        } else {
            self.active = false;
            true
        }
    }

    fn encode_chunk_and_send<U: Uart>(&mut self, uart: &mut U, mut pos: usize) {
        while pos < TX_CHUNK_LEN {
            match self.encoder.next_byte() {
                Some(byte) => {
                    self.buf[pos] = byte;
                    pos += 1;
                }
                None => break,
            }
        }

        if !self.encoder.has_data() {
            if let Some(dic) = self.dic.take() {
                for byte in Encoder::new(&dic.to_be_bytes()) {
                    self.buf[pos] = byte;
                    pos += 1;
                }
            }
            self.buf[pos] = END;
            pos += 1;
        }

        self.active = true;
        trace!("TX {:?}", HexSlice(&self.buf[..pos]));
        uart.send_block(&self.buf[..pos]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UartConfig;
    use crate::link::header::{PacketType, HEADER_LEN};
    use crate::link::SeqNum;
    use crate::slip::{DecodeStatus, Decoder};
    use crate::Error;
    use std::vec::Vec;

    #[derive(Default)]
    struct Blocks(Vec<Vec<u8>>);

    impl Uart for Blocks {
        fn init(&mut self, _: &UartConfig) {}
        fn open(&mut self) -> Result<(), Error> {
            Ok(())
        }
        fn close(&mut self) -> Result<(), Error> {
            Ok(())
        }
        fn send_block(&mut self, data: &[u8]) {
            assert!(data.len() <= TX_BUF_LEN);
            self.0.push(data.to_vec());
        }
        fn receive_block(&mut self, _: usize) {}
        fn set_baudrate(&mut self, _: u32) -> Result<(), Error> {
            Ok(())
        }
    }

    fn write_frame(header: Header, inline: &[u8], payload: &[u8]) -> Vec<Vec<u8>> {
        let mut uart = Blocks::default();
        let mut writer = FrameWriter::new();
        writer.send(&mut uart, header, inline, payload);
        while !writer.block_sent(&mut uart) {}
        assert!(!writer.is_active());
        uart.0
    }

    fn decode(wire: &[u8]) -> Vec<u8> {
        let mut decoder = Decoder::<2048>::new();
        for &byte in wire {
            if let DecodeStatus::Complete(_) = decoder.process(byte) {
                return decoder.frame().to_vec();
            }
        }
        panic!("no frame in {:02x?}", wire);
    }

    #[test]
    fn sync_frame() {
        let mut header = Header::new(PacketType::LinkControl);
        header.set_payload_length(2);
        let blocks = write_frame(header, &[0x01, 0x7e], &[]);
        assert_eq!(blocks, [[0xc0, 0x00, 0x2f, 0x00, 0xd0, 0x01, 0x7e, 0xc0]]);
    }

    #[test]
    fn large_payload_is_chunked() {
        let payload: Vec<u8> = (0..=255).cycle().take(300).collect();
        let mut header = Header::new(PacketType::AclData);
        header.set_reliable(true);
        header.set_seq(SeqNum::new(3));
        header.set_payload_length(payload.len() as u16);

        let blocks = write_frame(header, &[], &payload);
        assert!(blocks.len() > 1);
        for block in &blocks[..blocks.len() - 1] {
            assert_eq!(block.len(), TX_CHUNK_LEN);
        }

        let wire: Vec<u8> = blocks.concat();
        assert_eq!(wire.first(), Some(&END));
        assert_eq!(wire.last(), Some(&END));
        let frame = decode(&wire[1..]);
        assert_eq!(&frame[..HEADER_LEN], &header.to_bytes());
        assert_eq!(&frame[HEADER_LEN..], &payload[..]);
    }

    #[test]
    fn integrity_check_is_appended() {
        // Payload of escapable bytes, so the DIC lands right at the chunk boundary.
        let payload = [END; 40];
        let mut header = Header::new(PacketType::Event);
        header.set_reliable(true);
        header.set_data_integrity_check(true);
        header.set_payload_length(payload.len() as u16);

        let wire: Vec<u8> = write_frame(header, &[], &payload).concat();
        let frame = decode(&wire[1..]);
        let (body, dic) = frame.split_at(frame.len() - 2);
        let expected = crate::crc::data_integrity_check(&header.to_bytes(), &payload);
        assert_eq!(dic, &expected.to_be_bytes());
        assert_eq!(&body[HEADER_LEN..], &payload[..]);
    }

    #[test]
    fn spurious_completion_is_ignored() {
        let mut uart = Blocks::default();
        let mut writer = FrameWriter::new();
        assert!(!writer.block_sent(&mut uart));
        assert!(uart.0.is_empty());
    }
}
