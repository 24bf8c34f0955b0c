//! SLIP byte stuffing (RFC 1055) as used by H5 framing.
//!
//! H5 frames are delimited by `END` bytes. Inside a frame, `END` and `ESC` are replaced by 2-byte
//! escape sequences:
//!
//! ```notrust
//! 0xC0 (END) -> 0xDB 0xDC (ESC ESC_END)
//! 0xDB (ESC) -> 0xDB 0xDD (ESC ESC_ESC)
//! ```
//!
//! The [`Encoder`] only performs the escaping. Frame delimiters are written by its user, since
//! an H5 frame is assembled from several pieces (header, payload, optional integrity check).
//!
//! The [`Decoder`] reassembles one frame at a time into a fixed-capacity buffer.

use heapless::Vec;

/// Frame delimiter.
pub const END: u8 = 0xC0;

/// Escape byte.
pub const ESC: u8 = 0xDB;

/// Follows `ESC` to encode a literal `END`.
pub const ESC_END: u8 = 0xDC;

/// Follows `ESC` to encode a literal `ESC`.
pub const ESC_ESC: u8 = 0xDD;

/// Pull-based SLIP encoder.
///
/// The encoder yields one output byte at a time, so a frame can be written in chunks of any size:
/// the position inside the input, including a half-emitted escape sequence, is tracked by the
/// encoder itself.
#[derive(Debug, Clone)]
pub struct Encoder<'a> {
    data: &'a [u8],
    /// Second byte of an escape sequence whose first byte has already been emitted.
    pending: Option<u8>,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder that will escape `data`.
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pending: None,
        }
    }

    /// Restarts the encoder with new input, discarding any unread output.
    pub fn start(&mut self, data: &'a [u8]) {
        self.data = data;
        self.pending = None;
    }

    /// Returns whether more output bytes are available.
    pub fn has_data(&self) -> bool {
        self.pending.is_some() || !self.data.is_empty()
    }

    /// Returns the next output byte, or `None` when all input has been encoded.
    pub fn next_byte(&mut self) -> Option<u8> {
        if let Some(byte) = self.pending.take() {
            return Some(byte);
        }

        let (&byte, rest) = self.data.split_first()?;
        self.data = rest;
        Some(match byte {
            END => {
                self.pending = Some(ESC_END);
                ESC
            }
            ESC => {
                self.pending = Some(ESC_ESC);
                ESC
            }
            other => other,
        })
    }
}

impl Default for Encoder<'_> {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Iterator for Encoder<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.next_byte()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = usize::from(self.pending.is_some());
        (
            self.data.len() + pending,
            Some(self.data.len() * 2 + pending),
        )
    }
}

/// Result of feeding a byte to a [`Decoder`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    /// No complete frame is available yet.
    Incomplete,

    /// A frame of the given (unescaped) length has been received.
    ///
    /// The frame stays available through [`Decoder::frame`] until [`Decoder::reset`] is called.
    Complete(usize),

    /// The frame in progress was thrown away because it overflowed the buffer or contained an
    /// invalid escape sequence. Input is skipped until the next `END`.
    Discarded,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Receiving,
    Escaped,
    Discarding,
    Complete,
}

/// SLIP decoder reassembling a single frame of up to `N` bytes.
///
/// An `END` byte with no frame data before it is an idle delimiter and is ignored. Once a frame is
/// complete, the decoder holds on to it (and ignores further input) until it is explicitly
/// [`reset`](#method.reset), so the frame can be processed in place.
pub struct Decoder<const N: usize> {
    buf: Vec<u8, N>,
    state: State,
}

impl<const N: usize> Decoder<N> {
    /// Creates an empty decoder.
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            state: State::Receiving,
        }
    }

    /// Forgets the current frame and starts reassembling the next one.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = State::Receiving;
    }

    /// Feeds one received byte into the decoder.
    pub fn process(&mut self, byte: u8) -> DecodeStatus {
        match self.state {
            State::Complete => DecodeStatus::Complete(self.buf.len()),
            State::Discarding => {
                if byte == END {
                    self.reset();
                }
                DecodeStatus::Incomplete
            }
            State::Escaped => {
                let unescaped = match byte {
                    ESC_END => END,
                    ESC_ESC => ESC,
                    _ => return self.discard(),
                };
                self.state = State::Receiving;
                self.push(unescaped)
            }
            State::Receiving => match byte {
                END if self.buf.is_empty() => DecodeStatus::Incomplete,
                END => {
                    self.state = State::Complete;
                    DecodeStatus::Complete(self.buf.len())
                }
                ESC => {
                    self.state = State::Escaped;
                    DecodeStatus::Incomplete
                }
                _ => self.push(byte),
            },
        }
    }

    /// Returns the completed frame, or an empty slice if no frame is complete.
    pub fn frame(&self) -> &[u8] {
        if self.state == State::Complete {
            &self.buf
        } else {
            &[]
        }
    }

    fn push(&mut self, byte: u8) -> DecodeStatus {
        match self.buf.push(byte) {
            Ok(()) => DecodeStatus::Incomplete,
            Err(_) => self.discard(),
        }
    }

    fn discard(&mut self) -> DecodeStatus {
        self.buf.clear();
        self.state = State::Discarding;
        DecodeStatus::Discarded
    }
}

impl<const N: usize> Default for Decoder<N> {
    fn default() -> Self {
        Self::new()
    }
}
