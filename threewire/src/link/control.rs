//! Link control messages.
//!
//! Link control messages are carried in unreliable frames of type
//! [`PacketType::LinkControl`](../header/enum.PacketType.html). Each message starts with a fixed
//! 2-byte code. `CONFIG` and `CONFIG_RESPONSE` may be followed by a 1-byte [`ConfigField`].
//!
//! | Message           | Bytes            |
//! |-------------------|------------------|
//! | `SYNC`            | `01 7E`          |
//! | `SYNC_RESPONSE`   | `02 7D`          |
//! | `CONFIG`          | `03 FC [config]` |
//! | `CONFIG_RESPONSE` | `04 7B [config]` |
//! | `WAKEUP`          | `05 FA`          |
//! | `WOKEN`           | `06 F9`          |
//! | `SLEEP`           | `07 78`          |

use core::fmt;
use heapless::Vec;

/// Maximum length of an encoded control message.
pub const CONTROL_MAX_LEN: usize = 3;

const SYNC: [u8; 2] = [0x01, 0x7e];
const SYNC_RESPONSE: [u8; 2] = [0x02, 0x7d];
const CONFIG: [u8; 2] = [0x03, 0xfc];
const CONFIG_RESPONSE: [u8; 2] = [0x04, 0x7b];
const WAKEUP: [u8; 2] = [0x05, 0xfa];
const WOKEN: [u8; 2] = [0x06, 0xf9];
const SLEEP: [u8; 2] = [0x07, 0x78];

/// A link control message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    /// Link establishment, first step. Sent periodically until answered.
    Sync,

    /// Answer to `Sync`.
    SyncResponse,

    /// Link establishment, second step. Carries the sender's configuration, if any.
    Config(Option<ConfigField>),

    /// Answer to `Config`, carrying the configuration the responder will use.
    ConfigResponse(Option<ConfigField>),

    /// Asks a sleeping peer to wake up.
    Wakeup,

    /// Answer to `Wakeup`.
    Woken,

    /// Announces that the sender is going to sleep.
    Sleep,
}

impl ControlMessage {
    /// Parses a control message from the payload of a link control frame.
    ///
    /// Returns `None` if the payload does not start with a known message code.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < 2 {
            return None;
        }
        let (code, rest) = payload.split_at(2);
        let field = rest.first().map(|raw| ConfigField::from_raw(*raw));

        Some(match [code[0], code[1]] {
            SYNC => ControlMessage::Sync,
            SYNC_RESPONSE => ControlMessage::SyncResponse,
            CONFIG => ControlMessage::Config(field),
            CONFIG_RESPONSE => ControlMessage::ConfigResponse(field),
            WAKEUP => ControlMessage::Wakeup,
            WOKEN => ControlMessage::Woken,
            SLEEP => ControlMessage::Sleep,
            _ => return None,
        })
    }

    /// Returns the wire encoding of this message.
    pub fn to_bytes(&self) -> Vec<u8, CONTROL_MAX_LEN> {
        let (code, field) = match self {
            ControlMessage::Sync => (SYNC, None),
            ControlMessage::SyncResponse => (SYNC_RESPONSE, None),
            ControlMessage::Config(field) => (CONFIG, *field),
            ControlMessage::ConfigResponse(field) => (CONFIG_RESPONSE, *field),
            ControlMessage::Wakeup => (WAKEUP, None),
            ControlMessage::Woken => (WOKEN, None),
            ControlMessage::Sleep => (SLEEP, None),
        };

        let raw = [code[0], code[1], field.map_or(0, |f| f.raw())];
        let len = if field.is_some() { 3 } else { 2 };
        Vec::from_slice(&raw[..len]).unwrap_or_default()
    }
}

/// The configuration field exchanged in `CONFIG` and `CONFIG_RESPONSE`.
///
/// ```notrust
/// LSB                                                      MSB
/// +----------------+----------------+----------+-------------+
/// | Sliding Window | OOF Flow Ctrl  |   DIC    |   Version   |
/// |    (3 bits)    |    (1 bit)     | (1 bit)  |  (3 bits)   |
/// +----------------+----------------+----------+-------------+
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ConfigField(u8);

impl ConfigField {
    /// The configuration this transport advertises unless the Data Integrity Check is enabled.
    ///
    /// Sliding window of 1, no out-of-frame flow control, no DIC, version 0.
    pub const DEFAULT: Self = ConfigField(0x01);

    const DIC_BIT: u8 = 1 << 4;

    /// Creates a configuration field from its raw byte.
    pub const fn from_raw(raw: u8) -> Self {
        ConfigField(raw)
    }

    /// Returns the raw byte.
    pub fn raw(&self) -> u8 {
        self.0
    }

    /// Returns a copy of `self` with the Data Integrity Check bit set to `dic`.
    pub fn with_data_integrity_check(self, dic: bool) -> Self {
        if dic {
            ConfigField(self.0 | Self::DIC_BIT)
        } else {
            ConfigField(self.0 & !Self::DIC_BIT)
        }
    }

    /// Returns the sliding window size field.
    pub fn sliding_window_size(&self) -> u8 {
        self.0 & 0b111
    }

    /// Returns whether out-of-frame software flow control is requested.
    pub fn out_of_frame_flow_control(&self) -> bool {
        self.0 & (1 << 3) != 0
    }

    /// Returns whether the sender supports the Data Integrity Check.
    pub fn data_integrity_check(&self) -> bool {
        self.0 & Self::DIC_BIT != 0
    }

    /// Returns the protocol version field.
    pub fn version(&self) -> u8 {
        self.0 >> 5
    }
}

impl Default for ConfigField {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigField")
            .field("sliding_window_size", &self.sliding_window_size())
            .field("out_of_frame_flow_control", &self.out_of_frame_flow_control())
            .field("data_integrity_check", &self.data_integrity_check())
            .field("version", &self.version())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_encoding() {
        let cfg = Some(ConfigField::DEFAULT);
        assert_eq!(&ControlMessage::Sync.to_bytes()[..], &[0x01, 0x7e]);
        assert_eq!(&ControlMessage::SyncResponse.to_bytes()[..], &[0x02, 0x7d]);
        assert_eq!(&ControlMessage::Config(cfg).to_bytes()[..], &[0x03, 0xfc, 0x01]);
        assert_eq!(&ControlMessage::ConfigResponse(cfg).to_bytes()[..], &[0x04, 0x7b, 0x01]);
        assert_eq!(&ControlMessage::ConfigResponse(None).to_bytes()[..], &[0x04, 0x7b]);
        assert_eq!(&ControlMessage::Wakeup.to_bytes()[..], &[0x05, 0xfa]);
        assert_eq!(&ControlMessage::Woken.to_bytes()[..], &[0x06, 0xf9]);
        assert_eq!(&ControlMessage::Sleep.to_bytes()[..], &[0x07, 0x78]);
    }

    #[test]
    fn parse() {
        assert_eq!(ControlMessage::parse(&[0x01, 0x7e]), Some(ControlMessage::Sync));
        assert_eq!(
            ControlMessage::parse(&[0x03, 0xfc]),
            Some(ControlMessage::Config(None))
        );
        assert_eq!(
            ControlMessage::parse(&[0x04, 0x7b, 0x17]),
            Some(ControlMessage::ConfigResponse(Some(ConfigField::from_raw(0x17))))
        );
        assert_eq!(ControlMessage::parse(&[0x07, 0x78]), Some(ControlMessage::Sleep));
        assert_eq!(ControlMessage::parse(&[0x01]), None);
        assert_eq!(ControlMessage::parse(&[0x01, 0x7f]), None);
        assert_eq!(ControlMessage::parse(&[]), None);
    }

    #[test]
    fn config_field() {
        let cfg = ConfigField::DEFAULT;
        assert_eq!(cfg.sliding_window_size(), 1);
        assert!(!cfg.out_of_frame_flow_control());
        assert!(!cfg.data_integrity_check());
        assert_eq!(cfg.version(), 0);

        let dic = cfg.with_data_integrity_check(true);
        assert_eq!(dic.raw(), 0x11);
        assert_eq!(dic.sliding_window_size(), 1);
        assert!(dic.data_integrity_check());
        assert_eq!(dic.with_data_integrity_check(false), cfg);
    }
}
