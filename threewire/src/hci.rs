//! Interface to the HCI layer above the transport.

use crate::link::header::PacketType;

/// Event code of the transport's "packet sent" event.
///
/// Tells the HCI layer that it may submit the next packet.
pub const HCI_EVENT_TRANSPORT_PACKET_SENT: u8 = 0x6e;

/// Event code of the transport's "sleep mode" event.
pub const HCI_EVENT_TRANSPORT_SLEEP_MODE: u8 = 0x69;

/// Receiver of incoming HCI packets and transport events.
///
/// Transport events are delivered as [`PacketType::Event`] packets, see [`TransportEvent`].
pub trait PacketHandler {
    /// Called with every HCI packet received from the controller, and with every transport event.
    fn packet(&mut self, packet_type: PacketType, packet: &[u8]);
}

impl<F> PacketHandler for F
where
    F: FnMut(PacketType, &[u8]),
{
    fn packet(&mut self, packet_type: PacketType, packet: &[u8]) {
        self(packet_type, packet)
    }
}

/// Synthetic events generated by the transport itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The link is ready for (the next) outgoing packet.
    ///
    /// Emitted when the link becomes active, and whenever the outstanding packet has been
    /// acknowledged.
    PacketSent,

    /// The UART entered (`true`) or left (`false`) its low-power state.
    SleepMode(bool),
}

impl TransportEvent {
    /// Parses a transport event from an HCI event packet.
    ///
    /// Returns `None` for all other events.
    pub fn parse(packet: &[u8]) -> Option<Self> {
        match packet {
            [HCI_EVENT_TRANSPORT_PACKET_SENT, 0] => Some(TransportEvent::PacketSent),
            [HCI_EVENT_TRANSPORT_SLEEP_MODE, 1, active] => {
                Some(TransportEvent::SleepMode(*active != 0))
            }
            _ => None,
        }
    }

    /// Calls `f` with the HCI event packet encoding of `self`.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match self {
            TransportEvent::PacketSent => f(&[HCI_EVENT_TRANSPORT_PACKET_SENT, 0]),
            TransportEvent::SleepMode(active) => {
                f(&[HCI_EVENT_TRANSPORT_SLEEP_MODE, 1, u8::from(*active)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_encoding() {
        TransportEvent::PacketSent.with_bytes(|b| assert_eq!(b, &[0x6e, 0]));
        TransportEvent::SleepMode(true).with_bytes(|b| assert_eq!(b, &[0x69, 1, 1]));

        for &event in &[
            TransportEvent::PacketSent,
            TransportEvent::SleepMode(false),
            TransportEvent::SleepMode(true),
        ] {
            assert_eq!(event.with_bytes(TransportEvent::parse), Some(event));
        }
        assert_eq!(TransportEvent::parse(&[0x0e, 4, 1, 3, 0x0c, 0]), None);
    }

    #[test]
    fn closures_are_handlers() {
        let mut count = 0;
        {
            let mut handler = |ty: PacketType, packet: &[u8]| {
                assert_eq!(ty, PacketType::Event);
                count += packet.len();
            };
            handler.packet(PacketType::Event, &[1, 2, 3]);
        }
        assert_eq!(count, 3);
    }
}
