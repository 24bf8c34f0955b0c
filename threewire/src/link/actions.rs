//! The set of pending outgoing transmissions.

use bitflags::bitflags;

bitflags! {
    /// Transmissions requested by the link layer that have not been started yet.
    ///
    /// Every flag stands for exactly one frame. Setting a flag that is already set does not queue
    /// a second frame.
    pub struct Actions: u16 {
        /// Send `SYNC`.
        const SEND_SYNC = 1 << 0;
        /// Send `SYNC_RESPONSE`.
        const SEND_SYNC_RESPONSE = 1 << 1;
        /// Send `CONFIG` with our configuration field.
        const SEND_CONFIG = 1 << 2;
        /// Send `CONFIG_RESPONSE` with our configuration field.
        const SEND_CONFIG_RESPONSE = 1 << 3;
        /// Send `CONFIG_RESPONSE` without configuration field.
        const SEND_CONFIG_RESPONSE_EMPTY = 1 << 4;
        /// Send `WOKEN`.
        const SEND_WOKEN = 1 << 5;
        /// Send `WAKEUP`.
        const SEND_WAKEUP = 1 << 6;
        /// Send (or resend) the outstanding reliable packet.
        const SEND_QUEUED_PACKET = 1 << 7;
        /// Send a pure acknowledgement.
        const SEND_ACK = 1 << 8;
        /// Send `SLEEP`.
        const SEND_SLEEP = 1 << 9;
    }
}

/// A single transmission, taken from [`Actions`] in priority order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Sync,
    SyncResponse,
    Config,
    ConfigResponse,
    ConfigResponseEmpty,
    Woken,
    Wakeup,
    QueuedPacket,
    Ack,
    Sleep,
}

/// Flags in the order they are served. Link control comes first, then data, then bare acks.
const PRIORITY: [(Actions, Action); 10] = [
    (Actions::SEND_SYNC, Action::Sync),
    (Actions::SEND_SYNC_RESPONSE, Action::SyncResponse),
    (Actions::SEND_CONFIG, Action::Config),
    (Actions::SEND_CONFIG_RESPONSE, Action::ConfigResponse),
    (Actions::SEND_CONFIG_RESPONSE_EMPTY, Action::ConfigResponseEmpty),
    (Actions::SEND_WOKEN, Action::Woken),
    (Actions::SEND_WAKEUP, Action::Wakeup),
    (Actions::SEND_QUEUED_PACKET, Action::QueuedPacket),
    (Actions::SEND_ACK, Action::Ack),
    (Actions::SEND_SLEEP, Action::Sleep),
];

impl Actions {
    /// Removes and returns the highest-priority pending action.
    ///
    /// Taking the queued packet also drops a pending pure ack, since the packet's header already
    /// carries the current acknowledgement number.
    pub fn take_next(&mut self) -> Option<Action> {
        let (flag, action) = PRIORITY.iter().find(|(flag, _)| self.contains(*flag))?;
        self.remove(*flag);
        if *action == Action::QueuedPacket {
            self.remove(Actions::SEND_ACK);
        }
        Some(*action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order() {
        let mut actions = Actions::all();
        let mut taken = std::vec::Vec::new();
        while let Some(action) = actions.take_next() {
            taken.push(action);
        }
        assert_eq!(
            taken,
            [
                Action::Sync,
                Action::SyncResponse,
                Action::Config,
                Action::ConfigResponse,
                Action::ConfigResponseEmpty,
                Action::Woken,
                Action::Wakeup,
                Action::QueuedPacket,
                Action::Sleep,
            ]
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn packet_carries_ack() {
        let mut actions = Actions::SEND_ACK | Actions::SEND_QUEUED_PACKET;
        assert_eq!(actions.take_next(), Some(Action::QueuedPacket));
        assert_eq!(actions.take_next(), None);

        let mut actions = Actions::SEND_ACK | Actions::SEND_SLEEP;
        assert_eq!(actions.take_next(), Some(Action::Ack));
        assert_eq!(actions.take_next(), Some(Action::Sleep));
    }

    #[test]
    fn flags_do_not_accumulate() {
        let mut actions = Actions::SEND_SYNC;
        actions |= Actions::SEND_SYNC;
        assert_eq!(actions.take_next(), Some(Action::Sync));
        assert_eq!(actions.take_next(), None);
    }
}
