//! H5 link layer.
//!
//! The link layer turns a byte stream into a reliable, ordered channel for HCI packets. It is
//! driven entirely by the [`Transport`], which feeds it received bytes, write completions and
//! timer expirations.
//!
//! # Frame Format
//!
//! Every frame is enclosed in SLIP delimiters. Header, payload and integrity check are
//! SLIP-escaped (see [`slip`]).
//!
//! ```notrust
//! +------+-----------+--------------------+ - - - - - - - - +------+
//! | 0xC0 |  Header   |      Payload       |       DIC       | 0xC0 |
//! |      | (4 bytes) | (0..=4095 bytes)   |   (2 bytes)     |      |
//! +------+-----------+--------------------+ - - - - - - - - +------+
//! ```
//!
//! The header layout is described in [`header::Header`].
//!
//! # Link Establishment
//!
//! After opening, the link is `Uninitialized` and sends `SYNC` every 250 ms. A `SYNC` from the
//! peer is answered with `SYNC_RESPONSE`. Receiving `SYNC_RESPONSE` moves the link to
//! `Initialized`, where `CONFIG` is sent every 250 ms instead. Receiving `CONFIG_RESPONSE` makes
//! the link `Active`: both sequence numbers start at 0 and the HCI layer is told it can send.
//!
//! # Reliable Transfer
//!
//! Only a single reliable packet is outstanding at any time. It is retransmitted unchanged every
//! [`resend_timeout`] until the peer acknowledges it by sending a frame whose `Ack` field is the
//! packet's sequence number plus 1. Received reliable frames are only accepted in order. Every
//! accepted frame, and every out-of-order frame, is answered with the current acknowledgement
//! number.
//!
//! # Sleep
//!
//! Either side may send `SLEEP` when it has nothing outstanding. A peer that announced sleep has
//! to be woken with `WAKEUP` (repeated every 50 ms) before the next packet is sent to it. `WOKEN`
//! or any HCI packet from the peer ends its sleep.
//!
//! [`Transport`]: ../transport/struct.Transport.html
//! [`slip`]: ../slip/index.html
//! [`header::Header`]: header/struct.Header.html
//! [`resend_timeout`]: fn.resend_timeout.html

mod actions;
pub mod control;
pub mod header;
mod seq_num;
mod writer;

pub use self::seq_num::SeqNum;

use self::actions::{Action, Actions};
use self::control::{ConfigField, ControlMessage};
use self::header::{Header, PacketType, HEADER_LEN, MAX_PAYLOAD_LEN};
use self::writer::FrameWriter;
use crate::config::Config;
use crate::crc;
use crate::hci::{PacketHandler, TransportEvent};
use crate::slip::{DecodeStatus, Decoder};
use crate::time::{Duration, Instant, Timer};
use crate::uart::{Parity, SleepMode, Uart};
use crate::utils::{Hex, HexSlice};
use crate::Error;
use byteorder::{BigEndian, ByteOrder};

/// Largest HCI packet (ACL header plus payload) the receive buffer is sized for.
pub const MAX_HCI_PACKET_LEN: usize = 1018;

/// Size of the receive buffer: header, largest HCI packet and integrity check.
pub const RX_BUF_LEN: usize = HEADER_LEN + MAX_HCI_PACKET_LEN + 2;

/// Interval of `SYNC` and `CONFIG` retransmissions during link establishment.
pub const LINK_PERIOD: Duration = Duration::from_millis(250);

/// Interval of `WAKEUP` retransmissions.
pub const WAKEUP_PERIOD: Duration = Duration::from_millis(50);

/// First 4 bytes of a BCSP `SYNC` received with the wrong (even) parity setting.
const BCSP_SYNC_EVEN_PARITY: [u8; 4] = [0x01, 0x7a, 0x06, 0x10];

/// Returns the retransmission timeout at `baudrate`.
///
/// This is 3 times the time needed to transmit the largest frame (8 bits per byte, no framing
/// overhead).
pub fn resend_timeout(baudrate: u32) -> Duration {
    let max_frame_bits = (MAX_HCI_PACKET_LEN as u32 + 6) * 8;
    Duration::from_millis(max_frame_bits * 3000 / baudrate.max(1))
}

/// Specifies when the transport's `update` method should be called the next time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[must_use]
pub enum NextUpdate {
    /// Disable timer and do not call `update`.
    Disable,

    /// Call `update` at the given `Instant`.
    At(Instant),
}

/// Link establishment state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Sending `SYNC`, waiting for `SYNC_RESPONSE`.
    Uninitialized,

    /// Sending `CONFIG`, waiting for `CONFIG_RESPONSE`.
    Initialized,

    /// Link established, HCI packets can be exchanged.
    Active,
}

/// Counters of recovered link errors.
///
/// None of these conditions are reported as errors, since the link recovers from them on its
/// own. The counters only serve diagnostic purposes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Number of times the outstanding packet was sent again after a timeout.
    pub retransmissions: u32,

    /// Number of `WAKEUP` messages sent.
    pub wakeup_attempts: u32,

    /// Number of received frames that were discarded (bad framing, checksum, length, integrity
    /// check or sequence number).
    pub frames_dropped: u32,

    /// Number of times the peer restarted link establishment while the link was active.
    pub peer_resets: u32,
}

/// Borrowed hardware interfaces, passed into every link layer operation.
pub(crate) struct Ports<'p, C: Config> {
    pub uart: &'p mut C::Uart,
    pub timer: &'p C::Timer,
    pub handler: Option<&'p mut C::PacketHandler>,
}

impl<C: Config> Ports<'_, C> {
    fn now(&self) -> Instant {
        self.timer.now()
    }

    fn emit(&mut self, packet_type: PacketType, packet: &[u8]) {
        match &mut self.handler {
            Some(handler) => handler.packet(packet_type, packet),
            None => warn!("no packet handler, dropping {:?} packet", packet_type),
        }
    }

    fn emit_event(&mut self, event: TransportEvent) {
        event.with_bytes(|bytes| self.emit(PacketType::Event, bytes));
    }
}

/// The packet waiting for acknowledgement.
#[derive(Copy, Clone)]
struct Outgoing<'a> {
    packet_type: PacketType,
    data: &'a [u8],
}

/// H5 link state machine.
///
/// Outgoing packets are borrowed for `'a` and never copied. A packet has to stay alive until it
/// has been acknowledged or the link has been reset.
pub(crate) struct LinkLayer<'a> {
    state: LinkState,
    seq_nr: SeqNum,
    ack_nr: SeqNum,
    peer_asleep: bool,

    /// Configuration field sent in `CONFIG` and `CONFIG_RESPONSE`.
    config_field: ConfigField,

    /// Whether outgoing frames carry a Data Integrity Check, as negotiated.
    use_dic: bool,

    actions: Actions,

    /// Put the UART to sleep once the `SLEEP` frame has been written.
    enter_sleep: bool,

    pending: Option<Outgoing<'a>>,
    resend_timeout: Duration,
    link_timer: Option<Instant>,
    inactivity_timeout: Option<Duration>,
    inactivity_timer: Option<Instant>,

    /// Low-power mode to put the UART in, or `Off` if the driver has none that fits.
    sleep_mode: SleepMode,

    /// Last sleep state reported to the HCI layer.
    sleep_reported: bool,

    tx: FrameWriter<'a>,
    rx: Decoder<RX_BUF_LEN>,
    stats: LinkStats,
}

impl<'a> LinkLayer<'a> {
    pub fn new() -> Self {
        Self {
            state: LinkState::Uninitialized,
            seq_nr: SeqNum::ZERO,
            ack_nr: SeqNum::ZERO,
            peer_asleep: false,
            config_field: ConfigField::DEFAULT,
            use_dic: false,
            actions: Actions::empty(),
            enter_sleep: false,
            pending: None,
            resend_timeout: resend_timeout(115_200),
            link_timer: None,
            inactivity_timeout: None,
            inactivity_timer: None,
            sleep_mode: SleepMode::Off,
            sleep_reported: false,
            tx: FrameWriter::new(),
            rx: Decoder::new(),
            stats: LinkStats::default(),
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn resend_timeout(&self) -> Duration {
        self.resend_timeout
    }

    /// Recomputes the retransmission timeout for a new baud rate.
    pub fn set_baudrate(&mut self, baudrate: u32) {
        self.resend_timeout = resend_timeout(baudrate);
        info!("resend timeout for {} baud: {}", baudrate, self.resend_timeout);
    }

    pub fn set_auto_sleep(&mut self, inactivity_timeout: Option<Duration>) {
        self.inactivity_timeout = inactivity_timeout;
        if inactivity_timeout.is_none() {
            self.inactivity_timer = None;
        }
    }

    pub fn set_data_integrity_check(&mut self, enabled: bool) {
        self.config_field = ConfigField::DEFAULT.with_data_integrity_check(enabled);
    }

    pub fn set_sleep_mode(&mut self, mode: SleepMode) {
        self.sleep_mode = mode;
    }

    /// Returns whether `send_packet` will accept a packet.
    pub fn can_send_packet_now(&self) -> bool {
        self.state == LinkState::Active && self.pending.is_none()
    }

    /// Starts (or restarts) link establishment.
    ///
    /// Any outstanding packet is dropped without notification.
    pub fn start<C: Config>(&mut self, ports: &mut Ports<'_, C>) -> NextUpdate {
        self.leave_sleep(ports);
        self.restart(ports.now());
        self.run(ports);
        self.next_update()
    }

    /// Stops all timers and forgets all link state, including a partially written frame.
    pub fn stop(&mut self) {
        self.state = LinkState::Uninitialized;
        self.actions = Actions::empty();
        self.enter_sleep = false;
        self.pending = None;
        self.link_timer = None;
        self.inactivity_timer = None;
        self.tx.abort();
        self.rx.reset();
    }

    fn restart(&mut self, now: Instant) {
        info!("link reset, sending SYNC");
        self.state = LinkState::Uninitialized;
        self.peer_asleep = false;
        self.use_dic = false;
        self.pending = None;
        self.actions = Actions::SEND_SYNC;
        self.enter_sleep = false;
        self.inactivity_timer = None;
        self.rx.reset();
        self.link_timer = Some(now + LINK_PERIOD);
    }

    /// Queues a reliable HCI packet for transmission.
    pub fn send_packet<C: Config>(
        &mut self,
        ports: &mut Ports<'_, C>,
        packet_type: PacketType,
        data: &'a [u8],
    ) -> Result<NextUpdate, Error> {
        if !self.can_send_packet_now() {
            error!(
                "send_packet called in state {:?} with packet pending: {}",
                self.state,
                self.pending.is_some()
            );
            return Err(Error::Busy);
        }
        if data.len() > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidLength);
        }

        self.pending = Some(Outgoing { packet_type, data });

        let now = ports.now();
        if self.peer_asleep {
            self.leave_sleep(ports);
            self.actions |= Actions::SEND_WAKEUP;
            self.link_timer = Some(now + WAKEUP_PERIOD);
        } else {
            self.actions |= Actions::SEND_QUEUED_PACKET;
            self.link_timer = Some(now + self.resend_timeout);
        }
        self.run(ports);
        Ok(self.next_update())
    }

    /// Processes received bytes.
    pub fn bytes_received<C: Config>(&mut self, ports: &mut Ports<'_, C>, bytes: &[u8]) -> NextUpdate {
        for &byte in bytes {
            match self.rx.process(byte) {
                DecodeStatus::Incomplete => {}
                DecodeStatus::Complete(_) => {
                    trace!("RX {:?}", HexSlice(self.rx.frame()));
                    self.process_frame(ports);
                    self.rx.reset();
                }
                DecodeStatus::Discarded => {
                    info!("discarding oversized or malformed SLIP frame");
                    self.frame_dropped();
                }
            }
        }
        self.run(ports);
        self.next_update()
    }

    /// Handles completion of a UART write.
    pub fn block_sent<C: Config>(&mut self, ports: &mut Ports<'_, C>) -> NextUpdate {
        if self.tx.block_sent(&mut *ports.uart) {
            if self.enter_sleep {
                self.enter_sleep = false;
                if self.sleep_mode != SleepMode::Off {
                    info!("sent SLEEP, enabling UART sleep");
                    ports.uart.set_sleep(self.sleep_mode);
                } else {
                    info!("sent SLEEP, UART sleep not supported");
                }
                self.emit_sleep_state(ports, true);
            }
            self.run(ports);
        }
        self.next_update()
    }

    /// Handles expired timers.
    pub fn update<C: Config>(&mut self, ports: &mut Ports<'_, C>) -> NextUpdate {
        let now = ports.now();

        if let Some(deadline) = self.link_timer {
            if now.reached(deadline) {
                self.link_timer = None;
                self.link_timeout(now);
            }
        }

        if let Some(deadline) = self.inactivity_timer {
            if now.reached(deadline) {
                self.inactivity_timer = None;
                self.inactivity_timeout();
            }
        }

        self.run(ports);
        self.next_update()
    }

    fn link_timeout(&mut self, now: Instant) {
        match self.state {
            LinkState::Uninitialized => {
                self.actions |= Actions::SEND_SYNC;
                self.link_timer = Some(now + LINK_PERIOD);
            }
            LinkState::Initialized => {
                self.actions |= Actions::SEND_CONFIG;
                self.link_timer = Some(now + LINK_PERIOD);
            }
            LinkState::Active => {
                if self.pending.is_none() {
                    info!("link timeout while active, but no outgoing packet");
                } else if self.peer_asleep {
                    self.actions |= Actions::SEND_WAKEUP;
                    self.link_timer = Some(now + WAKEUP_PERIOD);
                } else {
                    debug!("resending packet with seq {}", self.seq_nr);
                    self.stats.retransmissions = self.stats.retransmissions.saturating_add(1);
                    self.actions |= Actions::SEND_QUEUED_PACKET;
                    self.link_timer = Some(now + self.resend_timeout);
                }
            }
        }
    }

    fn inactivity_timeout(&mut self) {
        debug!(
            "inactivity timeout: state {:?}, peer asleep {}, actions {:?}, packet pending {}",
            self.state,
            self.peer_asleep,
            self.actions,
            self.pending.is_some()
        );
        if self.state == LinkState::Active
            && self.pending.is_none()
            && self.actions.is_empty()
            && !self.peer_asleep
        {
            self.actions |= Actions::SEND_SLEEP;
        }
    }

    fn restart_inactivity_timer(&mut self, now: Instant) {
        if let Some(timeout) = self.inactivity_timeout {
            self.inactivity_timer = Some(now + timeout);
        }
    }

    fn next_update(&self) -> NextUpdate {
        let deadline = match (self.link_timer, self.inactivity_timer) {
            (Some(a), Some(b)) => Some(a.earliest(b)),
            (a, b) => a.or(b),
        };
        match deadline {
            Some(at) => NextUpdate::At(at),
            None => NextUpdate::Disable,
        }
    }

    fn frame_dropped(&mut self) {
        self.stats.frames_dropped = self.stats.frames_dropped.saturating_add(1);
    }

    /// Starts writing the highest-priority queued frame, unless a write is still in progress.
    fn run<C: Config>(&mut self, ports: &mut Ports<'_, C>) {
        if self.tx.is_active() {
            return;
        }

        while let Some(action) = self.actions.take_next() {
            let sent = match action {
                Action::Sync => self.send_control(ports, ControlMessage::Sync),
                Action::SyncResponse => self.send_control(ports, ControlMessage::SyncResponse),
                Action::Config => {
                    self.send_control(ports, ControlMessage::Config(Some(self.config_field)))
                }
                Action::ConfigResponse => self.send_control(
                    ports,
                    ControlMessage::ConfigResponse(Some(self.config_field)),
                ),
                Action::ConfigResponseEmpty => {
                    self.send_control(ports, ControlMessage::ConfigResponse(None))
                }
                Action::Woken => self.send_control(ports, ControlMessage::Woken),
                Action::Wakeup => {
                    self.stats.wakeup_attempts = self.stats.wakeup_attempts.saturating_add(1);
                    self.send_control(ports, ControlMessage::Wakeup)
                }
                Action::QueuedPacket => self.send_queued_packet(ports),
                Action::Ack => self.send_ack(ports),
                Action::Sleep => {
                    self.enter_sleep = true;
                    self.peer_asleep = true;
                    self.send_control(ports, ControlMessage::Sleep)
                }
            };
            if sent {
                return;
            }
        }
    }

    fn send_control<C: Config>(&mut self, ports: &mut Ports<'_, C>, message: ControlMessage) -> bool {
        debug!("-> {:?}", message);
        let bytes = message.to_bytes();
        let mut header = Header::new(PacketType::LinkControl);
        header.set_data_integrity_check(self.use_dic);
        header.set_payload_length(bytes.len() as u16);
        self.tx.send(&mut *ports.uart, header, &bytes, &[]);
        true
    }

    fn send_queued_packet<C: Config>(&mut self, ports: &mut Ports<'_, C>) -> bool {
        let packet = match self.pending {
            Some(packet) => packet,
            None => return false,
        };

        debug!(
            "-> {:?} seq {} ack {}, {} bytes",
            packet.packet_type,
            self.seq_nr,
            self.ack_nr,
            packet.data.len()
        );
        let mut header = Header::new(packet.packet_type);
        header.set_seq(self.seq_nr);
        header.set_ack(self.ack_nr);
        header.set_reliable(true);
        header.set_data_integrity_check(self.use_dic);
        header.set_payload_length(packet.data.len() as u16);
        self.tx.send(&mut *ports.uart, header, &[], packet.data);

        self.restart_inactivity_timer(ports.now());
        true
    }

    fn send_ack<C: Config>(&mut self, ports: &mut Ports<'_, C>) -> bool {
        debug!("-> ack {}", self.ack_nr);
        // Pure acks carry no payload, so they never get an integrity check either.
        let mut header = Header::new(PacketType::Acknowledgement);
        header.set_ack(self.ack_nr);
        self.tx.send(&mut *ports.uart, header, &[], &[]);
        true
    }

    /// Returns the header of the received frame if it passes all integrity checks.
    fn check_frame<C: Config>(&mut self, ports: &mut Ports<'_, C>) -> Option<Header> {
        let frame = self.rx.frame();
        if frame.len() < HEADER_LEN {
            info!("frame too short: {} bytes", frame.len());
            self.frame_dropped();
            return None;
        }

        if frame[..HEADER_LEN] == BCSP_SYNC_EVEN_PARITY {
            info!("detected BCSP SYNC sent with even parity, enabling even parity");
            if let Err(e) = ports.uart.set_parity(Parity::Even) {
                warn!("failed to enable even parity: {}", e);
            }
            return None;
        }

        if !Header::checksum_ok(frame) {
            info!("bad header checksum: {:?}", HexSlice(&frame[..HEADER_LEN]));
            self.frame_dropped();
            return None;
        }

        let header = Header::parse(frame);
        let payload_len = usize::from(header.payload_length());
        let dic_len = if header.data_integrity_check() { 2 } else { 0 };
        if frame.len() != HEADER_LEN + payload_len + dic_len {
            info!(
                "expected payload length {} but got {}",
                payload_len,
                (frame.len() - HEADER_LEN).saturating_sub(dic_len)
            );
            self.frame_dropped();
            return None;
        }

        if header.data_integrity_check() {
            let (body, dic) = frame.split_at(HEADER_LEN + payload_len);
            let received = BigEndian::read_u16(dic);
            let computed = crc::data_integrity_check(&body[..HEADER_LEN], &body[HEADER_LEN..]);
            if received != computed {
                info!("expected DIC {:#06x} but got {:#06x}", computed, received);
                self.frame_dropped();
                return None;
            }
        }

        Some(header)
    }

    fn payload(&self, header: Header) -> &[u8] {
        let len = usize::from(header.payload_length());
        &self.rx.frame()[HEADER_LEN..HEADER_LEN + len]
    }

    fn process_frame<C: Config>(&mut self, ports: &mut Ports<'_, C>) {
        let header = match self.check_frame(ports) {
            Some(header) => header,
            None => return,
        };

        let control = if header.packet_type() == PacketType::LinkControl {
            ControlMessage::parse(self.payload(header))
        } else {
            None
        };
        if let Some(message) = control {
            debug!("<- {:?}", message);
        }

        match self.state {
            LinkState::Uninitialized => match control {
                Some(ControlMessage::Sync) => self.actions |= Actions::SEND_SYNC_RESPONSE,
                Some(ControlMessage::SyncResponse) => {
                    info!("link initialized");
                    self.state = LinkState::Initialized;
                    self.actions |= Actions::SEND_CONFIG;
                    self.link_timer = Some(ports.now() + LINK_PERIOD);
                }
                _ => {}
            },
            LinkState::Initialized => match control {
                Some(ControlMessage::Sync) => self.actions |= Actions::SEND_SYNC_RESPONSE,
                Some(ControlMessage::Config(field)) => self.answer_config(field),
                Some(ControlMessage::ConfigResponse(field)) => {
                    let peer_dic = field.map_or(false, |f| f.data_integrity_check());
                    self.use_dic = self.config_field.data_integrity_check() && peer_dic;
                    info!("link active, data integrity check: {}", self.use_dic);
                    self.state = LinkState::Active;
                    self.link_timer = None;
                    self.seq_nr = SeqNum::ZERO;
                    self.ack_nr = SeqNum::ZERO;
                    ports.emit_event(TransportEvent::PacketSent);
                }
                _ => {}
            },
            LinkState::Active => self.process_active(ports, header, control),
        }
    }

    fn process_active<C: Config>(
        &mut self,
        ports: &mut Ports<'_, C>,
        header: Header,
        control: Option<ControlMessage>,
    ) {
        if header.reliable() {
            if header.seq() != self.ack_nr {
                info!("expected seq {} but got {}", self.ack_nr, header.seq());
                self.frame_dropped();
                self.actions |= Actions::SEND_ACK;
                return;
            }
            self.ack_nr += SeqNum::ONE;
            self.actions |= Actions::SEND_ACK;
        }

        if header.reliable() || header.packet_type() == PacketType::Acknowledgement {
            let next_seq_nr = self.seq_nr + SeqNum::ONE;
            if self.pending.is_some() && header.ack() == next_seq_nr {
                debug!("packet with seq {} acknowledged", self.seq_nr);
                self.seq_nr = next_seq_nr;
                self.pending = None;
                self.link_timer = None;
                ports.emit_event(TransportEvent::PacketSent);
            }
        }

        match header.packet_type() {
            PacketType::LinkControl => match control {
                Some(ControlMessage::Config(field)) => self.answer_config(field),
                Some(ControlMessage::Sync) => {
                    warn!("received SYNC while active, peer was reset");
                    self.stats.peer_resets = self.stats.peer_resets.saturating_add(1);
                    self.leave_sleep(ports);
                    self.restart(ports.now());
                    self.actions |= Actions::SEND_SYNC_RESPONSE;
                }
                Some(ControlMessage::Sleep) => {
                    if self.sleep_mode != SleepMode::Off {
                        info!("peer is going to sleep, enabling UART sleep");
                        ports.uart.set_sleep(self.sleep_mode);
                        self.emit_sleep_state(ports, true);
                    } else {
                        info!("peer is going to sleep, UART sleep not supported");
                    }
                    self.peer_asleep = true;
                }
                Some(ControlMessage::Wakeup) => {
                    info!("peer woke us up");
                    self.actions |= Actions::SEND_WOKEN;
                    self.peer_awake(ports);
                }
                Some(ControlMessage::Woken) => {
                    info!("peer is awake");
                    self.peer_awake(ports);
                }
                _ => {}
            },
            PacketType::Event | PacketType::AclData | PacketType::ScoData => {
                self.peer_awake(ports);
                let payload = self.payload(header);
                ports.emit(header.packet_type(), payload);
                self.restart_inactivity_timer(ports.now());
            }
            _ => {}
        }
    }

    fn answer_config(&mut self, field: Option<ConfigField>) {
        match field {
            Some(field) => {
                debug!("peer config {:?} ({:?})", field, Hex(field.raw()));
                self.actions |= Actions::SEND_CONFIG_RESPONSE;
            }
            None => self.actions |= Actions::SEND_CONFIG_RESPONSE_EMPTY,
        }
    }

    /// Notes that the peer is awake, sending a packet that was held back while it slept.
    fn peer_awake<C: Config>(&mut self, ports: &mut Ports<'_, C>) {
        self.leave_sleep(ports);
        if !self.peer_asleep {
            return;
        }
        self.peer_asleep = false;
        if self.pending.is_some() {
            self.actions |= Actions::SEND_QUEUED_PACKET;
            self.link_timer = Some(ports.now() + self.resend_timeout);
        }
    }

    /// Takes the UART out of its low-power state, if it is in one.
    fn leave_sleep<C: Config>(&mut self, ports: &mut Ports<'_, C>) {
        if !self.sleep_reported {
            return;
        }
        if self.sleep_mode != SleepMode::Off {
            info!("disabling UART sleep");
            ports.uart.set_sleep(SleepMode::Off);
        }
        self.emit_sleep_state(ports, false);
    }

    fn emit_sleep_state<C: Config>(&mut self, ports: &mut Ports<'_, C>, active: bool) {
        if active == self.sleep_reported {
            return;
        }
        self.sleep_reported = active;
        info!("sleep mode active: {}", active);
        ports.emit_event(TransportEvent::SleepMode(active));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resend_timeouts() {
        assert_eq!(resend_timeout(115_200), Duration::from_millis(213));
        assert_eq!(resend_timeout(921_600), Duration::from_millis(26));
        assert_eq!(resend_timeout(9_600), Duration::from_millis(2560));
        assert_eq!(RX_BUF_LEN, 1024);
    }
}
