//! The H5 transport as seen by the HCI layer.

use crate::config::{Config, TransportConfig, UartConfig};
use crate::link::header::PacketType;
use crate::link::{LinkLayer, LinkState, LinkStats, NextUpdate, Ports};
use crate::time::Duration;
use crate::uart::{Parity, SleepMode, SleepModes, Uart};
use crate::Error;

/// An H5 transport running over a UART.
///
/// The transport owns the UART driver, the timer and the packet handler supplied via the
/// [`Config`] `C`. Packets passed to [`send_packet`](#method.send_packet) are borrowed for `'a` and
/// transmitted straight from the caller's buffer.
///
/// Every method that can start a transmission or arm a timer returns a [`NextUpdate`] telling the
/// caller when [`update`](#method.update) has to be called next. Each returned value replaces the
/// previous one.
pub struct Transport<'a, C: Config> {
    uart: C::Uart,
    timer: C::Timer,
    handler: Option<C::PacketHandler>,
    uart_config: Option<UartConfig>,
    baudrate: u32,
    bcsp_mode: bool,
    open: bool,
    link: LinkLayer<'a>,
}

impl<'a, C: Config> Transport<'a, C> {
    /// Creates a transport using the given UART driver and timer.
    ///
    /// The transport has to be configured with [`init`](#method.init) before it can be opened.
    pub fn new(uart: C::Uart, timer: C::Timer) -> Self {
        Self {
            uart,
            timer,
            handler: None,
            uart_config: None,
            baudrate: 0,
            bcsp_mode: false,
            open: false,
            link: LinkLayer::new(),
        }
    }

    /// Configures the transport and passes the line settings to the UART driver.
    ///
    /// Only [`TransportConfig::Uart`] is accepted. The device is not opened yet. An open transport
    /// is closed first.
    pub fn init(&mut self, config: &TransportConfig) -> Result<(), Error> {
        let uart_config = match config {
            TransportConfig::Uart(uart_config) => uart_config,
            _ => {
                error!("H5 needs a UART transport configuration, got {:?}", config);
                return Err(Error::UnsupportedConfig);
            }
        };

        if self.open {
            info!("reconfiguring open transport, closing it first");
            self.close()?;
        }
        self.baudrate = uart_config.baudrate_init;
        self.uart.init(uart_config);
        self.uart_config = Some(uart_config.clone());
        Ok(())
    }

    /// Opens the UART and starts link establishment.
    pub fn open(&mut self) -> Result<NextUpdate, Error> {
        if self.uart_config.is_none() {
            error!("H5 transport opened without configuration");
            return Err(Error::NotInitialized);
        }

        self.uart.open()?;

        if self.bcsp_mode {
            info!("enabling even parity for BCSP mode");
            if let Err(e) = self.uart.set_parity(Parity::Even) {
                error!("failed to enable even parity: {}", e);
                self.uart.close()?;
                return Err(e);
            }
        }

        let sleep_mode = if self
            .uart
            .supported_sleep_modes()
            .contains(SleepModes::RTS_LOW_WAKE_ON_RX_EDGE)
        {
            info!("using wake on RX");
            SleepMode::RtsLowWakeOnRxEdge
        } else {
            info!("UART driver does not provide a compatible sleep mode");
            SleepMode::Off
        };
        self.link.set_sleep_mode(sleep_mode);
        self.link.set_baudrate(self.baudrate);

        self.open = true;
        let next_update = self.with_link(|link, ports| link.start(ports));
        self.uart.receive_block(1);
        Ok(next_update)
    }

    /// Stops the link and closes the UART.
    pub fn close(&mut self) -> Result<(), Error> {
        self.open = false;
        self.link.stop();
        self.uart.close()
    }

    /// Sets the receiver of incoming HCI packets and transport events, replacing any previous one.
    pub fn register_packet_handler(&mut self, handler: C::PacketHandler) {
        self.handler = Some(handler);
    }

    /// Returns whether [`send_packet`](#method.send_packet) will accept a packet.
    ///
    /// This is the case when the link is active and the previous packet has been acknowledged.
    pub fn can_send_packet_now(&self) -> bool {
        self.open && self.link.can_send_packet_now()
    }

    /// Sends an HCI packet reliably.
    ///
    /// The packet is borrowed until the transport reports it as sent with a
    /// [`TransportEvent::PacketSent`] event, or until the link is reset. Callers have to check
    /// [`can_send_packet_now`](#method.can_send_packet_now) first, otherwise `Error::Busy` is
    /// returned.
    ///
    /// [`TransportEvent::PacketSent`]: ../hci/enum.TransportEvent.html#variant.PacketSent
    pub fn send_packet(
        &mut self,
        packet_type: PacketType,
        packet: &'a [u8],
    ) -> Result<NextUpdate, Error> {
        if !self.open {
            error!("send_packet called on closed transport");
            return Err(Error::NotOpen);
        }
        self.with_link(|link, ports| link.send_packet(ports, packet_type, packet))
    }

    /// Changes the baud rate of the UART and adjusts the retransmission timeout.
    pub fn set_baudrate(&mut self, baudrate: u32) -> Result<(), Error> {
        info!("set_baudrate {}", baudrate);
        self.uart.set_baudrate(baudrate)?;
        self.baudrate = baudrate;
        self.link.set_baudrate(baudrate);
        Ok(())
    }

    /// Restarts link establishment.
    ///
    /// An outstanding packet is dropped without a `PacketSent` event.
    pub fn reset_link(&mut self) -> Result<NextUpdate, Error> {
        if !self.open {
            return Err(Error::NotOpen);
        }
        info!("reset_link");
        Ok(self.with_link(|link, ports| link.start(ports)))
    }

    /// Processes bytes received by the UART and requests the next byte.
    pub fn block_received(&mut self, bytes: &[u8]) -> NextUpdate {
        if !self.open {
            return NextUpdate::Disable;
        }
        let next_update = self.with_link(|link, ports| link.bytes_received(ports, bytes));
        self.uart.receive_block(1);
        next_update
    }

    /// Notifies the transport that the last block passed to `Uart::send_block` has been written.
    pub fn block_sent(&mut self) -> NextUpdate {
        if !self.open {
            return NextUpdate::Disable;
        }
        self.with_link(|link, ports| link.block_sent(ports))
    }

    /// Handles expired timers.
    ///
    /// Should be called at the time returned in the last [`NextUpdate`]. Calling it earlier is
    /// harmless.
    pub fn update(&mut self) -> NextUpdate {
        if !self.open {
            return NextUpdate::Disable;
        }
        self.with_link(|link, ports| link.update(ports))
    }

    /// Enables automatic sleep after `inactivity_timeout` without HCI traffic, or disables it.
    pub fn set_auto_sleep(&mut self, inactivity_timeout: Option<Duration>) {
        self.link.set_auto_sleep(inactivity_timeout);
    }

    /// Switches the UART to even parity when opened, for controllers starting in BCSP mode.
    pub fn enable_bcsp_mode(&mut self) {
        self.bcsp_mode = true;
    }

    /// Advertises support for the Data Integrity Check during link establishment.
    ///
    /// The check is only used if the controller supports it too. Takes effect on the next link
    /// establishment.
    pub fn set_data_integrity_check(&mut self, enabled: bool) {
        self.link.set_data_integrity_check(enabled);
    }

    /// Returns the link establishment state.
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Returns counters of recovered link errors.
    pub fn stats(&self) -> LinkStats {
        self.link.stats()
    }

    /// Returns the current retransmission timeout.
    pub fn resend_timeout(&self) -> Duration {
        self.link.resend_timeout()
    }

    /// Returns the baud rate the UART is running at.
    pub fn baudrate(&self) -> u32 {
        self.baudrate
    }

    /// Returns whether the transport is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns a reference to the UART driver.
    pub fn uart(&mut self) -> &mut C::Uart {
        &mut self.uart
    }

    /// Returns a reference to the timer.
    pub fn timer(&self) -> &C::Timer {
        &self.timer
    }

    fn with_link<R>(
        &mut self,
        f: impl FnOnce(&mut LinkLayer<'a>, &mut Ports<'_, C>) -> R,
    ) -> R {
        let mut ports = Ports {
            uart: &mut self.uart,
            timer: &self.timer,
            handler: self.handler.as_mut(),
        };
        f(&mut self.link, &mut ports)
    }
}
