//! Transport configuration.

use crate::{hci::PacketHandler, time::Timer, uart::Uart};

/// Trait for transport configurations.
///
/// This trait bundles the hardware interface types used by the transport. Every application must
/// define a type implementing this trait and supply it to [`Transport`].
///
/// [`Transport`]: ../transport/struct.Transport.html
pub trait Config {
    /// A timesource with at least millisecond resolution.
    type Timer: Timer;

    /// The UART driver the H5 link runs over.
    type Uart: Uart;

    /// Receiver of incoming HCI packets and transport events.
    type PacketHandler: PacketHandler;
}

/// Runtime configuration of an HCI transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Serial transport settings.
    Uart(UartConfig),

    /// USB transports need no settings. Not usable with H5.
    Usb,
}

/// Settings of a UART based transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate used to talk to the controller after reset.
    pub baudrate_init: u32,

    /// Baud rate the controller is switched to once it is up.
    ///
    /// The transport itself always starts out with `baudrate_init`. Switching is done by the HCI
    /// layer, which then calls `Transport::set_baudrate`.
    pub baudrate_main: u32,

    /// Whether RTS/CTS hardware flow control is used.
    pub flow_control: bool,

    /// Name of the serial device, for drivers that need one.
    pub device_name: Option<&'static str>,
}

impl UartConfig {
    /// Creates a configuration running at `baudrate` throughout, without flow control.
    pub fn new(baudrate: u32) -> Self {
        Self {
            baudrate_init: baudrate,
            baudrate_main: baudrate,
            flow_control: false,
            device_name: None,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::new(115_200)
    }
}
