//! Interface to the UART driver.
//!
//! The transport never blocks on the UART. Writes and reads are requested through the [`Uart`]
//! trait, and their completion is reported back to the transport by the platform:
//! * Once a block passed to [`Uart::send_block`] has been written, call
//!   `Transport::block_sent`.
//! * Once the bytes requested with [`Uart::receive_block`] have arrived, pass them to
//!   `Transport::block_received`.

use crate::{config::UartConfig, Error};
use bitflags::bitflags;

/// Parity setting of the serial line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
}

/// Low-power mode of the UART.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SleepMode {
    /// Normal operation.
    Off,

    /// RTS is pulled high, a pulse on CTS wakes the UART.
    RtsHighWakeOnCtsPulse,

    /// RTS is pulled low, an edge on RX wakes the UART.
    RtsLowWakeOnRxEdge,
}

bitflags! {
    /// The set of low-power modes a UART driver supports.
    pub struct SleepModes: u8 {
        /// [`SleepMode::RtsHighWakeOnCtsPulse`] is supported.
        const RTS_HIGH_WAKE_ON_CTS_PULSE = 1 << 1;
        /// [`SleepMode::RtsLowWakeOnRxEdge`] is supported.
        const RTS_LOW_WAKE_ON_RX_EDGE = 1 << 2;
    }
}

/// Trait for UART drivers.
///
/// At most one write and one read are outstanding at any time.
pub trait Uart {
    /// Stores the line configuration. The device is not opened yet.
    fn init(&mut self, config: &UartConfig);

    /// Opens the device.
    fn open(&mut self) -> Result<(), Error>;

    /// Closes the device.
    fn close(&mut self) -> Result<(), Error>;

    /// Starts writing `data` to the line.
    ///
    /// The driver must copy `data` (or write it out) before returning, the transport reuses the
    /// buffer for the next chunk.
    fn send_block(&mut self, data: &[u8]);

    /// Requests the next `len` received bytes.
    fn receive_block(&mut self, len: usize);

    /// Changes the baud rate.
    fn set_baudrate(&mut self, baudrate: u32) -> Result<(), Error>;

    /// Changes the parity setting.
    ///
    /// Only needed for controllers that start out in BCSP mode.
    fn set_parity(&mut self, parity: Parity) -> Result<(), Error> {
        let _ = parity;
        Ok(())
    }

    /// Returns the low-power modes this driver can enter.
    fn supported_sleep_modes(&self) -> SleepModes {
        SleepModes::empty()
    }

    /// Enters or leaves a low-power mode.
    ///
    /// Only called with modes reported by [`supported_sleep_modes`](#method.supported_sleep_modes)
    /// and [`SleepMode::Off`].
    fn set_sleep(&mut self, mode: SleepMode) {
        let _ = mode;
    }
}
