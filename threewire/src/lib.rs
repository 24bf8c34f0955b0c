//! A Bluetooth HCI transport implementing the *Three-Wire UART Transport Layer* (H5).
//!
//! H5 carries HCI packets over a plain asynchronous serial line (RX, TX and GND only, no RTS/CTS).
//! Frames are delimited and escaped with SLIP, carry a 4-byte header with 3-bit sequence and
//! acknowledgement numbers, and reliable frames are retransmitted until the peer acknowledges
//! them. A small set of link control messages handles link establishment and sleep/wake
//! negotiation.
//!
//! # Using the transport
//!
//! The transport is runtime and hardware-agnostic: It does not need an RTOS and never blocks. It is
//! driven from a single thread of control through three kinds of events:
//! * Bytes arrived from the UART: [`Transport::block_received`].
//! * A block handed to [`Uart::send_block`] has been written: [`Transport::block_sent`].
//! * The deadline returned in a [`NextUpdate`] has been reached: [`Transport::update`].
//!
//! Interrupt handlers must not call into the transport directly; they have to hand the event off
//! to the thread that owns it.
//!
//! Hardware-specific services are supplied through a [`Config`] implementation:
//! * A millisecond-or-better [`Timer`].
//! * A [`Uart`] driver.
//! * A [`PacketHandler`] that receives reassembled HCI packets and transport events.
//!
//! [`Transport::block_received`]: transport/struct.Transport.html#method.block_received
//! [`Transport::block_sent`]: transport/struct.Transport.html#method.block_sent
//! [`Transport::update`]: transport/struct.Transport.html#method.update
//! [`Uart::send_block`]: uart/trait.Uart.html#tymethod.send_block
//! [`NextUpdate`]: link/enum.NextUpdate.html
//! [`Config`]: config/trait.Config.html
//! [`Timer`]: time/trait.Timer.html
//! [`Uart`]: uart/trait.Uart.html
//! [`PacketHandler`]: hci/trait.PacketHandler.html

// We're `#[no_std]`, except when we're testing
#![cfg_attr(not(test), no_std)]
// Deny a few warnings in doctests, since rustdoc `allow`s many warnings by default
#![doc(test(attr(deny(unused_imports, unused_must_use))))]
#![warn(rust_2018_idioms)]
// The claims of this lint are dubious, disable it
#![allow(clippy::trivially_copy_pass_by_ref)]

#[macro_use]
mod log;
#[macro_use]
mod utils;
pub mod config;
pub mod crc;
mod error;
pub mod hci;
pub mod link;
pub mod slip;
pub mod time;
pub mod transport;
pub mod uart;


pub use self::error::Error;
pub use self::link::NextUpdate;
pub use self::transport::Transport;
