use core::fmt;

/// Errors returned by the H5 transport.
///
/// Conditions caused by a noisy or misbehaving line (bad checksums, unexpected sequence numbers,
/// stray control messages) are never reported through this type. They are handled inside the link
/// layer and only show up in [`LinkStats`].
///
/// [`LinkStats`]: link/struct.LinkStats.html
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A packet does not fit into the 12-bit payload length field of an H5 frame.
    InvalidLength,

    /// A packet was submitted while the transport could not accept one.
    ///
    /// Callers have to check `can_send_packet_now` first; this is a usage error, not a transient
    /// condition.
    Busy,

    /// The transport was opened before being configured with `init`.
    NotInitialized,

    /// The transport configuration passed to `init` does not describe a UART.
    UnsupportedConfig,

    /// The operation requires an open transport.
    NotOpen,

    /// The UART driver reported a failure.
    Uart,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::InvalidLength => "packet too long for an H5 frame",
            Error::Busy => "transport cannot accept a packet now",
            Error::NotInitialized => "transport has not been configured",
            Error::UnsupportedConfig => "transport configuration is not a UART configuration",
            Error::NotOpen => "transport is not open",
            Error::Uart => "UART driver failure",
        })
    }
}
