use std::io;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("Failed to open serial port {port}: {source}")]
    SerialOpen {
        port: String,
        source: tokio_serial::Error,
    },

    #[error("Serial read error: {0}")]
    SerialRead(io::Error),

    #[error("Failed to clear serial input buffer: {0}")]
    ClearInput(io::Error),

    #[error("Serial port closed")]
    SerialClosed,

    #[error("Failed to resolve OSC target {target}: {source}")]
    ResolveTarget { target: String, source: io::Error },

    #[error("OSC target {0} did not resolve to any address")]
    NoTargetAddress(String),

    #[error("Failed to bind UDP socket {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("OSC encode error: {0}")]
    Encode(rosc::OscError),

    #[error("OSC send error: {0}")]
    Send(io::Error),

    #[error("UDP receive error: {0}")]
    Receive(io::Error),
}
