use crate::error::Error;
use core::time::Duration;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_serial::{
    ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, SerialStream,
    StopBits,
};
use tracing::error;

/// Anything whose pending input can be thrown away.
pub(crate) trait DiscardInput {
    fn discard_input(&self) -> io::Result<()>;
}

impl DiscardInput for SerialStream {
    fn discard_input(&self) -> io::Result<()> {
        self.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}

/// Splits a byte stream into newline terminated fragments.
pub(crate) struct LineSource<R> {
    reader: BufReader<R>,
}

pub(crate) type SerialSource = LineSource<SerialStream>;

impl SerialSource {
    pub(crate) fn open(port: &str, baud: u32) -> Result<Self, Error> {
        let stream = tokio_serial::new(port, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()
            .map_err(|source| {
                error!("Failed to open serial port {port} with error {source}");
                Error::SerialOpen {
                    port: port.to_owned(),
                    source,
                }
            })?;

        Ok(Self::new(stream))
    }
}

impl<R: AsyncRead + Unpin> LineSource<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }
}

impl<R: AsyncRead + DiscardInput + Unpin> super::FragmentSource for LineSource<R> {
    fn clear_input(&mut self) -> Result<(), Error> {
        let buffered = self.reader.buffer().len();
        self.reader.consume(buffered);

        self.reader
            .get_ref()
            .discard_input()
            .map_err(Error::ClearInput)
    }

    async fn receive_fragment(
        &mut self,
        buffer: &mut Vec<u8>,
        timeout: Duration,
    ) -> Result<(), Error> {
        buffer.clear();

        // A timed out read leaves the partial line in the buffer.
        match tokio::time::timeout(timeout, self.reader.read_until(b'\n', buffer)).await {
            Ok(Ok(0)) => Err(Error::SerialClosed),
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => Ok(()),
            Ok(Err(e)) => {
                error!("Serial error: {e}");
                Err(Error::SerialRead(e))
            }
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
impl DiscardInput for tokio::io::DuplexStream {
    fn discard_input(&self) -> io::Result<()> {
        Ok(())
    }
}
