use crate::error::Error;
use core::time::Duration;
use theremin_line_protocol::SamplePair;

/// Somewhere sensor lines are read from.
#[allow(async_fn_in_trait)]
pub(crate) trait FragmentSource {
    /// Discards anything received before the call.
    fn clear_input(&mut self) -> Result<(), Error>;

    /// Reads at most one newline terminated fragment into `buffer`, waiting no
    /// longer than `timeout`.
    ///
    /// On timeout `buffer` holds whatever part of a line had arrived, which may
    /// be nothing.
    async fn receive_fragment(
        &mut self,
        buffer: &mut Vec<u8>,
        timeout: Duration,
    ) -> Result<(), Error>;
}

/// Somewhere sample pairs are sent to, without acknowledgement.
#[allow(async_fn_in_trait)]
pub(crate) trait PairSink {
    async fn send_pair(&mut self, pair: SamplePair) -> Result<(), Error>;
}

pub(crate) mod osc;
pub(crate) mod serialport;

#[cfg(test)]
pub(crate) mod tokio_channels;
