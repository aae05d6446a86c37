use crate::error::Error;
use theremin_line_protocol::SamplePair;
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    time::Instant,
};

/// Records every pair sent along with the time it was sent.
pub(crate) struct ChannelSink {
    tx: UnboundedSender<(Instant, SamplePair)>,
}

impl ChannelSink {
    pub(crate) fn new() -> (Self, UnboundedReceiver<(Instant, SamplePair)>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl super::PairSink for ChannelSink {
    async fn send_pair(&mut self, pair: SamplePair) -> Result<(), Error> {
        // Nobody listening is not a failure for a fire and forget sink.
        let _ = self.tx.send((Instant::now(), pair));
        Ok(())
    }
}

pub(crate) fn drain<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}
