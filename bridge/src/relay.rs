use crate::{
    error::Error,
    transport::{FragmentSource, PairSink},
};
use core::{convert::Infallible, time::Duration};
use theremin_line_protocol::{LineParser, SamplePair};
use tokio::{sync::watch, time::Instant};
use tracing::{info, warn};

/// How long the device may stay quiet before it is reported as silent.
const SILENCE_WARNING: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub(crate) struct RelayConfig {
    pub(crate) no_signal: i32,
    pub(crate) rate_hz: u32,
    pub(crate) read_timeout: Duration,
}

impl RelayConfig {
    pub(crate) fn period(&self) -> Duration {
        Duration::from_secs(1) / self.rate_hz.max(1)
    }
}

/// Forwards the most recent reading from a [`FragmentSource`] to a
/// [`PairSink`] at a fixed rate.
///
/// Reading and sending run side by side on one task. The sender always
/// sends whatever pair was stored last, so a quiet device produces a stream
/// of stale values rather than a gap in the output.
pub(crate) struct Relay {
    parser: LineParser,
    period: Duration,
    read_timeout: Duration,
}

impl Relay {
    pub(crate) fn new(config: &RelayConfig) -> Self {
        Self {
            parser: LineParser::new(config.no_signal),
            period: config.period(),
            read_timeout: config.read_timeout,
        }
    }

    /// Runs until either transport fails.
    pub(crate) async fn run<S: FragmentSource, K: PairSink>(
        &self,
        mut source: S,
        sink: K,
    ) -> Result<Infallible, Error> {
        if let Err(e) = source.clear_input() {
            warn!("Stale input was not discarded: {e}");
        }

        let (tx, rx) = watch::channel(self.parser.no_signal_pair());

        tokio::select! {
            result = self.sample(source, tx) => result,
            result = self.emit(sink, rx) => result,
        }
    }

    async fn sample<S: FragmentSource>(
        &self,
        mut source: S,
        latest: watch::Sender<SamplePair>,
    ) -> Result<Infallible, Error> {
        let mut buffer = Vec::new();
        let mut liveness = Liveness::new(Instant::now());

        loop {
            source
                .receive_fragment(&mut buffer, self.read_timeout)
                .await?;

            if buffer.is_empty() {
                liveness.quiet(Instant::now());
            } else {
                latest.send_replace(self.parser.parse(&buffer));
                liveness.received(Instant::now());
            }
        }
    }

    async fn emit<K: PairSink>(
        &self,
        mut sink: K,
        latest: watch::Receiver<SamplePair>,
    ) -> Result<Infallible, Error> {
        let mut cadence = Cadence::new(Instant::now(), self.period);

        loop {
            tokio::time::sleep_until(cadence.due()).await;
            let started = Instant::now();

            let pair = *latest.borrow();
            sink.send_pair(pair).await?;

            cadence.sent(started);
        }
    }
}

/// Send times for the emitter.
///
/// Sends stay on a fixed grid while they keep up, so the rate does not drift.
/// A send that starts too late for the next grid slot to be at least 90% of a
/// period away moves the grid to start one full period after it.
struct Cadence {
    period: Duration,
    due: Instant,
}

impl Cadence {
    fn new(start: Instant, period: Duration) -> Self {
        Self { period, due: start }
    }

    fn due(&self) -> Instant {
        self.due
    }

    fn sent(&mut self, started: Instant) {
        let on_grid = self.due + self.period;

        self.due = if on_grid < started + self.period * 9 / 10 {
            started + self.period
        } else {
            on_grid
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceState {
    Waiting,
    Receiving,
    Silent,
}

/// Logs transitions between the device talking and going quiet.
struct Liveness {
    state: DeviceState,
    last_fragment: Instant,
}

impl Liveness {
    fn new(now: Instant) -> Self {
        Self {
            state: DeviceState::Waiting,
            last_fragment: now,
        }
    }

    fn received(&mut self, now: Instant) {
        match self.state {
            DeviceState::Waiting => info!("Receiving data from device"),
            DeviceState::Silent => info!("Device is sending data again"),
            DeviceState::Receiving => {}
        }

        self.state = DeviceState::Receiving;
        self.last_fragment = now;
    }

    fn quiet(&mut self, now: Instant) {
        let quiet_for = now.duration_since(self.last_fragment);

        if self.state != DeviceState::Silent && quiet_for >= SILENCE_WARNING {
            warn!("No data from device for {quiet_for:?}, repeating last values");
            self.state = DeviceState::Silent;
        }
    }
}
