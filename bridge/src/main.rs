mod dump;
mod error;
mod relay;
mod transport;

use crate::{
    relay::{Relay, RelayConfig},
    transport::{osc::OscSink, serialport::SerialSource},
};
use clap::{Parser, Subcommand};
use core::{convert::Infallible, time::Duration};
use theremin_line_protocol::DEFAULT_NO_SIGNAL;
use tracing::{error, info};

/// Relays theremin sensor readings from a serial port to OSC.
#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Forward readings from the sensor board to an OSC listener
    Relay(RelayArgs),

    /// Print OSC messages received on a UDP port
    Dump {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:57120")]
        bind: String,
    },
}

#[derive(clap::Args)]
struct RelayArgs {
    /// Serial port
    #[arg(short, long)]
    port: String,

    /// Serial baud rate
    #[arg(short, long, default_value_t = 460_800)]
    baud: u32,

    /// Host to send OSC messages to
    #[arg(long, default_value = "127.0.0.1")]
    osc_host: String,

    /// Port to send OSC messages to
    #[arg(long, default_value_t = 57120)]
    osc_port: u16,

    /// OSC address pattern of the sent messages
    #[arg(long, default_value = "/sensors", value_parser = parse_osc_address)]
    osc_address: String,

    /// Value sent for a sensor that has no reading
    #[arg(long, default_value_t = DEFAULT_NO_SIGNAL, allow_negative_numbers = true)]
    no_signal: i32,

    /// Messages sent per second
    #[arg(short, long, default_value_t = 200, value_parser = clap::value_parser!(u32).range(1..=10_000))]
    rate: u32,

    /// Longest wait for a line from the serial port, in milliseconds
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    read_timeout: u64,
}

fn parse_osc_address(s: &str) -> Result<String, String> {
    if s.starts_with('/') && !s.contains(char::is_whitespace) {
        Ok(s.to_owned())
    } else {
        Err("must start with '/' and contain no whitespace".to_owned())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Relay(args) => relay(args).await,
        Command::Dump { bind } => dump::run(&bind).await,
    };

    if let Err(e) = result {
        error!("{e}");
        ::std::process::exit(1);
    }
}

async fn relay(args: RelayArgs) -> Result<Infallible, error::Error> {
    info!(
        "theremin-bridge {}",
        git_version::git_version!(fallback = "unknown")
    );

    let config = RelayConfig {
        no_signal: args.no_signal,
        rate_hz: args.rate,
        read_timeout: Duration::from_millis(args.read_timeout),
    };

    let source = SerialSource::open(&args.port, args.baud)?;
    info!("Reading from {} at {} baud", args.port, args.baud);

    let sink = OscSink::new(&args.osc_host, args.osc_port, &args.osc_address).await?;
    info!(
        "Sending {} to {} at {} Hz (period {:?}), no signal value {}",
        args.osc_address,
        sink.target(),
        config.rate_hz,
        config.period(),
        config.no_signal,
    );

    Relay::new(&config).run(source, sink).await
}

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    tracing_subscriber::fmt().with_test_writer().init();
}
