use crate::error::Error;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::SocketAddr;
use theremin_line_protocol::SamplePair;
use tokio::net::UdpSocket;
use tracing::error;

/// Sends each pair as an OSC message of two `int32` arguments over UDP.
///
/// The socket is left unconnected, so a missing listener never surfaces as a
/// send error.
pub(crate) struct OscSink {
    socket: UdpSocket,
    target: SocketAddr,
    address: String,
}

impl OscSink {
    pub(crate) async fn new(host: &str, port: u16, address: &str) -> Result<Self, Error> {
        let name = format!("{host}:{port}");

        let target = tokio::net::lookup_host((host, port))
            .await
            .map_err(|source| Error::ResolveTarget {
                target: name.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| Error::NoTargetAddress(name))?;

        let local = match target {
            SocketAddr::V4(_) => "0.0.0.0:0",
            SocketAddr::V6(_) => "[::]:0",
        };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|source| Error::Bind {
                address: local.to_owned(),
                source,
            })?;

        Ok(Self {
            socket,
            target,
            address: address.to_owned(),
        })
    }

    pub(crate) fn target(&self) -> SocketAddr {
        self.target
    }
}

impl super::PairSink for OscSink {
    async fn send_pair(&mut self, pair: SamplePair) -> Result<(), Error> {
        let packet = encode(&self.address, pair)?;

        self.socket
            .send_to(&packet, self.target)
            .await
            .map_err(|e| {
                error!("Failed to send to {} with error {e}", self.target);
                Error::Send(e)
            })?;

        Ok(())
    }
}

pub(crate) fn encode(address: &str, pair: SamplePair) -> Result<Vec<u8>, Error> {
    let message = OscMessage {
        addr: address.to_owned(),
        args: vec![OscType::Int(pair.a), OscType::Int(pair.b)],
    };

    encoder::encode(&OscPacket::Message(message)).map_err(Error::Encode)
}
