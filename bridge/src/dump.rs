use crate::error::Error;
use core::convert::Infallible;
use rosc::{OscPacket, OscType};
use tokio::net::UdpSocket;
use tracing::{info, warn};

/// Logs every OSC message arriving at `bind`.
pub(crate) async fn run(bind: &str) -> Result<Infallible, Error> {
    let socket = UdpSocket::bind(bind).await.map_err(|source| Error::Bind {
        address: bind.to_owned(),
        source,
    })?;
    info!("Listening for OSC on {bind}");

    let mut buffer = vec![0u8; rosc::decoder::MTU];

    loop {
        let (len, from) = socket
            .recv_from(&mut buffer)
            .await
            .map_err(Error::Receive)?;

        match rosc::decoder::decode_udp(&buffer[..len]) {
            Ok((_, packet)) => {
                for line in describe(&packet) {
                    info!("{from}: {line}");
                }
            }
            Err(e) => warn!("Failed to decode {len} bytes from {from}: {e}"),
        }
    }
}

/// One line per message, e.g. `/sensors [123, 456]`; bundles are flattened.
fn describe(packet: &OscPacket) -> Vec<String> {
    match packet {
        OscPacket::Message(msg) => {
            let args: Vec<String> = msg
                .args
                .iter()
                .map(|arg| match arg {
                    OscType::Int(v) => v.to_string(),
                    OscType::Long(v) => v.to_string(),
                    OscType::Float(v) => v.to_string(),
                    OscType::Double(v) => v.to_string(),
                    OscType::String(v) => format!("{v:?}"),
                    other => format!("{other:?}"),
                })
                .collect();
            vec![format!("{} [{}]", msg.addr, args.join(", "))]
        }
        OscPacket::Bundle(bundle) => bundle.content.iter().flat_map(describe).collect(),
    }
}
