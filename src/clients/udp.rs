use crate::clients::stats::StatsBuilder;
use crate::clients::{Connector, Exchanger};
use crate::errors::Error;
use log::{debug, trace};
use std::io;
use std::net::SocketAddr;
use std::net::UdpSocket;
use std::time::Duration;

/// Large enough for any UDP reply without EDNS(0), with room to spare.
const MAX_RESPONSE_SIZE: usize = 1500;

/// A UDP DNS Client, wrapping one socket.
///
/// The socket is not connected, so any datagram that arrives is taken as
/// the reply. Neither the source address nor the message id is checked.
///
/// # Example
///
/// ```rust,no_run
/// use rootwalk::clients::{Exchanger, UdpClient};
/// use rootwalk::Message;
/// use std::time::Duration;
///
/// fn main() -> Result<(), rootwalk::Error> {
///     let query = Message::query("bramp.net").to_vec()?;
///
///     let mut client = UdpClient::bind(Duration::from_secs(1))?;
///     let reply = client.exchange("198.41.0.4:53".parse().unwrap(), &query)?;
///
///     println!("{}", Message::from_slice(&reply)?);
///     Ok(())
/// }
/// ```
///
/// See <https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1>
pub struct UdpClient {
    socket: UdpSocket,
}

impl UdpClient {
    /// Creates a new UdpClient on a ephemeral port, waiting at most
    /// `read_timeout` for each reply.
    pub fn bind(read_timeout: Duration) -> Result<Self, Error> {
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(Error::Socket)?;
        socket
            .set_read_timeout(Some(read_timeout))
            .map_err(Error::Socket)?;

        Ok(Self { socket })
    }
}

impl Exchanger for UdpClient {
    /// Sends the query to the `server` via UDP and returns the reply.
    fn exchange(&mut self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, Error> {
        let stats = StatsBuilder::start(query.len());
        self.socket.send_to(query, server)?;

        let mut buf = [0; MAX_RESPONSE_SIZE];
        let (len, from) = match self.socket.recv_from(&mut buf) {
            Ok(r) => r,

            // Unix reports WouldBlock, Windows TimedOut.
            Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => {
                return Err(Error::Timeout)
            }
            Err(e) => return Err(e.into()),
        };

        if from != server {
            debug!("asked {} but the reply came from {}", server, from);
        }

        let stats = stats.end(from, len);
        debug!(
            "{} bytes from {} in {} msec",
            len,
            from,
            stats.duration.as_millis()
        );
        trace!("\n{}", stats);

        Ok(buf[..len].to_vec())
    }
}

/// Connects a new [`UdpClient`] for each level of the delegation.
#[derive(Clone, Debug)]
pub struct Udp {
    pub read_timeout: Duration,
}

impl Default for Udp {
    fn default() -> Self {
        Udp {
            read_timeout: Duration::from_secs(1),
        }
    }
}

impl Connector for Udp {
    type Exchanger = UdpClient;

    fn connect(&self) -> Result<UdpClient, Error> {
        UdpClient::bind(self.read_timeout)
    }
}
