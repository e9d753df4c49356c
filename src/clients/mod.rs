use crate::errors::Error;
use std::net::SocketAddr;

pub use self::resolver::{InOrder, NameServerSelector, Resolver, ResolverConfig, Seeded};
pub use self::stats::Stats;

#[cfg(feature = "udp")]
pub use self::udp::{Udp, UdpClient};

#[cfg(feature = "udp")]
pub mod udp;

mod resolver;
mod stats;

/// Exchanger sends one encoded query to one nameserver and returns the
/// encoded reply.
pub trait Exchanger {
    /// Sends `query` to `server` and waits for a reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if nothing arrives in time, or
    /// [`Error::Io`] if the query could not be sent.
    fn exchange(&mut self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, Error>;
}

/// Connector opens a new [`Exchanger`]. The resolver connects once per
/// level of the delegation, and reuses that exchanger for every nameserver
/// it tries at that level.
pub trait Connector {
    type Exchanger: Exchanger;

    /// # Errors
    ///
    /// Returns [`Error::Socket`] if no exchanger could be created. The
    /// resolver gives up entirely when this happens.
    fn connect(&self) -> Result<Self::Exchanger, Error>;
}
