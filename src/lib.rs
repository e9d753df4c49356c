//! A minimal recursive DNS resolver.
//!
//! Starting from a set of seed (normally root) nameservers, [`resolve`]
//! follows NS delegations, CNAME aliases and glue records until a
//! nameserver gives an answer. Dotted IPv4 addresses are looked up in
//! reverse, via their PTR record.
//!
//! ```rust,no_run
//! let seeds = rootwalk::seed::load("root-servers.txt")?;
//! let address = rootwalk::resolve("www.example.com", &seeds)?;
//! println!("www.example.com resolves to {}", address);
//! # Ok::<(), rootwalk::Error>(())
//! ```
pub mod clients;
mod display;
pub mod dns;
mod errors;
pub mod io;
pub mod referral;
pub mod resource;
pub mod seed;
pub mod types;
pub mod util;

#[macro_use]
extern crate num_derive;

pub use crate::types::*;

#[doc(inline)]
pub use crate::errors::{Error, Result};

#[doc(inline)]
pub use crate::clients::{Resolver, ResolverConfig};

#[doc(inline)]
pub use crate::referral::MatchAgainst;

/// Resolves `target` starting from the `seed` nameservers, over UDP with the
/// default [`ResolverConfig`].
///
/// Returns the IPv4 address for a hostname, or the hostname for a dotted
/// IPv4 address.
#[cfg(feature = "udp")]
pub fn resolve(target: &str, seed: &[NameServer]) -> Result<String> {
    Resolver::new(seed.to_vec()).resolve(target)
}
