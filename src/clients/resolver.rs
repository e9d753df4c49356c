use crate::clients::{Connector, Exchanger};
use crate::dns::question_for;
use crate::errors::Error;
use crate::referral::{MatchAgainst, Referral};
use crate::types::*;
use crate::util::{hexdump, names_eq};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Settings that change how a [`Resolver`] walks the delegation tree.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// How long to wait for each nameserver to reply.
    pub timeout: Duration,

    /// Destination port for every query.
    pub port: u16,

    /// Which name an A record must belong to, to be the answer.
    pub match_against: MatchAgainst,

    /// Maximum number of delegations followed, counting glue lookups.
    pub max_depth: usize,

    /// Maximum number of times a lookup is restarted from the seed
    /// nameservers to follow a CNAME.
    pub max_cname_hops: usize,

    /// Log every query and response in full.
    pub verbose: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            timeout: Duration::from_secs(1),
            port: 53,
            match_against: MatchAgainst::default(),
            max_depth: 16,
            max_cname_hops: 8,
            verbose: false,
        }
    }
}

/// Chooses which nameserver to try next.
pub trait NameServerSelector {
    /// Returns the index of one of `candidates`, which is never empty.
    fn select(&self, candidates: &[NameServer]) -> usize;
}

/// Tries nameservers in the order they were given.
#[derive(Clone, Copy, Debug, Default)]
pub struct InOrder;

impl NameServerSelector for InOrder {
    fn select(&self, _candidates: &[NameServer]) -> usize {
        0
    }
}

/// Tries nameservers in a random order, repeatable for a given seed.
#[derive(Debug)]
pub struct Seeded {
    rng: RefCell<StdRng>,
}

impl Seeded {
    pub fn new(seed: u64) -> Seeded {
        Seeded {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl NameServerSelector for Seeded {
    fn select(&self, candidates: &[NameServer]) -> usize {
        self.rng.borrow_mut().gen_range(0..candidates.len())
    }
}

/// What is being looked up, fixed for the whole of one resolution.
struct Lookup {
    /// The name first asked for (for reverse lookups, the in-addr.arpa name).
    original: String,
    r#type: Type,
}

/// Per level state, as the resolver descends.
#[derive(Clone, Copy)]
struct Level<'a> {
    depth: usize,
    cname_hops: usize,

    /// Nameserver names whose addresses are being looked up by the callers
    /// of this level.
    glue_for: &'a [String],
}

/// A recursive resolver, that starts at the seed (normally root)
/// nameservers and follows delegations until it finds an answer.
///
/// See [rfc1034#section-5.3.3] for the general algorithm.
///
/// [rfc1034#section-5.3.3]: https://datatracker.ietf.org/doc/html/rfc1034#section-5.3.3
pub struct Resolver<C, S = InOrder> {
    connector: C,
    selector: S,
    config: ResolverConfig,

    /// Never modified. Every level that starts from the top gets a copy.
    seeds: Vec<NameServer>,
}

#[cfg(feature = "udp")]
impl Resolver<crate::clients::Udp> {
    /// Creates a new Resolver, that sends queries over UDP.
    pub fn new(seeds: Vec<NameServer>) -> Self {
        Resolver::with_config(seeds, ResolverConfig::default())
    }

    pub fn with_config(seeds: Vec<NameServer>, config: ResolverConfig) -> Self {
        let connector = crate::clients::Udp {
            read_timeout: config.timeout,
        };
        Resolver::with_connector(connector, InOrder, config, seeds)
    }
}

impl<C, S> Resolver<C, S>
where
    C: Connector,
    S: NameServerSelector,
{
    pub fn with_connector(
        connector: C,
        selector: S,
        config: ResolverConfig,
        seeds: Vec<NameServer>,
    ) -> Resolver<C, S> {
        Resolver {
            connector,
            selector,
            config,
            seeds,
        }
    }

    pub fn seeds(&self) -> &[NameServer] {
        &self.seeds
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a hostname into an IPv4 address, or a dotted IPv4 address
    /// into a hostname.
    ///
    /// # Errors
    ///
    /// [`Error::Socket`] if no socket could be created. Otherwise the error
    /// from whichever level of the delegation failed last, typically
    /// [`Error::Exhausted`] or [`Error::NoAnswer`].
    pub fn resolve(&self, target: &str) -> Result<String, Error> {
        let (name, r#type) = question_for(target);
        let lookup = Lookup {
            original: name.clone(),
            r#type,
        };

        let level = Level {
            depth: 0,
            cname_hops: 0,
            glue_for: &[],
        };

        let result = self.resolve_level(&lookup, &name, self.seeds.clone(), level);
        match &result {
            Ok(answer) => info!("{} resolves to {}", target, answer),
            Err(e) => info!("Could not resolve the name {}: {}", target, e),
        }
        result
    }

    fn resolve_level(
        &self,
        lookup: &Lookup,
        name: &str,
        nameservers: Vec<NameServer>,
        level: Level,
    ) -> Result<String, Error> {
        if level.depth > self.config.max_depth {
            return Err(Error::TooDeep(level.depth));
        }

        debug!(
            "Resolving {} using {} nameservers (depth {})",
            name,
            nameservers.len(),
            level.depth
        );

        let message = self.query_level(name, lookup.r#type, nameservers)?;
        let referral =
            Referral::classify(&message, &lookup.original, name, self.config.match_against);

        if let Some(answer) = referral.answer {
            return Ok(answer);
        }

        let next = Level {
            depth: level.depth + 1,
            ..level
        };

        if !referral.nameservers.is_empty() {
            let nameservers = self.resolve_glue(referral.nameservers, next)?;

            debug!("now resolving the hostname {}...", referral.current_name);
            return self.resolve_level(lookup, &referral.current_name, nameservers, next);
        }

        if referral.is_alias(name) {
            if level.cname_hops >= self.config.max_cname_hops {
                warn!("Too many CNAMEs while resolving {}", lookup.original);
                return Err(Error::NoAnswer(name.to_string()));
            }

            debug!(
                "{} is an alias for {}, starting again from the seed nameservers",
                name, referral.current_name
            );
            let next = Level {
                cname_hops: level.cname_hops + 1,
                ..next
            };
            return self.resolve_level(lookup, &referral.current_name, self.seeds.clone(), next);
        }

        Err(Error::NoAnswer(name.to_string()))
    }

    /// Looks up the address of every nameserver that didn't come with glue.
    ///
    /// Each is looked up independently, starting from the seeds. Failures
    /// leave the nameserver without an address, so it will be skipped.
    fn resolve_glue(
        &self,
        mut nameservers: Vec<NameServer>,
        level: Level,
    ) -> Result<Vec<NameServer>, Error> {
        for ns in nameservers.iter_mut().filter(|ns| ns.address.is_none()) {
            let ns_name = match &ns.name {
                Some(name) => name.clone(),
                None => continue,
            };

            if level.glue_for.iter().any(|n| names_eq(n, &ns_name)) {
                warn!("Already looking up the address of {}, skipping", ns_name);
                continue;
            }

            debug!("Need to resolve IP address of nameserver {}", ns_name);

            let mut glue_for = level.glue_for.to_vec();
            glue_for.push(ns_name.clone());

            let lookup = Lookup {
                original: ns_name.clone(),
                r#type: Type::A,
            };
            let sub = Level {
                cname_hops: 0,
                glue_for: &glue_for,
                ..level
            };

            match self.resolve_level(&lookup, &ns_name, self.seeds.clone(), sub) {
                Ok(address) => ns.address = Some(address),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!("Failed to retrieve IP address for {}: {}", ns_name, e),
            }
        }

        Ok(nameservers)
    }

    /// Asks each candidate in turn until one gives a usable reply.
    fn query_level(
        &self,
        name: &str,
        r#type: Type,
        mut candidates: Vec<NameServer>,
    ) -> Result<Message, Error> {
        let total = candidates.len();

        // One socket for every attempt at this level.
        let mut exchanger = self.connector.connect()?;

        while !candidates.is_empty() {
            let i = self.selector.select(&candidates).min(candidates.len() - 1);
            let ns = candidates.remove(i);

            let server = match self.server_addr(&ns) {
                Some(server) => server,
                None => continue,
            };

            debug!("How about nameserver {}?", server.ip());

            let query = Message::new_query(name, r#type);
            let req = query.to_vec()?;

            if self.config.verbose {
                debug!("query:\n{}\n{}", hexdump(&req), query);
            }

            let reply = match exchanger.exchange(server, &req) {
                Ok(reply) => reply,
                Err(Error::Timeout) => {
                    debug!("Timed out while waiting for nameserver {}.", server.ip());
                    continue;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Failed to query nameserver {}: {}", server.ip(), e);
                    continue;
                }
            };

            let message = match Message::from_slice(&reply) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Discarding reply from {}: {}", server.ip(), e);
                    continue;
                }
            };

            if self.config.verbose {
                debug!("response:\n{}\n{}", hexdump(&reply), message);
            }

            match message.rcode() {
                Some(Rcode::NoError) => (),
                Some(Rcode::NXDomain) => return Err(Error::NxDomain(name.to_string())),
                rcode => {
                    warn!("Nameserver {} replied with {:?}", server.ip(), rcode);
                    continue;
                }
            }

            debug!(
                "Resolving {} using server {} out of {}",
                name,
                server.ip(),
                total
            );
            debug!(
                "{} questions, {} answers, {} authoritative records, and {} others",
                message.question_count,
                message.answer_count,
                message.authority_count,
                message.additional_count
            );

            return Ok(message);
        }

        Err(Error::Exhausted)
    }

    fn server_addr(&self, ns: &NameServer) -> Option<SocketAddr> {
        let address = match &ns.address {
            Some(address) => address,
            None => {
                debug!(
                    "Skipping nameserver {} as it has no address",
                    ns.name.as_deref().unwrap_or("?")
                );
                return None;
            }
        };

        match address.trim().parse::<Ipv4Addr>() {
            Ok(ip) => Some(SocketAddr::new(ip.into(), self.config.port)),
            Err(e) => {
                warn!("Skipping nameserver with invalid address '{}': {}", address, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<NameServer> {
        (0..n)
            .map(|i| NameServer::from_address(format!("192.0.2.{}", i)))
            .collect()
    }

    #[test]
    fn test_in_order() {
        assert_eq!(InOrder.select(&candidates(5)), 0);
    }

    #[test]
    fn test_seeded_is_repeatable() {
        let picks = |seed| {
            let selector = Seeded::new(seed);
            (0..20)
                .map(|_| selector.select(&candidates(7)))
                .collect::<Vec<usize>>()
        };

        let first = picks(42);
        assert_eq!(first, picks(42));
        assert!(first.iter().all(|i| *i < 7));
    }
}
