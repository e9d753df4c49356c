//! Works out what a single response tells us: an answer, an alias to
//! follow, or the nameservers to ask next.
use crate::types::{Message, NameServer, Resource};
use crate::util::names_eq;
use log::debug;
use strum_macros::{Display, EnumString};

/// Which name an A record must belong to before it is taken as the answer.
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum MatchAgainst {
    /// The name exactly as first asked for, even after a CNAME was followed.
    /// An A record for the alias target is then never an answer.
    OriginalName,

    /// The name currently being looked up, which is the alias target once a
    /// CNAME has been followed.
    CurrentAlias,
}

impl Default for MatchAgainst {
    fn default() -> Self {
        MatchAgainst::CurrentAlias
    }
}

/// The outcome of classifying every record in one response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Referral {
    /// The final answer: an IPv4 address, or for reverse lookups a name.
    pub answer: Option<String>,

    /// The name to look up from here on. Differs from the name asked for
    /// only if a CNAME was followed.
    pub current_name: String,

    /// Nameservers from NS records, in the order they appeared, with any
    /// addresses found in glue records.
    pub nameservers: Vec<NameServer>,
}

impl Referral {
    /// Walks the records of `m` in wire order.
    ///
    /// `original` is the name first asked for, and `name` the one asked for
    /// in this query. Processing stops at the first A record answering the
    /// query, or the first PTR record.
    pub fn classify(m: &Message, original: &str, name: &str, policy: MatchAgainst) -> Referral {
        let mut referral = Referral {
            current_name: name.to_string(),
            ..Default::default()
        };

        for record in &m.records {
            match &record.resource {
                Resource::A(ip) => {
                    debug!("The name {} resolves to IP addr: {}", record.name, ip);

                    let wanted = match policy {
                        MatchAgainst::OriginalName => original,
                        MatchAgainst::CurrentAlias => referral.current_name.as_str(),
                    };

                    if names_eq(&record.name, wanted) {
                        referral.answer = Some(ip.to_string());
                        return referral;
                    }

                    referral.add_glue(&record.name, ip.to_string());
                }

                Resource::NS(ns) => {
                    debug!("The name {} can be resolved by NS: {}", record.name, ns);
                    referral.nameservers.push(NameServer::from_name(ns.as_str()));
                }

                Resource::CNAME(alias) => {
                    debug!("The name {} is also known as {}.", record.name, alias);

                    if names_eq(&record.name, name)
                        || names_eq(&record.name, &referral.current_name)
                    {
                        referral.current_name = alias.clone();
                    }
                }

                Resource::PTR(host) => {
                    debug!("The host at {} is also known as {}.", record.name, host);
                    referral.answer = Some(host.clone());
                    return referral;
                }

                Resource::SOA(_) => debug!("Ignoring SOA record"),
                Resource::AAAA(_) => debug!("Ignoring IPv6 record"),
                Resource::Unknown => debug!("got unknown record type {}", record.r#type),
            }
        }

        referral
    }

    /// Returns true if a CNAME changed the name being looked up.
    pub fn is_alias(&self, name: &str) -> bool {
        !names_eq(&self.current_name, name)
    }

    // Fills in the address of the first pending nameserver called `name`.
    fn add_glue(&mut self, name: &str, address: String) {
        let pending = self.nameservers.iter_mut().find(|ns| {
            ns.address.is_none() && ns.name.as_deref().map_or(false, |n| names_eq(n, name))
        });

        if let Some(ns) = pending {
            debug!("Using {} as the address of nameserver {}", address, name);
            ns.address = Some(address);
        }
    }
}
