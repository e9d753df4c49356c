use crate::resource::SOA;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use strum_macros::{Display, EnumString};

/// DNS Message, as sent to, or received from a nameserver.
///
/// Only the fields a recursive resolver needs are decoded. The flags are kept
/// as the raw 16 bits from the header, with helpers to pull out the
/// interesting bits.
///
/// # Examples
///
/// ```rust
/// use rootwalk::Message;
///
/// let query = Message::query("bramp.net");
/// let req = query.to_vec().expect("failed to encode DNS request");
///
/// // 12 byte header, 11 bytes of name, then type and class.
/// assert_eq!(req.len(), 12 + 11 + 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Message {
    /// 16-bit identifier assigned by the program that generates any kind of
    /// query. This identifier is copied into the corresponding reply.
    pub id: u16,

    /// The second 16 bits of the header: QR, Opcode, AA, TC, RD, RA, Z, AD,
    /// CD and the Rcode.
    pub flags: u16,

    /// Number of questions, as stated by the header.
    pub question_count: u16,

    /// Number of answer records, as stated by the header.
    pub answer_count: u16,

    /// Number of authority records, as stated by the header.
    pub authority_count: u16,

    /// Number of additional records, as stated by the header.
    pub additional_count: u16,

    /// The questions.
    pub questions: Vec<Question>,

    /// All answer, authority and additional records, in wire order.
    /// Use [`Message::answers`] and friends to split them back up.
    pub records: Vec<Record>,
}

/// DNS Question.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    /// ASCII domain name, without the trailing dot.
    pub name: String,
    pub r#type: Type,
    pub class: u16,
}

/// Resource Record (RR)
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The owner of this record, ASCII without the trailing dot.
    pub name: String,

    pub r#type: Type,

    /// Raw class, almost always [`Class::Internet`].
    pub class: u16,

    /// The number of seconds that the resource record may be cached
    /// before the source of the information should again be consulted.
    pub ttl: Duration,

    /// The undecoded record data, exactly as it appeared on the wire.
    pub data: Vec<u8>,

    /// The decoded record data. Any names have been decompressed against
    /// the full message.
    pub resource: Resource,
}

/// Resource Record Type, for example, A, CNAME or SOA.
///
// When adding a Type, a parsing function must be added in resource.rs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Type {
    /// IPv4 Address.
    A,

    /// Authoritative name server.
    NS,

    /// Canonical name for an alias.
    CNAME,

    /// Start of a zone of authority.
    SOA,

    /// Domain name pointer.
    PTR,

    /// IPv6 Address.
    AAAA,

    /// Any type this resolver does not care about.
    Unknown(u16),
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        match value {
            1 => Type::A,
            2 => Type::NS,
            5 => Type::CNAME,
            6 => Type::SOA,
            12 => Type::PTR,
            28 => Type::AAAA,
            other => Type::Unknown(other),
        }
    }
}

impl From<Type> for u16 {
    fn from(value: Type) -> Self {
        match value {
            Type::A => 1,
            Type::NS => 2,
            Type::CNAME => 5,
            Type::SOA => 6,
            Type::PTR => 12,
            Type::AAAA => 28,
            Type::Unknown(other) => other,
        }
    }
}

/// Resource Record Class, for example Internet.
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq)]
#[repr(u16)]
pub enum Class {
    /// Reserved per [RFC6895]
    ///
    /// [rfc6895]: https://datatracker.ietf.org/doc/html/rfc6895
    Reserved = 0,

    /// (Default) The Internet (IN), see [rfc1035].
    ///
    /// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
    #[strum(serialize = "IN")]
    Internet = 1,

    /// CSNET (CS), obsolete (used only for examples in some obsolete RFCs).
    #[strum(serialize = "CS")]
    CsNet = 2,

    /// Chaosnet (CH), obsolete LAN protocol created at MIT in the mid-1970s.
    #[strum(serialize = "CH")]
    Chaos = 3,

    /// Hesiod (HS), an information service developed by MIT's Project Athena.
    #[strum(serialize = "HS")]
    Hesiod = 4,

    /// * (ANY) See [rfc1035]
    ///
    /// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
    #[strum(serialize = "*")]
    Any = 255,
}

impl Default for Class {
    fn default() -> Self {
        Class::Internet
    }
}

/// Response Codes.
/// See [rfc1035] and <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6>
///
/// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq)]
#[repr(u8)]
pub enum Rcode {
    /// No Error
    NoError = 0,

    /// Format Error
    FormErr = 1,

    /// Server Failure
    ServFail = 2,

    /// Non-Existent Domain
    NXDomain = 3,

    /// Not Implemented
    NotImp = 4,

    /// Query Refused
    Refused = 5,
    // Dynamic update codes (6-11) are never expected in a reply to a query.
}

impl Default for Rcode {
    fn default() -> Self {
        Rcode::NoError
    }
}

// This should be kept in sync with Type.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Resource {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),

    CNAME(String),
    NS(String),
    PTR(String),

    SOA(SOA),

    /// Record data of a type that is not decoded.
    Unknown,
}

/// A nameserver that may be sent queries.
///
/// Nameservers learnt from NS records start with just a `name`. The
/// `address` is filled in later from a glue record, or by resolving the name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameServer {
    pub name: Option<String>,

    /// Dotted IPv4 address.
    pub address: Option<String>,
}

impl NameServer {
    /// A nameserver known only by its address, such as a root server.
    pub fn from_address<S: Into<String>>(address: S) -> NameServer {
        NameServer {
            name: None,
            address: Some(address.into()),
        }
    }

    /// A nameserver known only by its name, such as one taken from a NS record.
    pub fn from_name<S: Into<String>>(name: S) -> NameServer {
        NameServer {
            name: Some(name.into()),
            address: None,
        }
    }
}
