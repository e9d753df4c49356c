//! Decoding of the type specific part of a resource record.
use crate::bail;
use crate::io::DNSReadExt;
use crate::types::{Resource, Type};
use byteorder::{ReadBytesExt, BE};
use std::io;
use std::io::Cursor;
use std::io::Read;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// Start of Authority record.
///
/// Only kept so it can be displayed. The resolver never acts on it.
#[derive(Clone, Debug, PartialEq)]
pub struct SOA {
    /// The name server that was the original or primary source of data for this zone.
    pub mname: String,

    /// The mailbox of the person responsible for this zone, in domain form.
    pub rname: String,

    pub serial: u32,
    pub refresh: Duration,
    pub retry: Duration,
    pub expire: Duration,
    pub minimum: Duration,
}

impl Resource {
    /// Decodes `len` bytes of record data starting at the cursor's position.
    ///
    /// The cursor must span the whole message, so compressed names can be
    /// followed. On success the cursor has consumed at most `len` bytes.
    pub(crate) fn parse(
        cur: &mut Cursor<&[u8]>,
        r#type: Type,
        len: u16,
    ) -> io::Result<Resource> {
        let start = cur.position();
        let end = start + u64::from(len);

        let resource = match r#type {
            Type::A => Resource::A(parse_a(cur, len)?),
            Type::AAAA => Resource::AAAA(parse_aaaa(cur, len)?),

            Type::NS => Resource::NS(cur.read_qname()?),
            Type::CNAME => Resource::CNAME(cur.read_qname()?),
            Type::PTR => Resource::PTR(cur.read_qname()?),

            Type::SOA => Resource::SOA(parse_soa(cur)?),

            Type::Unknown(_) => Resource::Unknown,
        };

        if cur.position() > end {
            bail!(
                InvalidData,
                "{:?} record data overran its length ({} > {})",
                r#type,
                cur.position() - start,
                len
            );
        }

        Ok(resource)
    }
}

fn parse_a(cur: &mut Cursor<&[u8]>, len: u16) -> io::Result<Ipv4Addr> {
    if len != 4 {
        bail!(InvalidData, "invalid A record length ({}) expected 4", len);
    }

    let mut octets = [0_u8; 4];
    cur.read_exact(&mut octets)?;
    Ok(Ipv4Addr::from(octets))
}

fn parse_aaaa(cur: &mut Cursor<&[u8]>, len: u16) -> io::Result<Ipv6Addr> {
    if len != 16 {
        bail!(InvalidData, "invalid AAAA record length ({}) expected 16", len);
    }

    let mut octets = [0_u8; 16];
    cur.read_exact(&mut octets)?;
    Ok(Ipv6Addr::from(octets))
}

fn parse_soa(cur: &mut Cursor<&[u8]>) -> io::Result<SOA> {
    Ok(SOA {
        mname: cur.read_qname()?,
        rname: cur.read_qname()?,
        serial: cur.read_u32::<BE>()?,
        refresh: Duration::from_secs(cur.read_u32::<BE>()?.into()),
        retry: Duration::from_secs(cur.read_u32::<BE>()?.into()),
        expire: Duration::from_secs(cur.read_u32::<BE>()?.into()),
        minimum: Duration::from_secs(cur.read_u32::<BE>()?.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a() {
        let buf = [192, 0, 2, 1];
        let mut cur = Cursor::new(&buf[..]);
        assert_eq!(
            Resource::parse(&mut cur, Type::A, 4).unwrap(),
            Resource::A(Ipv4Addr::new(192, 0, 2, 1))
        );
    }

    #[test]
    fn test_parse_a_bad_length() {
        let buf = [192, 0, 2, 1, 0];
        let mut cur = Cursor::new(&buf[..]);
        let err = Resource::parse(&mut cur, Type::A, 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_parse_ns_overrun() {
        // A name of 5 bytes, but the record claims to be only 3 long.
        let buf = [3, b'c', b'o', b'm', 0];
        let mut cur = Cursor::new(&buf[..]);
        assert!(Resource::parse(&mut cur, Type::NS, 3).is_err());
    }

    #[test]
    fn test_parse_unknown() {
        let buf = [1, 2, 3];
        let mut cur = Cursor::new(&buf[..]);
        assert_eq!(
            Resource::parse(&mut cur, Type::Unknown(99), 3).unwrap(),
            Resource::Unknown
        );
    }
}
