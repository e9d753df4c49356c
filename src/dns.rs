use crate::bail;
use crate::errors::Error;
use crate::io::{DNSReadExt, SeekExt, MAX_LABEL_LEN, MAX_NAME_LEN};
use crate::types::*;
use crate::util::reverse_name;
use byteorder::{ReadBytesExt, BE};
use log::warn;
use num_traits::FromPrimitive;
use std::io;
use std::io::Cursor;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Length of the fixed header at the start of every message.
pub const HEADER_LEN: usize = 12;

/// Recursion Desired - this bit directs the name server to pursue the query
/// recursively.
pub const FLAG_RD: u16 = 0b0000_0001_0000_0000;

/// Specifies whether this message is a query (0), or a response (1).
pub const FLAG_QR: u16 = 0b1000_0000_0000_0000;

/// Authoritative Answer.
pub const FLAG_AA: u16 = 0b0000_0100_0000_0000;

/// Truncation - specifies that this message was truncated.
pub const FLAG_TC: u16 = 0b0000_0010_0000_0000;

/// Recursion Available.
pub const FLAG_RA: u16 = 0b0000_0000_1000_0000;

const RCODE_MASK: u16 = 0b0000_0000_0000_1111;

/// Returns the name and type to query for a target supplied by the user.
///
/// A dotted IPv4 address becomes a PTR query under `in-addr.arpa`, anything
/// else is an A query for the name itself.
pub fn question_for(target: &str) -> (String, Type) {
    match target.parse::<Ipv4Addr>() {
        Ok(addr) => (reverse_name(addr), Type::PTR),
        Err(_) => (target.to_string(), Type::A),
    }
}

// A helper class to hold state while the parsing is happening.
pub(crate) struct MessageParser<'a> {
    cur: Cursor<&'a [u8]>,

    m: Message,
}

impl<'a> MessageParser<'a> {
    fn new(buf: &'a [u8]) -> MessageParser<'a> {
        MessageParser {
            cur: Cursor::new(buf),
            m: Message::default(),
        }
    }

    /// Consume the MessageParser and returned the resulting Message.
    fn parse(mut self) -> io::Result<Message> {
        self.m.id = self.cur.read_u16::<BE>()?;
        self.m.flags = self.cur.read_u16::<BE>()?;

        self.m.question_count = self.cur.read_u16::<BE>()?;
        self.m.answer_count = self.cur.read_u16::<BE>()?;
        self.m.authority_count = self.cur.read_u16::<BE>()?;
        self.m.additional_count = self.cur.read_u16::<BE>()?;

        self.read_questions(self.m.question_count)?;

        // The sections are only told apart by the counts, so read them all
        // as one run of records.
        let count = usize::from(self.m.answer_count)
            + usize::from(self.m.authority_count)
            + usize::from(self.m.additional_count);
        self.read_records(count)?;

        let remaining = self.cur.remaining()?;
        if remaining > 0 {
            warn!(
                "message {} finished parsing with {} bytes left over",
                self.m.id, remaining
            );
        }

        Ok(self.m)
    }

    fn read_questions(&mut self, count: u16) -> io::Result<()> {
        for _ in 0..count {
            let name = self.cur.read_qname()?;
            let r#type = self.cur.read_type()?;
            let class = self.cur.read_class()?;

            self.m.questions.push(Question {
                name,
                r#type,
                class,
            });
        }

        Ok(())
    }

    fn read_records(&mut self, count: usize) -> io::Result<()> {
        for _ in 0..count {
            let name = self.cur.read_qname()?;
            let r#type = self.cur.read_type()?;
            let class = self.cur.read_class()?;
            let ttl = Duration::from_secs(self.cur.read_u32::<BE>()?.into());
            let len = self.cur.read_u16::<BE>()?;

            let start = self.cur.position() as usize;
            let end = start + usize::from(len);
            let buf = *self.cur.get_ref();

            let data = match buf.get(start..end) {
                None => bail!(
                    UnexpectedEof,
                    "record data buf[{}..{}] runs past the end of the message ({} bytes)",
                    start,
                    end,
                    buf.len()
                ),
                Some(data) => data.to_vec(),
            };

            let resource = Resource::parse(&mut self.cur, r#type, len)?;

            // Skip over anything the resource parser didn't need.
            self.cur.set_position(end as u64);

            self.m.records.push(Record {
                name,
                r#type,
                class,
                ttl,
                data,
                resource,
            });
        }

        Ok(())
    }
}

impl Message {
    /// Builds a query for `target`: a PTR query if it is a dotted IPv4
    /// address, otherwise an A query.
    pub fn query(target: &str) -> Message {
        let (name, r#type) = question_for(target);
        Message::new_query(&name, r#type)
    }

    /// Builds a recursion desired query with a random id, asking a single
    /// question.
    pub fn new_query(name: &str, r#type: Type) -> Message {
        Message {
            id: rand::random(),
            flags: FLAG_RD,
            question_count: 1,
            questions: vec![Question {
                name: name.to_string(),
                r#type,
                class: Class::Internet as u16,
            }],

            ..Default::default()
        }
    }

    /// Decodes a message from the wire, as defined by [rfc1035](https://datatracker.ietf.org/doc/html/rfc1035).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if the buffer is truncated, contains an
    /// invalid name, or a record whose data runs past the end.
    pub fn from_slice(buf: &[u8]) -> Result<Message, Error> {
        MessageParser::new(buf)
            .parse()
            .map_err(|e| Error::Malformed(e.to_string()))
    }

    /// Returns this DNS Message as a Vec<u8> ready to be sent, as defined by [rfc1035](https://datatracker.ietf.org/doc/html/rfc1035).
    ///
    /// Only the header and question section are written.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        if !self.records.is_empty() {
            return Err(Error::Encoding(
                "writing resource records is not supported".to_string(),
            ));
        }

        let mut req = Vec::<u8>::with_capacity(512);

        req.extend_from_slice(&self.id.to_be_bytes());
        req.extend_from_slice(&self.flags.to_be_bytes());

        req.extend_from_slice(&(self.questions.len() as u16).to_be_bytes());
        req.extend_from_slice(&0_u16.to_be_bytes());
        req.extend_from_slice(&0_u16.to_be_bytes());
        req.extend_from_slice(&0_u16.to_be_bytes());

        for question in &self.questions {
            question.write(&mut req)?;
        }

        Ok(req)
    }

    /// The response code from the header, or None if it's one we don't know.
    pub fn rcode(&self) -> Option<Rcode> {
        FromPrimitive::from_u16(self.flags & RCODE_MASK)
    }

    pub fn is_response(&self) -> bool {
        self.flags & FLAG_QR != 0
    }

    pub fn is_authoritative(&self) -> bool {
        self.flags & FLAG_AA != 0
    }

    pub fn is_truncated(&self) -> bool {
        self.flags & FLAG_TC != 0
    }

    /// The records from the answer section.
    pub fn answers(&self) -> &[Record] {
        self.section(0, self.answer_count)
    }

    /// The records from the authority section.
    pub fn authorities(&self) -> &[Record] {
        self.section(self.answer_count, self.authority_count)
    }

    /// The records from the additional section.
    pub fn additionals(&self) -> &[Record] {
        self.section(
            self.answer_count.saturating_add(self.authority_count),
            self.additional_count,
        )
    }

    fn section(&self, start: u16, count: u16) -> &[Record] {
        let start = usize::from(start).min(self.records.len());
        let end = (start + usize::from(count)).min(self.records.len());
        &self.records[start..end]
    }
}

impl Question {
    /// Writes the question in wire format into the supplied `Vec<u8>`.
    pub fn write(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        write_qname(buf, &self.name)?;

        buf.extend_from_slice(&u16::from(self.r#type).to_be_bytes());
        buf.extend_from_slice(&self.class.to_be_bytes());

        Ok(())
    }
}

/// Writes a domain name into the supplied `Vec<u8>`, without compression.
///
/// ASCII names are written as is (keeping their case). Unicode names are
/// first converted to their ASCII form.
fn write_qname(buf: &mut Vec<u8>, domain: &str) -> Result<(), Error> {
    let domain = if domain.is_ascii() {
        domain.to_string()
    } else {
        match idna::domain_to_ascii(domain) {
            Err(e) => {
                return Err(Error::Encoding(format!(
                    "invalid dns name '{0}': {1}",
                    domain, e
                )))
            }
            Ok(domain) => domain,
        }
    };

    let mut len = 1; // The trailing zero.

    if !domain.is_empty() && domain != "." {
        for label in domain.strip_suffix('.').unwrap_or(domain.as_str()).split('.') {
            if label.is_empty() {
                return Err(Error::Encoding(format!(
                    "empty label in domain name '{}'",
                    domain
                )));
            }

            if label.len() > MAX_LABEL_LEN {
                return Err(Error::Encoding(format!(
                    "label '{0}' longer than {1} characters",
                    label, MAX_LABEL_LEN
                )));
            }

            len += 1 + label.len();
            if len > MAX_NAME_LEN {
                return Err(Error::Encoding(format!(
                    "domain name '{0}' longer than {1} bytes",
                    domain, MAX_NAME_LEN
                )));
            }

            // Write the length.
            buf.push(label.len() as u8);

            // Then the actual label.
            buf.extend_from_slice(label.as_bytes());
        }
    }

    buf.push(0);

    Ok(())
}
