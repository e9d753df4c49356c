//! Implements the Display trait for the various types, so they output
//! in `dig` style.
// Refer to https://github.com/tigeli/bind-utils/blob/master/bin/dig/dig.c for reference.

use crate::clients::Stats;
use crate::resource::SOA;
use crate::Class;
use crate::Message;
use crate::Question;
use crate::Record;
use crate::Resource;
use crate::Type;
use chrono::prelude::*;
use num_traits::FromPrimitive;
use std::fmt;

/// Displays this message in a format resembling `dig` output.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_header(f)?;

        // Always display the question section, but optionally
        // display the other sections.
        writeln!(f, ";; QUESTION SECTION:")?;
        for question in &self.questions {
            question.fmt(f)?;
        }
        writeln!(f)?;

        let sections = [
            ("ANSWER", self.answers()),
            ("AUTHORITY", self.authorities()),
            ("ADDITIONAL", self.additionals()),
        ];

        for (title, records) in sections.iter() {
            if records.is_empty() {
                continue;
            }

            writeln!(f, ";; {} SECTION:", title)?;
            for record in records.iter() {
                record.fmt(f)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Message {
    fn fmt_header(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rcode = match self.rcode() {
            Some(rcode) => rcode.to_string(),
            None => format!("RCODE{}", self.flags & 0xF),
        };

        writeln!(
            f,
            ";; ->>HEADER<<- status: {rcode}, id: {id}",
            rcode = rcode,
            id = self.id,
        )?;

        let mut flags = String::new();

        if self.is_response() {
            flags.push_str(" qr")
        }
        if self.is_authoritative() {
            flags.push_str(" aa")
        }
        if self.is_truncated() {
            flags.push_str(" tc")
        }
        if self.flags & crate::dns::FLAG_RD != 0 {
            flags.push_str(" rd")
        }
        if self.flags & crate::dns::FLAG_RA != 0 {
            flags.push_str(" ra")
        }

        writeln!(f, ";; flags:{flags}; QUERY: {qd_count}, ANSWER: {an_count}, AUTHORITY: {ns_count}, ADDITIONAL: {ar_count}",
            flags = flags,
            qd_count = self.question_count,
            an_count = self.answer_count,
            ns_count = self.authority_count,
            ar_count = self.additional_count,
        )?;

        writeln!(f)
    }
}

struct DisplayClass(u16);

impl fmt::Display for DisplayClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Class::from_u16(self.0) {
            Some(class) => class.fmt(f),
            None => write!(f, "CLASS{}", self.0),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Type::A => "A",
            Type::NS => "NS",
            Type::CNAME => "CNAME",
            Type::SOA => "SOA",
            Type::PTR => "PTR",
            Type::AAAA => "AAAA",

            // Per rfc3597
            Type::Unknown(code) => return write!(f, "TYPE{}", code),
        };

        f.pad(name)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            ";{name:<23} {class:4} {type:6}",
            name = format!("{}.", self.name.trim_end_matches('.')),
            class = DisplayClass(self.class).to_string(),
            r#type = self.r#type,
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{name:<20} {ttl:>6} {class:4} {type:6} {resource}",
            name = format!("{}.", self.name.trim_end_matches('.')),
            ttl = self.ttl.as_secs(),
            class = DisplayClass(self.class).to_string(),
            r#type = self.r#type,
            resource = self.resource,
        )
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::A(ip) => ip.fmt(f),
            Resource::AAAA(ip) => ip.fmt(f),

            Resource::NS(name) => write!(f, "{}.", name),
            Resource::CNAME(name) => write!(f, "{}.", name),
            Resource::PTR(name) => write!(f, "{}.", name),

            Resource::SOA(soa) => soa.fmt(f),

            Resource::Unknown => write!(f, "\\# (not decoded)"),
        }
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{mname}. {rname}. {serial} {refresh} {retry} {expire} {minimum}",
            mname = self.mname,
            rname = self.rname,
            serial = self.serial,
            refresh = self.refresh.as_secs(),
            retry = self.retry.as_secs(),
            expire = self.expire.as_secs(),
            minimum = self.minimum.as_secs(),
        )
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ";; Query time: {} msec", self.duration.as_millis())?;
        writeln!(f, ";; SERVER: {}", self.server)?;

        let start: chrono::DateTime<Local> = self.start.into();
        // ;; WHEN: Sat Jun 12 12:14:21 PDT 2021
        writeln!(f, ";; WHEN: {}", start.format("%a %b %-d %H:%M:%S %z %-Y"))?;
        writeln!(
            f,
            ";; MSG SIZE sent: {} rcvd: {}",
            self.request_size, self.response_size
        )
    }
}
