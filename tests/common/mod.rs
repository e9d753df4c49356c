//! Helpers for building DNS responses, and a scripted network to send
//! queries to.
#![allow(dead_code)]

use rootwalk::clients::{Connector, Exchanger};
use rootwalk::{Error, Message};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};

/// A resource record to place in a response.
pub struct Rr {
    name: String,
    r#type: u16,
    data: Vec<u8>,
}

pub fn encode_name(name: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf
}

pub fn a(name: &str, ip: &str) -> Rr {
    let ip: Ipv4Addr = ip.parse().expect("invalid test ip");
    raw(name, 1, ip.octets().to_vec())
}

pub fn ns(zone: &str, server: &str) -> Rr {
    raw(zone, 2, encode_name(server))
}

pub fn cname(name: &str, alias: &str) -> Rr {
    raw(name, 5, encode_name(alias))
}

pub fn ptr(name: &str, host: &str) -> Rr {
    raw(name, 12, encode_name(host))
}

pub fn aaaa(name: &str) -> Rr {
    raw(name, 28, vec![0; 16])
}

pub fn raw(name: &str, r#type: u16, data: Vec<u8>) -> Rr {
    Rr {
        name: name.to_string(),
        r#type,
        data,
    }
}

/// Builds the wire format of a response.
pub struct Response {
    question: String,
    rcode: u16,
    answers: Vec<Rr>,
    authorities: Vec<Rr>,
    additionals: Vec<Rr>,
}

impl Response {
    pub fn new(question: &str) -> Response {
        Response {
            question: question.to_string(),
            rcode: 0,
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn answer(mut self, rr: Rr) -> Self {
        self.answers.push(rr);
        self
    }

    pub fn authority(mut self, rr: Rr) -> Self {
        self.authorities.push(rr);
        self
    }

    pub fn additional(mut self, rr: Rr) -> Self {
        self.additionals.push(rr);
        self
    }

    pub fn rcode(mut self, rcode: u16) -> Self {
        self.rcode = rcode;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x1234_u16.to_be_bytes());
        buf.extend_from_slice(&(0x8000_u16 | self.rcode).to_be_bytes());
        buf.extend_from_slice(&1_u16.to_be_bytes());
        buf.extend_from_slice(&(self.answers.len() as u16).to_be_bytes());
        buf.extend_from_slice(&(self.authorities.len() as u16).to_be_bytes());
        buf.extend_from_slice(&(self.additionals.len() as u16).to_be_bytes());

        buf.extend_from_slice(&encode_name(&self.question));
        buf.extend_from_slice(&[0, 1, 0, 1]);

        let records = self
            .answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter());

        for rr in records {
            buf.extend_from_slice(&encode_name(&rr.name));
            buf.extend_from_slice(&rr.r#type.to_be_bytes());
            buf.extend_from_slice(&1_u16.to_be_bytes());
            buf.extend_from_slice(&3600_u32.to_be_bytes());
            buf.extend_from_slice(&(rr.data.len() as u16).to_be_bytes());
            buf.extend_from_slice(&rr.data);
        }

        buf
    }
}

/// What a scripted nameserver does when asked a question.
#[derive(Clone)]
pub enum Reply {
    Bytes(Vec<u8>),
    Timeout,
}

/// A fake network of nameservers. Anything not scripted times out.
#[derive(Default)]
pub struct MockNet {
    script: HashMap<(String, String), Reply>,

    /// Every (server, question name) asked, in order.
    pub log: RefCell<Vec<(String, String)>>,

    pub connects: Cell<usize>,

    /// Fail every connect after this many have succeeded.
    pub max_connects: Option<usize>,
}

impl MockNet {
    pub fn new() -> MockNet {
        MockNet::default()
    }

    /// Scripts `server` to reply to questions about `name`.
    pub fn on(mut self, server: &str, name: &str, reply: Response) -> Self {
        self.script.insert(key(server, name), Reply::Bytes(reply.build()));
        self
    }

    pub fn on_bytes(mut self, server: &str, name: &str, bytes: Vec<u8>) -> Self {
        self.script.insert(key(server, name), Reply::Bytes(bytes));
        self
    }

    pub fn asked(&self) -> Vec<(String, String)> {
        self.log.borrow().clone()
    }

    pub fn exchanges(&self) -> usize {
        self.log.borrow().len()
    }
}

fn key(server: &str, name: &str) -> (String, String) {
    (server.to_string(), name.to_ascii_lowercase())
}

pub fn step(server: &str, name: &str) -> (String, String) {
    key(server, name)
}

pub struct MockExchanger<'a> {
    net: &'a MockNet,
}

impl<'a> Connector for &'a MockNet {
    type Exchanger = MockExchanger<'a>;

    fn connect(&self) -> Result<MockExchanger<'a>, Error> {
        if let Some(max) = self.max_connects {
            if self.connects.get() >= max {
                return Err(Error::Socket(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "too many open files",
                )));
            }
        }

        self.connects.set(self.connects.get() + 1);
        Ok(MockExchanger { net: *self })
    }
}

impl<'a> Exchanger for MockExchanger<'a> {
    fn exchange(&mut self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, Error> {
        assert_eq!(server.port(), 53, "queries should go to port 53");

        let query = Message::from_slice(query).expect("resolver sent an invalid query");
        assert_eq!(query.questions.len(), 1);

        let k = key(&server.ip().to_string(), &query.questions[0].name);
        self.net.log.borrow_mut().push(k.clone());

        match self.net.script.get(&k) {
            Some(Reply::Bytes(bytes)) => Ok(bytes.clone()),
            Some(Reply::Timeout) | None => Err(Error::Timeout),
        }
    }
}
