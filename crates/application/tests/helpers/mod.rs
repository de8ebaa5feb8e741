#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_resolver_application::ports::DnsTransport;
use ferrous_resolver_domain::{RecordType, ResolverError};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, SOA};
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Mutex;

/// IPv4 addresses of the root hints, for scripting "any root server"
/// responses.
pub const ROOT_V4: &[&str] = &[
    "198.41.0.4",
    "170.247.170.2",
    "192.33.4.12",
    "199.7.91.13",
    "192.203.230.10",
    "192.5.5.241",
    "192.112.36.4",
    "198.97.190.53",
    "192.36.148.17",
    "192.58.128.30",
    "193.0.14.129",
    "199.7.83.42",
    "202.12.27.33",
];

// ── record builders ────────────────────────────────────────────────────────

pub fn wire_name(text: &str) -> Name {
    Name::from_str(text).unwrap()
}

pub fn a(owner: &str, ttl: u32, addr: &str) -> Record {
    Record::from_rdata(wire_name(owner), ttl, RData::A(A(addr.parse().unwrap())))
}

pub fn aaaa(owner: &str, ttl: u32, addr: &str) -> Record {
    Record::from_rdata(
        wire_name(owner),
        ttl,
        RData::AAAA(AAAA(addr.parse().unwrap())),
    )
}

pub fn ns(owner: &str, ttl: u32, target: &str) -> Record {
    Record::from_rdata(wire_name(owner), ttl, RData::NS(NS(wire_name(target))))
}

pub fn cname(owner: &str, ttl: u32, target: &str) -> Record {
    Record::from_rdata(
        wire_name(owner),
        ttl,
        RData::CNAME(CNAME(wire_name(target))),
    )
}

pub fn mx(owner: &str, ttl: u32, preference: u16, exchange: &str) -> Record {
    Record::from_rdata(
        wire_name(owner),
        ttl,
        RData::MX(MX::new(preference, wire_name(exchange))),
    )
}

pub fn soa(zone: &str) -> Record {
    Record::from_rdata(
        wire_name(zone),
        3600,
        RData::SOA(SOA::new(
            wire_name(&format!("ns1.{}", zone)),
            wire_name(&format!("hostmaster.{}", zone)),
            1,
            7200,
            3600,
            86400,
            300,
        )),
    )
}

/// A query message shaped the way the engine builds them.
pub fn request(domain: &str, rtype: RecordType) -> Message {
    let mut query = Query::new();
    query.set_name(wire_name(domain));
    query.set_query_type(hickory_proto::rr::RecordType::from(rtype.to_u16()));
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(7, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(false);
    message.add_query(query);
    message
}

// ── canned responses ───────────────────────────────────────────────────────

/// A response template; the question and message ID are echoed from the
/// request at build time.
#[derive(Clone, Default)]
pub struct CannedResponse {
    authoritative: bool,
    truncated: bool,
    rcode: Option<ResponseCode>,
    answers: Vec<Record>,
    authority: Vec<Record>,
    additionals: Vec<Record>,
}

impl CannedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authoritative(mut self) -> Self {
        self.authoritative = true;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.rcode = Some(rcode);
        self
    }

    pub fn answer(mut self, record: Record) -> Self {
        self.answers.push(record);
        self
    }

    pub fn authority(mut self, record: Record) -> Self {
        self.authority.push(record);
        self
    }

    pub fn additional(mut self, record: Record) -> Self {
        self.additionals.push(record);
        self
    }

    pub fn build(&self, request: &Message) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
        response.set_response_code(self.rcode.unwrap_or(ResponseCode::NoError));
        response.set_authoritative(self.authoritative);
        response.set_truncated(self.truncated);
        if let Some(query) = request.queries().first() {
            response.add_query(query.clone());
        }
        for record in &self.answers {
            response.add_answer(record.clone());
        }
        for record in &self.authority {
            response.add_name_server(record.clone());
        }
        for record in &self.additionals {
            response.add_additional(record.clone());
        }
        response
    }
}

/// Build the response a canned template would produce for `(domain, rtype)`.
pub fn response_for(domain: &str, rtype: RecordType, canned: &CannedResponse) -> Message {
    canned.build(&request(domain, rtype))
}

// ── scripted transport ─────────────────────────────────────────────────────

type ServerKey = (String, String, u16);
type QuestionKey = (String, u16);

/// Transport port fed from canned responses, keyed by question and
/// optionally pinned to one server address. Every exchange is recorded.
#[derive(Default)]
pub struct MockTransport {
    by_server: Mutex<HashMap<ServerKey, CannedResponse>>,
    generic: Mutex<HashMap<QuestionKey, CannedResponse>>,
    log: Mutex<Vec<(String, String, u16)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `(qname, rtype)` no matter which server is asked.
    pub fn respond(&self, qname: &str, rtype: RecordType, canned: CannedResponse) {
        self.generic
            .lock()
            .unwrap()
            .insert((qname.to_string(), rtype.to_u16()), canned);
    }

    /// Respond to `(qname, rtype)` only when `server` (an IP) is asked.
    pub fn respond_at(&self, server: &str, qname: &str, rtype: RecordType, canned: CannedResponse) {
        self.by_server.lock().unwrap().insert(
            (server.to_string(), qname.to_string(), rtype.to_u16()),
            canned,
        );
    }

    /// Respond as every root server.
    pub fn respond_at_roots(&self, qname: &str, rtype: RecordType, canned: CannedResponse) {
        for root in ROOT_V4 {
            self.respond_at(root, qname, rtype, canned.clone());
        }
    }

    /// Every `(server_ip, qname, qtype)` exchange, in order.
    pub fn queries(&self) -> Vec<(String, String, u16)> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn lookup(
        &self,
        request: &Message,
        server: SocketAddr,
    ) -> Result<Message, ResolverError> {
        let question = request.queries().first().expect("request without question");
        let qname = question.name().to_utf8().to_lowercase();
        let qtype = u16::from(question.query_type());
        let server_ip = server.ip().to_string();

        self.log
            .lock()
            .unwrap()
            .push((server_ip.clone(), qname.clone(), qtype));

        if let Some(canned) = self
            .by_server
            .lock()
            .unwrap()
            .get(&(server_ip, qname.clone(), qtype))
        {
            return Ok(canned.build(request));
        }
        if let Some(canned) = self.generic.lock().unwrap().get(&(qname.clone(), qtype)) {
            return Ok(canned.build(request));
        }

        Err(ResolverError::TransportIo {
            server: server.to_string(),
            reason: format!("no canned response for {} type {}", qname, qtype),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}
