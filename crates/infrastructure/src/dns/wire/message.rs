use ferrous_resolver_domain::{DomainName, Query, RData, Record};

use super::header::{Header, Rcode};

/// A decoded or to-be-encoded DNS message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Query>,
    pub answers: Vec<Record>,
    pub authority: Vec<Record>,
    pub additional: Vec<Record>,
}

impl Message {
    /// A recursive query for `query`. A non-zero `edns_payload_size` adds an
    /// OPT record advertising it.
    pub fn query(id: u16, query: Query, edns_payload_size: u16) -> Self {
        let mut message = Self {
            header: Header {
                id,
                recursion_desired: true,
                ..Header::default()
            },
            questions: vec![query],
            ..Self::default()
        };
        if edns_payload_size > 0 {
            message.additional.push(opt_record(edns_payload_size));
        }
        message
    }

    /// An empty NOERROR response echoing the id and question of `request`.
    pub fn response_to(request: &Message) -> Self {
        Self {
            header: Header {
                id: request.header.id,
                response: true,
                opcode: request.header.opcode,
                recursion_desired: request.header.recursion_desired,
                recursion_available: true,
                ..Header::default()
            },
            questions: request.questions.clone(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn rcode(&self) -> Rcode {
        self.header.rcode
    }

    pub fn is_truncated(&self) -> bool {
        self.header.truncated
    }

    pub fn question(&self) -> Option<&Query> {
        self.questions.first()
    }

    /// Payload size advertised by an OPT record in the additional section.
    pub fn edns_payload_size(&self) -> Option<u16> {
        self.additional
            .iter()
            .find(|r| matches!(r.data, RData::Opt(_)))
            .map(|r| r.class)
    }
}

fn opt_record(payload_size: u16) -> Record {
    Record {
        name: DomainName::root(),
        class: payload_size,
        ttl: 0,
        data: RData::Opt(Vec::new()),
    }
}
