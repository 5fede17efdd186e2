use ferrous_resolver_domain::{DomainName, Query, RData, Record};
use std::collections::HashMap;

use super::error::WireError;
use super::header::HEADER_LEN;
use super::message::Message;
use super::MAX_MESSAGE_LEN;

/// Offsets above this cannot be expressed in a 14-bit pointer.
const MAX_POINTER_OFFSET: usize = 0x3fff;

/// Encodes a single-question recursive query.
pub fn encode_query(query: &Query, id: u16, edns_payload_size: u16) -> Result<Vec<u8>, WireError> {
    encode(&Message::query(id, query.clone(), edns_payload_size))
}

/// Encodes `message`, compressing owner names and the names inside NS,
/// CNAME, PTR, MX and SOA rdata. SRV targets are never compressed
/// (RFC 2782).
pub fn encode(message: &Message) -> Result<Vec<u8>, WireError> {
    let mut encoder = Encoder::default();

    encoder.put_u16(message.header.id);
    encoder.put_u16(message.header.flags());
    for count in [
        message.questions.len(),
        message.answers.len(),
        message.authority.len(),
        message.additional.len(),
    ] {
        let count = u16::try_from(count).map_err(|_| WireError::MessageTooLarge(count))?;
        encoder.put_u16(count);
    }

    for question in &message.questions {
        encoder.put_name(&question.name, true);
        encoder.put_u16(question.record_type.to_u16());
        encoder.put_u16(question.class());
    }

    for record in message
        .answers
        .iter()
        .chain(&message.authority)
        .chain(&message.additional)
    {
        encoder.put_record(record)?;
    }

    if encoder.buf.len() > MAX_MESSAGE_LEN {
        return Err(WireError::MessageTooLarge(encoder.buf.len()));
    }
    Ok(encoder.buf)
}

#[derive(Default)]
struct Encoder {
    buf: Vec<u8>,
    /// Lower-cased label sequence → offset of its first occurrence.
    names: HashMap<Vec<Vec<u8>>, u16>,
}

impl Encoder {
    fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn put_name(&mut self, name: &DomainName, compress: bool) {
        let labels: Vec<Vec<u8>> = name.labels().map(|l| l.to_ascii_lowercase()).collect();

        for (index, label) in name.labels().enumerate() {
            let suffix = &labels[index..];
            if compress {
                if let Some(&offset) = self.names.get(suffix) {
                    self.put_u16(0xc000 | offset);
                    return;
                }
            }
            let offset = self.buf.len();
            if offset >= HEADER_LEN && offset <= MAX_POINTER_OFFSET {
                self.names.entry(suffix.to_vec()).or_insert(offset as u16);
            }
            self.buf.push(label.len() as u8);
            self.buf.extend_from_slice(label);
        }
        self.buf.push(0);
    }

    fn put_character_string(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        let len = u8::try_from(bytes.len()).map_err(|_| WireError::StringTooLong(bytes.len()))?;
        self.buf.push(len);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn put_record(&mut self, record: &Record) -> Result<(), WireError> {
        self.put_name(&record.name, true);
        self.put_u16(record.record_type().to_u16());
        self.put_u16(record.class);
        self.put_u32(record.ttl);

        let length_at = self.buf.len();
        self.put_u16(0);
        let start = self.buf.len();

        match &record.data {
            RData::A(ip) => self.buf.extend_from_slice(&ip.octets()),
            RData::AAAA(ip) => self.buf.extend_from_slice(&ip.octets()),
            RData::Ptr(name) | RData::Cname(name) | RData::Ns(name) => self.put_name(name, true),
            RData::Mx(mx) => {
                self.put_u16(mx.preference);
                self.put_name(&mx.exchange, true);
            }
            RData::Srv(srv) => {
                self.put_u16(srv.priority);
                self.put_u16(srv.weight);
                self.put_u16(srv.port);
                self.put_name(&srv.target, false);
            }
            RData::Txt(txt) => {
                if txt.segments.is_empty() {
                    self.buf.push(0);
                }
                for segment in &txt.segments {
                    self.put_character_string(segment)?;
                }
            }
            RData::Soa(soa) => {
                self.put_name(&soa.mname, true);
                self.put_name(&soa.rname, true);
                for value in [soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum] {
                    self.put_u32(value);
                }
            }
            RData::Opt(data) | RData::Unknown { data, .. } => self.buf.extend_from_slice(data),
        }

        let rdlength = self.buf.len() - start;
        let rdlength =
            u16::try_from(rdlength).map_err(|_| WireError::MessageTooLarge(self.buf.len()))?;
        self.buf[length_at..start].copy_from_slice(&rdlength.to_be_bytes());
        Ok(())
    }
}
