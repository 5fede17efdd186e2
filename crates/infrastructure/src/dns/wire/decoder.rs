use ferrous_resolver_domain::domain_name::MAX_NAME_WIRE_LEN;
use ferrous_resolver_domain::{
    DomainName, MxRecord, Query, RData, Record, RecordType, SoaRecord, SrvRecord, TxtRecord,
};
use smallvec::SmallVec;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::error::WireError;
use super::header::{Header, HEADER_LEN};
use super::message::Message;

/// Smallest possible question: root name, type, class.
const MIN_QUESTION_LEN: usize = 5;
/// Smallest possible record: root name, type, class, ttl, rdlength.
const MIN_RECORD_LEN: usize = 11;

/// Decodes a complete DNS message. Bytes after the last declared record are
/// ignored.
pub fn decode(bytes: &[u8]) -> Result<Message, WireError> {
    let mut reader = Reader::new(bytes);

    let id = reader.u16()?;
    let flags = reader.u16()?;
    let qdcount = reader.u16()? as usize;
    let ancount = reader.u16()? as usize;
    let nscount = reader.u16()? as usize;
    let arcount = reader.u16()? as usize;

    let needed = qdcount * MIN_QUESTION_LEN + (ancount + nscount + arcount) * MIN_RECORD_LEN;
    if needed > reader.remaining() {
        return Err(WireError::CountOverflow {
            count: qdcount + ancount + nscount + arcount,
            remaining: reader.remaining(),
        });
    }

    let mut message = Message {
        header: Header::from_flags(id, flags),
        ..Message::default()
    };

    for _ in 0..qdcount {
        let name = reader.name()?;
        let record_type = RecordType::from_u16(reader.u16()?);
        // Queries are always class IN.
        let _class = reader.u16()?;
        message.questions.push(Query::new(name, record_type));
    }
    for _ in 0..ancount {
        message.answers.push(reader.record()?);
    }
    for _ in 0..nscount {
        message.authority.push(reader.record()?);
    }
    for _ in 0..arcount {
        message.additional.push(reader.record()?);
    }

    Ok(message)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(WireError::Truncated { offset: self.pos })?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, WireError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, WireError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a possibly compressed name. Each pointer must target an offset
    /// before the start of the label run it terminates, which rules out
    /// cycles.
    fn name(&mut self) -> Result<DomainName, WireError> {
        let start = self.pos;
        let mut labels: SmallVec<[&[u8]; 8]> = SmallVec::new();
        let mut wire_len = 1;
        let mut cursor = self.pos;
        let mut run_start = self.pos;
        let mut resume_at = None;

        loop {
            let len = *self
                .buf
                .get(cursor)
                .ok_or(WireError::Truncated { offset: cursor })?;

            match len & 0xc0 {
                0x00 if len == 0 => {
                    cursor += 1;
                    break;
                }
                0x00 => {
                    let label_start = cursor + 1;
                    let label_end = label_start + len as usize;
                    let label = self
                        .buf
                        .get(label_start..label_end)
                        .ok_or(WireError::Truncated { offset: cursor })?;
                    wire_len += label.len() + 1;
                    if wire_len > MAX_NAME_WIRE_LEN {
                        return Err(WireError::NameTooLong { offset: start });
                    }
                    labels.push(label);
                    cursor = label_end;
                }
                0xc0 => {
                    let low = *self
                        .buf
                        .get(cursor + 1)
                        .ok_or(WireError::Truncated { offset: cursor })?;
                    let target = (usize::from(len & 0x3f) << 8) | usize::from(low);
                    if target >= run_start {
                        return Err(WireError::BadPointer {
                            offset: cursor,
                            target,
                        });
                    }
                    if resume_at.is_none() {
                        resume_at = Some(cursor + 2);
                    }
                    cursor = target;
                    run_start = target;
                }
                _ => {
                    return Err(WireError::InvalidLabel {
                        offset: cursor,
                        label: len,
                    })
                }
            }
        }

        self.pos = resume_at.unwrap_or(cursor);
        DomainName::from_labels(labels).map_err(|_| WireError::NameTooLong { offset: start })
    }

    fn character_string(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.u8()? as usize;
        self.take(len)
    }

    fn record(&mut self) -> Result<Record, WireError> {
        let name = self.name()?;
        let record_type = RecordType::from_u16(self.u16()?);
        let class = self.u16()?;
        let ttl = self.u32()?;
        let rdlength = self.u16()? as usize;

        let rdata_start = self.pos;
        let rdata_end = rdata_start + rdlength;
        if rdata_end > self.buf.len() {
            return Err(WireError::Truncated { offset: rdata_start });
        }

        let data = self.rdata(record_type, rdata_end)?;
        if self.pos != rdata_end {
            return Err(WireError::InvalidRdata {
                record_type,
                reason: format!(
                    "rdata consumed {} of {} bytes",
                    self.pos - rdata_start,
                    rdlength
                ),
            });
        }

        Ok(Record {
            name,
            class,
            ttl,
            data,
        })
    }

    fn rdata(&mut self, record_type: RecordType, end: usize) -> Result<RData, WireError> {
        let rdlength = end - self.pos;
        let invalid = |reason: &str| WireError::InvalidRdata {
            record_type,
            reason: reason.to_string(),
        };

        let data = match record_type {
            RecordType::A => {
                let b: [u8; 4] = self
                    .take(rdlength)?
                    .try_into()
                    .map_err(|_| invalid("expected 4 bytes"))?;
                RData::A(Ipv4Addr::from(b))
            }
            RecordType::AAAA => {
                let b: [u8; 16] = self
                    .take(rdlength)?
                    .try_into()
                    .map_err(|_| invalid("expected 16 bytes"))?;
                RData::AAAA(Ipv6Addr::from(b))
            }
            RecordType::PTR => RData::Ptr(self.name()?),
            RecordType::CNAME => RData::Cname(self.name()?),
            RecordType::NS => RData::Ns(self.name()?),
            RecordType::MX => RData::Mx(MxRecord {
                preference: self.u16()?,
                exchange: self.name()?,
            }),
            RecordType::SRV => RData::Srv(SrvRecord {
                priority: self.u16()?,
                weight: self.u16()?,
                port: self.u16()?,
                target: self.name()?,
            }),
            RecordType::TXT => {
                if rdlength == 0 {
                    return Err(invalid("empty TXT rdata"));
                }
                let mut segments = Vec::new();
                while self.pos < end {
                    segments.push(self.character_string()?.to_vec());
                }
                RData::Txt(TxtRecord { segments })
            }
            RecordType::SOA => RData::Soa(SoaRecord {
                mname: self.name()?,
                rname: self.name()?,
                serial: self.u32()?,
                refresh: self.u32()?,
                retry: self.u32()?,
                expire: self.u32()?,
                minimum: self.u32()?,
            }),
            RecordType::OPT => RData::Opt(self.take(rdlength)?.to_vec()),
            RecordType::Unknown(code) => RData::Unknown {
                code,
                data: self.take(rdlength)?.to_vec(),
            },
        };
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::wire::{encode, encode_query, Rcode};
    use ferrous_resolver_domain::Query;

    fn response_header(ancount: u8) -> Vec<u8> {
        vec![0xab, 0xcd, 0x81, 0x80, 0, 1, 0, ancount, 0, 0, 0, 0]
    }

    fn question() -> Vec<u8> {
        b"\x07example\x03com\x00\x00\x01\x00\x01".to_vec()
    }

    #[test]
    fn test_decode_round_trips_question() {
        let query = Query::parse("_sip._udp.Example.ORG", RecordType::SRV).unwrap();
        let bytes = encode_query(&query, 0x0102, 1232).unwrap();
        let message = decode(&bytes).unwrap();

        assert_eq!(message.id(), 0x0102);
        assert_eq!(message.questions, vec![query]);
        assert_eq!(message.edns_payload_size(), Some(1232));
        assert!(message.header.recursion_desired);
        assert!(!message.header.response);
    }

    #[test]
    fn test_decode_answer_with_pointer() {
        let mut bytes = response_header(1);
        bytes.extend(question());
        bytes.extend([0xc0, 0x0c, 0, 1, 0, 1, 0, 0, 0, 60, 0, 4, 93, 184, 216, 34]);

        let message = decode(&bytes).unwrap();
        assert_eq!(message.rcode(), Rcode::NoError);
        assert_eq!(message.answers.len(), 1);
        let answer = &message.answers[0];
        assert_eq!(answer.name.to_string(), "example.com.");
        assert_eq!(answer.ttl, 60);
        assert_eq!(answer.data, RData::A(Ipv4Addr::new(93, 184, 216, 34)));
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        assert_eq!(
            decode(&[0xab, 0xcd, 0x81]),
            Err(WireError::Truncated { offset: 2 })
        );
    }

    #[test]
    fn test_decode_rejects_forward_pointer() {
        let mut bytes = response_header(1);
        bytes.extend(question());
        // owner name points past itself
        bytes.extend([0xc0, 0x40, 0, 1, 0, 1, 0, 0, 0, 60, 0, 4, 1, 2, 3, 4]);
        assert!(matches!(
            decode(&bytes),
            Err(WireError::BadPointer { target: 0x40, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_pointer_loop() {
        let mut bytes = response_header(1);
        bytes.extend(question());
        let loop_at = bytes.len();
        // "a" followed by a pointer back to itself
        bytes.extend([1, b'a', 0xc0, loop_at as u8]);
        bytes.extend([0, 1, 0, 1, 0, 0, 0, 60, 0, 4, 1, 2, 3, 4]);
        assert!(matches!(decode(&bytes), Err(WireError::BadPointer { .. })));
    }

    #[test]
    fn test_decode_rejects_reserved_label_type() {
        let mut bytes = response_header(0);
        bytes.extend([0x40, 0, 1, 0, 1]);
        assert!(matches!(
            decode(&bytes),
            Err(WireError::InvalidLabel { label: 0x40, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_counts_beyond_buffer() {
        let mut bytes = response_header(200);
        bytes.extend(question());
        assert!(matches!(
            decode(&bytes),
            Err(WireError::CountOverflow { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_rdata_past_end() {
        let mut bytes = response_header(1);
        bytes.extend(question());
        bytes.extend([0xc0, 0x0c, 0, 1, 0, 1, 0, 0, 0, 60, 0, 4, 1, 2]);
        assert!(matches!(decode(&bytes), Err(WireError::Truncated { .. })));
    }

    #[test]
    fn test_decode_rejects_bad_address_length() {
        let mut bytes = response_header(1);
        bytes.extend(question());
        bytes.extend([0xc0, 0x0c, 0, 1, 0, 1, 0, 0, 0, 60, 0, 3, 1, 2, 3]);
        assert!(matches!(
            decode(&bytes),
            Err(WireError::InvalidRdata {
                record_type: RecordType::A,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_txt_keeps_segments() {
        let query = Query::parse("example.com", RecordType::TXT).unwrap();
        let mut message = Message::response_to(&Message::query(9, query.clone(), 0));
        message.answers.push(Record::new(
            query.name.clone(),
            300,
            RData::Txt(TxtRecord::new(["v=spf1", "include:example.com"])),
        ));

        let decoded = decode(&encode(&message).unwrap()).unwrap();
        assert_eq!(decoded.answers, message.answers);
    }
}
