use async_trait::async_trait;
use ferrous_resolver_application::ports::RecordSource;
use ferrous_resolver_domain::{
    DomainName, MxRecord, Query, RData, Record, RecordType, Resolution, ResolveError, SrvRecord,
    TxtRecord,
};
use hickory_proto::op::{Message, MessageType, OpCode, Query as HickoryQuery, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData as HickoryRData, RecordType as HickoryRecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tracing::debug;

/// One server, UDP with a TCP retry on truncation, no failover.
pub struct HickoryOracle {
    server: SocketAddr,
    timeout: Duration,
}

impl HickoryOracle {
    pub fn new(server: SocketAddr, timeout: Duration) -> Self {
        Self { server, timeout }
    }

    fn build_query(&self, query: &Query) -> Result<(u16, Vec<u8>), ResolveError> {
        let name = Name::from_str(&query.name.to_fqdn())
            .map_err(|e| ResolveError::InvalidName(format!("{}: {}", query.name, e)))?;

        let mut hickory_query = HickoryQuery::new();
        hickory_query.set_name(name);
        hickory_query.set_query_type(HickoryRecordType::from(query.record_type.to_u16()));
        hickory_query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);
        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(hickory_query);

        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        message
            .emit(&mut encoder)
            .map_err(|e| self.failure(e.to_string()))?;
        Ok((id, buf))
    }

    async fn send_udp(&self, bytes: &[u8], id: u16) -> Result<Vec<u8>, ResolveError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| self.failure(e.to_string()))?;
        socket
            .send_to(bytes, self.server)
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        let mut buf = vec![0u8; 65535];
        loop {
            let (len, from) = socket
                .recv_from(&mut buf)
                .await
                .map_err(|e| self.failure(e.to_string()))?;
            if from == self.server && len >= 2 && u16::from_be_bytes([buf[0], buf[1]]) == id {
                buf.truncate(len);
                return Ok(buf);
            }
        }
    }

    async fn send_tcp(&self, bytes: &[u8]) -> Result<Vec<u8>, ResolveError> {
        let mut stream = TcpStream::connect(self.server)
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        let mut framed = (bytes.len() as u16).to_be_bytes().to_vec();
        framed.extend_from_slice(bytes);
        stream
            .write_all(&framed)
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        let mut len_buf = [0u8; 2];
        stream
            .read_exact(&mut len_buf)
            .await
            .map_err(|e| self.failure(e.to_string()))?;
        let mut response = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        stream
            .read_exact(&mut response)
            .await
            .map_err(|e| self.failure(e.to_string()))?;
        Ok(response)
    }

    async fn exchange(&self, query: &Query) -> Result<Message, ResolveError> {
        let (id, bytes) = self.build_query(query)?;

        let mut response = self.parse(&self.send_udp(&bytes, id).await?)?;
        if response.truncated() {
            debug!(query = %query, "Reference answer truncated, retrying over TCP");
            response = self.parse(&self.send_tcp(&bytes).await?)?;
        }
        Ok(response)
    }

    fn parse(&self, bytes: &[u8]) -> Result<Message, ResolveError> {
        Message::from_vec(bytes).map_err(|e| ResolveError::MalformedResponse {
            server: self.server.to_string(),
            reason: e.to_string(),
        })
    }

    fn failure(&self, reason: String) -> ResolveError {
        ResolveError::ServerFailure {
            server: self.server.to_string(),
            reason,
        }
    }

    fn domain_name(&self, name: &Name) -> Result<DomainName, ResolveError> {
        DomainName::parse(&name.to_utf8()).map_err(|e| ResolveError::MalformedResponse {
            server: self.server.to_string(),
            reason: e.to_string(),
        })
    }

    fn convert(&self, data: &HickoryRData) -> Result<Option<RData>, ResolveError> {
        let converted = match data {
            HickoryRData::A(a) => RData::A(a.0),
            HickoryRData::AAAA(aaaa) => RData::AAAA(aaaa.0),
            HickoryRData::CNAME(cname) => RData::Cname(self.domain_name(&cname.0)?),
            HickoryRData::NS(ns) => RData::Ns(self.domain_name(&ns.0)?),
            HickoryRData::PTR(ptr) => RData::Ptr(self.domain_name(&ptr.0)?),
            HickoryRData::MX(mx) => RData::Mx(MxRecord {
                preference: mx.preference(),
                exchange: self.domain_name(mx.exchange())?,
            }),
            HickoryRData::SRV(srv) => RData::Srv(SrvRecord {
                priority: srv.priority(),
                weight: srv.weight(),
                port: srv.port(),
                target: self.domain_name(srv.target())?,
            }),
            HickoryRData::TXT(txt) => {
                RData::Txt(TxtRecord::new(txt.txt_data().iter().map(|s| s.to_vec())))
            }
            _ => return Ok(None),
        };
        Ok(Some(converted))
    }
}

#[async_trait]
impl RecordSource for HickoryOracle {
    async fn resolve(&self, query: &Query) -> Result<Resolution, ResolveError> {
        let message = tokio::time::timeout(self.timeout, self.exchange(query))
            .await
            .map_err(|_| ResolveError::Timeout {
                name: query.name.to_fqdn(),
            })??;

        match message.response_code() {
            ResponseCode::NoError => {}
            ResponseCode::NXDomain => {
                return Err(ResolveError::not_found(
                    query.name.to_fqdn(),
                    query.record_type,
                    true,
                ))
            }
            other => return Err(self.failure(format!("{:?}", other))),
        }

        let mut canonical_name = query.name.clone();
        let mut records = Vec::new();
        for answer in message.answers() {
            let Some(data) = self.convert(answer.data())? else {
                continue;
            };
            let owner = self.domain_name(answer.name())?;
            match &data {
                RData::Cname(target) if query.record_type != RecordType::CNAME => {
                    if owner == canonical_name {
                        canonical_name = target.clone();
                    }
                }
                _ if data.record_type() == query.record_type => {
                    records.push(Record::new(owner, answer.ttl(), data));
                }
                _ => {}
            }
        }

        if records.is_empty() {
            return Err(ResolveError::not_found(
                query.name.to_fqdn(),
                query.record_type,
                false,
            ));
        }
        Ok(Resolution::new(canonical_name, records))
    }

    fn name(&self) -> &'static str {
        "hickory"
    }
}
