use async_trait::async_trait;
use ferrous_resolver_application::ports::RecordSource;
use ferrous_resolver_domain::{
    DomainName, MxRecord, Query, RData, Record, RecordType, Resolution, ResolveError, SrvRecord,
    TxtRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

type Key = (String, RecordType);

/// Scripted answers keyed by (name, type). Unscripted questions get NXDOMAIN.
pub struct MockRecordSource {
    answers: Arc<RwLock<HashMap<Key, Result<Resolution, ResolveError>>>>,
    delays: Arc<RwLock<HashMap<Key, Duration>>>,
    calls: AtomicUsize,
}

fn key(name: &str, record_type: RecordType) -> Key {
    let name = DomainName::parse(name).unwrap();
    (name.to_fqdn().to_ascii_lowercase(), record_type)
}

pub fn name(text: &str) -> DomainName {
    DomainName::parse(text).unwrap()
}

pub fn mx(preference: u16, exchange: &str) -> RData {
    RData::Mx(MxRecord {
        preference,
        exchange: name(exchange),
    })
}

pub fn srv(priority: u16, weight: u16, port: u16, target: &str) -> RData {
    RData::Srv(SrvRecord {
        priority,
        weight,
        port,
        target: name(target),
    })
}

pub fn txt(segments: &[&str]) -> RData {
    RData::Txt(TxtRecord::new(segments.iter().map(|s| s.as_bytes().to_vec())))
}

impl MockRecordSource {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(RwLock::new(HashMap::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn set_records(&self, owner: &str, record_type: RecordType, data: Vec<RData>) {
        let owner_name = name(owner);
        let records = data
            .into_iter()
            .map(|d| Record::new(owner_name.clone(), 300, d))
            .collect();
        self.set_resolution(owner, record_type, Resolution::new(owner_name, records))
            .await;
    }

    pub async fn set_resolution(
        &self,
        owner: &str,
        record_type: RecordType,
        resolution: Resolution,
    ) {
        self.answers
            .write()
            .await
            .insert(key(owner, record_type), Ok(resolution));
    }

    pub async fn set_error(&self, owner: &str, record_type: RecordType, error: ResolveError) {
        self.answers
            .write()
            .await
            .insert(key(owner, record_type), Err(error));
    }

    pub async fn set_delay(&self, owner: &str, record_type: RecordType, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(key(owner, record_type), delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn resolve(&self, query: &Query) -> Result<Resolution, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (query.name.to_fqdn().to_ascii_lowercase(), query.record_type);

        let delay = self.delays.read().await.get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.answers
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(ResolveError::not_found(
                    query.name.to_fqdn(),
                    query.record_type,
                    true,
                ))
            })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
