mod record;
mod record_type;

pub use record::{MxRecord, RData, Record, SoaRecord, SrvRecord, TxtRecord};
pub use record_type::RecordType;
