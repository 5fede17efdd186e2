#![allow(dead_code)]
mod mock_record_source;

pub use mock_record_source::{mx, name, srv, txt, MockRecordSource};
