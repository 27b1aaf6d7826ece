pub mod counter_source;
pub mod record_store;

pub use counter_source::{CounterSource, RawInterface, SourceError};
pub use record_store::{RecordStore, Tick};
