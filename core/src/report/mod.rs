//! Poll-source schema and the validation boundary in front of the core.

pub mod ingest;
pub mod record;
pub mod wire;

pub use ingest::{ingest, ingest_json, IngestOutcome};
pub use record::RawReport;
pub use wire::WireReport;
