//! Track aggregation and ranking core for the live tracking dashboard.
//!
//! Every poll cycle is recomputed from scratch: raw reports are validated,
//! grouped into tracks, projected onto a travel status, ranked, and merged
//! with the session's visibility flags.

pub mod board;
pub mod directory;
pub mod geo;
pub mod prelude;
pub mod report;
pub mod selection;
pub mod telemetry;
pub mod tracking;

pub use board::{refresh, Board, BoardEntry};
pub use prelude::{CoreResult, Destination, GroupBy, ReportError, ARRIVAL_THRESHOLD_KM};
