//! Per-cycle derivations: tracks, their status, and the display order.

pub mod ranking;
pub mod status;
pub mod track;

pub use ranking::rank;
pub use status::{project_status, Status};
pub use track::{build_tracks, Track};
