use crate::prelude::ReportError;
use crate::report::record::RawReport;
use crate::report::wire::WireReport;
use crate::telemetry::log::LogManager;
use serde_json::Value;

/// Result of validating one poll batch.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    /// Accepted reports, in input order.
    pub reports: Vec<RawReport>,
    /// Index into the original batch and the reason it was dropped.
    pub rejected: Vec<(usize, ReportError)>,
}

impl IngestOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validates a batch of wire reports, keeping the accepted ones in order.
pub fn ingest(batch: Vec<WireReport>) -> IngestOutcome {
    let logger = LogManager::new();
    let mut outcome = IngestOutcome::default();
    for (index, wire) in batch.into_iter().enumerate() {
        match RawReport::try_from(wire) {
            Ok(report) => outcome.reports.push(report),
            Err(err) => {
                logger.record_rejected(index, &err);
                outcome.rejected.push((index, err));
            }
        }
    }
    if !outcome.is_clean() {
        logger.record(&format!(
            "accepted {} reports, rejected {}",
            outcome.reports.len(),
            outcome.rejected.len()
        ));
    }
    outcome
}

/// Parses a poll-source body. A body that is not a JSON array fails as a
/// whole; individual elements of the wrong shape are rejected one by one.
pub fn ingest_json(body: &str) -> Result<IngestOutcome, serde_json::Error> {
    let elements: Vec<Value> = serde_json::from_str(body)?;
    let logger = LogManager::new();
    let mut wires = Vec::with_capacity(elements.len());
    let mut malformed = Vec::new();

    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<WireReport>(element) {
            Ok(wire) => wires.push((index, wire)),
            Err(err) => {
                let err = ReportError::Malformed(err.to_string());
                logger.record_rejected(index, &err);
                malformed.push((index, err));
            }
        }
    }

    let mut outcome = IngestOutcome::default();
    for (index, wire) in wires {
        match RawReport::try_from(wire) {
            Ok(report) => outcome.reports.push(report),
            Err(err) => {
                logger.record_rejected(index, &err);
                outcome.rejected.push((index, err));
            }
        }
    }
    outcome.rejected.extend(malformed);
    outcome.rejected.sort_by_key(|(index, _)| *index);
    Ok(outcome)
}
