//! Data models shared across the service.

mod record;

pub use record::{FeatureRecord, NewPatientRecord, Outcome, PatientRecord, RecordId};
