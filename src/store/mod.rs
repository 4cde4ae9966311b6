pub mod json_store;

use crate::models::{DataSet, MedicalRecord, Person, StationAssignment};
use std::sync::Arc;

pub use json_store::JsonFileStore;

/// Read access to the three record collections.
///
/// Implementations hand out consistent snapshots; a report is always computed
/// against one snapshot even if the store changes meanwhile.
pub trait RecordStore {
    fn snapshot(&self) -> Arc<DataSet>;

    fn people(&self) -> Vec<Person> {
        self.snapshot().persons.clone()
    }

    fn station_assignments(&self) -> Vec<StationAssignment> {
        self.snapshot().firestations.clone()
    }

    fn medical_records(&self) -> Vec<MedicalRecord> {
        self.snapshot().medicalrecords.clone()
    }
}

impl RecordStore for DataSet {
    fn snapshot(&self) -> Arc<DataSet> {
        Arc::new(self.clone())
    }
}
