//! JSON document store: the whole data set lives in memory and is written
//! back to its file after every successful mutation.

use super::RecordStore;
use crate::error::StoreError;
use crate::models::{
    DataSet, MedicalRecord, MedicalRecordUpdate, Person, PersonUpdate, StationAssignment,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub struct JsonFileStore {
    path: Option<PathBuf>,
    data: RwLock<Arc<DataSet>>,
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (p, s, m) = self.snapshot().counts();
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("persons", &p)
            .field("firestations", &s)
            .field("medicalrecords", &m)
            .finish()
    }
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();
        let text = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: display.clone(),
            source,
        })?;
        let data: DataSet = serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: display.clone(),
            source,
        })?;
        let (p, s, m) = data.counts();
        log::info!(
            "Loaded {}: {} persons, {} firestations, {} medical records",
            display,
            p,
            s,
            m
        );
        Ok(Self {
            path: Some(path),
            data: RwLock::new(Arc::new(data)),
        })
    }

    /// A store with no backing file; mutations stay in memory.
    pub fn in_memory(data: DataSet) -> Self {
        Self {
            path: None,
            data: RwLock::new(Arc::new(data)),
        }
    }

    fn persist(&self, data: &DataSet) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let display = path.display().to_string();
        let text = serde_json::to_string_pretty(data)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: display.clone(),
                    source,
                })?;
            }
        }
        // write atomically: write to tmp then rename
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, text.as_bytes())
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|source| StoreError::Write {
                path: display.clone(),
                source,
            })?;
        log::info!("Data written to {}", display);
        Ok(())
    }

    /// Apply `f` to a copy of the current data, persist the copy, then publish it.
    /// Nothing changes if `f` or the write fails.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut DataSet) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        let mut next = (**guard).clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *guard = Arc::new(next);
        Ok(out)
    }

    pub fn add_person(&self, person: Person) -> Result<Person, StoreError> {
        require_name("person", &person.first_name, &person.last_name)?;
        log::debug!("Adding person {}", person.full_name());
        self.mutate(|d| {
            d.persons.push(person.clone());
            Ok(person)
        })
    }

    pub fn update_person(
        &self,
        first_name: &str,
        last_name: &str,
        update: &PersonUpdate,
    ) -> Result<Person, StoreError> {
        self.mutate(|d| {
            let p = d
                .persons
                .iter_mut()
                .find(|p| same_key(&p.first_name, &p.last_name, first_name, last_name))
                .ok_or_else(|| not_found("person", first_name, last_name))?;
            update.apply_to(p);
            Ok(p.clone())
        })
    }

    pub fn delete_person(&self, first_name: &str, last_name: &str) -> Result<(), StoreError> {
        self.mutate(|d| {
            let before = d.persons.len();
            d.persons
                .retain(|p| !same_key(&p.first_name, &p.last_name, first_name, last_name));
            if d.persons.len() == before {
                return Err(not_found("person", first_name, last_name));
            }
            Ok(())
        })
    }

    pub fn add_station(&self, assignment: StationAssignment) -> Result<StationAssignment, StoreError> {
        if assignment.address.trim().is_empty() || assignment.station.trim().is_empty() {
            return Err(StoreError::Invalid {
                kind: "firestation",
                reason: "address and station are required".into(),
            });
        }
        log::debug!(
            "Adding firestation {} for {}",
            assignment.station,
            assignment.address
        );
        self.mutate(|d| {
            d.firestations.push(assignment.clone());
            Ok(assignment)
        })
    }

    /// Reassign every mapping of `address` to `station`.
    pub fn update_station(
        &self,
        address: &str,
        station: &str,
    ) -> Result<StationAssignment, StoreError> {
        self.mutate(|d| {
            let mut hit = None;
            for a in d.firestations.iter_mut().filter(|a| a.address == address) {
                a.station = station.to_string();
                hit.get_or_insert_with(|| a.clone());
            }
            hit.ok_or_else(|| StoreError::NotFound {
                kind: "firestation",
                key: address.to_string(),
            })
        })
    }

    pub fn delete_station(&self, address: &str) -> Result<(), StoreError> {
        self.mutate(|d| {
            let before = d.firestations.len();
            d.firestations.retain(|a| a.address != address);
            if d.firestations.len() == before {
                return Err(StoreError::NotFound {
                    kind: "firestation",
                    key: address.to_string(),
                });
            }
            Ok(())
        })
    }

    pub fn add_medical_record(&self, record: MedicalRecord) -> Result<MedicalRecord, StoreError> {
        require_name("medical record", &record.first_name, &record.last_name)?;
        log::debug!(
            "Adding medical record {} {}",
            record.first_name,
            record.last_name
        );
        self.mutate(|d| {
            d.medicalrecords.push(record.clone());
            Ok(record)
        })
    }

    pub fn update_medical_record(
        &self,
        first_name: &str,
        last_name: &str,
        update: &MedicalRecordUpdate,
    ) -> Result<MedicalRecord, StoreError> {
        self.mutate(|d| {
            let r = d
                .medicalrecords
                .iter_mut()
                .find(|r| same_key(&r.first_name, &r.last_name, first_name, last_name))
                .ok_or_else(|| not_found("medical record", first_name, last_name))?;
            update.apply_to(r);
            Ok(r.clone())
        })
    }

    pub fn delete_medical_record(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), StoreError> {
        self.mutate(|d| {
            let before = d.medicalrecords.len();
            d.medicalrecords
                .retain(|r| !same_key(&r.first_name, &r.last_name, first_name, last_name));
            if d.medicalrecords.len() == before {
                return Err(not_found("medical record", first_name, last_name));
            }
            Ok(())
        })
    }
}

impl RecordStore for JsonFileStore {
    fn snapshot(&self) -> Arc<DataSet> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }
}

// Record keys for update and delete ignore case.
fn same_key(first_a: &str, last_a: &str, first_b: &str, last_b: &str) -> bool {
    first_a.to_lowercase() == first_b.to_lowercase()
        && last_a.to_lowercase() == last_b.to_lowercase()
}

fn not_found(kind: &'static str, first_name: &str, last_name: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        key: format!("{} {}", first_name, last_name),
    }
}

fn require_name(kind: &'static str, first_name: &str, last_name: &str) -> Result<(), StoreError> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(StoreError::Invalid {
            kind,
            reason: "first name and last name are required".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_doc() -> serde_json::Value {
        json!({
            "persons": [
                {"firstName": "John", "lastName": "Boyd", "address": "1509 Culver St", "city": "Culver",
                 "zip": "97451", "phone": "841-874-6512", "email": "jaboyd@email.com"}
            ],
            "firestations": [
                {"address": "1509 Culver St", "station": "3"}
            ],
            "medicalrecords": [
                {"firstName": "John", "lastName": "Boyd", "birthdate": "03/06/1984",
                 "medications": ["aznol:350mg"], "allergies": ["nillacilan"]}
            ]
        })
    }

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("data.json");
        fs::write(&path, serde_json::to_string(&sample_doc()).unwrap()).unwrap();
        path
    }

    #[test]
    fn open_reads_all_collections() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(write_sample(&dir)).unwrap();
        assert_eq!(store.people().len(), 1);
        assert_eq!(store.station_assignments()[0].station, "3");
        assert_eq!(
            store.medical_records()[0].birthdate,
            NaiveDate::from_ymd_opt(1984, 3, 6)
        );
    }

    #[test]
    fn open_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = JsonFileStore::open(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn open_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path).unwrap_err(),
            StoreError::Parse { .. }
        ));
    }

    #[test]
    fn mutations_are_written_through() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let store = JsonFileStore::open(&path).unwrap();
        store
            .add_person(Person {
                first_name: "Tenley".into(),
                last_name: "Boyd".into(),
                address: "1509 Culver St".into(),
                ..Default::default()
            })
            .unwrap();
        store.update_station("1509 Culver St", "4").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.people().len(), 2);
        assert_eq!(reopened.station_assignments()[0].station, "4");
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn update_and_delete_match_names_ignoring_case() {
        let store = JsonFileStore::in_memory(serde_json::from_value(sample_doc()).unwrap());
        let updated = store
            .update_person(
                "john",
                "BOYD",
                &PersonUpdate {
                    address: "29 15th St".into(),
                    city: "Culver".into(),
                    zip: "97451".into(),
                    phone: "841-874-0000".into(),
                    email: "new@email.com".into(),
                },
            )
            .unwrap();
        assert_eq!(updated.first_name, "John");
        assert_eq!(updated.address, "29 15th St");

        store.delete_medical_record("JOHN", "boyd").unwrap();
        assert!(store.medical_records().is_empty());
    }

    #[test]
    fn missing_targets_are_not_found() {
        let store = JsonFileStore::in_memory(serde_json::from_value(sample_doc()).unwrap());
        assert!(matches!(
            store.delete_person("Eric", "Cadigan"),
            Err(StoreError::NotFound { kind: "person", .. })
        ));
        assert!(matches!(
            store.update_station("nowhere", "1"),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.update_medical_record("Eric", "Cadigan", &MedicalRecordUpdate::default()),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn add_requires_names() {
        let store = JsonFileStore::in_memory(DataSet::default());
        let err = store.add_person(Person::default()).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { .. }));
        assert!(store.people().is_empty());
    }

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let store = JsonFileStore::in_memory(serde_json::from_value(sample_doc()).unwrap());
        let before = store.snapshot();
        store.delete_station("1509 Culver St").unwrap();
        assert_eq!(before.firestations.len(), 1);
        assert!(store.snapshot().firestations.is_empty());
    }
}
