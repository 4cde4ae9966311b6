use crate::alerts::age::{format_birthdate, parse_birthdate};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Attributes of a person that can change without changing who they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonUpdate {
    pub address: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl PersonUpdate {
    pub fn apply_to(&self, p: &mut Person) {
        p.address = self.address.clone();
        p.city = self.city.clone();
        p.zip = self.zip.clone();
        p.phone = self.phone.clone();
        p.email = self.email.clone();
    }
}

/// Address to fire station mapping. The station is an opaque identifier:
/// the document may carry it as `"3"` or `3`, both are held as `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StationAssignment {
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "station_id_from_any")]
    pub station: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StationRepr {
    Text(String),
    Number(i64),
}

fn station_id_from_any<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StationRepr::deserialize(d)? {
        StationRepr::Text(s) => s,
        StationRepr::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalRecord {
    pub first_name: String,
    pub last_name: String,
    #[serde(
        serialize_with = "birthdate_to_text",
        deserialize_with = "birthdate_from_any"
    )]
    pub birthdate: Option<NaiveDate>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalRecordUpdate {
    #[serde(
        serialize_with = "birthdate_to_text",
        deserialize_with = "birthdate_from_any"
    )]
    pub birthdate: Option<NaiveDate>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl MedicalRecordUpdate {
    pub fn apply_to(&self, r: &mut MedicalRecord) {
        r.birthdate = self.birthdate;
        r.medications = self.medications.clone();
        r.allergies = self.allergies.clone();
    }
}

fn birthdate_to_text<S>(d: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match d {
        Some(date) => s.serialize_str(&format_birthdate(*date)),
        None => s.serialize_none(),
    }
}

// Anything that is not a parseable date string becomes `None`.
fn birthdate_from_any<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(d)?;
    Ok(match raw {
        serde_json::Value::String(s) => parse_birthdate(&s),
        _ => None,
    })
}

/// The whole data document: the three collections under their on-disk keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataSet {
    pub persons: Vec<Person>,
    pub firestations: Vec<StationAssignment>,
    pub medicalrecords: Vec<MedicalRecord>,
}

impl DataSet {
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.persons.len(),
            self.firestations.len(),
            self.medicalrecords.len(),
        )
    }
}
