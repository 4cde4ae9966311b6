use super::age::age_on;
use crate::models::{MedicalRecord, Person};
use crate::normalize::MatchPolicy;
use chrono::NaiveDate;

/// Medical details attached to a person in a report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MedicalFacts {
    pub age: u32,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

pub struct MedicalJoin<'a> {
    records: &'a [MedicalRecord],
    policy: MatchPolicy,
    today: NaiveDate,
}

impl<'a> MedicalJoin<'a> {
    pub fn new(records: &'a [MedicalRecord], policy: MatchPolicy, today: NaiveDate) -> Self {
        Self {
            records,
            policy,
            today,
        }
    }

    /// First record whose first and last name both match.
    pub fn find_record(&self, first_name: &str, last_name: &str) -> Option<&'a MedicalRecord> {
        self.records.iter().find(|r| {
            self.policy
                .same_name(&r.first_name, &r.last_name, first_name, last_name)
        })
    }

    pub fn record_for(&self, p: &Person) -> Option<&'a MedicalRecord> {
        self.find_record(&p.first_name, &p.last_name)
    }

    pub fn age_of(&self, record: &MedicalRecord) -> u32 {
        age_on(record.birthdate, self.today)
    }

    /// Age and treatment lists for `p`; age 0 and empty lists without a record.
    pub fn facts_for(&self, p: &Person) -> MedicalFacts {
        match self.record_for(p) {
            Some(r) => MedicalFacts {
                age: self.age_of(r),
                medications: r.medications.clone(),
                allergies: r.allergies.clone(),
            },
            None => {
                log::debug!("no medical record for {}", p.full_name());
                MedicalFacts::default()
            }
        }
    }
}
