//! Cross-collection alert reports.
//!
//! An [`AlertEngine`] borrows one snapshot of the data document and answers the
//! seven report queries against it. It never mutates the snapshot and never
//! fails: anything that cannot be resolved becomes an empty collection or a
//! documented default.

pub mod age;
pub mod household;
pub mod medical;
pub mod reports;

use crate::models::{DataSet, Person};
use crate::normalize::MatchPolicy;
use age::{DEFAULT_MAX_CHILD_AGE, is_child};
use chrono::NaiveDate;
use household::HouseholdResolver;
use medical::MedicalJoin;
use reports::{
    ChildInfo, ChildReport, CommunityEmailReport, CoverageReport, CoveredPerson, FireReport,
    FloodReport, HouseholdMember, PersonInfo, PersonInfoReport, PhoneReport, Resident,
};
use std::collections::{BTreeMap, HashSet};

pub use reports::{AlertReport, ReportKind};

pub struct AlertEngine<'a> {
    data: &'a DataSet,
    policy: MatchPolicy,
    today: NaiveDate,
    max_child_age: u32,
}

impl<'a> AlertEngine<'a> {
    pub fn new(data: &'a DataSet, today: NaiveDate) -> Self {
        Self {
            data,
            policy: MatchPolicy::default(),
            today,
            max_child_age: DEFAULT_MAX_CHILD_AGE,
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_child_age(mut self, max_child_age: u32) -> Self {
        self.max_child_age = max_child_age;
        self
    }

    fn households(&self) -> HouseholdResolver<'a> {
        HouseholdResolver::new(self.data, self.policy)
    }

    fn medical(&self) -> MedicalJoin<'a> {
        MedicalJoin::new(&self.data.medicalrecords, self.policy, self.today)
    }

    fn resident(&self, join: &MedicalJoin<'_>, p: &Person) -> Resident {
        let facts = join.facts_for(p);
        Resident {
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            phone: p.phone.clone(),
            age: facts.age,
            medications: facts.medications,
            allergies: facts.allergies,
        }
    }

    /// Children living at `address` plus the other people there.
    ///
    /// People without a medical record are left out of both lists. When no
    /// child lives at the address the report is empty, household included.
    pub fn children_at_address(&self, address: &str) -> ChildReport {
        let people = self.households().people_at_address(address);
        log::debug!("child alert: {} people at {}", people.len(), address);
        let join = self.medical();

        let mut children: Vec<ChildInfo> = Vec::new();
        let mut adults: Vec<HouseholdMember> = Vec::new();
        for p in people {
            let Some(record) = join.record_for(p) else {
                continue;
            };
            let age = join.age_of(record);
            if is_child(age, self.max_child_age) {
                children.push(ChildInfo {
                    first_name: p.first_name.clone(),
                    last_name: p.last_name.clone(),
                    age,
                });
            } else {
                let member = HouseholdMember {
                    first_name: p.first_name.clone(),
                    last_name: p.last_name.clone(),
                };
                if !adults.contains(&member) {
                    adults.push(member);
                }
            }
        }

        // A name that resolved as a child elsewhere in the household is not
        // listed again as a member.
        adults.retain(|m| {
            !children
                .iter()
                .any(|c| c.first_name == m.first_name && c.last_name == m.last_name)
        });

        if children.is_empty() {
            log::debug!("child alert: no children at {}", address);
            return ChildReport::default();
        }
        ChildReport {
            children,
            household_members: adults,
        }
    }

    /// People covered by `station_id`, with adult and child head counts.
    /// A person without a medical record counts as an adult.
    pub fn coverage_by_station(&self, station_id: &str) -> CoverageReport {
        let resolver = self.households();
        let addresses = resolver.addresses_for_stations(&[station_id]);
        let people = resolver.people_at_addresses(&addresses);
        let join = self.medical();

        let child_count = people
            .iter()
            .filter(|p| match join.record_for(p) {
                Some(r) => is_child(join.age_of(r), self.max_child_age),
                None => false,
            })
            .count();
        let adult_count = people.len() - child_count;
        log::debug!(
            "coverage for station {}: {} adults, {} children",
            station_id,
            adult_count,
            child_count
        );

        CoverageReport {
            persons: people
                .iter()
                .map(|p| CoveredPerson {
                    first_name: p.first_name.clone(),
                    last_name: p.last_name.clone(),
                    address: p.address.clone(),
                    phone: p.phone.clone(),
                })
                .collect(),
            adult_count,
            child_count,
        }
    }

    /// Station number and residents of `address`.
    ///
    /// The station number is 0 when the address has no mapping or the mapped
    /// identifier is not a number.
    pub fn fire_info_by_address(&self, address: &str) -> FireReport {
        let resolver = self.households();
        let station_number = match resolver.station_for_address(address) {
            Some(a) => a.station.parse::<u32>().unwrap_or_else(|_| {
                log::warn!(
                    "invalid fire station number '{}' for {}; using 0",
                    a.station,
                    address
                );
                0
            }),
            None => 0,
        };
        let join = self.medical();
        let residents = resolver
            .people_at_address(address)
            .into_iter()
            .map(|p| self.resident(&join, p))
            .collect::<Vec<_>>();
        log::debug!(
            "fire info for {}: station {}, {} residents",
            address,
            station_number,
            residents.len()
        );
        FireReport {
            station_number,
            residents,
        }
    }

    /// Residents of every address covered by any of `station_ids`, grouped by address.
    pub fn households_by_stations<S: AsRef<str>>(&self, station_ids: &[S]) -> FloodReport {
        let resolver = self.households();
        let addresses = resolver.addresses_for_stations(station_ids);
        let join = self.medical();

        let mut households: BTreeMap<String, Vec<Resident>> = BTreeMap::new();
        for p in resolver.people_at_addresses(&addresses) {
            households
                .entry(p.address.clone())
                .or_default()
                .push(self.resident(&join, p));
        }
        log::debug!(
            "flood: {} addresses covered, {} households populated",
            addresses.len(),
            households.len()
        );
        FloodReport { households }
    }

    /// Distinct non-empty emails of people living in `city`, first-seen order.
    pub fn emails_by_city(&self, city: &str) -> CommunityEmailReport {
        let mut seen = HashSet::new();
        let emails: Vec<String> = self
            .data
            .persons
            .iter()
            .filter(|p| self.policy.same_city(&p.city, city))
            .map(|p| p.email.as_str())
            .filter(|e| !e.is_empty() && seen.insert(*e))
            .map(str::to_string)
            .collect();
        log::debug!("community email for {}: {} emails", city, emails.len());
        CommunityEmailReport {
            city: city.to_string(),
            emails,
        }
    }

    pub fn person_info_by_last_name(&self, last_name: &str) -> PersonInfoReport {
        let join = self.medical();
        let persons: Vec<PersonInfo> = self
            .data
            .persons
            .iter()
            .filter(|p| self.policy.same_last_name(&p.last_name, last_name))
            .map(|p| {
                let facts = join.facts_for(p);
                PersonInfo {
                    first_name: p.first_name.clone(),
                    last_name: p.last_name.clone(),
                    address: p.address.clone(),
                    age: facts.age,
                    email: p.email.clone(),
                    medications: facts.medications,
                    allergies: facts.allergies,
                }
            })
            .collect();
        log::debug!("person info for {}: {} persons", last_name, persons.len());
        PersonInfoReport { persons }
    }

    /// Distinct phone numbers of people covered by `station_id`, first-seen order.
    /// An empty phone is a value like any other.
    pub fn phones_by_station(&self, station_id: &str) -> PhoneReport {
        let resolver = self.households();
        let addresses = resolver.addresses_for_stations(&[station_id]);
        let mut seen = HashSet::new();
        let phone_numbers: Vec<String> = resolver
            .people_at_addresses(&addresses)
            .into_iter()
            .map(|p| p.phone.as_str())
            .filter(|ph| seen.insert(*ph))
            .map(str::to_string)
            .collect();
        log::debug!(
            "phone alert for station {}: {} numbers",
            station_id,
            phone_numbers.len()
        );
        PhoneReport { phone_numbers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MedicalRecord, StationAssignment};
    use crate::normalize::TextMatch;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn born_years_ago(years: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024 - years, 6, 1)
    }

    fn person(first: &str, last: &str, address: &str, city: &str, phone: &str, email: &str) -> Person {
        Person {
            first_name: first.into(),
            last_name: last.into(),
            address: address.into(),
            city: city.into(),
            zip: "97451".into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    fn record(first: &str, last: &str, age: i32, meds: &[&str]) -> MedicalRecord {
        MedicalRecord {
            first_name: first.into(),
            last_name: last.into(),
            birthdate: born_years_ago(age),
            medications: meds.iter().map(|s| s.to_string()).collect(),
            allergies: vec![],
        }
    }

    fn station(address: &str, id: &str) -> StationAssignment {
        StationAssignment {
            address: address.into(),
            station: id.into(),
        }
    }

    const CULVER: &str = "1509 Culver St";

    fn sample() -> DataSet {
        DataSet {
            persons: vec![
                person("John", "Boyd", CULVER, "Culver", "841-874-6512", "jaboyd@email.com"),
                person("Tenley", "Boyd", CULVER, "Culver", "841-874-6512", "tenz@email.com"),
                person("Jacob", "Boyd", CULVER, "Culver", "841-874-6513", "jaboyd@email.com"),
                person("Peter", "Duncan", "644 Gershwin Cir", "Culver", "841-874-6544", ""),
                person("Reginold", "Walker", "908 73rd St", "Culver", "841-874-8547", "reg@email.com"),
                person("Jamie", "Peters", "908 73rd St", "Culver", "841-874-7462", "jpeter@email.com"),
                person("Eric", "Cadigan", "951 LoneTree Rd", "Culver", "841-874-7458", "gramps@email.com"),
                person("Ron", "Peters", "112 Steppes Pl", "Culver", "841-874-8888", "jpeter@email.com"),
            ],
            firestations: vec![
                station(CULVER, "3"),
                station("644 Gershwin Cir", "1"),
                station("908 73rd St", "1"),
                station("112 Steppes Pl", "4"),
                station("951 LoneTree Rd", "two"),
            ],
            medicalrecords: vec![
                record("John", "Boyd", 40, &["aznol:350mg"]),
                record("Tenley", "Boyd", 12, &[]),
                record("Jacob", "Boyd", 35, &["pharmacol:5000mg"]),
                record("Peter", "Duncan", 24, &[]),
                record("Reginold", "Walker", 45, &["thradox:700mg"]),
                record("Jamie", "Peters", 42, &[]),
                record("Eric", "Cadigan", 79, &["tradoxidine:400mg"]),
            ],
        }
    }

    #[test]
    fn child_alert_splits_children_and_members() {
        let ds = DataSet {
            persons: vec![
                person("John", "Boyd", CULVER, "Culver", "841-874-6512", "jaboyd@email.com"),
                person("Tenley", "Boyd", CULVER, "Culver", "841-874-6512", "tenz@email.com"),
            ],
            firestations: vec![],
            medicalrecords: vec![record("John", "Boyd", 35, &[]), record("Tenley", "Boyd", 10, &[])],
        };
        let r = AlertEngine::new(&ds, today()).children_at_address(CULVER);
        assert_eq!(
            r.children,
            vec![ChildInfo {
                first_name: "Tenley".into(),
                last_name: "Boyd".into(),
                age: 10
            }]
        );
        assert_eq!(
            r.household_members,
            vec![HouseholdMember {
                first_name: "John".into(),
                last_name: "Boyd".into()
            }]
        );
    }

    #[test]
    fn child_alert_without_children_is_empty() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).children_at_address("908 73rd St");
        assert!(r.children.is_empty());
        assert!(r.household_members.is_empty());
        assert!(r.is_empty());
    }

    #[test]
    fn child_alert_skips_people_without_record() {
        let mut ds = sample();
        ds.persons
            .push(person("Ghost", "Boyd", CULVER, "Culver", "000", ""));
        let r = AlertEngine::new(&ds, today()).children_at_address(CULVER);
        assert_eq!(r.children.len(), 1);
        let names: Vec<_> = r
            .household_members
            .iter()
            .map(|m| m.first_name.as_str())
            .collect();
        assert_eq!(names, vec!["John", "Jacob"]);
    }

    #[test]
    fn child_alert_lists_each_member_once() {
        let mut ds = sample();
        ds.persons
            .push(person("John", "Boyd", CULVER, "Culver", "841-874-6512", ""));
        let r = AlertEngine::new(&ds, today()).children_at_address(CULVER);
        let johns = r
            .household_members
            .iter()
            .filter(|m| m.first_name == "John")
            .count();
        assert_eq!(johns, 1);
    }

    #[test]
    fn child_age_bound_is_configurable() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today())
            .with_max_child_age(11)
            .children_at_address(CULVER);
        assert!(r.is_empty());
    }

    #[test]
    fn coverage_counts_adults_and_children() {
        let ds = DataSet {
            persons: vec![
                person("A", "One", "1 Main St", "Culver", "1", ""),
                person("B", "One", "1 Main St", "Culver", "2", ""),
                person("C", "Two", "2 Main St", "Culver", "3", ""),
            ],
            firestations: vec![station("1 Main St", "2"), station("2 Main St", "2")],
            medicalrecords: vec![
                record("A", "One", 40, &[]),
                record("B", "One", 10, &[]),
                record("C", "Two", 33, &[]),
            ],
        };
        let r = AlertEngine::new(&ds, today()).coverage_by_station("2");
        assert_eq!(r.persons.len(), 3);
        assert_eq!(r.adult_count, 2);
        assert_eq!(r.child_count, 1);
        let order: Vec<_> = r.persons.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn coverage_counts_unknown_age_as_adult() {
        let ds = sample();
        // Ron Peters has no medical record.
        let r = AlertEngine::new(&ds, today()).coverage_by_station("4");
        assert_eq!(r.persons.len(), 1);
        assert_eq!((r.adult_count, r.child_count), (1, 0));
    }

    #[test]
    fn coverage_of_unknown_station_is_empty() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).coverage_by_station("99");
        assert!(r.persons.is_empty());
        assert_eq!((r.adult_count, r.child_count), (0, 0));
    }

    #[test]
    fn fire_info_joins_medical_details() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).fire_info_by_address(CULVER);
        assert_eq!(r.station_number, 3);
        assert_eq!(r.residents.len(), 3);
        let john = &r.residents[0];
        assert_eq!(john.age, 40);
        assert_eq!(john.medications, vec!["aznol:350mg"]);
        assert_eq!(john.phone, "841-874-6512");
    }

    #[test]
    fn fire_info_without_station_keeps_residents() {
        let mut ds = sample();
        ds.firestations.retain(|s| s.address != CULVER);
        let r = AlertEngine::new(&ds, today()).fire_info_by_address(CULVER);
        assert_eq!(r.station_number, 0);
        assert_eq!(r.residents.len(), 3);
    }

    #[test]
    fn fire_info_with_malformed_station_uses_zero() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).fire_info_by_address("951 LoneTree Rd");
        assert_eq!(r.station_number, 0);
        assert_eq!(r.residents.len(), 1);
    }

    #[test]
    fn fire_info_for_unknown_address_is_empty() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).fire_info_by_address("nowhere");
        assert_eq!(r.station_number, 0);
        assert!(r.residents.is_empty());
    }

    #[test]
    fn unmatched_person_gets_defaults_everywhere() {
        let ds = sample();
        let engine = AlertEngine::new(&ds, today());
        let fire = engine.fire_info_by_address("112 Steppes Pl");
        assert_eq!(fire.residents[0].age, 0);
        assert!(fire.residents[0].medications.is_empty());
        assert!(fire.residents[0].allergies.is_empty());

        let flood = engine.households_by_stations(&["4"]);
        let ron = &flood.households["112 Steppes Pl"][0];
        assert_eq!(ron.age, 0);

        let info = engine.person_info_by_last_name("Peters");
        let ron = info.persons.iter().find(|p| p.first_name == "Ron").unwrap();
        assert_eq!(ron.age, 0);
        assert!(ron.medications.is_empty());
    }

    #[test]
    fn flood_groups_by_reachable_address() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).households_by_stations(&["1", "3"]);
        let keys: Vec<_> = r.households.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![CULVER, "644 Gershwin Cir", "908 73rd St"]);
        for (address, residents) in &r.households {
            let expected = ds.persons.iter().filter(|p| &p.address == address).count();
            assert_eq!(residents.len(), expected);
        }
        assert_eq!(r.households["908 73rd St"][0].first_name, "Reginold");
    }

    #[test]
    fn flood_for_unknown_stations_is_empty() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).households_by_stations(&["42"]);
        assert!(r.is_empty());
    }

    #[test]
    fn community_email_dedups_and_drops_blanks() {
        let ds = sample();
        let engine = AlertEngine::new(&ds, today());
        let r = engine.emails_by_city("culver");
        assert_eq!(r.city, "culver");
        assert_eq!(
            r.emails,
            vec![
                "jaboyd@email.com",
                "tenz@email.com",
                "reg@email.com",
                "jpeter@email.com",
                "gramps@email.com"
            ]
        );
        assert_eq!(engine.emails_by_city("culver"), r);
    }

    #[test]
    fn community_email_shared_address_yields_single_entry() {
        let ds = DataSet {
            persons: vec![
                person("A", "X", "1 Main St", "Culver", "1", "family@email.com"),
                person("B", "X", "1 Main St", "Culver", "2", "family@email.com"),
            ],
            ..Default::default()
        };
        let r = AlertEngine::new(&ds, today()).emails_by_city("Culver");
        assert_eq!(r.emails, vec!["family@email.com"]);
    }

    #[test]
    fn community_email_unknown_city_is_empty() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).emails_by_city("Springfield");
        assert!(r.emails.is_empty());
        assert_eq!(r.city, "Springfield");
    }

    #[test]
    fn person_info_ignores_case_of_last_name() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).person_info_by_last_name("bOYD");
        assert_eq!(r.persons.len(), 3);
        let tenley = &r.persons[1];
        assert_eq!(tenley.first_name, "Tenley");
        assert_eq!(tenley.age, 12);
        assert_eq!(tenley.email, "tenz@email.com");
        assert_eq!(tenley.address, CULVER);
    }

    #[test]
    fn person_info_last_name_policy_can_be_exact() {
        let ds = sample();
        let policy = MatchPolicy {
            last_name: TextMatch::Exact,
            ..Default::default()
        };
        let r = AlertEngine::new(&ds, today())
            .with_policy(policy)
            .person_info_by_last_name("boyd");
        assert!(r.is_empty());
    }

    #[test]
    fn phones_by_station_are_distinct() {
        let ds = sample();
        let r = AlertEngine::new(&ds, today()).phones_by_station("3");
        assert_eq!(r.phone_numbers, vec!["841-874-6512", "841-874-6513"]);
        assert!(AlertEngine::new(&ds, today()).phones_by_station("03").is_empty());
    }

    #[test]
    fn phones_by_station_keeps_empty_phone() {
        let ds = DataSet {
            persons: vec![
                person("Ann", "Lee", "1 Main", "Culver", "", ""),
                person("Bob", "Lee", "1 Main", "Culver", "555", ""),
                person("Cid", "Lee", "1 Main", "Culver", "", ""),
            ],
            firestations: vec![station("1 Main", "3")],
            medicalrecords: vec![],
        };
        let r = AlertEngine::new(&ds, today()).phones_by_station("3");
        assert_eq!(r.phone_numbers, vec!["", "555"]);
    }

    #[test]
    fn fire_station_number_is_parsed_verbatim() {
        let ds = DataSet {
            persons: vec![
                person("Ann", "Lee", "1 Main", "Culver", "555", ""),
                person("Bob", "Lee", "2 Main", "Culver", "556", ""),
            ],
            firestations: vec![station("1 Main", "3 "), station("2 Main", "-1")],
            medicalrecords: vec![],
        };
        let engine = AlertEngine::new(&ds, today());
        assert_eq!(engine.fire_info_by_address("1 Main").station_number, 0);
        assert_eq!(engine.fire_info_by_address("2 Main").station_number, 0);
        assert_eq!(engine.fire_info_by_address("2 Main").residents.len(), 1);
    }

    #[test]
    fn empty_address_reports_are_empty_not_errors() {
        let ds = sample();
        let engine = AlertEngine::new(&ds, today());
        assert!(engine.children_at_address("0 Nowhere").is_empty());
        assert!(engine.fire_info_by_address("0 Nowhere").is_empty());
    }

    #[test]
    fn empty_dataset_is_fine() {
        let ds = DataSet::default();
        let engine = AlertEngine::new(&ds, today());
        assert!(engine.coverage_by_station("1").is_empty());
        assert!(engine.households_by_stations(&["1"]).is_empty());
        assert!(engine.emails_by_city("Culver").is_empty());
        assert!(engine.person_info_by_last_name("Boyd").is_empty());
        assert!(engine.phones_by_station("1").is_empty());
    }
}
