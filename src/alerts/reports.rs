//! Report values produced by the alert engine.
//!
//! Every report owns copies of its fields. Field names serialize in camelCase,
//! matching the data document.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    ChildAlert,
    Coverage,
    Fire,
    Flood,
    CommunityEmail,
    PersonInfo,
    PhoneAlert,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildAlert => "child-alert",
            Self::Coverage => "coverage",
            Self::Fire => "fire",
            Self::Flood => "flood",
            Self::CommunityEmail => "community-email",
            Self::PersonInfo => "person-info",
            Self::PhoneAlert => "phone-alert",
        }
    }

    /// Whether an empty report is surfaced to the caller as "not found".
    /// Coverage and phone alerts always answer, even with nothing in them.
    pub fn empty_is_not_found(&self) -> bool {
        !matches!(self, Self::Coverage | Self::PhoneAlert)
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Common surface used by the exporters and the command line.
pub trait AlertReport: Serialize {
    fn kind(&self) -> ReportKind;
    fn is_empty(&self) -> bool;
    fn headers(&self) -> Vec<&'static str>;
    /// Flat rows for tabular export, one per person (or email / phone).
    fn rows(&self) -> Vec<Vec<String>>;
}

fn join_list(items: &[String]) -> String {
    items.join(";")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildInfo {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdMember {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChildReport {
    pub children: Vec<ChildInfo>,
    pub household_members: Vec<HouseholdMember>,
}

impl AlertReport for ChildReport {
    fn kind(&self) -> ReportKind {
        ReportKind::ChildAlert
    }
    fn is_empty(&self) -> bool {
        self.children.is_empty() && self.household_members.is_empty()
    }
    fn headers(&self) -> Vec<&'static str> {
        vec!["role", "firstName", "lastName", "age"]
    }
    fn rows(&self) -> Vec<Vec<String>> {
        let children = self.children.iter().map(|c| {
            vec![
                "child".to_string(),
                c.first_name.clone(),
                c.last_name.clone(),
                c.age.to_string(),
            ]
        });
        let members = self.household_members.iter().map(|m| {
            vec![
                "member".to_string(),
                m.first_name.clone(),
                m.last_name.clone(),
                String::new(),
            ]
        });
        children.chain(members).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveredPerson {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub persons: Vec<CoveredPerson>,
    pub adult_count: usize,
    pub child_count: usize,
}

impl AlertReport for CoverageReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Coverage
    }
    fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
    fn headers(&self) -> Vec<&'static str> {
        vec!["firstName", "lastName", "address", "phone"]
    }
    fn rows(&self) -> Vec<Vec<String>> {
        self.persons
            .iter()
            .map(|p| {
                vec![
                    p.first_name.clone(),
                    p.last_name.clone(),
                    p.address.clone(),
                    p.phone.clone(),
                ]
            })
            .collect()
    }
}

/// A resident with the medical details first responders need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: u32,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl Resident {
    fn row(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.phone.clone(),
            self.age.to_string(),
            join_list(&self.medications),
            join_list(&self.allergies),
        ]
    }
}

const RESIDENT_HEADERS: [&str; 6] = [
    "firstName",
    "lastName",
    "phone",
    "age",
    "medications",
    "allergies",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FireReport {
    /// 0 when the address has no usable station mapping.
    pub station_number: u32,
    pub residents: Vec<Resident>,
}

impl AlertReport for FireReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Fire
    }
    fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }
    fn headers(&self) -> Vec<&'static str> {
        let mut h = vec!["stationNumber"];
        h.extend(RESIDENT_HEADERS);
        h
    }
    fn rows(&self) -> Vec<Vec<String>> {
        self.residents
            .iter()
            .map(|r| {
                let mut row = vec![self.station_number.to_string()];
                row.extend(r.row());
                row
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FloodReport {
    pub households: BTreeMap<String, Vec<Resident>>,
}

impl AlertReport for FloodReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Flood
    }
    fn is_empty(&self) -> bool {
        self.households.is_empty()
    }
    fn headers(&self) -> Vec<&'static str> {
        let mut h = vec!["address"];
        h.extend(RESIDENT_HEADERS);
        h
    }
    fn rows(&self) -> Vec<Vec<String>> {
        self.households
            .iter()
            .flat_map(|(address, residents)| {
                residents.iter().map(move |r| {
                    let mut row = vec![address.clone()];
                    row.extend(r.row());
                    row
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEmailReport {
    pub city: String,
    pub emails: Vec<String>,
}

impl AlertReport for CommunityEmailReport {
    fn kind(&self) -> ReportKind {
        ReportKind::CommunityEmail
    }
    fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
    fn headers(&self) -> Vec<&'static str> {
        vec!["city", "email"]
    }
    fn rows(&self) -> Vec<Vec<String>> {
        self.emails
            .iter()
            .map(|e| vec![self.city.clone(), e.clone()])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub age: u32,
    pub email: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

/// Serializes as a bare list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(transparent)]
pub struct PersonInfoReport {
    pub persons: Vec<PersonInfo>,
}

impl AlertReport for PersonInfoReport {
    fn kind(&self) -> ReportKind {
        ReportKind::PersonInfo
    }
    fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
    fn headers(&self) -> Vec<&'static str> {
        vec![
            "firstName",
            "lastName",
            "address",
            "age",
            "email",
            "medications",
            "allergies",
        ]
    }
    fn rows(&self) -> Vec<Vec<String>> {
        self.persons
            .iter()
            .map(|p| {
                vec![
                    p.first_name.clone(),
                    p.last_name.clone(),
                    p.address.clone(),
                    p.age.to_string(),
                    p.email.clone(),
                    join_list(&p.medications),
                    join_list(&p.allergies),
                ]
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PhoneReport {
    pub phone_numbers: Vec<String>,
}

impl AlertReport for PhoneReport {
    fn kind(&self) -> ReportKind {
        ReportKind::PhoneAlert
    }
    fn is_empty(&self) -> bool {
        self.phone_numbers.is_empty()
    }
    fn headers(&self) -> Vec<&'static str> {
        vec!["phone"]
    }
    fn rows(&self) -> Vec<Vec<String>> {
        self.phone_numbers.iter().map(|p| vec![p.clone()]).collect()
    }
}
