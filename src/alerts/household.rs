//! Address and station lookups over one snapshot of the data document.

use crate::models::{DataSet, Person, StationAssignment};
use crate::normalize::MatchPolicy;
use std::collections::HashSet;

pub struct HouseholdResolver<'a> {
    data: &'a DataSet,
    policy: MatchPolicy,
}

impl<'a> HouseholdResolver<'a> {
    pub fn new(data: &'a DataSet, policy: MatchPolicy) -> Self {
        Self { data, policy }
    }

    /// Every address mapped to one of `station_ids`, first-seen order, no repeats.
    /// Station identifiers compare as exact strings: `"03"` is not `"3"`.
    pub fn addresses_for_stations<S: AsRef<str>>(&self, station_ids: &[S]) -> Vec<String> {
        let wanted: HashSet<&str> = station_ids.iter().map(|s| s.as_ref()).collect();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for a in &self.data.firestations {
            if wanted.contains(a.station.as_str()) && seen.insert(self.policy.address.key(&a.address)) {
                out.push(a.address.clone());
            }
        }
        log::debug!(
            "stations {:?} cover {} addresses",
            wanted,
            out.len()
        );
        out
    }

    pub fn people_at_address(&self, address: &str) -> Vec<&'a Person> {
        self.data
            .persons
            .iter()
            .filter(|p| self.policy.same_address(&p.address, address))
            .collect()
    }

    /// People whose address is any of `addresses`, in People scan order.
    pub fn people_at_addresses<S: AsRef<str>>(&self, addresses: &[S]) -> Vec<&'a Person> {
        let keys: HashSet<String> = addresses
            .iter()
            .map(|a| self.policy.address.key(a.as_ref()))
            .collect();
        self.data
            .persons
            .iter()
            .filter(|p| keys.contains(&self.policy.address.key(&p.address)))
            .collect()
    }

    /// First station mapping recorded for `address`, if any.
    pub fn station_for_address(&self, address: &str) -> Option<&'a StationAssignment> {
        self.data
            .firestations
            .iter()
            .find(|a| self.policy.same_address(&a.address, address))
    }
}
