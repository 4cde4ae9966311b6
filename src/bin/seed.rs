use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use log::info;
use safetynet_alerts::models::{DataSet, MedicalRecord, Person, StationAssignment};

const STREETS: [&str; 8] = [
    "Culver St",
    "Buttercup Rd",
    "Elm Ave",
    "Hillcrest Dr",
    "Lakeshore Blvd",
    "Maple Ln",
    "Oak Ct",
    "Pine Way",
];
const CITIES: [(&str, &str); 3] = [("Culver", "97451"), ("Riverton", "97452"), ("Ashby", "97453")];
const MEDICATIONS: [&str; 6] = [
    "aznol:350mg",
    "hydrapermazol:100mg",
    "noxidian:100mg",
    "pharmacol:5000mg",
    "terazine:10mg",
    "tetracyclaz:650mg",
];
const ALLERGIES: [&str; 4] = ["nillacilan", "peanut", "shellfish", "pollen"];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    // Args: out_path households seed
    let args: Vec<String> = std::env::args().collect();
    let out = args.get(1).cloned().unwrap_or_else(|| "data.json".into());
    let households = args
        .get(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(50);
    let seed = args
        .get(3)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    let this_year = chrono::Local::now().year();
    let data = seed_households(households, seed, this_year);
    let (p, f, m) = data.counts();
    info!("Seeding {out}: {p} persons, {f} station mappings, {m} medical records");

    let json = serde_json::to_string_pretty(&data)?;
    std::fs::write(&out, json).with_context(|| format!("writing {}", out))?;
    println!("Seeding complete.");
    Ok(())
}

fn seed_households(households: usize, seed: u64, this_year: i32) -> DataSet {
    let mut rng = Lcg::new(seed);
    let first_names = sample_first_names();
    let last_names = sample_last_names();
    let mut data = DataSet::default();

    for hh in 0..households {
        let last = pick(&mut rng, &last_names);
        let street = pick(&mut rng, &STREETS);
        let address = format!("{} {}", 100 + hh * 7, street);
        let (city, zip) = pick(&mut rng, &CITIES);
        let phone = format!("841-874-{:04}", rng.next() % 10_000);
        // Stations 1-4, every address is mapped once
        data.firestations.push(StationAssignment {
            address: address.clone(),
            station: (1 + rng.next() % 4).to_string(),
        });

        let adults = 1 + (rng.next() % 2) as usize;
        let children = (rng.next() % 4) as usize;
        for member in 0..adults + children {
            let first = pick(&mut rng, &first_names);
            let is_child = member >= adults;
            let birthdate = if is_child {
                random_birthdate(&mut rng, this_year - 17, this_year - 1)
            } else {
                random_birthdate(&mut rng, 1950, this_year - 19)
            };
            data.persons.push(Person {
                first_name: first.to_string(),
                last_name: last.to_string(),
                address: address.clone(),
                city: city.to_string(),
                zip: zip.to_string(),
                phone: phone.clone(),
                email: format!(
                    "{}.{}@email.com",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
            });
            // Roughly one in twenty residents has no medical record
            if rng.next() % 20 == 0 {
                continue;
            }
            data.medicalrecords.push(MedicalRecord {
                first_name: first.to_string(),
                last_name: last.to_string(),
                birthdate: Some(birthdate),
                medications: sample_some(&mut rng, &MEDICATIONS),
                allergies: sample_some(&mut rng, &ALLERGIES),
            });
        }
    }
    data
}

fn pick<T: Copy>(rng: &mut Lcg, items: &[T]) -> T {
    items[(rng.next() % items.len() as u64) as usize]
}

// Zero to two distinct entries.
fn sample_some(rng: &mut Lcg, items: &[&str]) -> Vec<String> {
    let n = (rng.next() % 3) as usize;
    let mut out: Vec<String> = Vec::with_capacity(n);
    for _ in 0..n {
        let item = pick(rng, items).to_string();
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn random_birthdate(rng: &mut Lcg, from_year: i32, to_year: i32) -> NaiveDate {
    let span = (to_year - from_year).max(0) as u64 + 1;
    let year = from_year + (rng.next() % span) as i32;
    let month = 1 + (rng.next() % 12) as u32;
    let mut day_max = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => 28,
    };
    // handle leap years simply
    if month == 2 && (year % 4 == 0) {
        day_max = 29;
    }
    let day = 1 + (rng.next() % day_max as u64) as u32;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

struct Lcg {
    state: u64,
}
impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next(&mut self) -> u64 {
        // Numerical Recipes LCG constants
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG cycle quickly
        self.state >> 16
    }
}

fn sample_first_names() -> Vec<&'static str> {
    vec![
        "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "William",
        "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas",
        "Sarah", "Charles", "Karen", "Tenley", "Roger", "Felicia", "Jacob",
    ]
}

fn sample_last_names() -> Vec<&'static str> {
    vec![
        "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
        "Rodriguez", "Martinez", "Boyd", "Marrack", "Cadigan", "Zemicks", "Ferguson", "Peters",
    ]
}
