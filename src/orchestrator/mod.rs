//! Orchestrator: runs one request from the command line against the store.
//!
//! Reports are computed on a single snapshot and written in the configured
//! format. Mutations go through the [`JsonFileStore`] and are persisted before
//! the call returns.

pub mod summary;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::time::Instant;

use crate::alerts::{AlertEngine, AlertReport, ReportKind};
use crate::config::AppConfig;
use crate::error::{ConfigError, StoreError};
use crate::export::{OutputFormat, export_report};
use crate::models::{MedicalRecord, MedicalRecordUpdate, Person, PersonUpdate, StationAssignment};
use crate::store::{JsonFileStore, RecordStore};
use summary::ReportSummary;

pub const EXIT_OK: i32 = 0;
pub const EXIT_INTERNAL: i32 = 1;
pub const EXIT_BAD_REQUEST: i32 = 2;
pub const EXIT_NOT_FOUND: i32 = 4;

/// Map an error chain to the process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return EXIT_BAD_REQUEST;
        }
        match cause.downcast_ref::<StoreError>() {
            Some(StoreError::NotFound { .. }) => return EXIT_NOT_FOUND,
            Some(StoreError::Invalid { .. }) => return EXIT_BAD_REQUEST,
            Some(_) => return EXIT_INTERNAL,
            None => {}
        }
    }
    EXIT_INTERNAL
}

/// Everything a run needs besides the request itself.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub app: AppConfig,
    pub format: OutputFormat,
    /// Reference date for ages
    pub today: NaiveDate,
}

impl RunConfig {
    pub fn new(app: AppConfig, today: NaiveDate) -> Result<Self> {
        app.validate()?;
        let format = match app.export.format.as_deref() {
            Some(f) => f.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
            None => OutputFormat::default(),
        };
        Ok(Self { app, format, today })
    }

    pub fn open_store(&self) -> Result<JsonFileStore> {
        JsonFileStore::open(&self.app.data.path)
            .with_context(|| format!("opening data document {}", self.app.data.path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    ChildAlert { address: String },
    Coverage { station: String },
    Fire { address: String },
    Flood { stations: Vec<String> },
    CommunityEmail { city: String },
    PersonInfo { last_name: String },
    PhoneAlert { station: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written(ReportSummary),
    /// The report was empty and its kind treats that as "not found".
    NotFound(ReportKind),
}

pub fn run_report<S: RecordStore + ?Sized>(
    store: &S,
    cfg: &RunConfig,
    req: &ReportRequest,
) -> Result<Outcome> {
    let started = Instant::now();
    let snapshot = store.snapshot();
    log::debug!(
        "{:?} with matching {} and max child age {}",
        req,
        cfg.app.matching.policy,
        cfg.app.matching.max_child_age
    );
    let engine = AlertEngine::new(&snapshot, cfg.today)
        .with_policy(cfg.app.matching.policy)
        .with_max_child_age(cfg.app.matching.max_child_age);

    match req {
        ReportRequest::ChildAlert { address } => {
            emit(&engine.children_at_address(address), cfg, started)
        }
        ReportRequest::Coverage { station } => {
            emit(&engine.coverage_by_station(station), cfg, started)
        }
        ReportRequest::Fire { address } => emit(&engine.fire_info_by_address(address), cfg, started),
        ReportRequest::Flood { stations } => {
            emit(&engine.households_by_stations(stations), cfg, started)
        }
        ReportRequest::CommunityEmail { city } => {
            emit(&engine.emails_by_city(city), cfg, started)
        }
        ReportRequest::PersonInfo { last_name } => {
            emit(&engine.person_info_by_last_name(last_name), cfg, started)
        }
        ReportRequest::PhoneAlert { station } => {
            emit(&engine.phones_by_station(station), cfg, started)
        }
    }
}

fn emit<R: AlertReport>(report: &R, cfg: &RunConfig, started: Instant) -> Result<Outcome> {
    let kind = report.kind();
    if report.is_empty() && kind.empty_is_not_found() {
        warn!("No {} data found", kind);
        return Ok(Outcome::NotFound(kind));
    }
    export_report(report, cfg.format, cfg.app.export.out_path.as_deref())
        .with_context(|| format!("writing {} report", kind))?;
    let summary = ReportSummary::new(kind)
        .with_entries(report.rows().len())
        .with_format(cfg.format)
        .with_elapsed(started.elapsed());
    info!("{}", summary);
    Ok(Outcome::Written(summary))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddPerson(Person),
    UpdatePerson {
        first_name: String,
        last_name: String,
        update: PersonUpdate,
    },
    DeletePerson {
        first_name: String,
        last_name: String,
    },
    AddStation(StationAssignment),
    UpdateStation {
        address: String,
        station: String,
    },
    DeleteStation {
        address: String,
    },
    AddMedicalRecord(MedicalRecord),
    UpdateMedicalRecord {
        first_name: String,
        last_name: String,
        update: MedicalRecordUpdate,
    },
    DeleteMedicalRecord {
        first_name: String,
        last_name: String,
    },
}

/// Apply one mutation and return the affected record as JSON (`null` after a delete).
pub fn apply_mutation(store: &JsonFileStore, m: Mutation) -> Result<serde_json::Value> {
    fn to_value<T: Serialize>(v: T) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(v)?)
    }
    let out = match m {
        Mutation::AddPerson(p) => to_value(store.add_person(p)?)?,
        Mutation::UpdatePerson {
            first_name,
            last_name,
            update,
        } => to_value(store.update_person(&first_name, &last_name, &update)?)?,
        Mutation::DeletePerson {
            first_name,
            last_name,
        } => {
            store.delete_person(&first_name, &last_name)?;
            serde_json::Value::Null
        }
        Mutation::AddStation(a) => to_value(store.add_station(a)?)?,
        Mutation::UpdateStation { address, station } => {
            to_value(store.update_station(&address, &station)?)?
        }
        Mutation::DeleteStation { address } => {
            store.delete_station(&address)?;
            serde_json::Value::Null
        }
        Mutation::AddMedicalRecord(r) => to_value(store.add_medical_record(r)?)?,
        Mutation::UpdateMedicalRecord {
            first_name,
            last_name,
            update,
        } => to_value(store.update_medical_record(&first_name, &last_name, &update)?)?,
        Mutation::DeleteMedicalRecord {
            first_name,
            last_name,
        } => {
            store.delete_medical_record(&first_name, &last_name)?;
            serde_json::Value::Null
        }
    };
    Ok(out)
}
