use crate::alerts::age::{DEFAULT_MAX_CHILD_AGE, parse_birthdate};
use crate::config::{AppConfig, DataConfig, ExportConfig, MatchingConfig};
use crate::error::ConfigError;
use crate::models::{MedicalRecord, MedicalRecordUpdate, Person, PersonUpdate, StationAssignment};
use crate::normalize::{MatchPolicy, TextMatch};
use crate::orchestrator::{Mutation, ReportRequest};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, ValueEnum, Debug)]
pub enum FormatOpt {
    Json,
    Csv,
}

impl FormatOpt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}
impl std::fmt::Display for FormatOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum, Debug)]
pub enum MatchOpt {
    Exact,
    #[value(alias = "ignore_case")]
    IgnoreCase,
    Folded,
}

impl From<MatchOpt> for TextMatch {
    fn from(m: MatchOpt) -> Self {
        match m {
            MatchOpt::Exact => TextMatch::Exact,
            MatchOpt::IgnoreCase => TextMatch::IgnoreCase,
            MatchOpt::Folded => TextMatch::Folded,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "safetynet",
    version,
    about = "Emergency alert queries over a resident, fire station and medical record document",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Data document (env: SAFETYNET_DATA)
    #[arg(long, global = true, env = "SAFETYNET_DATA", default_value = "data.json")]
    pub data: String,
    /// Output format (env: SAFETYNET_FORMAT)
    #[arg(long, global = true, env = "SAFETYNET_FORMAT", default_value_t = FormatOpt::Json)]
    pub format: FormatOpt,
    /// Output path; stdout when omitted (env: SAFETYNET_OUT)
    #[arg(long, global = true, env = "SAFETYNET_OUT")]
    pub out: Option<String>,
    /// Reference date for ages, YYYY-MM-DD (default: local today)
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<NaiveDate>,
    /// Oldest age still counted as a child (env: SAFETYNET_MAX_CHILD_AGE)
    #[arg(
        long = "max-child-age",
        global = true,
        env = "SAFETYNET_MAX_CHILD_AGE",
        default_value_t = DEFAULT_MAX_CHILD_AGE
    )]
    pub max_child_age: u32,
    /// Address comparison (env: SAFETYNET_ADDRESS_MATCH)
    #[arg(long = "address-match", global = true, env = "SAFETYNET_ADDRESS_MATCH")]
    pub address_match: Option<MatchOpt>,
    /// First/last name join with medical records (env: SAFETYNET_NAME_MATCH)
    #[arg(long = "name-match", global = true, env = "SAFETYNET_NAME_MATCH")]
    pub name_match: Option<MatchOpt>,
    /// City comparison (env: SAFETYNET_CITY_MATCH)
    #[arg(long = "city-match", global = true, env = "SAFETYNET_CITY_MATCH")]
    pub city_match: Option<MatchOpt>,
    /// Last-name lookup (env: SAFETYNET_LAST_NAME_MATCH)
    #[arg(long = "last-name-match", global = true, env = "SAFETYNET_LAST_NAME_MATCH")]
    pub last_name_match: Option<MatchOpt>,
    /// Log through a tracing subscriber instead of env_logger (env: SAFETYNET_TRACING)
    #[arg(long, global = true, env = "SAFETYNET_TRACING")]
    pub tracing: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Children living at an address and the other members of their household
    ChildAlert {
        #[arg(long)]
        address: String,
    },
    /// Residents covered by a station with adult and child counts
    Coverage {
        #[arg(long)]
        station: String,
    },
    /// Residents at an address with medical details and the serving station
    Fire {
        #[arg(long)]
        address: String,
    },
    /// Households grouped by address for one or more stations
    Flood {
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        stations: Vec<String>,
    },
    /// Email addresses of everyone living in a city
    CommunityEmail {
        #[arg(long)]
        city: String,
    },
    /// Everyone with a last name, with contact and medical details
    PersonInfo {
        #[arg(long = "last-name")]
        last_name: String,
    },
    /// Phone numbers of residents covered by a station
    PhoneAlert {
        #[arg(long)]
        station: String,
    },
    /// Add, update or delete a person
    #[command(subcommand)]
    Person(PersonAction),
    /// Add, update or delete an address to station mapping
    #[command(subcommand)]
    Station(StationAction),
    /// Add, update or delete a medical record
    #[command(subcommand)]
    Medical(MedicalAction),
    /// Write a template .env with every SAFETYNET_* setting
    EnvTemplate {
        #[arg(default_value = ".env.template")]
        path: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct NameArgs {
    #[arg(long = "first-name")]
    pub first_name: String,
    #[arg(long = "last-name")]
    pub last_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub zip: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
}

impl From<&ContactArgs> for PersonUpdate {
    fn from(c: &ContactArgs) -> Self {
        PersonUpdate {
            address: c.address.clone(),
            city: c.city.clone(),
            zip: c.zip.clone(),
            phone: c.phone.clone(),
            email: c.email.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct MedicalArgs {
    /// MM/dd/yyyy or YYYY-MM-DD
    #[arg(long)]
    pub birthdate: Option<String>,
    /// Comma separated
    #[arg(long, value_delimiter = ',')]
    pub medications: Vec<String>,
    /// Comma separated
    #[arg(long, value_delimiter = ',')]
    pub allergies: Vec<String>,
}

impl MedicalArgs {
    fn to_update(&self) -> Result<MedicalRecordUpdate, ConfigError> {
        let birthdate = match self.birthdate.as_deref() {
            Some(raw) => Some(parse_birthdate(raw).ok_or_else(|| ConfigError::InvalidValue {
                field: "birthdate",
                reason: format!("'{}' is not MM/dd/yyyy or YYYY-MM-DD", raw),
            })?),
            None => None,
        };
        Ok(MedicalRecordUpdate {
            birthdate,
            medications: self.medications.clone(),
            allergies: self.allergies.clone(),
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum PersonAction {
    Add {
        #[command(flatten)]
        name: NameArgs,
        #[command(flatten)]
        contact: ContactArgs,
    },
    /// Replace the contact fields of an existing person
    Update {
        #[command(flatten)]
        name: NameArgs,
        #[command(flatten)]
        contact: ContactArgs,
    },
    Delete {
        #[command(flatten)]
        name: NameArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum StationAction {
    Add {
        #[arg(long)]
        address: String,
        #[arg(long)]
        station: String,
    },
    /// Reassign every mapping for an address
    Update {
        #[arg(long)]
        address: String,
        #[arg(long)]
        station: String,
    },
    Delete {
        #[arg(long)]
        address: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MedicalAction {
    Add {
        #[command(flatten)]
        name: NameArgs,
        #[command(flatten)]
        medical: MedicalArgs,
    },
    Update {
        #[command(flatten)]
        name: NameArgs,
        #[command(flatten)]
        medical: MedicalArgs,
    },
    Delete {
        #[command(flatten)]
        name: NameArgs,
    },
}

impl Cli {
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigError> {
        let defaults = MatchPolicy::default();
        let pick = |opt: Option<MatchOpt>, fallback: TextMatch| opt.map(TextMatch::from).unwrap_or(fallback);
        let cfg = AppConfig {
            data: DataConfig {
                path: self.data.clone(),
            },
            matching: MatchingConfig {
                policy: MatchPolicy {
                    address: pick(self.address_match, defaults.address),
                    name: pick(self.name_match, defaults.name),
                    city: pick(self.city_match, defaults.city),
                    last_name: pick(self.last_name_match, defaults.last_name),
                },
                max_child_age: self.max_child_age,
            },
            export: ExportConfig {
                out_path: self.out.clone(),
                format: Some(self.format.as_str().into()),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reference date for ages: `--today` or the local calendar date.
    pub fn reference_date(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl Command {
    pub fn report_request(&self) -> Option<ReportRequest> {
        Some(match self {
            Self::ChildAlert { address } => ReportRequest::ChildAlert {
                address: address.clone(),
            },
            Self::Coverage { station } => ReportRequest::Coverage {
                station: station.clone(),
            },
            Self::Fire { address } => ReportRequest::Fire {
                address: address.clone(),
            },
            Self::Flood { stations } => ReportRequest::Flood {
                stations: stations.clone(),
            },
            Self::CommunityEmail { city } => ReportRequest::CommunityEmail { city: city.clone() },
            Self::PersonInfo { last_name } => ReportRequest::PersonInfo {
                last_name: last_name.clone(),
            },
            Self::PhoneAlert { station } => ReportRequest::PhoneAlert {
                station: station.clone(),
            },
            _ => return None,
        })
    }

    /// The store mutation for a CRUD command, `Ok(None)` for anything else.
    pub fn mutation(&self) -> Result<Option<Mutation>, ConfigError> {
        let m = match self {
            Self::Person(PersonAction::Add { name, contact }) => Mutation::AddPerson(Person {
                first_name: name.first_name.clone(),
                last_name: name.last_name.clone(),
                address: contact.address.clone(),
                city: contact.city.clone(),
                zip: contact.zip.clone(),
                phone: contact.phone.clone(),
                email: contact.email.clone(),
            }),
            Self::Person(PersonAction::Update { name, contact }) => Mutation::UpdatePerson {
                first_name: name.first_name.clone(),
                last_name: name.last_name.clone(),
                update: PersonUpdate::from(contact),
            },
            Self::Person(PersonAction::Delete { name }) => Mutation::DeletePerson {
                first_name: name.first_name.clone(),
                last_name: name.last_name.clone(),
            },
            Self::Station(StationAction::Add { address, station }) => {
                Mutation::AddStation(StationAssignment {
                    address: address.clone(),
                    station: station.clone(),
                })
            }
            Self::Station(StationAction::Update { address, station }) => Mutation::UpdateStation {
                address: address.clone(),
                station: station.clone(),
            },
            Self::Station(StationAction::Delete { address }) => Mutation::DeleteStation {
                address: address.clone(),
            },
            Self::Medical(MedicalAction::Add { name, medical }) => {
                let u = medical.to_update()?;
                Mutation::AddMedicalRecord(MedicalRecord {
                    first_name: name.first_name.clone(),
                    last_name: name.last_name.clone(),
                    birthdate: u.birthdate,
                    medications: u.medications,
                    allergies: u.allergies,
                })
            }
            Self::Medical(MedicalAction::Update { name, medical }) => {
                Mutation::UpdateMedicalRecord {
                    first_name: name.first_name.clone(),
                    last_name: name.last_name.clone(),
                    update: medical.to_update()?,
                }
            }
            Self::Medical(MedicalAction::Delete { name }) => Mutation::DeleteMedicalRecord {
                first_name: name.first_name.clone(),
                last_name: name.last_name.clone(),
            },
            _ => return Ok(None),
        };
        Ok(Some(m))
    }
}
