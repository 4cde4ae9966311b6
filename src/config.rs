use crate::alerts::age::DEFAULT_MAX_CHILD_AGE;
use crate::error::ConfigError;
use crate::normalize::MatchPolicy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct DataConfig {
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "data.json".into(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct MatchingConfig {
    pub policy: MatchPolicy,
    pub max_child_age: u32, // inclusive
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            max_child_age: DEFAULT_MAX_CHILD_AGE,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct ExportConfig {
    pub out_path: Option<String>, // stdout when None
    pub format: Option<String>,   // json|csv
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_path: None,
            format: Some("json".into()),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.path.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "data.path" });
        }
        if let Some(ref fmt) = self.export.format {
            match fmt.as_str() {
                "json" | "csv" => {}
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "export.format",
                        reason: format!("unsupported: {}", other),
                    });
                }
            }
        }
        if let Some(ref out) = self.export.out_path {
            if out.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "export.out_path",
                    reason: "must not be blank".into(),
                });
            }
        }
        if self.matching.max_child_age > 150 {
            return Err(ConfigError::InvalidValue {
                field: "matching.max_child_age",
                reason: format!("{} is out of range", self.matching.max_child_age),
            });
        }
        Ok(())
    }
}
