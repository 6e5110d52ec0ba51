//! Request-scoped datasheet inputs: product attributes, custom fields, model choice.
//!
//! Nothing here is persisted. Every submission builds these fresh and drops them
//! once the response has been rendered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on user-declared key/value pairs per submission.
pub const MAX_CUSTOM_FIELDS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// ProductSpec
// ────────────────────────────────────────────────────────────────────────────

/// Free-text component attributes collected from the form.
///
/// No field is required and none is validated. Empty strings flow through to the
/// prompt and the document cells unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSpec {
    pub name: String,
    pub dimensions: String,
    pub weight: String,
    pub power_supply: String,
    pub features: String,
    pub applications: String,
    /// Sensor sub-type, e.g. "temperature" or "pressure".
    pub sensor_type: Option<String>,
    pub output_signal: String,
    pub measurement_range: String,
    pub sensitivity: String,
    pub accuracy: String,
    pub response_time: String,
}

impl ProductSpec {
    /// Assigns a field by its form name. Returns false for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "name" => &mut self.name,
            "dimensions" => &mut self.dimensions,
            "weight" => &mut self.weight,
            "power_supply" => &mut self.power_supply,
            "features" => &mut self.features,
            "applications" => &mut self.applications,
            "output_signal" => &mut self.output_signal,
            "measurement_range" => &mut self.measurement_range,
            "sensitivity" => &mut self.sensitivity,
            "accuracy" => &mut self.accuracy,
            "response_time" => &mut self.response_time,
            "sensor_type" => {
                self.sensor_type = Some(value).filter(|v| !v.trim().is_empty());
                return true;
            }
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn attribute(&self, attr: SpecAttribute) -> &str {
        match attr {
            SpecAttribute::Dimensions => &self.dimensions,
            SpecAttribute::Weight => &self.weight,
            SpecAttribute::PowerSupply => &self.power_supply,
            SpecAttribute::OutputSignal => &self.output_signal,
            SpecAttribute::MeasurementRange => &self.measurement_range,
            SpecAttribute::Sensitivity => &self.sensitivity,
            SpecAttribute::Accuracy => &self.accuracy,
            SpecAttribute::ResponseTime => &self.response_time,
        }
    }
}

/// Attributes that have a dedicated row in the Word template's spec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecAttribute {
    Dimensions,
    Weight,
    PowerSupply,
    OutputSignal,
    MeasurementRange,
    Sensitivity,
    Accuracy,
    ResponseTime,
}

impl SpecAttribute {
    pub const ALL: [SpecAttribute; 8] = [
        SpecAttribute::Dimensions,
        SpecAttribute::Weight,
        SpecAttribute::PowerSupply,
        SpecAttribute::OutputSignal,
        SpecAttribute::MeasurementRange,
        SpecAttribute::Sensitivity,
        SpecAttribute::Accuracy,
        SpecAttribute::ResponseTime,
    ];

    /// Lower-cased row label as it appears in the template's first column.
    pub fn label(self) -> &'static str {
        match self {
            SpecAttribute::Dimensions => "dimensions",
            SpecAttribute::Weight => "weight",
            SpecAttribute::PowerSupply => "power supply",
            SpecAttribute::OutputSignal => "output signal",
            SpecAttribute::MeasurementRange => "measurement range",
            SpecAttribute::Sensitivity => "sensitivity",
            SpecAttribute::Accuracy => "accuracy",
            SpecAttribute::ResponseTime => "response time",
        }
    }

    /// Matches a template row label. Comparison is trimmed and case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        let needle = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.label() == needle)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CustomFieldSet
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl CustomField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn is_usable(&self) -> bool {
        !self.key.trim().is_empty() && !self.value.trim().is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomFieldError {
    #[error("At most {MAX_CUSTOM_FIELDS} custom fields are allowed, got {count}")]
    TooMany { count: usize },

    #[error("Custom field index {index} is out of range (0..{MAX_CUSTOM_FIELDS})")]
    IndexOutOfRange { index: usize },
}

/// Ordered user-declared attributes. Holds only entries with both a key and a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFieldSet(Vec<CustomField>);

impl CustomFieldSet {
    /// Bounds-checks the raw submission, then drops incomplete entries.
    pub fn new(entries: Vec<CustomField>) -> Result<Self, CustomFieldError> {
        if entries.len() > MAX_CUSTOM_FIELDS {
            return Err(CustomFieldError::TooMany {
                count: entries.len(),
            });
        }
        Ok(Self(
            entries
                .into_iter()
                .filter(CustomField::is_usable)
                .map(|f| CustomField::new(f.key.trim(), f.value.trim()))
                .collect(),
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CompletionModel
// ────────────────────────────────────────────────────────────────────────────

/// The two model identifiers the form offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionModel {
    #[default]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4")]
    Gpt4,
}

impl CompletionModel {
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionModel::Gpt35Turbo => "gpt-3.5-turbo",
            CompletionModel::Gpt4 => "gpt-4",
        }
    }
}

impl fmt::Display for CompletionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown completion model '{0}'")]
pub struct UnknownModel(pub String);

impl FromStr for CompletionModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gpt-3.5-turbo" => Ok(CompletionModel::Gpt35Turbo),
            "gpt-4" => Ok(CompletionModel::Gpt4),
            other => Err(UnknownModel(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request body
// ────────────────────────────────────────────────────────────────────────────

/// JSON counterpart of the multipart form, used by the prompt preview endpoint.
///
/// `custom_fields` holds the raw entries; `custom_field_set` applies the bound.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasheetRequest {
    #[serde(default)]
    pub spec: ProductSpec,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    pub model: Option<CompletionModel>,
}

impl DatasheetRequest {
    pub fn custom_field_set(&self) -> Result<CustomFieldSet, CustomFieldError> {
        CustomFieldSet::new(self.custom_fields.clone())
    }
}
