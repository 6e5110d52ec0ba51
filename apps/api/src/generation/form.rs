//! Form Collector — turns one multipart submission into explicit input objects.
//!
//! Field names:
//! - product attributes use the `ProductSpec` field names (`name`, `weight`, ...)
//! - custom pairs use `custom_key_N` / `custom_value_N` with N in 0..10
//! - `model` picks the completion model, `logo` carries an optional PNG/JPEG

use std::collections::BTreeMap;

use axum::extract::multipart::{Field, Multipart};
use tracing::debug;

use crate::errors::AppError;
use crate::models::datasheet::{
    CompletionModel, CustomField, CustomFieldError, CustomFieldSet, ProductSpec,
    MAX_CUSTOM_FIELDS,
};
use crate::render::logo::Logo;

/// Everything one form submission carries.
#[derive(Debug, Default)]
pub struct FormSubmission {
    pub spec: ProductSpec,
    pub custom_fields: CustomFieldSet,
    pub model: Option<CompletionModel>,
    pub logo: Option<Logo>,
}

/// Accumulates raw form parts before the custom-field bounds check runs.
#[derive(Debug, Default)]
struct FormBuilder {
    spec: ProductSpec,
    custom: BTreeMap<usize, CustomField>,
    model: Option<CompletionModel>,
    logo: Option<Logo>,
}

enum CustomPart {
    Key(usize),
    Value(usize),
}

impl FormBuilder {
    fn accept_text(&mut self, name: &str, value: String) -> Result<(), AppError> {
        if let Some(part) = parse_custom_part(name)? {
            match part {
                CustomPart::Key(i) => self.custom_entry(i).key = value,
                CustomPart::Value(i) => self.custom_entry(i).value = value,
            }
            return Ok(());
        }

        if name == "model" {
            if !value.trim().is_empty() {
                self.model = Some(
                    value
                        .parse()
                        .map_err(|e| AppError::Validation(format!("{e}")))?,
                );
            }
            return Ok(());
        }

        if !self.spec.set_field(name, value) {
            debug!("Ignoring unknown form field '{name}'");
        }
        Ok(())
    }

    fn custom_entry(&mut self, index: usize) -> &mut CustomField {
        self.custom
            .entry(index)
            .or_insert_with(|| CustomField::new("", ""))
    }

    fn finish(self) -> Result<FormSubmission, AppError> {
        Ok(FormSubmission {
            spec: self.spec,
            custom_fields: CustomFieldSet::new(self.custom.into_values().collect())?,
            model: self.model,
            logo: self.logo,
        })
    }
}

fn parse_custom_part(name: &str) -> Result<Option<CustomPart>, CustomFieldError> {
    let (index, is_key) = if let Some(rest) = name.strip_prefix("custom_key_") {
        (rest, true)
    } else if let Some(rest) = name.strip_prefix("custom_value_") {
        (rest, false)
    } else {
        return Ok(None);
    };

    let Ok(index) = index.parse::<usize>() else {
        return Ok(None);
    };
    if index >= MAX_CUSTOM_FIELDS {
        return Err(CustomFieldError::IndexOutOfRange { index });
    }
    Ok(Some(if is_key {
        CustomPart::Key(index)
    } else {
        CustomPart::Value(index)
    }))
}

/// Reads every part of the submission. Empty values are kept as empty strings.
pub async fn collect_form(mut multipart: Multipart) -> Result<FormSubmission, AppError> {
    let mut builder = FormBuilder::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "logo" {
            builder.logo = read_logo(field).await?;
            continue;
        }
        let value = field.text().await.map_err(malformed)?;
        builder.accept_text(&name, value)?;
    }

    let submission = builder.finish()?;
    debug!(
        "Collected form: product='{}', custom_fields={}, logo={}",
        submission.spec.name,
        submission.custom_fields.len(),
        submission.logo.is_some()
    );
    Ok(submission)
}

/// Decodes an uploaded logo part. An empty upload means "no logo".
pub async fn read_logo(field: Field<'_>) -> Result<Option<Logo>, AppError> {
    let bytes = field.bytes().await.map_err(malformed)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Logo::decode(&bytes).map(Some)
}

pub fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed form data: {e}"))
}
