//! Prompt Builder — embeds the submitted attributes in the datasheet template.
//!
//! Pure construction: no escaping, no length limit. Values are substituted in a
//! single left-to-right pass, so a value that itself looks like `{weight}` is
//! emitted verbatim instead of being expanded again.

use crate::generation::prompts::{CUSTOM_BLOCK_HEADING, DATASHEET_PROMPT_TEMPLATE};
use crate::models::datasheet::{CustomFieldSet, ProductSpec};

/// Builds the user prompt for one submission.
pub fn build_prompt(spec: &ProductSpec, custom: &CustomFieldSet) -> String {
    let custom_block = render_custom_block(custom);
    let vars: [(&str, &str); 13] = [
        ("name", spec.name.as_str()),
        ("dimensions", spec.dimensions.as_str()),
        ("weight", spec.weight.as_str()),
        ("power_supply", spec.power_supply.as_str()),
        ("output_signal", spec.output_signal.as_str()),
        ("features", spec.features.as_str()),
        ("applications", spec.applications.as_str()),
        ("sensor_type", spec.sensor_type.as_deref().unwrap_or_default()),
        ("measurement_range", spec.measurement_range.as_str()),
        ("sensitivity", spec.sensitivity.as_str()),
        ("accuracy", spec.accuracy.as_str()),
        ("response_time", spec.response_time.as_str()),
        ("custom_block", custom_block.as_str()),
    ];
    substitute(DATASHEET_PROMPT_TEMPLATE, &vars)
}

/// `Additional Attributes:` followed by one `- key: value` line per entry.
/// Empty string when nothing usable remains, so the template collapses to the
/// same text as a form without the dynamic section.
fn render_custom_block(custom: &CustomFieldSet) -> String {
    if custom.is_empty() {
        return String::new();
    }
    let mut block = format!("\n{CUSTOM_BLOCK_HEADING}\n");
    for field in custom.iter() {
        block.push_str(&format!("- {}: {}\n", field.key, field.value));
    }
    block
}

/// Single-pass `{key}` substitution. Unknown tokens are copied through.
fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let token = after
            .find('}')
            .map(|close| &after[..close])
            .and_then(|key| vars.iter().find(|(k, _)| *k == key));

        match token {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
