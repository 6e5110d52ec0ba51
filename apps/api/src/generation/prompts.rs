// All LLM prompt constants for datasheet generation.
// Placeholders are `{name}` tokens substituted in a single pass by prompt_builder.

/// System prompt for datasheet generation.
pub const DATASHEET_SYSTEM: &str = "You are a technical writer who produces concise, \
    accurate datasheets for electronic components. \
    Respond with the datasheet in markdown only. \
    Do NOT include explanations, apologies, or text outside the datasheet.";

/// Datasheet prompt template.
/// Replace: {name}, {dimensions}, {weight}, {power_supply}, {output_signal},
///          {features}, {applications}, {sensor_type}, {measurement_range},
///          {sensitivity}, {accuracy}, {response_time}, {custom_block}
pub const DATASHEET_PROMPT_TEMPLATE: &str = r#"Write a professional technical datasheet for the electronic component described below.

Product Name: {name}
Dimensions: {dimensions}
Weight: {weight}
Power Supply: {power_supply}
Output Signal: {output_signal}

Key Features:
{features}

Applications:
{applications}

Sensor Details:
Sensor Type: {sensor_type}
Measurement Range: {measurement_range}
Sensitivity: {sensitivity}
Accuracy: {accuracy}
Response Time: {response_time}
{custom_block}
Structure the datasheet with these sections, in this order:
# Overview
# Key Features
# Technical Specifications
# Applications
# Additional Information

FORMATTING RULES:
- Start every section title with '#'
- Use '-' bullets for lists and never nest them
- Do NOT use tables, bold, or italics
- Express quantities in SI units (mm, g, V, mA, ms) with a space between value and unit
- Omit any section or attribute whose input above is empty; do NOT invent values"#;

/// Heading of the optional user-declared attribute block.
pub const CUSTOM_BLOCK_HEADING: &str = "Additional Attributes:";
