//! JSON Schema loading for the suite manifest.
//!
//! The manifest schema ships inside the binary so a relocated install can
//! still validate manifests. Callers get the compiled validator plus the
//! `schema_version` const the schema pins.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

/// Manifest schema compiled into the crate.
pub(crate) const SUITE_MANIFEST_SCHEMA: &str =
    include_str!("../schema/suite_manifest.schema.json");

const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

pub(crate) fn load_json_schema(raw: &str, label: &str) -> Result<SchemaLoadResult> {
    let schema_value: Value =
        serde_json::from_str(raw).with_context(|| format!("parsing schema {label}"))?;

    let schema_version = extract_schema_version(&schema_value)
        .ok_or_else(|| anyhow!("schema {label} missing schema_version const"))?;

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate `instance` and fold every violation into a single error.
pub(crate) fn validate_instance(schema: &JSONSchema, instance: &Value, label: &str) -> Result<()> {
    if let Err(errors) = schema.validate(instance) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed schema validation:\n{details}");
    }
    Ok(())
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    let version = schema.pointer(SCHEMA_VERSION_POINTER).and_then(Value::as_str)?;
    if !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
