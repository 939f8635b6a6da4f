//! Ordered, read-only registry of test suites.
//!
//! The registry is built once at startup (from the compiled-in table or a
//! manifest) and never mutated afterwards, so request handlers share it
//! behind an `Arc` without locking. Declaration order is preserved because
//! the index page lists suites in that order.

use crate::schema_loader::{SUITE_MANIFEST_SCHEMA, load_json_schema, validate_instance};
use crate::suite::builtin::builtin_descriptors;
use crate::suite::identity::{SuiteName, is_valid_suite_name};
use crate::suite::model::{SuiteDescriptor, SuiteManifest};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone)]
/// Suite descriptors in declaration order plus a name index.
pub struct SuiteRegistry {
    suites: Vec<SuiteDescriptor>,
    by_name: BTreeMap<String, usize>,
}

impl SuiteRegistry {
    /// Registry over the suites compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_descriptors(builtin_descriptors()).context("building builtin suite table")
    }

    /// Build a registry, rejecting bad names, empty entries, and duplicates.
    pub fn from_descriptors(suites: Vec<SuiteDescriptor>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for (idx, suite) in suites.iter().enumerate() {
            validate_descriptor(suite)?;
            if by_name.insert(suite.name.0.clone(), idx).is_some() {
                bail!("duplicate suite name {}", suite.name);
            }
        }
        Ok(Self { suites, by_name })
    }

    /// Load a manifest from disk, validating it against the embedded schema.
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening manifest {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing manifest {}", path.display()))?;

        let schema = load_json_schema(SUITE_MANIFEST_SCHEMA, "suite manifest schema")?;
        validate_instance(
            &schema.compiled,
            &value,
            &format!("suite manifest {}", path.display()),
        )?;

        let manifest: SuiteManifest = serde_json::from_value(value)
            .with_context(|| format!("decoding manifest {}", path.display()))?;
        if manifest.schema_version != schema.schema_version {
            bail!(
                "manifest {} declares schema_version '{}', expected '{}'",
                path.display(),
                manifest.schema_version,
                schema.schema_version
            );
        }
        if manifest.suites.is_empty() {
            bail!("manifest {} contains no suites", path.display());
        }

        let registry = Self::from_descriptors(manifest.suites)
            .with_context(|| format!("loading suites from {}", path.display()))?;
        tracing::debug!(
            manifest = %path.display(),
            suites = registry.len(),
            "loaded suite manifest"
        );
        Ok(registry)
    }

    /// Resolve a suite by exact name.
    pub fn lookup(&self, name: &str) -> Option<&SuiteDescriptor> {
        let idx = self.by_name.get(name)?;
        self.suites.get(*idx)
    }

    /// Suite names in declaration order.
    pub fn list_names(&self) -> Vec<&SuiteName> {
        self.suites.iter().map(|suite| &suite.name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuiteDescriptor> {
        self.suites.iter()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

fn validate_descriptor(suite: &SuiteDescriptor) -> Result<()> {
    if !is_valid_suite_name(suite.name.as_str()) {
        bail!(
            "suite name must match ^[A-Za-z0-9_.-]+$, got '{}'",
            suite.name
        );
    }
    if let Some(template) = &suite.template {
        if template.as_str().trim().is_empty() {
            bail!("suite {} declares an empty template", suite.name);
        }
    }
    if suite.sources.iter().any(|s| s.trim().is_empty()) {
        bail!("suite {} sources must not contain empty entries", suite.name);
    }
    if suite.specs.iter().any(|s| s.trim().is_empty()) {
        bail!("suite {} specs must not contain empty entries", suite.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::identity::TemplateId;

    fn descriptor(name: &str, sources: &[&str], specs: &[&str]) -> SuiteDescriptor {
        SuiteDescriptor {
            name: SuiteName(name.to_string()),
            template: None,
            sources: sources.iter().map(|s| s.to_string()).collect(),
            specs: specs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn builtin_table_is_valid_and_ordered() {
        let registry = SuiteRegistry::builtin().unwrap();
        let names: Vec<&str> = registry.list_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["ServicesTests"]);

        let services = registry.lookup("ServicesTests").unwrap();
        assert_eq!(
            services.sources,
            vec![
                "horizon/js/angular/horizon.conf.js",
                "horizon/js/angular/services/horizon.utils.js"
            ]
        );
        assert_eq!(services.specs, vec!["horizon/tests/jasmine/utilsSpec.js"]);
        assert_eq!(services.template(), TemplateId::default_detail());
    }

    #[test]
    fn declaration_order_survives_indexing() {
        let registry = SuiteRegistry::from_descriptors(vec![
            descriptor("Zeta", &[], &[]),
            descriptor("Alpha", &[], &[]),
            descriptor("Mid", &[], &[]),
        ])
        .unwrap();
        let names: Vec<&str> = registry.list_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn lookup_is_exact() {
        let registry =
            SuiteRegistry::from_descriptors(vec![descriptor("ServicesTests", &["a.js"], &["b.js"])])
                .unwrap();
        assert!(registry.lookup("ServicesTests").is_some());
        assert!(registry.lookup("servicestests").is_none());
        assert!(registry.lookup(" ServicesTests").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn duplicates_and_bad_entries_are_rejected() {
        let err = SuiteRegistry::from_descriptors(vec![
            descriptor("Same", &[], &[]),
            descriptor("Same", &[], &[]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate suite name Same"));

        let err = SuiteRegistry::from_descriptors(vec![descriptor("a/b", &[], &[])]).unwrap_err();
        assert!(err.to_string().contains("must match"));

        let err =
            SuiteRegistry::from_descriptors(vec![descriptor("Ok", &["", "x.js"], &[])]).unwrap_err();
        assert!(err.to_string().contains("sources must not contain empty entries"));
    }

    #[test]
    fn empty_registry_is_allowed_in_memory() {
        let registry = SuiteRegistry::from_descriptors(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.list_names().is_empty());
    }
}
