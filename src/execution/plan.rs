//! Augmentation documents and their compiled plans.
//!
//! A document is an ordered mapping of operation keys to operations, and an
//! operation is an ordered mapping of transform names to parameter sets:
//!
//! ```json
//! {
//!   "op1": { "rotation": { "angle": 90 } },
//!   "op2": { "flip": { "flip_code": 0 }, "contrast": { "contrast_factor": 2.0 } }
//! }
//! ```
//!
//! Loading parses the document once. Compiling resolves every entry through
//! the registry into typed [`Transform`] steps, so nothing is re-validated
//! while images are processed.

use crate::core::error::{ConfigError, ConfigResult};
use crate::core::types::{ImageShape, ParamSet, Value};
use crate::filters::registry::TransformRegistry;
use crate::filters::transform::Transform;
use indexmap::IndexMap;
use log::warn;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Raw entries of one operation, in document order.
///
/// Repeated transform names are kept as separate entries. A value that is not
/// a mapping deserializes to [`OperationEntries::Malformed`] instead of failing
/// the whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationEntries {
    Entries(Vec<(String, Value)>),
    Malformed(&'static str),
}

impl<'de> Deserialize<'de> for OperationEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OperationEntriesVisitor)
    }
}

struct OperationEntriesVisitor;

impl<'de> Visitor<'de> for OperationEntriesVisitor {
    type Value = OperationEntries;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping of transform names to parameter sets")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some(name) = map.next_key::<String>()? {
            let params = map.next_value::<Value>()?;
            entries.push((name, params));
        }
        Ok(OperationEntries::Entries(entries))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(OperationEntries::Malformed("array"))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(OperationEntries::Malformed("boolean"))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(OperationEntries::Malformed("integer"))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(OperationEntries::Malformed("integer"))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(OperationEntries::Malformed("float"))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(OperationEntries::Malformed("string"))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OperationEntries::Malformed("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OperationEntries::Malformed("null"))
    }
}

/// A parsed, not yet compiled, augmentation document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AugmentationDocument {
    operations: IndexMap<String, OperationEntries>,
}

impl AugmentationDocument {
    /// Parse a JSON document. The top level must be a mapping.
    pub fn from_json(source: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read and parse a JSON document from disk.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Resolve every entry against `registry`.
    ///
    /// Unknown transform names are logged and left out of the compiled
    /// operation; they are reported in [`Operation::skipped`].
    pub fn compile(&self, registry: &TransformRegistry) -> Plan {
        let operations = self
            .operations
            .iter()
            .map(|(key, entries)| compile_operation(key, entries, registry))
            .collect();
        Plan { operations }
    }
}

fn compile_operation(key: &str, entries: &OperationEntries, registry: &TransformRegistry) -> Operation {
    let mut operation = Operation {
        key: key.to_string(),
        steps: Vec::new(),
        skipped: Vec::new(),
    };

    let entries = match entries {
        OperationEntries::Entries(entries) => entries,
        OperationEntries::Malformed(found) => {
            warn!("operation '{}' is a {}, not a mapping; skipping it", key, found);
            return operation;
        }
    };

    let empty = ParamSet::new();
    for (name, value) in entries {
        let params = match value {
            Value::Map(params) => params,
            other => {
                warn!(
                    "operation '{}': parameters of '{}' are a {}, using defaults",
                    key,
                    name,
                    other.type_name()
                );
                &empty
            }
        };
        match registry.resolve(name, params, ImageShape::NDIM) {
            Some(step) => operation.steps.push(step),
            None => {
                warn!("operation '{}': unknown transform '{}' skipped", key, name);
                operation.skipped.push(name.clone());
            }
        }
    }
    operation
}

/// One compiled operation: a single transform or a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operation key from the document (a grouping label only)
    pub key: String,
    /// Recognized steps in application order
    pub steps: Vec<Transform>,
    /// Transform names that were not recognized
    pub skipped: Vec<String>,
}

impl Operation {
    /// More than one recognized step.
    pub fn is_chain(&self) -> bool {
        self.steps.len() > 1
    }

    /// No recognized step; such an operation produces no output.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the recognized steps in application order, duplicates kept.
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Transform::name).collect()
    }
}

/// A compiled document: operations in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub operations: Vec<Operation>,
}

impl Plan {
    /// Parse and compile a JSON document in one go.
    pub fn from_json(source: &str, registry: &TransformRegistry) -> ConfigResult<Self> {
        Ok(AugmentationDocument::from_json(source)?.compile(registry))
    }

    /// Load and compile a JSON document from disk.
    pub fn load(path: &Path, registry: &TransformRegistry) -> ConfigResult<Self> {
        Ok(AugmentationDocument::load(path)?.compile(registry))
    }

    /// Operations that will produce an output.
    pub fn runnable(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| !op.is_empty())
    }

    /// Outputs written per successfully processed image.
    pub fn outputs_per_image(&self) -> usize {
        self.runnable().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TransformKind;
    use crate::filters::params::{ContrastParams, FlipParams, RotationParams};

    fn registry() -> TransformRegistry {
        TransformRegistry::with_builtins()
    }

    #[test]
    fn test_single_operation() {
        let plan = Plan::from_json(r#"{"op1": {"rotation": {"angle": 90}}}"#, &registry()).unwrap();
        assert_eq!(plan.operations.len(), 1);
        let op = &plan.operations[0];
        assert_eq!(op.key, "op1");
        assert!(!op.is_chain());
        assert_eq!(
            op.steps,
            vec![Transform::Rotation(RotationParams { angle: 90.0 })]
        );
    }

    #[test]
    fn test_chain_keeps_document_order() {
        let json = r#"{"op1": {"flip": {"flip_code": 0}, "contrast": {"contrast_factor": 2.0}}}"#;
        let plan = Plan::from_json(json, &registry()).unwrap();
        let op = &plan.operations[0];
        assert!(op.is_chain());
        assert_eq!(op.names(), vec!["flip", "contrast"]);
        assert_eq!(
            op.steps,
            vec![
                Transform::Flip(FlipParams { flip_code: 0 }),
                Transform::Contrast(ContrastParams {
                    contrast_factor: 2.0
                }),
            ]
        );
    }

    #[test]
    fn test_operations_keep_document_order() {
        let json = r#"{"zeta": {"zoom": {}}, "alpha": {"shear": {}}, "mid": {"flip": {}}}"#;
        let plan = Plan::from_json(json, &registry()).unwrap();
        let keys: Vec<_> = plan.operations.iter().map(|op| op.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_repeated_transform_names_are_kept() {
        let json = r#"{"op": {"flip": {"flip_code": 1}, "flip": {"flip_code": 0}}}"#;
        let plan = Plan::from_json(json, &registry()).unwrap();
        assert_eq!(plan.operations[0].names(), vec!["flip", "flip"]);
        assert_eq!(
            plan.operations[0].steps[1],
            Transform::Flip(FlipParams { flip_code: 0 })
        );
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let json = r#"{"op": {"sharpen": {"amount": 2}, "contrast": {}}, "bad": {"warp": {}}}"#;
        let plan = Plan::from_json(json, &registry()).unwrap();
        assert_eq!(plan.operations[0].names(), vec!["contrast"]);
        assert_eq!(plan.operations[0].skipped, vec!["sharpen".to_string()]);
        assert!(plan.operations[1].is_empty());
        assert_eq!(plan.outputs_per_image(), 1);
    }

    #[test]
    fn test_non_mapping_parameters_use_defaults() {
        let json = r#"{"op": {"adjust_gamma": 3, "rotation": null}}"#;
        let plan = Plan::from_json(json, &registry()).unwrap();
        let op = &plan.operations[0];
        assert_eq!(op.steps[0].kind(), TransformKind::AdjustGamma);
        assert_eq!(
            op.steps[1],
            Transform::Rotation(RotationParams { angle: 0.0 })
        );
    }

    #[test]
    fn test_non_mapping_operation_is_empty() {
        let json = r#"{"op": [1, 2], "other": "rotation", "ok": {"flip": {}}}"#;
        let document = AugmentationDocument::from_json(json).unwrap();
        assert_eq!(document.len(), 3);
        let plan = document.compile(&registry());
        assert!(plan.operations[0].is_empty());
        assert!(plan.operations[1].is_empty());
        assert_eq!(plan.outputs_per_image(), 1);
    }

    #[test]
    fn test_malformed_document_is_config_error() {
        assert!(matches!(
            AugmentationDocument::from_json("{\"op\": "),
            Err(ConfigError::Document(_))
        ));
        assert!(matches!(
            AugmentationDocument::from_json("[1, 2]"),
            Err(ConfigError::Document(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Plan::load(&dir.path().join("absent.json"), &registry()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aug.json");
        std::fs::write(&path, r#"{"op": {"gaussian_blur": {"kernel_size": 5}}}"#).unwrap();
        let plan = Plan::load(&path, &registry()).unwrap();
        assert_eq!(plan.operations[0].names(), vec!["gaussian_blur"]);
    }
}
