//! Registry of the available transforms.

use crate::core::param::ParameterDefinition;
use crate::core::types::{Category, ImageShape, ParamSet, TransformKind};
use crate::filters::params::parameter_table;
use crate::filters::transform::Transform;
use indexmap::IndexMap;

/// Builds a typed step from a raw parameter set and the image dimensionality.
pub type TransformFactory = fn(TransformKind, &ParamSet, usize) -> Transform;

/// Metadata describing one transform.
#[derive(Debug, Clone)]
pub struct TransformMetadata {
    /// Name as used in documents and output file names
    pub id: &'static str,
    /// Short description
    pub description: &'static str,
    /// Listing category
    pub category: Category,
    /// Parameter table
    pub parameters: Vec<ParameterDefinition>,
}

/// Registry entry containing metadata and factory.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub kind: TransformKind,
    pub factory: TransformFactory,
    pub metadata: TransformMetadata,
}

/// Registry for all known transform names.
///
/// The vocabulary is closed: [`TransformRegistry::with_builtins`] registers
/// every [`TransformKind`] and documents naming anything else are skipped by
/// the caller.
pub struct TransformRegistry {
    /// Transforms indexed by name, in registration order.
    transforms: IndexMap<&'static str, RegistryEntry>,
    /// Names grouped by category.
    categories: IndexMap<Category, Vec<&'static str>>,
}

impl TransformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            transforms: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with every built-in transform.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for kind in TransformKind::ALL {
            registry.register(kind, Transform::from_params);
        }
        registry
    }

    /// Register a transform kind.
    pub fn register(&mut self, kind: TransformKind, factory: TransformFactory) {
        let metadata = TransformMetadata {
            id: kind.name(),
            description: describe(kind),
            category: kind.category(),
            parameters: parameter_table(kind, ImageShape::NDIM),
        };
        let id = metadata.id;
        let category = metadata.category;

        let replaced = self
            .transforms
            .insert(
                id,
                RegistryEntry {
                    kind,
                    factory,
                    metadata,
                },
            )
            .is_some();

        if !replaced {
            self.categories.entry(category).or_default().push(id);
        }
    }

    /// Get a registry entry.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.transforms.get(name)
    }

    /// Get metadata for a transform.
    pub fn get_metadata(&self, name: &str) -> Option<&TransformMetadata> {
        self.get(name).map(|e| &e.metadata)
    }

    /// Check if a transform name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Build the typed step for `name`, or `None` for an unknown name.
    pub fn resolve(&self, name: &str, params: &ParamSet, ndim: usize) -> Option<Transform> {
        self.get(name).map(|e| (e.factory)(e.kind, params, ndim))
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transforms.keys().copied()
    }

    /// Names grouped by category.
    pub fn grouped_by_category(&self) -> &IndexMap<Category, Vec<&'static str>> {
        &self.categories
    }

    /// Get the number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn describe(kind: TransformKind) -> &'static str {
    match kind {
        TransformKind::Rotation => "Rotate about the center, keeping the canvas size",
        TransformKind::Flip => "Flip about the horizontal axis, vertical axis, or both",
        TransformKind::Shift => "Shift along an array axis, zero-filling vacated positions",
        TransformKind::Shear => "Shear by an angle in radians",
        TransformKind::Zoom => "Zoom around the center, keeping the canvas size",
        TransformKind::RandomCrop => "Crop a randomly placed window",
        TransformKind::RandomBrightness => "Add a random offset to the HSV value channel",
        TransformKind::AdjustGamma => "Gamma correction through a lookup table",
        TransformKind::GaussianBlur => "Gaussian blur with an explicit kernel size",
        TransformKind::Contrast => "Scale every sample by a factor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use crate::filters::params::RotationParams;

    #[test]
    fn test_builtins_cover_every_kind() {
        let registry = TransformRegistry::with_builtins();
        assert_eq!(registry.len(), TransformKind::ALL.len());
        for kind in TransformKind::ALL {
            assert!(registry.contains(kind.name()));
            assert_eq!(registry.get(kind.name()).unwrap().kind, kind);
        }
        assert!(!registry.contains("sharpen"));
    }

    #[test]
    fn test_registration_order_is_kept() {
        let registry = TransformRegistry::with_builtins();
        let names: Vec<_> = registry.names().collect();
        let expected: Vec<_> = TransformKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_resolve_builds_typed_steps() {
        let registry = TransformRegistry::with_builtins();
        let mut params = ParamSet::new();
        params.insert("angle".to_string(), Value::Integer(45));

        assert_eq!(
            registry.resolve("rotation", &params, 3),
            Some(Transform::Rotation(RotationParams { angle: 45.0 }))
        );
        assert_eq!(registry.resolve("warp", &params, 3), None);
    }

    #[test]
    fn test_grouped_by_category() {
        let registry = TransformRegistry::with_builtins();
        let groups = registry.grouped_by_category();
        assert_eq!(groups[&Category::Geometric].len(), 6);
        assert_eq!(
            groups[&Category::Photometric],
            vec!["random_brightness", "adjust_gamma", "contrast"]
        );
        assert_eq!(groups[&Category::Blur], vec!["gaussian_blur"]);
    }

    #[test]
    fn test_reregistering_does_not_duplicate_category_entries() {
        let mut registry = TransformRegistry::with_builtins();
        registry.register(TransformKind::Zoom, Transform::from_params);
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.grouped_by_category()[&Category::Geometric].len(), 6);
    }

    #[test]
    fn test_metadata_lists_parameters() {
        let registry = TransformRegistry::with_builtins();
        let meta = registry.get_metadata("shift").unwrap();
        let names: Vec<_> = meta.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["axis", "shift_range"]);
        assert!(meta.parameters[0].default_value.is_none());
    }
}
