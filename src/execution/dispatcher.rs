//! Dispatcher: single-vs-chain composition over transform steps.

use crate::core::error::TransformResult;
use crate::core::types::{Image, ImageShape, ParamSet};
use crate::execution::plan::{Operation, Plan};
use crate::filters::registry::TransformRegistry;
use log::debug;
use rand::Rng;

/// Result of running one operation on one image.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutput {
    /// Key of the operation that produced this output
    pub key: String,
    /// Final image
    pub image: Image,
    /// Transform names in application order, duplicates kept
    pub applied: Vec<&'static str>,
}

/// Maps transform names to steps and runs operations.
pub struct Dispatcher {
    registry: TransformRegistry,
}

impl Dispatcher {
    pub fn new(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Apply the transform called `name` with a raw parameter set.
    ///
    /// Returns `None` when the name is not registered; the caller treats that
    /// as "not applied".
    pub fn apply(
        &self,
        image: &Image,
        name: &str,
        params: &ParamSet,
        rng: &mut impl Rng,
    ) -> Option<TransformResult<Image>> {
        let ndim = ImageShape::of(image).ndim();
        let step = self.registry.resolve(name, params, ndim)?;
        Some(step.apply(image, rng))
    }

    /// Run one operation against `image`.
    ///
    /// A single step is applied once; a chain feeds each step's output into
    /// the next, starting from `image`. Returns `Ok(None)` when the operation
    /// has no recognized step.
    ///
    /// # Errors
    ///
    /// The first precondition violation aborts the operation.
    pub fn run_operation(
        &self,
        image: &Image,
        operation: &Operation,
        rng: &mut impl Rng,
    ) -> TransformResult<Option<OperationOutput>> {
        let Some((first, rest)) = operation.steps.split_first() else {
            return Ok(None);
        };

        let mut current = first.apply(image, rng)?;
        for step in rest {
            current = step.apply(&current, rng)?;
        }
        debug!(
            "operation '{}' applied {}",
            operation.key,
            operation.names().join(" -> ")
        );

        Ok(Some(OperationOutput {
            key: operation.key.clone(),
            image: current,
            applied: operation.names(),
        }))
    }

    /// Run every operation of a plan, each against the same original image.
    ///
    /// Outputs come back in document order; operations without a recognized
    /// step contribute nothing.
    ///
    /// # Errors
    ///
    /// The first precondition violation aborts the whole document for this
    /// image, so no partial set of outputs is produced.
    pub fn run_document(
        &self,
        image: &Image,
        plan: &Plan,
        rng: &mut impl Rng,
    ) -> TransformResult<Vec<OperationOutput>> {
        let mut outputs = Vec::with_capacity(plan.operations.len());
        for operation in &plan.operations {
            if let Some(output) = self.run_operation(image, operation, rng)? {
                outputs.push(output);
            }
        }
        Ok(outputs)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(TransformRegistry::with_builtins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TransformError;
    use crate::core::types::Value;
    use crate::filters::builtin;
    use image::Rgb;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source() -> Image {
        Image::from_fn(20, 10, |x, y| Rgb([(x * 12) as u8, (y * 25) as u8, 60]))
    }

    fn plan(json: &str) -> Plan {
        Plan::from_json(json, &TransformRegistry::with_builtins()).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_apply_known_and_unknown_names() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let mut params = ParamSet::new();
        params.insert("flip_code".to_string(), Value::Integer(1));

        let flipped = dispatcher
            .apply(&image, "flip", &params, &mut rng())
            .unwrap()
            .unwrap();
        assert_eq!(flipped, builtin::flip(&image, 1));
        assert!(dispatcher
            .apply(&image, "posterize", &params, &mut rng())
            .is_none());
    }

    #[test]
    fn test_apply_with_empty_params_uses_defaults() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let out = dispatcher
            .apply(&image, "contrast", &ParamSet::new(), &mut rng())
            .unwrap()
            .unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_single_operation() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let plan = plan(r#"{"op1": {"rotation": {"angle": 90}}}"#);
        let output = dispatcher
            .run_operation(&image, &plan.operations[0], &mut rng())
            .unwrap()
            .unwrap();
        assert_eq!(output.applied, vec!["rotation"]);
        assert_eq!(output.image.dimensions(), image.dimensions());
        assert_eq!(output.image, builtin::rotate(&image, 90.0));
    }

    #[test]
    fn test_chain_folds_in_order() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let plan = plan(r#"{"op1": {"flip": {"flip_code": 0}, "contrast": {"contrast_factor": 2.0}}}"#);
        let output = dispatcher
            .run_operation(&image, &plan.operations[0], &mut rng())
            .unwrap()
            .unwrap();
        assert_eq!(output.applied, vec!["flip", "contrast"]);
        assert_eq!(output.image, builtin::contrast(&builtin::flip(&image, 0), 2.0));
    }

    #[test]
    fn test_chain_order_is_observable() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let shift_then_zoom = plan(
            r#"{"a": {"shift": {"axis": 1, "shift_range": 0.5}, "zoom": {"zoom_factor": 2.0}}}"#,
        );
        let zoom_then_shift = plan(
            r#"{"a": {"zoom": {"zoom_factor": 2.0}, "shift": {"axis": 1, "shift_range": 0.5}}}"#,
        );
        let a = dispatcher
            .run_operation(&image, &shift_then_zoom.operations[0], &mut rng())
            .unwrap()
            .unwrap();
        let b = dispatcher
            .run_operation(&image, &zoom_then_shift.operations[0], &mut rng())
            .unwrap()
            .unwrap();
        assert_ne!(a.image, b.image);
    }

    #[test]
    fn test_skipped_names_are_not_reported() {
        let dispatcher = Dispatcher::default();
        let plan = plan(r#"{"op": {"emboss": {}, "adjust_gamma": {"gamma": 1.0}}}"#);
        let output = dispatcher
            .run_operation(&source(), &plan.operations[0], &mut rng())
            .unwrap()
            .unwrap();
        assert_eq!(output.applied, vec!["adjust_gamma"]);
    }

    #[test]
    fn test_empty_operation_produces_nothing() {
        let dispatcher = Dispatcher::default();
        let plan = plan(r#"{"op": {"emboss": {}}}"#);
        assert_eq!(
            dispatcher
                .run_operation(&source(), &plan.operations[0], &mut rng())
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_document_operations_are_independent() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let plan = plan(
            r#"{"op1": {"contrast": {"contrast_factor": 0.5}}, "op2": {"flip": {"flip_code": 1}}}"#,
        );
        let outputs = dispatcher.run_document(&image, &plan, &mut rng()).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].key, "op1");
        assert_eq!(outputs[0].image, builtin::contrast(&image, 0.5));
        // op2 starts from the original, not from op1's result
        assert_eq!(outputs[1].image, builtin::flip(&image, 1));
    }

    #[test]
    fn test_precondition_aborts_document() {
        let dispatcher = Dispatcher::default();
        let tiny = Image::new(1, 1);
        let plan = plan(
            r#"{"ok": {"flip": {}}, "bad": {"random_crop": {"height_range": 0.5}}}"#,
        );
        let err = dispatcher.run_document(&tiny, &plan, &mut rng()).unwrap_err();
        assert!(matches!(err, TransformError::Precondition { .. }));
    }

    #[test]
    fn test_random_crop_fallback_keeps_dimensions() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let plan = plan(r#"{"op": {"random_crop": {"height_range": 1.2}}}"#);
        let outputs = dispatcher.run_document(&image, &plan, &mut rng()).unwrap();
        assert_eq!(outputs[0].image.dimensions(), image.dimensions());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let dispatcher = Dispatcher::default();
        let image = source();
        let plan = plan(
            r#"{"op": {"random_crop": {"height_range": 0.5, "width_range": 0.5}, "random_brightness": {"brightness_range": [-40, 40]}}}"#,
        );
        let a = dispatcher.run_document(&image, &plan, &mut rng()).unwrap();
        let b = dispatcher.run_document(&image, &plan, &mut rng()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].image.dimensions(), (10, 5));
    }
}
