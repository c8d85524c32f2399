//! Directory runs: list, load, dispatch, name and write.
//!
//! The engine owns the only mutable state of a run: the output counter and
//! the random generator. Images are processed one at a time in listing order.

use crate::config::Settings;
use crate::core::error::AugmentResult;
use crate::core::types::Image;
use crate::execution::dispatcher::{Dispatcher, OperationOutput};
use crate::execution::plan::Plan;
use crate::io::naming::{output_dir_for, OutputNamer};
use crate::io::store::ImageStore;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Run options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Appended to the input directory name to form the output directory.
    pub output_suffix: String,
    /// Whether to stop on the first per-image failure.
    pub stop_on_error: bool,
    /// Seed for the random transforms.
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_suffix: "_aug".to_string(),
            stop_on_error: false,
            seed: None,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    pub fn with_stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl From<&Settings> for RunOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            output_suffix: settings.output_suffix.clone(),
            stop_on_error: settings.stop_on_error,
            seed: settings.seed,
        }
    }
}

/// One image that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct ImageFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Summary of a directory run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Output directory
    pub output_dir: PathBuf,
    /// Candidate images found
    pub images_seen: usize,
    /// Images whose outputs were all written
    pub images_processed: usize,
    /// Written files, in write order
    pub outputs: Vec<PathBuf>,
    /// Per-image failures
    pub failures: Vec<ImageFailure>,
    /// Wall-clock duration
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u128(duration.as_millis())
    }
}

/// Runs a compiled plan over a directory of images.
pub struct Augmenter<S: ImageStore> {
    store: S,
    dispatcher: Dispatcher,
    options: RunOptions,
}

impl<S: ImageStore> Augmenter<S> {
    pub fn new(store: S, dispatcher: Dispatcher, options: RunOptions) -> Self {
        Self {
            store,
            dispatcher,
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Augment every image in `input_dir` with `plan`.
    ///
    /// Outputs go to `<input_dir><suffix>`, which is created if absent. A
    /// failure on one image is recorded in the report and the run moves on,
    /// unless `stop_on_error` is set.
    ///
    /// # Errors
    ///
    /// Listing the input or creating the output directory fails the run, as
    /// does any per-image failure when `stop_on_error` is set.
    pub fn run(&self, input_dir: &Path, plan: &Plan) -> AugmentResult<RunReport> {
        let start = Instant::now();
        let output_dir = output_dir_for(input_dir, &self.options.output_suffix);
        let images = self.store.list_images(input_dir)?;
        self.store.ensure_dir(&output_dir)?;

        info!(
            "augmenting {} image(s) from {} into {} ({} output(s) each)",
            images.len(),
            input_dir.display(),
            output_dir.display(),
            plan.outputs_per_image()
        );

        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut namer = OutputNamer::new();
        let mut report = RunReport {
            output_dir: output_dir.clone(),
            images_seen: images.len(),
            ..RunReport::default()
        };

        for path in &images {
            let result = self
                .process_image(path, plan, &mut rng)
                .and_then(|outputs| self.write_outputs(path, &output_dir, outputs, &mut namer));

            match result {
                Ok(written) => {
                    report.images_processed += 1;
                    report.outputs.extend(written);
                }
                Err(e) if self.options.stop_on_error || !e.is_per_image() => {
                    warn!("{}: {}; stopping", path.display(), e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("{}: {}; skipping", path.display(), e);
                    report.failures.push(ImageFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.elapsed = start.elapsed();
        info!(
            "wrote {} output(s) for {}/{} image(s) in {:.2?}",
            report.outputs.len(),
            report.images_processed,
            report.images_seen,
            report.elapsed
        );
        Ok(report)
    }

    /// Every output for one image, computed before any is written.
    fn process_image(
        &self,
        path: &Path,
        plan: &Plan,
        rng: &mut StdRng,
    ) -> AugmentResult<Vec<OperationOutput>> {
        let image: Image = self.store.load(path)?;
        debug!("loaded {} ({}x{})", path.display(), image.width(), image.height());
        Ok(self.dispatcher.run_document(&image, plan, rng)?)
    }

    fn write_outputs(
        &self,
        source: &Path,
        output_dir: &Path,
        outputs: Vec<OperationOutput>,
        namer: &mut OutputNamer,
    ) -> AugmentResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(outputs.len());
        for output in outputs {
            let target = output_dir.join(namer.file_name(source, &output.applied));
            self.store.save(&target, &output.image)?;
            namer.commit();
            info!("wrote {}", target.display());
            written.push(target);
        }
        Ok(written)
    }
}
