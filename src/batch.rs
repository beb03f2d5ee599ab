//! Directory-to-directory batch processing.
//!
//! Every `*.json` page dump in the input directory yields exactly one output
//! record named after its stem, even when the dump cannot be read. Inputs
//! whose stems collide get distinct names from [`output_names`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::backend::{DumpSource, RecordedLayoutEngine};
use crate::error::Result;
use crate::model::{DocumentResult, UniversalResult};
use crate::outline::{OutlineBuilder, OutlineOptions, Tier};
use crate::render::{write_json, JsonFormat};
use crate::universal;

/// Suffix of the Windows download marker files to skip.
const ZONE_IDENTIFIER: &str = "Zone.Identifier";

/// Options for [`run_batch`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Process documents in parallel
    pub parallel: bool,
    /// Emit the universal record instead of the outline record
    pub universal: bool,
    /// JSON output format
    pub format: JsonFormat,
    /// Options passed to every outline build
    pub outline: OutlineOptions,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Emit universal records.
    pub fn universal(mut self) -> Self {
        self.universal = true;
        self
    }

    /// Set the JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the outline options.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline = options;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            universal: false,
            format: JsonFormat::Pretty,
            outline: OutlineOptions::default(),
        }
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of input documents
    pub processed: usize,
    /// Inputs that produced a placeholder or minimal record
    pub degraded: usize,
    /// Output files, in input order
    pub written: Vec<PathBuf>,
}

/// Input dumps of a directory in sorted file-name order.
pub fn collect_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && !name.ends_with(ZONE_IDENTIFIER) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Output names for a sorted input list, unique within the run.
///
/// An input keeps its file stem unless another input shares it (`a.json` and
/// `a.JSON`); colliding inputs are named after their whole file name with
/// dots replaced by underscores. A counter suffix settles anything left.
pub fn output_names(inputs: &[PathBuf]) -> Vec<String> {
    let mut stems: HashMap<String, usize> = HashMap::new();
    for input in inputs {
        *stems.entry(file_stem(input)).or_default() += 1;
    }

    let mut used = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = file_stem(input);
            let base = if stems.get(&stem).copied().unwrap_or_default() > 1 {
                file_name(input).replace('.', "_")
            } else {
                stem
            };
            let mut name = base.clone();
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

/// Output path for an output name.
pub fn output_path(output_dir: &Path, name: &str, universal: bool) -> PathBuf {
    if universal {
        output_dir.join(format!("{}_universal.json", name))
    } else {
        output_dir.join(format!("{}.json", name))
    }
}

/// Process every dump in `input_dir`, writing one record per input into
/// `output_dir`.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchReport> {
    run_batch_with_progress(input_dir, output_dir, options, &|_: &Path| {})
}

/// [`run_batch`] calling `progress` after each written record.
///
/// Dumps are loaded one at a time as they are processed. Each document
/// replays its own recorded layout.
pub fn run_batch_with_progress(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    progress: &(dyn Fn(&Path) + Sync),
) -> Result<BatchReport> {
    let inputs = collect_inputs(input_dir)?;
    fs::create_dir_all(output_dir)?;
    log::info!("Found {} dumps in {}", inputs.len(), input_dir.display());

    let jobs: Vec<(PathBuf, PathBuf)> = output_names(&inputs)
        .iter()
        .zip(&inputs)
        .map(|(name, input)| {
            let output = output_path(output_dir, name, options.universal);
            (input.clone(), output)
        })
        .collect();

    let process = |(input, output): &(PathBuf, PathBuf)| -> Result<(PathBuf, bool)> {
        let source = DumpSource::open(input);
        let degraded = if options.universal {
            let (record, degraded) = universal_record(input, &source);
            write_json(&record, output, options.format)?;
            degraded
        } else {
            let (record, degraded) = outline_record(&options.outline, input, &source);
            write_json(&record, output, options.format)?;
            degraded
        };
        progress(output);
        Ok((output.clone(), degraded))
    };

    let results: Vec<Result<(PathBuf, bool)>> = if options.parallel {
        jobs.par_iter().map(process).collect()
    } else {
        jobs.iter().map(process).collect()
    };

    let mut report = BatchReport::default();
    for result in results {
        let (path, degraded) = result?;
        report.processed += 1;
        if degraded {
            report.degraded += 1;
        }
        report.written.push(path);
    }

    log::info!(
        "Wrote {} records ({} degraded) to {}",
        report.processed,
        report.degraded,
        output_dir.display()
    );
    Ok(report)
}

fn outline_record(
    options: &OutlineOptions,
    path: &Path,
    source: &Result<DumpSource>,
) -> (DocumentResult, bool) {
    match source {
        Ok(source) => {
            let engine = Arc::new(RecordedLayoutEngine::new().with_source(source));
            let builder = OutlineBuilder::new(engine).with_options(options.clone());
            let (record, report) = builder.build_with_report(source);
            (record, report.tier == Tier::Placeholder)
        }
        Err(e) => {
            log::warn!("Could not load {}: {}", path.display(), e);
            (DocumentResult::placeholder(file_stem(path)), true)
        }
    }
}

fn universal_record(path: &Path, source: &Result<DumpSource>) -> (UniversalResult, bool) {
    match source {
        Ok(source) => (universal::analyze(source), false),
        Err(e) => {
            log::warn!("Could not load {}: {}", path.display(), e);
            (UniversalResult::minimal(file_stem(path)), true)
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
