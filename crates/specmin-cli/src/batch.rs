use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};
use rayon::prelude::*;

use specmin_core::config::CompactOptions;
use specmin_core::parse::{self, SpecDocument};
use specmin_core::{CompactOutput, compact};

const SPEC_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Outcome counts for one batch run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

/// Read and parse a spec file, choosing the parser by extension.
pub fn load_document(path: &Path) -> Result<SpecDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    let doc = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(doc)
}

/// Compact one file, logging any unresolvable references.
pub fn compact_file(path: &Path, options: &CompactOptions) -> Result<CompactOutput> {
    let doc = load_document(path)?;
    let out = compact(&doc, options).with_context(|| format!("invalid spec {}", path.display()))?;
    for warning in &out.warnings {
        warn!("{}: {warning}", path.display());
    }
    Ok(out)
}

/// Write `<stem>.txt` and `<stem>.json` into `dir`.
pub fn write_outputs(dir: &Path, stem: &str, out: &CompactOutput) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let text_path = dir.join(format!("{stem}.txt"));
    fs::write(&text_path, &out.text)
        .with_context(|| format!("failed to write {}", text_path.display()))?;

    let types_path = dir.join(format!("{stem}.json"));
    fs::write(&types_path, out.types_json()?)
        .with_context(|| format!("failed to write {}", types_path.display()))?;

    info!("wrote {} and {}", text_path.display(), types_path.display());
    Ok(())
}

/// Spec files directly inside `dir`, sorted by name.
pub fn spec_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_spec = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SPEC_EXTENSIONS.contains(&e));
        if path.is_file() && is_spec {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Compact every spec file in `input` into `output`.
///
/// Files are processed independently in parallel. A failing file is logged
/// and counted; it never stops the others.
pub fn run(
    input: &Path,
    output: &Path,
    options: &CompactOptions,
    jobs: Option<usize>,
) -> Result<BatchSummary> {
    let files = spec_files(input)?;
    if files.is_empty() {
        warn!("no spec files found in {}", input.display());
        return Ok(BatchSummary::default());
    }

    let process = || {
        files
            .par_iter()
            .map(|path| {
                let result = compact_file(path, options).and_then(|out| {
                    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("spec");
                    write_outputs(output, stem, &out)
                });
                match result {
                    Ok(()) => true,
                    Err(e) => {
                        error!("{}: {e:#}", path.display());
                        false
                    }
                }
            })
            .collect::<Vec<bool>>()
    };

    let outcomes = match jobs {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("failed to build thread pool")?
            .install(process),
        None => process(),
    };

    let succeeded = outcomes.iter().filter(|ok| **ok).count();
    Ok(BatchSummary {
        succeeded,
        failed: outcomes.len() - succeeded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r##"
servers: [{url: "https://api.test"}]
paths:
  /things:
    get:
      operationId: listThings
      requestBody:
        content:
          application/json:
            schema: {$ref: "#/components/schemas/Thing"}
components:
  schemas:
    Thing: {type: object}
"##;

    #[test]
    fn batch_writes_text_and_types() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("things.yaml"), VALID).unwrap();
        fs::write(input.path().join("notes.md"), "not a spec").unwrap();

        let summary = run(input.path(), output.path(), &CompactOptions::default(), None).unwrap();
        assert_eq!(summary, BatchSummary { succeeded: 1, failed: 0 });

        let text = fs::read_to_string(output.path().join("things.txt")).unwrap();
        assert!(text.starts_with("##IMPORTANT: base_url:https://api.test\n"));
        assert!(text.contains("opid: listThings"));

        let types = fs::read_to_string(output.path().join("things.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&types).unwrap();
        assert_eq!(value["Thing"]["type"], "obj");
        assert!(!output.path().join("notes.txt").exists());
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("a.yaml"), VALID).unwrap();
        fs::write(input.path().join("b.json"), "{ not json").unwrap();
        fs::write(input.path().join("c.yml"), "paths: {}\n").unwrap();

        let summary = run(input.path(), output.path(), &CompactOptions::default(), Some(2)).unwrap();
        assert_eq!(summary, BatchSummary { succeeded: 1, failed: 2 });
        assert!(!summary.all_failed());
        assert!(output.path().join("a.txt").exists());
        assert!(!output.path().join("b.txt").exists());
    }

    #[test]
    fn all_failed_is_reported() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("bad.yaml"), "- not\n- a mapping\n").unwrap();

        let summary = run(input.path(), output.path(), &CompactOptions::default(), None).unwrap();
        assert!(summary.all_failed());
    }

    #[test]
    fn empty_directory_is_not_a_failure() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let summary = run(input.path(), output.path(), &CompactOptions::default(), None).unwrap();
        assert_eq!(summary, BatchSummary::default());
        assert!(!summary.all_failed());
    }

    #[test]
    fn spec_files_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.yml", "a.json", "c.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let names: Vec<_> = spec_files(dir.path())
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        assert_eq!(names, ["a.json", "b.yml"]);
    }
}
