//! Keeps `thumbnails/` in step with `full/`.
//!
//! There is no manifest: each run checks the filesystem, generates what is
//! missing and leaves everything else alone, so a run that died half way is
//! finished by simply running again.

use itertools::Itertools;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::record::PersonRecord;
use crate::settings::Settings;

/// External image tool used to make thumbnails.
pub trait ImageTool {
    fn is_available(&self) -> bool;

    fn make_thumbnail(&self, src: &Path, dst: &Path, geometry: &str, quality: u32) -> Result<()>;
}

/// ImageMagick 7 (`magick`) or anything with the same argument contract.
#[derive(Debug, Clone)]
pub struct Magick {
    program: String,
}

impl Magick {
    pub fn new(program: impl Into<String>) -> Self {
        Magick {
            program: program.into(),
        }
    }
}

impl ImageTool for Magick {
    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn make_thumbnail(&self, src: &Path, dst: &Path, geometry: &str, quality: u32) -> Result<()> {
        let file = dst
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let status = Command::new(&self.program)
            .arg(src)
            .args(["-thumbnail", geometry, "-strip", "-quality"])
            .arg(quality.to_string())
            .arg(dst)
            .status()
            .map_err(|e| PipelineError::ToolFailed {
                file: file.clone(),
                detail: format!("failed to start {}: {e}", self.program),
            })?;
        if !status.success() {
            return Err(PipelineError::ToolFailed {
                file,
                detail: format!("{} exited with {status}", self.program),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStatus {
    ToolMissing,
    SourceMissing,
    Present,
    NeedsGeneration,
}

/// What to do for one photo, decided from the filesystem alone.
pub fn plan_thumbnail(tool_available: bool, src: &Path, dst: &Path) -> ThumbnailStatus {
    if !tool_available {
        ThumbnailStatus::ToolMissing
    } else if !src.exists() {
        ThumbnailStatus::SourceMissing
    } else if dst.exists() {
        ThumbnailStatus::Present
    } else {
        ThumbnailStatus::NeedsGeneration
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub tool_missing: bool,
    pub generated: Vec<String>,
    pub present: usize,
    pub missing_sources: Vec<String>,
    /// (file name, reason)
    pub failed: Vec<(String, String)>,
}

/// Distinct non-empty photo names, sorted.
pub fn photo_files(records: &[PersonRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r.photo_file.as_str())
        .filter(|f| !f.is_empty())
        .sorted()
        .dedup()
        .collect()
}

/// Generates every missing thumbnail whose full-size image exists.
///
/// Only I/O trouble creating the thumbnail directory is returned as an error;
/// a missing tool, missing source or failed conversion is logged and reported.
pub fn reconcile(
    records: &[PersonRecord],
    settings: &Settings,
    tool: &dyn ImageTool,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    let available = tool.is_available();
    if available {
        let thumb_dir = settings.thumb_dir_path();
        fs::create_dir_all(&thumb_dir).map_err(|e| PipelineError::io(&thumb_dir, e))?;
    } else {
        warn!(
            tool = %settings.thumb_tool,
            "image tool not found, skipping thumbnail generation"
        );
        report.tool_missing = true;
    }

    let full_dir = settings.full_dir_path();
    let thumb_dir = settings.thumb_dir_path();
    let mut to_make = Vec::new();
    for file in photo_files(records) {
        let src = full_dir.join(file);
        let dst = thumb_dir.join(file);
        match plan_thumbnail(available, &src, &dst) {
            // same answer for every file
            ThumbnailStatus::ToolMissing => break,
            ThumbnailStatus::SourceMissing => {
                warn!(path = %src.display(), "full image missing");
                report.missing_sources.push(file.to_string());
            }
            ThumbnailStatus::Present => report.present += 1,
            ThumbnailStatus::NeedsGeneration => to_make.push(file),
        }
    }
    if report.tool_missing {
        return Ok(report);
    }

    if to_make.is_empty() {
        info!("thumbnails: all present, nothing to generate");
        return Ok(report);
    }
    info!(count = to_make.len(), "thumbnails: generating");

    // one at a time, odd file names are common
    for file in to_make {
        let src = full_dir.join(file);
        let dst = thumb_dir.join(file);
        match tool.make_thumbnail(&src, &dst, &settings.thumb_geometry, settings.thumb_quality) {
            Ok(()) => report.generated.push(file.to_string()),
            Err(e) => {
                warn!(file, error = %e, "thumbnail generation failed");
                report.failed.push((file.to_string(), e.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Copies the source to the destination and records each call.
    struct FakeTool {
        available: bool,
        fail_on: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTool {
        fn new() -> Self {
            FakeTool {
                available: true,
                fail_on: None,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageTool for FakeTool {
        fn is_available(&self) -> bool {
            self.available
        }

        fn make_thumbnail(&self, src: &Path, dst: &Path, geometry: &str, quality: u32) -> Result<()> {
            let name = dst.file_name().unwrap().to_string_lossy().into_owned();
            self.calls
                .borrow_mut()
                .push(format!("{name} {geometry} {quality}"));
            if self.fail_on == Some(name.as_str()) {
                return Err(PipelineError::ToolFailed {
                    file: name,
                    detail: "exit status: 1".into(),
                });
            }
            fs::copy(src, dst).unwrap();
            Ok(())
        }
    }

    fn site(full: &[&str], thumbs: &[&str]) -> (tempfile::TempDir, Settings) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::with_root(dir.path());
        fs::create_dir_all(settings.full_dir_path()).unwrap();
        fs::create_dir_all(settings.thumb_dir_path()).unwrap();
        for f in full {
            fs::write(settings.full_dir_path().join(f), b"img").unwrap();
        }
        for f in thumbs {
            fs::write(settings.thumb_dir_path().join(f), b"thumb").unwrap();
        }
        (dir, settings)
    }

    fn records(files: &[&str]) -> Vec<PersonRecord> {
        files
            .iter()
            .map(|f| PersonRecord::new("S", "N", *f))
            .collect()
    }

    #[test]
    fn plan_covers_every_case() {
        let (_dir, s) = site(&["a.jpg", "b.jpg"], &["b.jpg"]);
        let full = s.full_dir_path();
        let thumb = s.thumb_dir_path();
        assert_eq!(
            plan_thumbnail(false, &full.join("a.jpg"), &thumb.join("a.jpg")),
            ThumbnailStatus::ToolMissing
        );
        assert_eq!(
            plan_thumbnail(true, &full.join("zz.jpg"), &thumb.join("zz.jpg")),
            ThumbnailStatus::SourceMissing
        );
        assert_eq!(
            plan_thumbnail(true, &full.join("b.jpg"), &thumb.join("b.jpg")),
            ThumbnailStatus::Present
        );
        assert_eq!(
            plan_thumbnail(true, &full.join("a.jpg"), &thumb.join("a.jpg")),
            ThumbnailStatus::NeedsGeneration
        );
    }

    #[test]
    fn photo_files_are_distinct_sorted_non_empty() {
        let recs = records(&["b.jpg", "", "a.jpg", "b.jpg"]);
        assert_eq!(photo_files(&recs), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn generates_only_missing_thumbnails() {
        let (_dir, s) = site(&["a.jpg", "b.jpg", "c.jpg"], &["b.jpg"]);
        let tool = FakeTool::new();
        let report = reconcile(&records(&["c.jpg", "a.jpg", "b.jpg", "gone.jpg"]), &s, &tool).unwrap();

        assert_eq!(report.generated, vec!["a.jpg", "c.jpg"]);
        assert_eq!(report.present, 1);
        assert_eq!(report.missing_sources, vec!["gone.jpg"]);
        assert_eq!(*tool.calls.borrow(), vec!["a.jpg 420x 82", "c.jpg 420x 82"]);
        assert!(!s.thumb_dir_path().join("gone.jpg").exists());
    }

    #[test]
    fn second_run_invokes_nothing() {
        let (_dir, s) = site(&["a.jpg", "b.jpg"], &[]);
        let recs = records(&["a.jpg", "b.jpg"]);

        let first = FakeTool::new();
        reconcile(&recs, &s, &first).unwrap();
        assert_eq!(first.calls.borrow().len(), 2);

        let second = FakeTool::new();
        let report = reconcile(&recs, &s, &second).unwrap();
        assert!(second.calls.borrow().is_empty());
        assert_eq!(report.present, 2);
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let (_dir, s) = site(&["a.jpg", "b.jpg", "c.jpg"], &[]);
        let mut tool = FakeTool::new();
        tool.fail_on = Some("b.jpg");
        let report = reconcile(&records(&["a.jpg", "b.jpg", "c.jpg"]), &s, &tool).unwrap();

        assert_eq!(report.generated, vec!["a.jpg", "c.jpg"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "b.jpg");
        assert!(!s.thumb_dir_path().join("b.jpg").exists());
    }

    #[test]
    fn missing_tool_skips_everything() {
        let (_dir, s) = site(&["a.jpg"], &[]);
        let mut tool = FakeTool::new();
        tool.available = false;
        let report = reconcile(&records(&["a.jpg"]), &s, &tool).unwrap();

        assert!(report.tool_missing);
        assert!(tool.calls.borrow().is_empty());
        assert!(report.missing_sources.is_empty());
        assert_eq!(report.present, 0);
    }

    #[test]
    fn missing_tool_with_no_photos_is_still_reported() {
        let (_dir, s) = site(&[], &[]);
        let mut tool = FakeTool::new();
        tool.available = false;
        let report = reconcile(&records(&["", ""]), &s, &tool).unwrap();

        assert!(report.tool_missing);
        assert!(tool.calls.borrow().is_empty());
    }

    #[test]
    fn magick_with_bogus_program_is_unavailable() {
        assert!(!Magick::new("definitely-not-an-image-tool-xyz").is_available());
    }
}
