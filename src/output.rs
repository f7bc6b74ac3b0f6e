//! CLI output formatting for both pipelines.
//!
//! # Output Format
//!
//! ## Sheet
//!
//! ```text
//! Photos/Trip
//!     001 dawn.jpg → page 1, column 1, row 1
//!     002 tower.jpg → page 1, column 2, row 1 (rotated)
//!     Skipped broken.jpg: Failed to read dimensions: ...
//! Skipping notes.txt: not a folder
//!
//! Placed 2 images on 1 page → Contactsheet.pdf
//! Skipped 1 image
//! ```
//!
//! ## Thumbs
//!
//! ```text
//! Photos/Trip (2 images)
//!     dawn.jpg
//!         icon 75: written
//!         300x200: exists
//!     tower.jpg
//!         icon 75: written
//!         300x200: Processing failed: ...
//!     tower.png: same output names as tower.jpg, not processed
//!
//! 3 written, 1 already present, 1 failed (3 images in 1 folder)
//! 1 image not processed: output names already taken
//! ```
//!
//! # Architecture
//!
//! Each event has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Grid positions are shown
//! 1-based.

use crate::imaging::DerivativeStatus;
use crate::layout::Orientation;
use crate::sheet::{SheetEvent, SheetReport};
use crate::thumbs::{ThumbEvent, ThumbReport};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `1 image`, `2 images`
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

// ============================================================================
// Sheet
// ============================================================================

pub fn format_sheet_event(event: &SheetEvent) -> Vec<String> {
    match event {
        SheetEvent::FolderStarted { path } => vec![path.display().to_string()],
        SheetEvent::NotAFolder { path } => {
            vec![format!("Skipping {}: not a folder", path.display())]
        }
        SheetEvent::ImagePlaced { index, placement } => {
            let rotated = match placement.orientation {
                Orientation::Rotated => " (rotated)",
                Orientation::Normal => "",
            };
            vec![format!(
                "{}{} {} → page {}, column {}, row {}{}",
                indent(1),
                format_index(*index),
                file_name(&placement.path),
                placement.page,
                placement.column + 1,
                placement.row + 1,
                rotated
            )]
        }
        SheetEvent::ImageSkipped { path, reason } => {
            vec![format!("{}Skipped {}: {}", indent(1), file_name(path), reason)]
        }
        SheetEvent::WalkFailed { reason } => vec![format!("{}Warning: {}", indent(1), reason)],
    }
}

pub fn format_sheet_summary(report: &SheetReport, output: &Path) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Placed {} on {} → {}",
            count(report.placements.len(), "image"),
            count(report.pages, "page"),
            output.display()
        ),
    ];
    if !report.skipped.is_empty() {
        lines.push(format!("Skipped {}", count(report.skipped.len(), "image")));
    }
    lines
}

pub fn print_sheet_event(event: &SheetEvent) {
    for line in format_sheet_event(event) {
        println!("{}", line);
    }
}

pub fn print_sheet_summary(report: &SheetReport, output: &Path) {
    for line in format_sheet_summary(report, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumbs
// ============================================================================

pub fn format_thumb_event(event: &ThumbEvent) -> Vec<String> {
    match event {
        ThumbEvent::NotAFolder { path } => {
            vec![format!("Skipping {}: not a folder", path.display())]
        }
        ThumbEvent::WalkFailed { reason } => vec![format!("Warning: {}", reason)],
        ThumbEvent::FolderStarted { path, images: 0 } => {
            vec![format!("{} (no images)", path.display())]
        }
        ThumbEvent::FolderStarted { path, images } => {
            vec![format!("{} ({})", path.display(), count(*images, "image"))]
        }
        ThumbEvent::FolderFailed { error } => vec![format!("{}Error: {}", indent(1), error)],
        ThumbEvent::ImageDone {
            source,
            outcomes,
            failures,
        } => {
            let mut lines = vec![format!("{}{}", indent(1), file_name(source))];
            for outcome in outcomes {
                let status = match outcome.status {
                    DerivativeStatus::Written => "written",
                    DerivativeStatus::Skipped => "exists",
                };
                lines.push(format!(
                    "{}{}: {}",
                    indent(2),
                    outcome.derivative.label(),
                    status
                ));
            }
            for failure in failures {
                lines.push(format!("{}{}", indent(2), failure));
            }
            lines
        }
        ThumbEvent::NameCollision { source, kept } => vec![format!(
            "{}{}: same output names as {}, not processed",
            indent(1),
            file_name(source),
            file_name(kept)
        )],
    }
}

pub fn format_thumb_summary(report: &ThumbReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "{} written, {} already present, {} failed ({} in {})",
            report.written,
            report.skipped,
            report.failed,
            count(report.images, "image"),
            count(report.folders, "folder")
        ),
    ];
    if report.collisions > 0 {
        lines.push(format!(
            "{} not processed: output names already taken",
            count(report.collisions, "image")
        ));
    }
    lines
}

pub fn print_thumb_event(event: &ThumbEvent) {
    for line in format_thumb_event(event) {
        println!("{}", line);
    }
}

pub fn print_thumb_summary(report: &ThumbReport) {
    for line in format_thumb_summary(report) {
        println!("{}", line);
    }
}
