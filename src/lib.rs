//! # Contactsheet
//!
//! Batch tools for folders of photographs: multi-page PDF contact sheets
//! and on-disk thumbnail/icon derivatives.
//!
//! # Architecture: Two Pipelines, Shared Collectors
//!
//! ```text
//! sheet   folders → collect → identify → GridLayout → PdfCanvas → Contactsheet.pdf
//! thumbs  folders → collect → (rayon, per folder) → resize / crop → Folder-WxH/, Folder-N/
//! ```
//!
//! Both pipelines share the same traversal ([`collect`]) and the same rule
//! for recognising folders written by `thumbs` ([`naming`]), so a sheet
//! never picks up generated thumbnails and `thumbs -r` never makes
//! thumbnails of thumbnails.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | Grid layout engine: geometry, orientation/scale fit, paging cursor |
//! | [`pdf`] | `lopdf` canvas the engine draws on |
//! | [`sheet`] | Contact-sheet pipeline: folders → placements → document |
//! | [`thumbs`] | Thumbnail and icon pipeline, parallel over folders |
//! | [`collect`] | Folder validation and lazy, ordered image collection |
//! | [`naming`] | Derivative suffixes, output names and derivative-folder detection |
//! | [`imaging`] | Pure-Rust image operations: identify, resize, crop, embed |
//! | [`config`] | `contactsheet.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting of pipeline events |
//!
//! # Design Decisions
//!
//! ## The Engine Never Touches Pixels
//!
//! [`layout::GridLayout`] takes image sizes, not images. It decides the
//! cell, orientation, scale and label, and hands drawing to a
//! [`layout::SheetCanvas`]. The layout rules are therefore tested with a
//! recording canvas and no files at all, and the PDF canvas only has to
//! translate instructions into content-stream operators.
//!
//! ## Portraits Are Turned Sideways
//!
//! Cells on the stock tabloid sheet are wider than they are tall. A
//! portrait image is rotated a quarter turn so it uses the cell's width
//! instead of shrinking to its height.
//!
//! ## Idempotent Thumbnails
//!
//! A derivative whose output file already exists is skipped without
//! decoding its source. Re-running `thumbs` over a folder only produces
//! what is missing, and an interrupted run picks up where it stopped.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling (Lanczos3) and JPEG encoding use the `image`
//! crate; PDF assembly uses `lopdf`. The binary has no system
//! dependencies.

pub mod collect;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod naming;
pub mod output;
pub mod pdf;
pub mod sheet;
pub mod thumbs;

#[cfg(test)]
pub(crate) mod test_helpers;
