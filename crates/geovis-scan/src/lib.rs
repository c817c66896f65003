//! AI visibility scanning and scoring.
//!
//! Extracts genuine brand/domain recognition signals from AI answer text
//! (filtering false positives caused by the answer merely echoing the
//! question), reduces them to a reproducible 0–100 visibility score, and
//! orchestrates the full scan pipeline: site context → probe queries →
//! platform fan-out → extraction → scoring.

mod error;
mod extract;
mod fragments;
mod pipeline;
mod score;
mod types;

pub use error::ScanError;
pub use extract::{aggregate_signal, extract_answer};
pub use pipeline::{run_scan, ScanDeps, ScanOptions};
pub use score::{score_visibility, verdict, VisibilityScore};
pub use types::{AnswerExtraction, MentionSignal};
