//! Presentation views over assessment results.

pub mod views;

pub use views::{AssessmentView, RiskBand, WaterfallStep};
