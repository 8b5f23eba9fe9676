//! Generation pipeline
//!
//! [`GenerationOrchestrator`] owns the run: scan, classify, generate the
//! Dockerfile, save, validate, offer one repair, then the optional compose
//! file. Repair confirmation goes through a [`RepairDecider`] so the loop runs
//! without a terminal in tests and scripts.

pub mod decider;
pub mod orchestrator;

pub use decider::{FixedDecider, RepairDecider, ScriptedDecider, TerminalDecider};
pub use orchestrator::{
    ArtifactOutcome, ArtifactReport, GenerationOrchestrator, GenerationSettings, RunReport,
};
