//! Compiled specification artifact

use super::error::ArtifactError;
use crate::automaton::AutomatonDefinition;
use crate::compiler::CompilationWarning;
use crate::logging::codes;
use crate::preamble::Preamble;
use crate::{log_error, log_success};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationMetadata {
    pub compiled_at: DateTime<Utc>,
    /// Build profile the compile-time limits came from
    pub profile: String,
    pub statement_count: usize,
    pub state_count: usize,
    #[serde(default)]
    pub warnings: Vec<CompilationWarning>,
    /// Present when performance events are enabled
    #[serde(default)]
    pub timings: Option<PhaseTimings>,
}

/// Wall-clock time spent per phase, in microseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub tokenize_micros: u64,
    /// Parsing and reduction run interleaved and are timed together
    pub reduce_micros: u64,
}

impl PhaseTimings {
    pub fn total_micros(&self) -> u64 {
        self.tokenize_micros + self.reduce_micros
    }
}

/// The compiler's output: adapter configuration plus automaton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledSpecification {
    pub preamble: Preamble,
    pub automaton: AutomatonDefinition,
    pub metadata: CompilationMetadata,
}

impl CompiledSpecification {
    pub fn to_json(&self) -> Result<String, ArtifactError> {
        self.export(serde_json::to_string(self))
    }

    pub fn to_json_pretty(&self) -> Result<String, ArtifactError> {
        self.export(serde_json::to_string_pretty(self))
    }

    /// Restore a dumped specification, rejecting transitions to missing
    /// states
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let result = serde_json::from_str::<Self>(json)
            .map_err(ArtifactError::Deserialization)
            .and_then(|compiled| {
                compiled.automaton.validate()?;
                Ok(compiled)
            });

        match &result {
            Ok(compiled) => log_success!(codes::success::ARTIFACT_IMPORTED,
                "Compiled specification restored",
                "states" => compiled.automaton.state_count()
            ),
            Err(error) => log_error!(error.error_code(), "Failed to restore compiled specification",
                "error" => error
            ),
        }
        result
    }

    fn export(&self, json: serde_json::Result<String>) -> Result<String, ArtifactError> {
        let json = json.map_err(ArtifactError::Serialization)?;
        log_success!(codes::success::ARTIFACT_EXPORTED,
            "Compiled specification exported",
            "bytes" => json.len()
        );
        Ok(json)
    }

    pub fn has_warnings(&self) -> bool {
        !self.metadata.warnings.is_empty()
    }
}
