//! Compile pipeline: source text to `CompiledSpecification`
//!
//! Statements are pulled from the parser one at a time and reduced
//! immediately, so a phase-order error stops compilation at the statement
//! that caused it rather than after the whole file has been parsed.

mod error;
pub mod output;

pub use error::{ArtifactError, CompileError};
pub use output::{CompilationMetadata, CompiledSpecification, PhaseTimings};

use crate::compiler::CompilerContext;
use crate::config::runtime::RuntimeConfig;
use crate::lexical::LexicalAnalyzer;
use crate::logging::codes;
use crate::syntax::{StatementParser, SyntaxError};
use crate::utils::SourceMap;
use crate::{log_debug, log_error, log_success};
use std::time::Instant;

/// Compile with preferences read from the environment
pub fn compile_source(source: &str) -> Result<CompiledSpecification, CompileError> {
    compile_source_with_config(source, &RuntimeConfig::default())
}

pub fn compile_source_with_config(
    source: &str,
    config: &RuntimeConfig,
) -> Result<CompiledSpecification, CompileError> {
    log_debug!("Starting compilation", "bytes" => source.len());

    let result = run_phases(source, config);

    match &result {
        Ok(compiled) => match compiled.metadata.timings {
            Some(timings) => log_success!(codes::success::COMPILATION_COMPLETE,
                "Compilation completed successfully",
                "statements" => compiled.metadata.statement_count,
                "states" => compiled.metadata.state_count,
                "warnings" => compiled.metadata.warnings.len(),
                "tokenize_us" => timings.tokenize_micros,
                "reduce_us" => timings.reduce_micros,
                "total_us" => timings.total_micros()
            ),
            None => log_success!(codes::success::COMPILATION_COMPLETE,
                "Compilation completed successfully",
                "statements" => compiled.metadata.statement_count,
                "states" => compiled.metadata.state_count,
                "warnings" => compiled.metadata.warnings.len()
            ),
        },
        Err(error) => match error.span() {
            Some(span) => log_error!(error.error_code(), "Compilation failed",
                span = span,
                "error" => error.detail()
            ),
            None => log_error!(error.error_code(), "Compilation failed",
                "error" => error.detail()
            ),
        },
    }

    result
}

fn run_phases(source: &str, config: &RuntimeConfig) -> Result<CompiledSpecification, CompileError> {
    let started = Instant::now();
    let tokens = LexicalAnalyzer::with_preferences(config.lexical.clone()).tokenize(source)?;
    let tokenized = Instant::now();

    let mut parser = StatementParser::new(tokens);
    let mut context = CompilerContext::new(config.compiler.clone());
    while let Some(statement) = parser.next_statement()? {
        context.reduce(&statement)?;
    }

    let statement_count = parser.statements_parsed();
    if statement_count == 0 {
        return Err(SyntaxError::EmptyProgram.into());
    }

    let (preamble, automaton, warnings) = context.finish();
    let timings = config.logging.log_performance_events.then(|| PhaseTimings {
        tokenize_micros: micros(tokenized - started),
        reduce_micros: micros(tokenized.elapsed()),
    });

    let metadata = CompilationMetadata {
        compiled_at: chrono::Utc::now(),
        profile: crate::config::build_info::profile().to_string(),
        statement_count,
        state_count: automaton.state_count(),
        warnings,
        timings,
    };

    Ok(CompiledSpecification {
        preamble,
        automaton,
        metadata,
    })
}

fn micros(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Render a compile error against its source, with a caret under the span
pub fn render_diagnostic(source: &str, error: &CompileError) -> String {
    match error.span() {
        Some(span) => SourceMap::new(source).format_error(&span, &error.detail()),
        None => format!("error: {}", error.detail()),
    }
}
