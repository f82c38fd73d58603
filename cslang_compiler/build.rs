// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    automaton: AutomatonLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_string_size: usize,
    max_identifier_length: usize,
    max_comment_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_statements: usize,
    max_parameters_per_pattern: usize,
    max_error_history: usize,
}

#[derive(serde::Deserialize)]
struct AutomatonLimits {
    max_states: usize,
    max_registers: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CSLANG_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=CSLANG_CONFIG_DIR");

    let profile = env::var("CSLANG_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("CSLANG_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the cslang_compiler directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_TOKEN_COUNT: usize = 50_000_000;
    const ABSOLUTE_MAX_STATES: usize = 1_000_000;
    const ABSOLUTE_MAX_STRING_SIZE: usize = 64 * 1024 * 1024;

    if config.lexical.max_token_count > ABSOLUTE_MAX_TOKEN_COUNT {
        panic!("SECURITY: max_token_count exceeds absolute maximum");
    }

    if config.lexical.max_string_size > ABSOLUTE_MAX_STRING_SIZE {
        panic!("SECURITY: max_string_size exceeds absolute maximum");
    }

    if config.automaton.max_states > ABSOLUTE_MAX_STATES {
        panic!("SECURITY: max_states exceeds absolute maximum");
    }

    if config.automaton.max_states < 2 {
        panic!("max_states must allow the start state and at least one event state");
    }

    if config.syntax.max_parameters_per_pattern == 0 {
        panic!("max_parameters_per_pattern must be positive");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("SECURITY: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.lexical.max_token_count > 10_000_000 {
        panic!("PRODUCTION: max_token_count too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_STRING_SIZE: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_COMMENT_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_STATEMENTS: usize = {};
        pub const MAX_PARAMETERS_PER_PATTERN: usize = {};
        pub const MAX_ERROR_HISTORY: usize = {};
    }}

    pub mod automaton {{
        pub const MAX_STATES: usize = {};
        pub const MAX_REGISTERS: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // Lexical
        config.lexical.max_string_size,
        config.lexical.max_identifier_length,
        config.lexical.max_comment_length,
        config.lexical.max_token_count,
        // Syntax
        config.syntax.max_statements,
        config.syntax.max_parameters_per_pattern,
        config.syntax.max_error_history,
        // Automaton
        config.automaton.max_states,
        config.automaton.max_registers,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
