// click-sentinel-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for CLI argument parsing.
// Purpose: Ensure the command surface parses the documented flags.
// Dependencies: click-sentinel-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the clap command definitions and the config-path plumbing.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use clap::CommandFactory;
use clap::Parser;

use super::Cli;
use super::Commands;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies the command definition is internally consistent.
#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

/// Verifies `serve --config` captures the path.
#[test]
fn serve_parses_config_path() {
    let cli = Cli::parse_from(["click-sentinel", "serve", "--config", "conf/app.toml"]);
    match cli.command {
        Commands::Serve(command) => {
            assert_eq!(command.config, Some(PathBuf::from("conf/app.toml")));
        }
        Commands::CheckConfig(_) => panic!("expected serve command"),
    }
}

/// Verifies `check-config` parses without a path.
#[test]
fn check_config_parses_without_path() {
    let cli = Cli::parse_from(["click-sentinel", "check-config"]);
    match cli.command {
        Commands::CheckConfig(command) => assert_eq!(command.config, None),
        Commands::Serve(_) => panic!("expected check-config command"),
    }
}
