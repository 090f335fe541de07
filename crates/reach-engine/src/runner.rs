//! Concrete execution through an external interpreter.
//!
//! Builds the interpreter command line, runs it to completion and decodes
//! the final state it prints. Programs and configuration values are passed
//! through already rendered; printing terms is the caller's business.

use reach_ir::CTerm;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration variable holding the program itself.
pub const PROGRAM_VARIABLE: &str = "PGM";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Cannot supply both pgm and config with PGM variable.")]
    ProgramConfigCollision,
    #[error("Expected non-negative depth, got: {0}")]
    NegativeDepth(i64),
    #[error("Expected {expected:?} as exit code from {command}, but got {}", display_code(.actual))]
    ExitCode {
        command: String,
        expected: Vec<i32>,
        /// `None` when the process was terminated by a signal.
        actual: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot decode interpreter output: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| c.to_string())
}

/// Output format requested from the interpreter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutput {
    #[default]
    Json,
    Kore,
    Pretty,
    None,
}

impl RunOutput {
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutput::Json => "json",
            RunOutput::Kore => "kore",
            RunOutput::Pretty => "pretty",
            RunOutput::None => "none",
        }
    }
}

/// How to invoke the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub command: String,
    pub definition_dir: Option<PathBuf>,
    pub output: RunOutput,
    /// Input parser for the program file.
    pub parser: Option<String>,
    /// Step bound; the run is unbounded when `None`.
    pub depth: Option<i64>,
    /// Exit codes accepted as success.
    pub expect_rc: Vec<i32>,
    pub temp_dir: Option<PathBuf>,
    pub expand_macros: bool,
    pub search_final: bool,
    pub no_pattern: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            command: "krun".to_string(),
            definition_dir: None,
            output: RunOutput::Json,
            parser: None,
            depth: None,
            expect_rc: vec![0],
            temp_dir: None,
            expand_macros: false,
            search_final: false,
            no_pattern: false,
        }
    }
}

/// A program file and initial values of further configuration variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub program: PathBuf,
    /// Rendered values keyed by configuration variable name.
    pub config: BTreeMap<String, String>,
}

impl RunRequest {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            config: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(name.into(), value.into());
        self
    }

    /// Reject requests the interpreter would misread.
    pub fn validate(&self, options: &RunOptions) -> Result<(), RunError> {
        if self.config.contains_key(PROGRAM_VARIABLE) {
            return Err(RunError::ProgramConfigCollision);
        }
        if let Some(depth) = options.depth.filter(|d| *d < 0) {
            return Err(RunError::NegativeDepth(depth));
        }
        Ok(())
    }

    /// Interpreter command line, starting with the command itself.
    pub fn build_args(&self, options: &RunOptions) -> Vec<String> {
        let mut args = vec![options.command.clone(), path_arg(&self.program)];
        if let Some(dir) = &options.definition_dir {
            args.extend(["--definition".to_string(), path_arg(dir)]);
        }
        if options.output != RunOutput::None {
            args.extend(["--output".to_string(), options.output.as_str().to_string()]);
        }
        if let Some(parser) = &options.parser {
            args.extend(["--parser".to_string(), parser.clone()]);
        }
        if let Some(depth) = options.depth {
            args.extend(["--depth".to_string(), depth.to_string()]);
        }
        args.extend(self.config.keys().map(|name| format!("-p{name}=cat")));
        args.extend(
            self.config
                .iter()
                .map(|(name, value)| format!("-c{name}={value}")),
        );
        if let Some(dir) = &options.temp_dir {
            args.extend(["--temp-dir".to_string(), path_arg(dir)]);
        }
        if !options.expand_macros {
            args.push("--no-expand-macros".to_string());
        }
        if options.search_final {
            args.push("--search-final".to_string());
        }
        if options.no_pattern {
            args.push("--no-pattern".to_string());
        }
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Fail unless the process exited with one of the accepted codes.
pub fn check_exit_code(command: &str, output: &Output, expected: &[i32]) -> Result<(), RunError> {
    let actual = output.status.code();
    if actual.is_some_and(|code| expected.contains(&code)) {
        return Ok(());
    }
    Err(RunError::ExitCode {
        command: command.to_string(),
        expected: expected.to_vec(),
        actual,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run the interpreter and return its raw output once the exit code is
/// accepted.
pub fn run_process(request: &RunRequest, options: &RunOptions) -> Result<Output, RunError> {
    request.validate(options)?;
    if !request.program.is_file() {
        return Err(RunError::Io {
            path: request.program.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "program file not found"),
        });
    }
    let args = request.build_args(options);
    info!(command = %args.join(" "), "Running");
    let output = Command::new(&args[0])
        .args(&args[1..])
        .output()
        .map_err(|source| RunError::Io {
            path: PathBuf::from(&options.command),
            source,
        })?;
    debug!(status = ?output.status.code(), "Interpreter finished");
    check_exit_code(&options.command, &output, &options.expect_rc)?;
    Ok(output)
}

/// Run to completion and decode the final state from JSON output.
pub fn run(request: &RunRequest, options: &RunOptions) -> Result<CTerm, RunError> {
    let options = RunOptions {
        output: RunOutput::Json,
        ..options.clone()
    };
    let output = run_process(request, &options)?;
    Ok(serde_json::from_slice(&output.stdout)?)
}
