//! CLI entry point for edgeguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `edgeguard-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use edgeguard_app::{
    AuditInput, ExplainOutput, HookInput, SKIP_ENV_VAR, bypass_requested, format_explanation,
    format_not_found, render_text, run_audit, run_explain, run_hook, serialize_report,
    skipped_report, verdict_exit_code, write_report,
};
use edgeguard_settings::Overrides;
use std::io::Read;

/// Environment variable holding a tracing filter directive.
const LOG_ENV_VAR: &str = "EDGEGUARD_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "edgeguard",
    version,
    about = "Pre-deploy audit for serverless edge projects"
)]
struct Cli {
    /// Log debug events to stderr (overridden by EDGEGUARD_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Append audit diagnostics to this file.
    #[arg(long, global = true)]
    debug_log: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit a project and print the report.
    Check {
        /// Directory containing wrangler.jsonc / wrangler.toml / wrangler.json.
        #[arg(long, default_value = ".")]
        project_dir: Utf8PathBuf,

        /// Source directory to scan, relative to the project (overrides edgeguard.toml).
        #[arg(long)]
        source_dir: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also write the JSON report to this path.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,
    },

    /// Run as a pre-tool-use hook: read the JSON envelope from stdin.
    Hook,

    /// Explain a rule id with remediation guidance.
    Explain {
        /// The rule id (e.g. "RES001").
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.cmd {
        Commands::Check {
            project_dir,
            source_dir,
            format,
            report_out,
        } => cmd_check(
            project_dir,
            Overrides {
                source_dir,
                debug_log: cli.debug_log,
            },
            format,
            report_out,
        )?,
        Commands::Hook => cmd_hook(Overrides {
            source_dir: None,
            debug_log: cli.debug_log,
        }),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_check(
    project_dir: Utf8PathBuf,
    overrides: Overrides,
    format: Format,
    report_out: Option<Utf8PathBuf>,
) -> anyhow::Result<i32> {
    let skip_env = std::env::var(SKIP_ENV_VAR).ok();
    let report = if bypass_requested(skip_env.as_deref(), None) {
        skipped_report("EDGEGUARD_SKIP is set")
    } else {
        run_audit(AuditInput {
            project_root: &project_dir,
            overrides,
        })
        .report
    };

    if let Some(path) = &report_out {
        write_report(path, &report).with_context(|| format!("write report to {path}"))?;
    }

    match format {
        Format::Text => print!("{}", render_text(&report)),
        Format::Json => print!("{}", serialize_report(&report)?),
    }

    Ok(verdict_exit_code(report.verdict))
}

fn cmd_hook(overrides: Overrides) -> i32 {
    let mut stdin = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut stdin) {
        tracing::debug!(error = %err, "could not read hook envelope; allowing");
        return 0;
    }

    let fallback_dir = std::env::var("PWD")
        .ok()
        .filter(|p| !p.is_empty())
        .map(Utf8PathBuf::from)
        .or_else(|| {
            std::env::current_dir()
                .ok()
                .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
        })
        .unwrap_or_else(|| Utf8PathBuf::from("."));
    let skip_env = std::env::var(SKIP_ENV_VAR).ok();

    let output = run_hook(HookInput {
        stdin: &stdin,
        skip_env: skip_env.as_deref(),
        fallback_dir: &fallback_dir,
        overrides,
    });
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
    output.exit_code
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found { id, explanation } => {
            print!("{}", format_explanation(&id, &explanation));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available,
        } => {
            eprint!("{}", format_not_found(&identifier, available));
            1
        }
    }
}
