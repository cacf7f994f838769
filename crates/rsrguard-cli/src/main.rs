//! CLI entry point for rsrguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. All business logic lives in the `rsrguard-app` crate.
//!
//! Exit codes: 0 = pass, 2 = failing-but-valid report, 1 = orchestration
//! failure (repository unreadable, malformed policy). A failing report is not
//! an engine error and prints to stdout; orchestration failures print a
//! clearly labeled error on stderr.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use rsrguard_app::{
    format_explanation, format_not_found, parse_report_json, render_annotations, render_markdown,
    render_text, report_exit_code, run_explain, run_scan_with_retries, scan_fleet,
    serialize_report, to_renderable, ExplainOutput, FleetOptions, FleetTarget, ScanInput,
    EXIT_ORCHESTRATION_FAILURE,
};
use rsrguard_repo::SnapshotLimits;
use rsrguard_settings::Overrides;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(
    name = "rsrguard",
    version,
    about = "RSR repository compliance verifier"
)]
struct Cli {
    /// Repository root to scan.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Path to the policy TOML (relative to the repo root unless absolute).
    #[arg(long, default_value = "rsr-policy.toml")]
    policy: Utf8PathBuf,

    /// Override profile (rhodium|lenient).
    #[arg(long)]
    profile: Option<String>,

    /// Override the blocking severity (critical|high|medium|low).
    #[arg(long)]
    fail_threshold: Option<String>,

    /// Override maximum violations to emit.
    #[arg(long)]
    max_violations: Option<u32>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan one repository and print the report.
    Check {
        /// Repository identifier carried into the report.
        #[arg(long)]
        repo_id: Option<String>,

        /// Snapshot deadline in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Retry budget for transient repository-access failures.
        #[arg(long, default_value = "0")]
        retry_budget: u32,

        /// Where to write the JSON report (omit to skip).
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/rsrguard/report.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Scan a list of repositories with a bounded worker pool.
    Fleet {
        /// File listing repository roots, one per line (# for comments).
        #[arg(long)]
        targets: Utf8PathBuf,

        /// Upper bound on concurrent scans.
        #[arg(long, default_value = "4")]
        max_workers: usize,

        /// Retry budget per repository.
        #[arg(long, default_value = "1")]
        retry_budget: u32,

        /// Per-repository snapshot deadline in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (prints to stdout if omitted).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule id with remediation guidance.
    Explain {
        /// The rule id (e.g. "files.readme" or "pkg.banned.npm").
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            ref repo_id,
            timeout_secs,
            retry_budget,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(
            &cli,
            repo_id.clone(),
            timeout_secs,
            retry_budget,
            report_out.clone(),
            write_markdown,
            markdown_out.clone(),
        ),
        Commands::Fleet {
            ref targets,
            max_workers,
            retry_budget,
            timeout_secs,
        } => cmd_fleet(&cli, targets.clone(), max_workers, retry_budget, timeout_secs),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        fail_threshold: cli.fail_threshold.clone(),
        max_violations: cli.max_violations,
    }
}

/// Load the policy file if present; a missing file is allowed (preset
/// defaults apply), any other read failure is an orchestration error.
fn read_policy_text(cli: &Cli, repo_root: &Utf8PathBuf) -> anyhow::Result<String> {
    let path = if cli.policy.is_absolute() {
        cli.policy.clone()
    } else {
        repo_root.join(&cli.policy)
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("read policy {path}")),
    }
}

fn cmd_check(
    cli: &Cli,
    repo_id: Option<String>,
    timeout_secs: Option<u64>,
    retry_budget: u32,
    report_out: Option<Utf8PathBuf>,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
) -> anyhow::Result<()> {
    let repo_root = cli
        .repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone());
    let repository_id = repo_id.unwrap_or_else(|| {
        repo_root
            .file_name()
            .unwrap_or(repo_root.as_str())
            .to_string()
    });

    let result = (|| -> anyhow::Result<i32> {
        let policy_text = read_policy_text(cli, &repo_root)?;

        let mut limits = SnapshotLimits::default();
        if let Some(secs) = timeout_secs {
            limits.deadline = Some(Instant::now() + Duration::from_secs(secs));
        }

        let input = ScanInput {
            repo_root: &repo_root,
            repository_id: &repository_id,
            policy_text: &policy_text,
            overrides: overrides(cli),
            limits,
        };

        let output = run_scan_with_retries(&input, retry_budget)?;
        let renderable = to_renderable(&output.report);
        print!("{}", render_text(&renderable));

        if let Some(report_out) = &report_out {
            write_bytes(report_out, &serialize_report(&output.report)?)
                .context("write report json")?;
        }
        if write_markdown {
            write_text(&markdown_out, &render_markdown(&renderable)).context("write markdown")?;
        }

        Ok(report_exit_code(&output.report))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("rsrguard error: {err:#}");
            std::process::exit(EXIT_ORCHESTRATION_FAILURE);
        }
    }
}

fn cmd_fleet(
    cli: &Cli,
    targets_path: Utf8PathBuf,
    max_workers: usize,
    retry_budget: u32,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let listing = std::fs::read_to_string(&targets_path)
            .with_context(|| format!("read targets {targets_path}"))?;
        let targets: Vec<FleetTarget> = listing
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| FleetTarget {
                repository_id: l.to_string(),
                repo_root: Utf8PathBuf::from(l),
            })
            .collect();
        if targets.is_empty() {
            anyhow::bail!("no targets in {targets_path}");
        }

        // Fleet policy comes from the configured path as-is; per-repo policy
        // files would make reports incomparable across the fleet.
        let policy_text = match std::fs::read_to_string(&cli.policy) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e).with_context(|| format!("read policy {}", cli.policy)),
        };

        let options = FleetOptions {
            max_workers,
            retry_budget,
            timeout: timeout_secs.map(Duration::from_secs),
        };
        let outcomes = scan_fleet(&targets, &policy_text, &overrides(cli), &options)?;

        let mut exit = 0;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(report) => {
                    let verdict = if report.pass { "PASS" } else { "FAIL" };
                    println!(
                        "{} {} ({} violation(s))",
                        verdict, outcome.repository_id, report.counts.total()
                    );
                    if !report.pass {
                        exit = exit.max(2);
                    }
                }
                Err(err) => {
                    println!("ERROR {} ({err})", outcome.repository_id);
                    exit = exit.max(1);
                }
            }
        }
        Ok(exit)
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("rsrguard error: {err:#}");
            std::process::exit(EXIT_ORCHESTRATION_FAILURE);
        }
    }
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{md}");
    }
    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;

    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_ids,
        } => {
            eprint!("{}", format_not_found(&identifier, &available_ids));
            std::process::exit(EXIT_ORCHESTRATION_FAILURE);
        }
    }
}

fn write_bytes(path: &Utf8PathBuf, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write: {path}"))?;
    Ok(())
}

fn write_text(path: &Utf8PathBuf, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}
