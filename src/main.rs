use anyhow::Context;
use clap::Parser;
use dockerfile_optimizer::{
    analyzer::{
        self, AnalysisOptions, Report,
        build_history::{self, HistoryReport},
        formatter::{self, FileOutput, OutputFormat},
        size_estimator::{self, SizeEstimate},
    },
    cli::Cli,
    config,
};
use log::{debug, info};
use rayon::prelude::*;
use std::io::{self, Write};
use std::process;

/// Exit status when at least one high-severity suggestion was found.
const EXIT_HIGH_SEVERITY: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;
    debug!("configuration: {:?}", config);

    let format = cli.format.map(OutputFormat::from).unwrap_or(config.format);
    let min_severity = cli.min_severity.map(Into::into).unwrap_or(config.min_severity);
    let colors = config.color && !cli.no_color;
    let estimate_size = cli.estimate_size || config.estimate_size;
    if !colors {
        colored::control::set_override(false);
    }

    let mut options = AnalysisOptions::new();
    for code in config.ignore_rules.iter().chain(&cli.ignore) {
        options = options.ignore(code.trim());
    }

    info!("analyzing {} file(s)", cli.files.len());
    let analyses: Vec<(Report, Option<SizeEstimate>)> = cli
        .files
        .par_iter()
        .map(|path| -> dockerfile_optimizer::Result<(Report, Option<SizeEstimate>)> {
            let report = analyzer::analyze_file(path, &options)?;
            let estimate = estimate_size.then(|| size_estimator::estimate(report.parse_result()));
            Ok((report, estimate))
        })
        .collect::<dockerfile_optimizer::Result<_>>()?;

    let history: Option<HistoryReport> = match &cli.history {
        Some(path) => {
            let layers = build_history::load_history(path)?;
            Some(build_history::analyze_history(&layers, cli.large_layer_bytes()))
        }
        None => None,
    };

    let names: Vec<String> = cli.files.iter().map(|p| p.display().to_string()).collect();
    let outputs: Vec<FileOutput<'_>> = analyses
        .iter()
        .zip(&names)
        .enumerate()
        .map(|(i, ((report, estimate), name))| FileOutput {
            file: name,
            report,
            size_estimate: estimate.as_ref(),
            // history describes one built image; report it once
            history: if i == 0 { history.as_ref() } else { None },
        })
        .collect();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    formatter::format_reports(&outputs, format, min_severity, colors, &mut handle)?;
    handle.flush()?;

    let any_high = analyses.iter().any(|(report, _)| report.has_high());
    Ok(if any_high { EXIT_HIGH_SEVERITY } else { 0 })
}
