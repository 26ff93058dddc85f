//! Application runner logic
//!
//! Handles one run: configuration, logging, reading the document, applying
//! the effect and writing the results. Nothing is written until the effect
//! has succeeded.

use crate::core::cli::CliArgs;
use crate::core::config_file::ConfigFile;
use crate::data::{self, PendingWrite};
use crate::editing::{self, EffectReport};
use crate::logging;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Run the effect with the given CLI arguments.
/// Handles special CLI flags and delegates to the effect.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    cli_args.validate().map_err(anyhow::Error::msg)?;

    let config = ConfigFile::load();
    let settings = cli_args.log_settings(config.as_ref());
    let _logging = match logging::init(&settings) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to open diagnostic log: {e:#}");
            logging::init(&settings.without_diagnostic_file())?
        }
    };
    logging::log_run_start();

    if !cli_args.ids.is_empty() {
        debug!("Ignoring selection {:?}; the effect converts the whole document", cli_args.ids);
    }

    let mut doc = data::load_svg(cli_args.input_path())?;
    let report = editing::apply(&mut doc).context("Failed to convert layers to an SVG font")?;

    // Stage everything before replacing anything
    let output = PendingWrite::svg(&doc, cli_args.output.as_deref())?;
    let report_write = match &cli_args.report {
        Some(path) => Some(prepare_report(&report, path)?),
        None => None,
    };
    if let Some(report_write) = report_write {
        report_write.commit()?;
    }
    output.commit()?;

    info!("Converted {} glyph layers", report.glyphs.len());
    Ok(())
}

/// Stage the effect report as pretty-printed JSON
pub fn prepare_report(report: &EffectReport, path: &Path) -> Result<PendingWrite> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    let pending = PendingWrite::prepare(Some(path), json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    debug!("Prepared report for {:?}", path);
    Ok(pending)
}
