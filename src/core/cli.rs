//! Command line interface for layers2font
//!
//! Inkscape runs effect extensions as `layers2font [options] <document.svg>`
//! and reads the modified document back from stdout, so the defaults here
//! follow that contract. The remaining options make the tool usable from a
//! shell or a build script.

use crate::core::config_file::ConfigFile;
use crate::logging::{self, LogSettings, DEFAULT_FILTER};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use tracing::debug;

/// layers2font CLI arguments
///
/// Examples:
///   layers2font drawing.svg > font.svg          # Inkscape-style, result on stdout
///   layers2font drawing.svg -o drawing.svg      # Update the document in place
///   layers2font - < drawing.svg                 # Read the document from stdin
///   layers2font drawing.svg --report run.json   # Also write a JSON summary
///   layers2font --new-config                    # Create ~/.config/layers2font
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "layers2font",
    version,
    about = "Convert GlyphLayer-* layers into an embedded SVG font",
    long_about = "Reads font metrics from the baseline, ascender, caps, xheight, descender, lbearing and rbearing guides of an Inkscape document, writes them to an SVG <font> in <defs>, and adds a <glyph> referencing every top-level layer whose label contains GlyphLayer-<unicode>."
)]
pub struct CliArgs {
    /// SVG document to convert
    ///
    /// Reads from stdin when omitted or `-`.
    #[clap(value_name = "INPUT", help = "SVG document to convert (stdin if omitted or -)")]
    pub input: Option<PathBuf>,

    /// Where to write the converted document
    #[clap(
        long = "output",
        short = 'o',
        value_name = "PATH",
        help = "Write the converted document here instead of stdout"
    )]
    pub output: Option<PathBuf>,

    /// Write a JSON summary of the run (metrics and mapped glyphs)
    #[clap(long = "report", value_name = "PATH", help = "Write a JSON run report")]
    pub report: Option<PathBuf>,

    /// Diagnostic log location
    ///
    /// Overrides `log_file` from settings.json. The default is
    /// `inkscape-ext-logfile` in the system temp directory.
    #[clap(
        long = "log-file",
        value_name = "PATH",
        conflicts_with = "no_log",
        help = "Append diagnostic output to this file"
    )]
    pub log_file: Option<PathBuf>,

    /// Disable the diagnostic log file
    #[clap(long = "no-log", help = "Do not write the diagnostic log file")]
    pub no_log: bool,

    /// Increase stderr verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Ids of selected objects, passed by Inkscape
    ///
    /// The effect always works on the whole document; these are accepted so
    /// that Inkscape's invocation does not fail.
    #[clap(long = "id", value_name = "ID", hide = true)]
    pub ids: Vec<String>,

    /// Initialize the user configuration directory and exit
    #[clap(
        long = "new-config",
        help = "Initialize ~/.config/layers2font/settings.json and exit"
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = self.input_path() {
            if !path.exists() {
                return Err(format!(
                    "Input document does not exist: {}\nMake sure the path is correct and the file exists.",
                    path.display()
                ));
            }
            if path.is_dir() {
                return Err(format!(
                    "Input is a directory: {}\nExpected an SVG file.",
                    path.display()
                ));
            }
        }

        if let Some(path) = &self.output {
            if path.is_dir() {
                return Err(format!(
                    "Output is a directory: {}\nExpected a file path.",
                    path.display()
                ));
            }
        }

        Ok(())
    }

    /// The input file, or `None` for stdin
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| *path != Path::new("-"))
    }

    /// Get the log settings from CLI args, config file, or defaults
    ///
    /// Priority order:
    /// 1. CLI arguments (--no-log, --log-file, -v)
    /// 2. Config file settings (~/.config/layers2font/settings.json)
    /// 3. RUST_LOG for the stderr filter
    /// 4. Built-in defaults
    pub fn log_settings(&self, config: Option<&ConfigFile>) -> LogSettings {
        let diagnostic_file = if self.no_log {
            None
        } else if let Some(path) = &self.log_file {
            Some(path.clone())
        } else if let Some(path) = config.and_then(|c| c.log_file.clone()) {
            debug!("Using log file from config file: {}", path.display());
            Some(path)
        } else {
            Some(logging::default_log_file())
        };

        let filter = match self.verbose {
            0 => config
                .and_then(|c| c.log_filter.clone())
                .or_else(|| std::env::var("RUST_LOG").ok())
                .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            1 => "layers2font=info".to_string(),
            2 => "layers2font=debug".to_string(),
            _ => "layers2font=trace".to_string(),
        };

        LogSettings {
            diagnostic_file,
            filter,
        }
    }
}
