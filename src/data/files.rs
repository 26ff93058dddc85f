//! SVG file I/O operations

use crate::data::svg::{parse_svg, write_svg};
use crate::data::tree::SvgDocument;
use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Load an SVG document from a path, or from stdin when no path (or `-`) is given
pub fn load_svg(path: Option<&Path>) -> Result<SvgDocument> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SVG file {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read SVG document from stdin")?;
            text
        }
    };

    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    let doc = parse_svg(&text).with_context(|| format!("Invalid SVG in {source}"))?;
    Ok(doc)
}

/// Output that has been fully prepared but not yet made visible.
///
/// File contents are written to a temporary sibling of the target and only
/// renamed over it on [`PendingWrite::commit`], so a run that fails before
/// committing leaves every existing file untouched.
pub enum PendingWrite {
    File { temp: NamedTempFile, path: PathBuf },
    Stdout(String),
}

impl PendingWrite {
    /// Stage `contents` for `path`, or for stdout when there is no path
    pub fn prepare(path: Option<&Path>, contents: String) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(contents));
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        temp.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Self::File {
            temp,
            path: path.to_path_buf(),
        })
    }

    /// Stage an SVG document; `-` means stdout
    pub fn svg(doc: &SvgDocument, path: Option<&Path>) -> Result<Self> {
        Self::prepare(path.filter(|p| *p != Path::new("-")), write_svg(doc))
    }

    /// Move the staged contents into place
    pub fn commit(self) -> Result<()> {
        match self {
            Self::File { temp, path } => {
                temp.persist(&path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
            }
            Self::Stdout(contents) => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(contents.as_bytes())
                    .context("Failed to write SVG document to stdout")?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
