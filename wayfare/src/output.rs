use std::{
  collections::HashSet,
  fs,
  io::{self, Read, Write},
  path::{Path, PathBuf},
};

use clap::ValueEnum;
use color_eyre::eyre::{Context, Result, bail};
use log::info;
use rayon::prelude::*;
use wayfare_config::Config;
use wayfare_format::{FormattedDocument, ItineraryFormatter};
use wayfare_html::template::{render_itinerary_page, render_snapshot};

const STDIN_NAME: &str = "itinerary";

/// What `wayfare itinerary` writes for each input.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
  /// Standalone HTML page with the stylesheet inlined.
  #[default]
  Page,
  /// The itinerary block alone, as sent to the PDF renderer.
  Snapshot,
  /// Bare day fragments.
  Fragment,
  /// The document structure as JSON.
  Json,
  /// Plain text outline.
  Text,
}

impl OutputFormat {
  #[must_use]
  pub const fn extension(self) -> &'static str {
    match self {
      Self::Page | Self::Snapshot | Self::Fragment => "html",
      Self::Json => "json",
      Self::Text => "txt",
    }
  }

  /// Render a formatted document in this format.
  ///
  /// # Errors
  ///
  /// Returns an error if a template cannot be rendered or the document cannot
  /// be serialized.
  pub fn render(self, config: &Config, doc: &FormattedDocument) -> Result<String> {
    match self {
      Self::Page => render_itinerary_page(config, doc),
      Self::Snapshot => render_snapshot(config, doc),
      Self::Fragment => Ok(doc.to_html()),
      Self::Json => {
        serde_json::to_string_pretty(doc)
          .wrap_err("Failed to serialize itinerary to JSON")
      },
      Self::Text => Ok(doc.to_plain_text()),
    }
  }
}

fn is_stdin(path: &Path) -> bool {
  path.as_os_str() == "-"
}

/// Read an input file, or standard input for `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_input(path: &Path) -> Result<String> {
  if is_stdin(path) {
    let mut content = String::new();
    io::stdin()
      .read_to_string(&mut content)
      .wrap_err("Failed to read standard input")?;
    Ok(content)
  } else {
    fs::read_to_string(path)
      .wrap_err_with(|| format!("Failed to read input file: {}", path.display()))
  }
}

/// Write `content` to standard output.
///
/// # Errors
///
/// Returns an error if standard output is closed.
pub fn write_stdout(content: &str) -> Result<()> {
  let mut stdout = io::stdout().lock();
  stdout.write_all(content.as_bytes())?;
  if !content.ends_with('\n') {
    stdout.write_all(b"\n")?;
  }
  stdout.flush()?;
  Ok(())
}

/// Output path for `input` inside `output_dir`.
#[must_use]
pub fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
  let stem = if is_stdin(input) {
    STDIN_NAME.to_string()
  } else {
    input
      .file_stem()
      .map_or_else(|| STDIN_NAME.to_string(), |s| s.to_string_lossy().to_string())
  };
  output_dir.join(format!("{stem}.{}", format.extension()))
}

/// Format a single input and render it.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the result cannot be
/// rendered. Text that fails to format is not an error: it renders as the
/// error document.
pub fn format_input(
  config: &Config,
  formatter: &ItineraryFormatter,
  input: &Path,
  format: OutputFormat,
) -> Result<String> {
  let raw = read_input(input)?;
  let doc = formatter.format(&raw);
  if doc.is_error() {
    log::warn!("Could not structure {}, writing error document", input.display());
  }
  format.render(config, &doc)
}

/// Format every input in parallel and write the results into `output_dir`.
///
/// Returns the written paths in input order.
///
/// # Errors
///
/// Returns an error if two inputs map to the same output file, the output
/// directory cannot be created, or any input fails to read, render or write.
pub fn process_itineraries(
  config: &Config,
  inputs: &[PathBuf],
  output_dir: &Path,
  format: OutputFormat,
) -> Result<Vec<PathBuf>> {
  let targets: Vec<PathBuf> = inputs
    .iter()
    .map(|input| output_path(output_dir, input, format))
    .collect();

  let mut seen = HashSet::new();
  for target in &targets {
    if !seen.insert(target) {
      bail!(
        "Several inputs would be written to {}. Rename them or format them \
         separately.",
        target.display()
      );
    }
  }

  fs::create_dir_all(output_dir).wrap_err_with(|| {
    format!("Failed to create output directory: {}", output_dir.display())
  })?;
  info!("Output directory: {}", output_dir.display());

  let formatter = ItineraryFormatter::new(config.format_options());
  inputs
    .par_iter()
    .zip(targets.par_iter())
    .try_for_each(|(input, target)| {
      let rendered = format_input(config, &formatter, input, format)?;
      fs::write(target, rendered).wrap_err_with(|| {
        format!("Failed to write output file: {}", target.display())
      })?;
      log::debug!("Wrote {}", target.display());
      Ok::<(), color_eyre::eyre::Report>(())
    })?;

  info!("Formatted {} itineraries", inputs.len());
  Ok(targets)
}
