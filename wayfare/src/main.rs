use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use wayfare::{
  cli::{Cli, Commands},
  output::{self, OutputFormat},
  preferences::{TripPreferences, chat_prompt, generation_prompt},
};
use wayfare_config::Config;
use wayfare_format::{ItineraryFormatter, format_chat_bubble_with};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!("Failed to generate configuration file: {}", output.display())
      })?;

      info!(
        "Configuration file created successfully. Edit it to customize how \
         itineraries are rendered."
      );
      Ok(())
    },

    Commands::ExportTemplates { output_dir, force } => {
      Config::export_templates(output_dir, *force).wrap_err_with(|| {
        format!("Failed to export templates to {}", output_dir.display())
      })
    },

    Commands::Prompt { preferences, chat } => {
      let prompt = match (chat, preferences) {
        (Some(message), _) => chat_prompt(message),
        (None, Some(path)) => {
          let prefs = TripPreferences::from_file(path).wrap_err_with(|| {
            format!("Failed to load trip preferences: {}", path.display())
          })?;
          generation_prompt(&prefs)
        },
        (None, None) => bail!("Either a preferences file or --chat is required"),
      };
      output::write_stdout(&prompt)
    },

    Commands::Chat { role, message } => {
      let config = load_config(&cli)?;
      let text = match message {
        Some(message) => message.clone(),
        None => output::read_input(Path::new("-"))?,
      };
      let bubble =
        format_chat_bubble_with((*role).into(), &text, &config.format_options());
      output::write_stdout(&bubble)
    },

    Commands::Itinerary {
      inputs,
      output_dir,
      format,
      jobs,
    } => {
      let mut config = load_config(&cli)?;
      if jobs.is_some() {
        config.jobs = *jobs;
      }
      format_itineraries(&config, inputs, output_dir.as_deref(), *format)
    },
  }
}

fn load_config(cli: &Cli) -> Result<Config> {
  let config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  config.validate_paths().wrap_err("Invalid configuration")?;
  Ok(config)
}

/// Format itinerary inputs, to standard output or into a directory.
fn format_itineraries(
  config: &Config,
  inputs: &[PathBuf],
  output_dir: Option<&Path>,
  format: OutputFormat,
) -> Result<()> {
  if let [input] = inputs
    && output_dir.is_none()
  {
    let formatter = ItineraryFormatter::new(config.format_options());
    let rendered = output::format_input(config, &formatter, input, format)?;
    return output::write_stdout(&rendered);
  }

  // Setup thread pool once for all parallel operations
  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build_global()?;

  let output_dir = output_dir.unwrap_or(&config.output_dir);
  let written = output::process_itineraries(config, inputs, output_dir, format)?;

  info!(
    "Itineraries written successfully to {} ({} files)",
    output_dir.display(),
    written.len()
  );
  Ok(())
}
