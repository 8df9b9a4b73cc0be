use std::{
  collections::HashMap,
  fs,
  sync::{LazyLock, PoisonError, RwLock},
};

use color_eyre::eyre::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tera::Tera;
use wayfare_config::Config;
use wayfare_format::{ChatRole, FormattedDocument, format_chat_bubble_with};
use wayfare_templates as templates;

const PAGE_TEMPLATE: &str = templates::PAGE_TEMPLATE;
const SNAPSHOT_TEMPLATE: &str = templates::SNAPSHOT_TEMPLATE;
const CHAT_TEMPLATE: &str = templates::CHAT_TEMPLATE;
const DEFAULT_CSS: &str = templates::DEFAULT_CSS;

static TEMPLATE_CACHE: LazyLock<RwLock<HashMap<String, String>>> =
  LazyLock::new(|| RwLock::new(HashMap::new()));

/// Render the itinerary snapshot: the header block followed by every day
/// fragment of `doc`.
///
/// This is the markup handed to the PDF renderer.
///
/// # Errors
///
/// Returns an error if the template cannot be loaded or rendered.
pub fn render_snapshot(config: &Config, doc: &FormattedDocument) -> Result<String> {
  let template_content =
    get_template_content(config, "snapshot.html", SNAPSHOT_TEMPLATE)?;

  let mut tera = Tera::default();
  tera.add_raw_template("snapshot", &template_content)?;

  let mut tera_context = tera::Context::new();
  tera_context.insert("title", &encode_text(&config.title));
  tera_context.insert("subtitle", &encode_text(&config.subtitle));
  tera_context.insert("days", &doc.to_html());
  tera_context.insert("is_error", &doc.is_error());

  let html = tera
    .render("snapshot", &tera_context)
    .wrap_err("Failed to render itinerary snapshot")?;
  Ok(html)
}

/// Render a standalone HTML document around `content`.
///
/// The default stylesheet (or its override from the template directory) is
/// inlined; every configured stylesheet path is linked after it.
///
/// # Errors
///
/// Returns an error if a template cannot be loaded or rendered.
pub fn render_page(config: &Config, content: &str, page_title: &str) -> Result<String> {
  let template_content = get_template_content(config, "page.html", PAGE_TEMPLATE)?;
  let stylesheet = get_template_content(config, "default.css", DEFAULT_CSS)?;

  let extra_stylesheets: Vec<String> = config
    .stylesheet_paths
    .iter()
    .map(|path| {
      encode_double_quoted_attribute(&path.display().to_string()).into_owned()
    })
    .collect();

  let mut tera = Tera::default();
  tera.add_raw_template("page", &template_content)?;

  let mut tera_context = tera::Context::new();
  tera_context.insert("page_title", &encode_text(page_title));
  tera_context.insert("stylesheet", &stylesheet);
  tera_context.insert("extra_stylesheets", &extra_stylesheets);
  tera_context.insert("content", content);

  let html = tera
    .render("page", &tera_context)
    .wrap_err_with(|| format!("Failed to render page '{page_title}'"))?;
  Ok(html)
}

/// Render a formatted itinerary as a complete HTML page.
///
/// # Errors
///
/// Returns an error if a template cannot be loaded or rendered.
pub fn render_itinerary_page(
  config: &Config,
  doc: &FormattedDocument,
) -> Result<String> {
  let snapshot = render_snapshot(config, doc)?;
  render_page(config, &snapshot, &config.title)
}

/// Render a list of chat messages as bubbles inside the chat container.
///
/// Message text is formatted with the options derived from `config`.
///
/// # Errors
///
/// Returns an error if the template cannot be loaded or rendered.
pub fn render_chat_transcript(
  config: &Config,
  messages: &[(ChatRole, String)],
) -> Result<String> {
  let template_content = get_template_content(config, "chat.html", CHAT_TEMPLATE)?;
  let options = config.format_options();

  let bubbles: Vec<String> = messages
    .iter()
    .map(|(role, text)| format_chat_bubble_with(*role, text, &options))
    .collect();
  log::debug!("Rendering chat transcript with {} messages", bubbles.len());

  let mut tera = Tera::default();
  tera.add_raw_template("chat", &template_content)?;

  let mut tera_context = tera::Context::new();
  tera_context.insert("messages", &bubbles);

  let html = tera
    .render("chat", &tera_context)
    .wrap_err("Failed to render chat transcript")?;
  Ok(html)
}

/// Get the template content from the template directory if it exists,
/// otherwise use the embedded fallback.
fn get_template_content(
  config: &Config,
  template_name: &str,
  fallback: &str,
) -> Result<String> {
  let template_dir_key = config
    .template_dir
    .as_ref()
    .map_or_else(|| "default".to_string(), |p| p.display().to_string());
  let cache_key = format!("{template_dir_key}:{template_name}");

  {
    let cache = TEMPLATE_CACHE.read().unwrap_or_else(PoisonError::into_inner);
    if let Some(cached) = cache.get(&cache_key) {
      return Ok(cached.clone());
    }
  }

  let content = load_template_content(config, template_name, fallback)?;

  {
    let mut cache = TEMPLATE_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    cache.entry(cache_key).or_insert_with(|| content.clone());
  }

  Ok(content)
}

fn load_template_content(
  config: &Config,
  template_name: &str,
  fallback: &str,
) -> Result<String> {
  if let Some(template_path) = config.get_template_file(template_name)
    && template_path.is_file()
  {
    log::debug!("Using template override: {}", template_path.display());
    return fs::read_to_string(&template_path).wrap_err_with(|| {
      format!("Failed to read template file: {}", template_path.display())
    });
  }

  Ok(fallback.to_string())
}
