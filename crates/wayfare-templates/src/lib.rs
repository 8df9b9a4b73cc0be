use std::collections::HashMap;

pub const PAGE_TEMPLATE: &str = include_str!("../templates/page.html");
pub const SNAPSHOT_TEMPLATE: &str = include_str!("../templates/snapshot.html");
pub const CHAT_TEMPLATE: &str = include_str!("../templates/chat.html");

pub const DEFAULT_CSS: &str = include_str!("../templates/default.css");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("page.html", PAGE_TEMPLATE);
  templates.insert("snapshot.html", SNAPSHOT_TEMPLATE);
  templates.insert("chat.html", CHAT_TEMPLATE);
  templates.insert("default.css", DEFAULT_CSS);
  templates
}
