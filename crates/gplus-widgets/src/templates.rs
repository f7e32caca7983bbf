//! Template collaborator seam
//!
//! The renderer only knows the narrow `render(template, context)`
//! interface; [`BuiltinTemplates`] is the shipped implementation for the
//! two default widget templates. A host embedding this crate can plug in
//! its own engine behind the same trait.

use crate::error::{Result, WidgetError};
use serde_json::Value;

/// Renders a template identifier with a `{status, record}` context.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// Built-in HTML rendering for the default profile and feed templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTemplates;

impl TemplateRenderer for BuiltinTemplates {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        match template {
            "gplus_profile.html" => Ok(render_profile(context)),
            "gplus_feed.html" => Ok(render_feed(context)),
            other => Err(WidgetError::Template(format!(
                "unknown template '{}'",
                other
            ))),
        }
    }
}

/// Escape text for use in HTML bodies and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Failed results carry a human-readable message in `record`.
fn notice(context: &Value) -> String {
    let message = context["record"].as_str().unwrap_or("Widget unavailable.");
    format!("<p class=\"gplus-notice\">{}</p>\n", escape(message))
}

fn render_profile(context: &Value) -> String {
    if context["status"] != true {
        return notice(context);
    }
    let record = &context["record"];

    let mut html = String::from("<div class=\"gplus-profile\">\n");
    if let Some(url) = record.pointer("/cover/coverPhoto/url").and_then(Value::as_str) {
        html.push_str(&format!(
            "  <img class=\"gplus-cover\" src=\"{}\" alt=\"\">\n",
            escape(url)
        ));
    }
    if let Some(url) = record.pointer("/image/url").and_then(Value::as_str) {
        html.push_str(&format!(
            "  <img class=\"gplus-avatar\" src=\"{}\" alt=\"\">\n",
            escape(url)
        ));
    }

    let name = record.get("displayName").and_then(Value::as_str).unwrap_or("");
    match record.get("url").and_then(Value::as_str) {
        Some(url) => html.push_str(&format!(
            "  <h3 class=\"gplus-name\"><a href=\"{}\">{}</a></h3>\n",
            escape(url),
            escape(name)
        )),
        None => html.push_str(&format!("  <h3 class=\"gplus-name\">{}</h3>\n", escape(name))),
    }

    if let Some(tagline) = record.get("tagline").and_then(Value::as_str) {
        html.push_str(&format!(
            "  <p class=\"gplus-tagline\">{}</p>\n",
            escape(tagline)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_feed(context: &Value) -> String {
    if context["status"] != true {
        return notice(context);
    }
    let record = &context["record"];

    let mut html = String::from("<ul class=\"gplus-feed\">\n");
    let items = record.get("items").and_then(Value::as_array);
    for item in items.into_iter().flatten() {
        html.push_str("  <li class=\"gplus-item\">\n");

        let title = item.get("title").and_then(Value::as_str).unwrap_or("");
        match item.get("url").and_then(Value::as_str) {
            Some(url) => html.push_str(&format!(
                "    <a class=\"gplus-item-title\" href=\"{}\">{}</a>\n",
                escape(url),
                escape(title)
            )),
            None => html.push_str(&format!(
                "    <span class=\"gplus-item-title\">{}</span>\n",
                escape(title)
            )),
        }

        let attachments = item.pointer("/object/attachments").and_then(Value::as_array);
        for attachment in attachments.into_iter().flatten() {
            if let Some(url) = attachment.pointer("/image/url").and_then(Value::as_str) {
                html.push_str(&format!(
                    "    <img class=\"gplus-attachment\" src=\"{}\" alt=\"\">\n",
                    escape(url)
                ));
            }
        }
        html.push_str("  </li>\n");
    }
    html.push_str("</ul>\n");
    html
}
