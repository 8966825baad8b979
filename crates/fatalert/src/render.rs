//! Alert rendering
//!
//! One structured content model, two formatters. `render` builds the model
//! from the captured error, configuration, environment and log id; the
//! plain-text and HTML formatters walk the same lines so both variants carry
//! identical information. Pure functions of their inputs, no I/O.

use crate::capture::FatalCondition;
use crate::config::AlertConfig;
use crate::environment::EnvSnapshot;

/// Placeholder for request details missing from the environment
const UNKNOWN: &str = "(unknown)";

/// One line of alert content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLine {
    /// Leading banner sentence
    Banner(String),
    /// Labeled value ("Message: ...")
    Field { label: String, value: String },
    /// Labeled URL, rendered as an anchor in HTML and on its own line in
    /// plain text so mail clients auto-link it
    Link { label: String, url: String },
    /// Visual separator between blocks
    Blank,
}

/// Structured alert body plus subject
#[derive(Debug, Clone)]
pub struct AlertContent {
    pub subject: String,
    pub lines: Vec<ContentLine>,
}

/// Build the alert content model.
///
/// `log_id` is the id assigned by the error store, or None when the insert
/// failed or was skipped; the body then carries a "(not recorded)" marker so
/// the operator knows history is degraded.
pub fn render(
    error: &FatalCondition,
    config: &AlertConfig,
    env: &EnvSnapshot,
    log_id: Option<i64>,
) -> AlertContent {
    let subject = format!("{} - {}", config.subject_prefix.trim(), env.site_name);

    let mut lines = Vec::new();

    lines.push(ContentLine::Banner(
        "A fatal/critical error was detected.".to_string(),
    ));
    lines.push(ContentLine::Blank);

    lines.push(field("Site", &env.site_name));
    if let Some(home) = &env.home_url {
        lines.push(ContentLine::Link {
            label: "Home".to_string(),
            url: home.clone(),
        });
    }
    if let Some(url) = &env.request_url {
        lines.push(ContentLine::Link {
            label: "URL".to_string(),
            url: url.clone(),
        });
    }
    lines.push(field(
        "Time (UTC)",
        &env.now.format("%Y-%m-%d %H:%M:%S").to_string(),
    ));
    lines.push(ContentLine::Blank);

    lines.push(field(
        "Type",
        &format!("{} ({})", error.kind.label(), error.kind.code()),
    ));
    lines.push(field("Message", &error.message));
    lines.push(field("File", &error.file));
    lines.push(field("Line", &error.line.to_string()));

    if config.include_request {
        lines.push(ContentLine::Blank);
        lines.push(field(
            "Request URI",
            env.request_uri.as_deref().unwrap_or(UNKNOWN),
        ));
        lines.push(field(
            "Method",
            env.request_method.as_deref().unwrap_or(UNKNOWN),
        ));
        lines.push(field("IP", env.remote_ip.as_deref().unwrap_or(UNKNOWN)));
        lines.push(field(
            "User Agent",
            env.user_agent.as_deref().unwrap_or(UNKNOWN),
        ));
    }

    if config.include_user {
        lines.push(ContentLine::Blank);
        lines.push(field("User ID", &env.user_id.unwrap_or(0).to_string()));
    }

    lines.push(ContentLine::Blank);
    match log_id {
        Some(id) => lines.push(field("Log entry", &format!("#{}", id))),
        None => lines.push(field("Log entry", "(not recorded)")),
    }

    if let Some(url) = &env.log_viewer_url {
        lines.push(ContentLine::Link {
            label: "View logs".to_string(),
            url: url.clone(),
        });
    }
    if let Some(url) = &env.health_url {
        lines.push(ContentLine::Link {
            label: "Health debug".to_string(),
            url: url.clone(),
        });
    }
    if config.hosting_logs_url.is_empty() {
        lines.push(field(
            "Hosting error logs",
            "(add a URL in the alert configuration)",
        ));
    } else {
        lines.push(ContentLine::Link {
            label: "Hosting error logs".to_string(),
            url: config.hosting_logs_url.clone(),
        });
    }

    if let Some(path) = &env.debug_log_path {
        lines.push(field("Debug log path", &path.display().to_string()));
    }

    AlertContent { subject, lines }
}

fn field(label: &str, value: &str) -> ContentLine {
    ContentLine::Field {
        label: label.to_string(),
        value: value.to_string(),
    }
}

impl AlertContent {
    /// Plain-text body: one content line per text line, links on their own
    /// line so mail clients auto-link them.
    pub fn to_plain_text(&self) -> String {
        let mut out = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            match line {
                ContentLine::Banner(text) => out.push(text.clone()),
                ContentLine::Field { label, value } => out.push(format!("{}: {}", label, value)),
                ContentLine::Link { label, url } => out.push(format!("{}: {}", label, url)),
                ContentLine::Blank => out.push(String::new()),
            }
        }
        out.join("\n")
    }

    /// HTML body carrying the same information. Every dynamic value is
    /// escaped; URLs become anchors.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<html><body>\n");
        for line in &self.lines {
            match line {
                ContentLine::Banner(text) => {
                    out.push_str(&format!("<p><strong>{}</strong></p>\n", escape_html(text)));
                }
                ContentLine::Field { label, value } => {
                    out.push_str(&format!(
                        "<div><strong>{}:</strong> {}</div>\n",
                        escape_html(label),
                        escape_html(value)
                    ));
                }
                ContentLine::Link { label, url } => {
                    let escaped = escape_html(url);
                    out.push_str(&format!(
                        "<div><strong>{}:</strong> <a href=\"{}\">{}</a></div>\n",
                        escape_html(label),
                        escaped,
                        escaped
                    ));
                }
                ContentLine::Blank => out.push_str("<br>\n"),
            }
        }
        out.push_str("</body></html>\n");
        out
    }
}

/// Escape a value for embedding in HTML text or attributes
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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
