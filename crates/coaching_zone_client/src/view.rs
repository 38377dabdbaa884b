//! What the answer slot currently shows, and its HTML rendering.

use chrono::{Local, TimeZone};

use crate::category::Categories;
use crate::format::{escape_html, is_safe_href, prettify_host, render};
use crate::history::{Exchange, Source};

pub const NETWORK_ERROR_MESSAGE: &str = "Netzwerkfehler oder Timeout. Bitte erneut versuchen.";
pub const EMPTY_HISTORY_MESSAGE: &str = "Noch keine Anfragen.";

/// User-visible message for a non-2xx reply.
pub fn http_error_message(status: u16) -> String {
    format!("Fehler {}: Bitte später erneut versuchen.", status)
}

/// Numbered source link as displayed under an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    /// 1-based position.
    pub index: usize,
    pub title: String,
    pub url: String,
}

impl SourceLink {
    pub fn from_sources(sources: &[Source]) -> Vec<SourceLink> {
        sources
            .iter()
            .enumerate()
            .map(|(i, s)| SourceLink {
                index: i + 1,
                title: s.title.clone().unwrap_or_else(|| prettify_host(&s.url)),
                url: s.url.clone(),
            })
            .collect()
    }
}

/// A rendered answer: formatted prose plus its source links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    /// Raw answer text as received.
    pub text: String,
    /// `text` rendered to HTML.
    pub html: String,
    pub sources: Vec<SourceLink>,
}

impl AnswerView {
    pub fn new(text: &str, sources: &[Source], trust_remote_html: bool) -> Self {
        Self {
            text: text.to_string(),
            html: render(text, trust_remote_html),
            sources: SourceLink::from_sources(sources),
        }
    }
}

/// Content of the answer slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Empty,
    Loading,
    Answer(AnswerView),
    Error(String),
}

impl View {
    /// HTML fragment for the answer slot.
    pub fn to_html(&self) -> String {
        match self {
            View::Empty => String::new(),
            View::Loading => concat!(
                r#"<div class="cz-card cz-skeleton">"#,
                "<div></div><div></div><div></div><div></div>",
                "</div>"
            )
            .to_string(),
            View::Answer(answer) => {
                let mut html = String::from(r#"<article class="cz-card"><h2>Antwort</h2>"#);
                html.push_str(r#"<div class="cz-prose">"#);
                html.push_str(&answer.html);
                html.push_str("</div>");
                if !answer.sources.is_empty() {
                    html.push_str(r#"<div class="cz-sources"><p>Quellen &amp; Links</p>"#);
                    for link in &answer.sources {
                        let label = format!(
                            "<span>{}</span><span>{}</span>",
                            link.index,
                            escape_html(&link.title)
                        );
                        if is_safe_href(&link.url) {
                            html.push_str(&format!(
                                r#"<a href="{}" target="_blank" rel="noreferrer">{}</a>"#,
                                escape_html(&link.url),
                                label
                            ));
                        } else {
                            html.push_str(&format!(r#"<span class="cz-source">{}</span>"#, label));
                        }
                    }
                    html.push_str("</div>");
                }
                html.push_str("</article>");
                html
            }
            View::Error(message) => format!(
                r#"<div class="cz-card cz-error"><div>{}</div></div>"#,
                escape_html(message)
            ),
        }
    }
}

/// Wrap a fragment in the configured mount element.
pub fn mount(mount_id: &str, inner: &str) -> String {
    format!(r#"<div id="{}">{}</div>"#, escape_html(mount_id), inner)
}

/// One row of the history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub timestamp: i64,
    pub category_label: String,
    /// Local date and time of the exchange.
    pub time: String,
    pub question: String,
}

impl HistoryLine {
    pub fn new(exchange: &Exchange, categories: &Categories) -> Self {
        let category_label = exchange
            .category
            .as_deref()
            .map(|key| categories.label_for(key).to_string())
            .unwrap_or_default();
        let time = Local
            .timestamp_millis_opt(exchange.timestamp)
            .single()
            .map(|t| t.format("%d.%m.%Y, %H:%M:%S").to_string())
            .unwrap_or_else(|| exchange.timestamp.to_string());
        Self {
            timestamp: exchange.timestamp,
            category_label,
            time,
            question: exchange.question.clone(),
        }
    }
}
