//! Escaping and lightweight markdown rendering for answer text.
//!
//! Rendering rules, first match wins:
//! 1. the whole text is a fenced ```` ```html ```` block: inner content is returned verbatim;
//! 2. the text contains something that looks like an HTML tag: returned verbatim;
//! 3. otherwise the text is escaped and the markdown subset (bold, italic,
//!    inline code, links, paragraphs, line breaks) is applied. Links only
//!    become anchors for the schemes accepted by [`is_safe_href`].
//!
//! Rules 1 and 2 trust the webhook's output completely. They only apply when
//! `trust_remote_html` is set; deployments that receive pre-formatted HTML
//! depend on them.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn fenced_html() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^\s*```html[ \t]*\r?\n(.*?)\r?\n?```\s*$").expect("valid regex"))
}

fn link_base() -> &'static reqwest::Url {
    static BASE: OnceLock<reqwest::Url> = OnceLock::new();
    BASE.get_or_init(|| reqwest::Url::parse("https://relative.invalid/").expect("valid base url"))
}

fn html_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?[a-zA-Z][a-zA-Z0-9-]*(\s[^<>]*)?/?>").expect("valid regex"))
}

struct Markdown {
    paragraph_split: Regex,
    bold: Regex,
    italic: Regex,
    code: Regex,
    link: Regex,
}

fn markdown() -> &'static Markdown {
    static MD: OnceLock<Markdown> = OnceLock::new();
    MD.get_or_init(|| Markdown {
        paragraph_split: Regex::new(r"\n\n+").expect("valid regex"),
        bold: Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"),
        italic: Regex::new(r"\*(.*?)\*").expect("valid regex"),
        code: Regex::new(r"`([^`]+)`").expect("valid regex"),
        link: Regex::new(r"\[(.+?)\]\((.+?)\)").expect("valid regex"),
    })
}

/// Escape HTML metacharacters (`& < > " '`).
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render untrusted answer text to an HTML fragment.
pub fn render(text: &str, trust_remote_html: bool) -> String {
    if trust_remote_html {
        if let Some(caps) = fenced_html().captures(text) {
            return caps[1].to_string();
        }
        if looks_like_html(text) {
            return text.to_string();
        }
    }
    markdown_to_html(text)
}

pub fn looks_like_html(text: &str) -> bool {
    html_tag().is_match(text)
}

/// Escape, then apply the markdown subset chunk by chunk.
pub fn markdown_to_html(md: &str) -> String {
    let rules = markdown();
    let md = md.replace('\r', "");
    rules
        .paragraph_split
        .split(&md)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            let html = escape_html(chunk);
            let html = rules.bold.replace_all(&html, "<strong>${1}</strong>");
            let html = rules.italic.replace_all(&html, "<em>${1}</em>");
            let html = rules.code.replace_all(&html, "<code>${1}</code>");
            let html = rules.link.replace_all(&html, |caps: &Captures| {
                if is_safe_href(&caps[2]) {
                    format!(
                        r#"<a href="{}" target="_blank" rel="noreferrer">{}</a>"#,
                        &caps[2], &caps[1]
                    )
                } else {
                    caps[0].to_string()
                }
            });
            format!("<p>{}</p>", html.replace('\n', "<br/>"))
        })
        .collect()
}

/// Whether `href` may become a clickable link: `http`, `https`, `mailto`
/// or a relative reference. Everything else (`javascript:`, `data:`, ...)
/// stays plain text.
pub fn is_safe_href(href: &str) -> bool {
    match link_base().join(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto"),
        Err(_) => false,
    }
}

/// Display name for a source URL: host without a leading `www.`, or the
/// input unchanged when it does not parse as a URL.
pub fn prettify_host(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}
