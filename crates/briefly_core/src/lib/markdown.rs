//! Line-oriented markdown to HTML conversion for notification emails.
//!
//! Summaries arrive as lightweight markdown (headers, lists, bold/italic,
//! horizontal rules). This deliberately small converter covers exactly that
//! subset; anything else is emitted as a paragraph.

use std::sync::LazyLock;

use regex::Regex;

static OL_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());
static BOLD_STARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static BOLD_UNDERS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.*?)__").unwrap());
static ITALIC_STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static ITALIC_UNDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_([^_]+)_").unwrap());

fn parse_inline(text: &str) -> String {
    let text = BOLD_STARS_RE.replace_all(text, "<strong>$1</strong>");
    let text = BOLD_UNDERS_RE.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC_STAR_RE.replace_all(&text, "<em>$1</em>");
    let text = ITALIC_UNDER_RE.replace_all(&text, "<em>$1</em>");
    text.into_owned()
}

pub fn markdown_to_html(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open_list: Option<&'static str> = None;

    let close_list = |out: &mut Vec<String>, open_list: &mut Option<&'static str>| {
        if let Some(tag) = open_list.take() {
            out.push(format!("</{tag}>"));
        }
    };

    for line in text.lines() {
        let stripped = line.trim();

        if stripped.is_empty() {
            close_list(&mut out, &mut open_list);
            continue;
        }

        if stripped.starts_with('#') {
            close_list(&mut out, &mut open_list);
            let level = stripped.chars().take_while(|c| *c == '#').count();
            let content = stripped[level..].trim();
            if (1..=6).contains(&level) {
                out.push(format!("<h{level}>{}</h{level}>", parse_inline(content)));
            } else {
                out.push(format!("<p>{}</p>", parse_inline(stripped)));
            }
            continue;
        }

        if matches!(stripped, "---" | "***" | "___") {
            close_list(&mut out, &mut open_list);
            out.push("<hr>".to_string());
            continue;
        }

        let is_ul = stripped.starts_with("- ") || stripped.starts_with("* ");
        let is_ol = OL_ITEM_RE.is_match(stripped);

        if is_ul || is_ol {
            let list_tag = if is_ul { "ul" } else { "ol" };
            if open_list.is_some_and(|open| open != list_tag) {
                close_list(&mut out, &mut open_list);
            }
            if open_list.is_none() {
                open_list = Some(list_tag);
                out.push(format!("<{list_tag}>"));
            }
            let content = if is_ul {
                &stripped[2..]
            } else {
                OL_ITEM_RE.splitn(stripped, 2).nth(1).unwrap_or_default()
            };
            out.push(format!("<li>{}</li>", parse_inline(content)));
            continue;
        }

        // a plain paragraph line breaks any open list
        close_list(&mut out, &mut open_list);
        out.push(format!("<p>{}</p>", parse_inline(stripped)));
    }

    close_list(&mut out, &mut open_list);
    out.join("\n")
}
