//! Best-effort HTML-to-text cleanup for question statements.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use daily_common::types::Question;

/// Matches any markup tag; group 1 is the tag name.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\s*/?\s*([a-zA-Z0-9]*)[^<>]*>").expect("valid tag pattern"));

/// Tags whose boundaries become line breaks instead of vanishing.
const BLOCK_TAGS: &[&str] = &[
    "p", "br", "div", "li", "ul", "ol", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
];

/// Full-width sentence terminator that gets a paragraph break after it.
const SENTENCE_END: char = '。';

/// Strip markup, decode entities and split the statement into readable lines.
pub fn html_to_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, |caps: &Captures| {
        let name = caps[1].to_ascii_lowercase();
        if BLOCK_TAGS.contains(&name.as_str()) {
            "\n"
        } else {
            ""
        }
    });

    let decoded = html_escape::decode_html_entities(&stripped).replace('\u{a0}', " ");
    let broken = decoded.replace(SENTENCE_END, "。\n");

    broken
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a question as the chat message sent to channels.
pub fn render_question(question: &Question) -> String {
    format!(
        "『LeetCode 每日一题』 {}, 难度: {}\n题目：{}\n链接：{}\n",
        question.title,
        question.difficulty,
        html_to_text(&question.content_html),
        question.link()
    )
}
