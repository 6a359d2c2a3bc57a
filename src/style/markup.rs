//! Inline style markup inside content lines.
//!
//! Lines handed to a text atom are opaque, pre-formatted payloads that may
//! carry curly-brace tags:
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `{bold}`, `{italic}`, `{underline}` | enable a modifier |
//! | `{blink}`, `{inverse}`, `{invisible}` | enable a modifier |
//! | `{red-fg}`, `{#ff8000-bg}` | set foreground / background |
//! | `{/bold}`, `{/red-fg}` | undo one tag |
//! | `{/}` | reset everything |
//! | `{open}`, `{close}` | literal `{` and `}` |
//!
//! Anything else between braces is kept as literal text.

use super::{Color, Modifiers};

/// Style carried by a run of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SpanStyle {
    /// Active modifiers.
    pub modifiers: Modifiers,
    /// Foreground override (`None` keeps the atom's style).
    pub fg: Option<Color>,
    /// Background override (`None` keeps the atom's style).
    pub bg: Option<Color>,
}

/// A run of text with a single style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span<'a> {
    /// The text, borrowed from the line.
    pub text: &'a str,
    /// Style for the whole run.
    pub style: SpanStyle,
}

fn modifier(name: &str) -> Option<Modifiers> {
    match name {
        "bold" => Some(Modifiers::BOLD),
        "italic" => Some(Modifiers::ITALIC),
        "underline" | "ul" => Some(Modifiers::UNDERLINE),
        "blink" => Some(Modifiers::BLINK),
        "inverse" | "reverse" => Some(Modifiers::REVERSED),
        "invisible" => Some(Modifiers::HIDDEN),
        _ => None,
    }
}

/// Apply one tag to `style`. Returns `false` if the tag is not recognized.
fn apply_tag(tag: &str, style: &mut SpanStyle) -> bool {
    if tag == "/" {
        *style = SpanStyle::default();
        return true;
    }

    let (closing, name) = tag
        .strip_prefix('/')
        .map_or((false, tag), |name| (true, name));

    if let Some(flag) = modifier(name) {
        style.modifiers.set(flag, !closing);
        return true;
    }

    let (color, slot) = if let Some(color) = name.strip_suffix("-fg") {
        (color, &mut style.fg)
    } else if let Some(color) = name.strip_suffix("-bg") {
        (color, &mut style.bg)
    } else {
        return false;
    };

    if closing {
        *slot = None;
        return true;
    }
    match color.parse::<Color>() {
        Ok(color) => {
            *slot = Some(color);
            true
        }
        Err(_) => false,
    }
}

/// Split a line into styled spans.
///
/// Empty runs are skipped; an unterminated `{` is literal text.
pub fn parse(line: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut style = SpanStyle::default();
    let mut rest = line;

    while !rest.is_empty() {
        let Some(open) = rest.find('{') else {
            spans.push(Span { text: rest, style });
            break;
        };
        if open > 0 {
            spans.push(Span { text: &rest[..open], style });
        }

        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            spans.push(Span { text: &rest[open..], style });
            break;
        };

        let tag = &after[..close];
        match tag {
            "open" => spans.push(Span { text: "{", style }),
            "close" => spans.push(Span { text: "}", style }),
            _ => {
                if !apply_tag(tag, &mut style) {
                    spans.push(Span {
                        text: &rest[open..open + close + 2],
                        style,
                    });
                }
            }
        }
        rest = &after[close + 1..];
    }

    spans
}

/// The visible text of a line with all recognized tags removed.
pub fn plain_text(line: &str) -> String {
    parse(line).iter().map(|span| span.text).collect()
}
