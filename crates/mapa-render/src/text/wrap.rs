//! Greedy word wrapping driven by a [`TextMeasurer`].

use super::{TextMeasurer, TextStyle};
use std::collections::VecDeque;

/// Splits a line into alternating word and single-space tokens.
pub fn split_line_to_words(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    for ch in line.chars() {
        if ch.is_whitespace() {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            out.push(" ".to_string());
        } else {
            cur.push(ch);
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// Wraps `text` into lines no wider than `max_width` as reported by `measurer`.
///
/// Explicit `\n` breaks are kept. Words wider than the limit are split by characters. `None`
/// (or a non-positive width) only splits on explicit breaks.
pub fn wrap_text_lines(
    text: &str,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    max_width: Option<f64>,
) -> Vec<String> {
    let max_width = max_width.filter(|w| w.is_finite() && *w > 0.0);
    let mut out: Vec<String> = Vec::new();
    for line in text.split('\n') {
        match max_width {
            Some(w) => out.extend(wrap_line(line, measurer, style, w)),
            None => out.push(line.trim_end().to_string()),
        }
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn wrap_line(
    line: &str,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    max_width: f64,
) -> Vec<String> {
    let mut tokens = VecDeque::from(split_line_to_words(line));
    let mut out: Vec<String> = Vec::new();
    let mut cur = String::new();

    while let Some(tok) = tokens.pop_front() {
        if cur.is_empty() && tok == " " {
            continue;
        }

        let candidate = format!("{cur}{tok}");
        if measurer.measure(candidate.trim_end(), style).width <= max_width {
            cur = candidate;
            continue;
        }

        if !cur.trim().is_empty() {
            out.push(cur.trim_end().to_string());
            cur.clear();
            tokens.push_front(tok);
            continue;
        }

        if tok == " " {
            continue;
        }

        // The word does not fit on an empty line; cut it at the widest prefix that does.
        let chars = tok.chars().collect::<Vec<_>>();
        let mut cut = 1usize;
        while cut < chars.len() {
            let head: String = chars[..=cut].iter().collect();
            if measurer.measure(&head, style).width > max_width {
                break;
            }
            cut += 1;
        }
        let head: String = chars[..cut].iter().collect();
        let tail: String = chars[cut..].iter().collect();
        out.push(head);
        if !tail.is_empty() {
            tokens.push_front(tail);
        }
    }

    if !cur.trim().is_empty() {
        out.push(cur.trim_end().to_string());
    }

    if out.is_empty() {
        vec![String::new()]
    } else {
        out
    }
}
