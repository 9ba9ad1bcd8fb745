//! Line-oriented SSH config decoder

use super::document::{Comment, Document, HostBlock, KeyValue, KeyValueLayout, Node};
use super::error::ParseError;
use super::pattern::Pattern;

/// A classified source line
enum Line {
    Host(Vec<Pattern>),
    Node(Node),
}

/// Parse SSH config text into a [`Document`]
pub fn decode(text: &str) -> Result<Document, ParseError> {
    let (body, trailing_newline) = match text.strip_suffix('\n') {
        Some(body) => (body, true),
        None => (text, false),
    };

    let mut hosts = vec![HostBlock::implicit()];
    for (index, raw) in body.split('\n').enumerate() {
        match parse_line(raw, index + 1)? {
            Line::Host(patterns) => hosts.push(HostBlock::with_header(patterns, raw.to_string())),
            Line::Node(node) => {
                if let Some(current) = hosts.last_mut() {
                    current.push(node);
                }
            }
        }
    }

    tracing::debug!("Decoded SSH config with {} host blocks", hosts.len());
    Ok(Document::from_parts(hosts, trailing_newline))
}

fn parse_line(raw: &str, line: usize) -> Result<Line, ParseError> {
    let (content, line_ending) = match raw.strip_suffix('\r') {
        Some(content) => (content, "\r"),
        None => (raw, ""),
    };

    let body = content.trim_start();
    if body.trim_end().is_empty() {
        return Ok(Line::Node(Node::Other(raw.to_string())));
    }
    if body.starts_with('#') {
        return Ok(Line::Node(Node::Comment(Comment::new(raw.to_string()))));
    }
    let indent = &content[..content.len() - body.len()];

    let key_end = body
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(body.len());
    let key = &body[..key_end];
    let after_key = &body[key_end..];
    let separator_end = separator_len(after_key);
    let separator = &after_key[..separator_end];
    let remainder = &after_key[separator_end..];

    let comment_start = find_trailing_comment(remainder, line)?;
    let value = remainder[..comment_start].trim_end();
    let trailing = format!("{}{}", &remainder[value.len()..], line_ending);

    let keyword = key.to_ascii_lowercase();
    match keyword.as_str() {
        "host" => {
            let patterns = split_arguments(value)
                .into_iter()
                .map(|text| {
                    Pattern::new(&text).map_err(|e| ParseError::InvalidPattern {
                        line,
                        pattern: text.clone(),
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if patterns.is_empty() {
                return Err(ParseError::EmptyHost { line });
            }
            return Ok(Line::Host(patterns));
        }
        "match" => return Err(ParseError::UnsupportedMatch { line }),
        _ => {}
    }

    if value.is_empty() {
        return Err(ParseError::MissingValue {
            line,
            key: key.to_string(),
        });
    }

    // Include is carried through untouched
    if keyword == "include" {
        return Ok(Line::Node(Node::Other(raw.to_string())));
    }

    let (value, quoted) = match unquote(value) {
        Some(inner) => (inner.to_string(), true),
        None => (value.to_string(), false),
    };
    let layout = KeyValueLayout {
        indent: indent.to_string(),
        separator: separator.to_string(),
        trailing,
    };
    Ok(Line::Node(Node::KeyValue(KeyValue::parsed(
        raw.to_string(),
        layout,
        key.to_string(),
        value,
        quoted,
    ))))
}

/// Length of the whitespace run after a key, allowing a single `=` inside it
fn separator_len(s: &str) -> usize {
    let mut seen_equals = false;
    for (i, c) in s.char_indices() {
        if c == '=' && !seen_equals {
            seen_equals = true;
        } else if !c.is_whitespace() {
            return i;
        }
    }
    s.len()
}

/// Byte offset of a ` #` comment outside quotes, or the length of `s`
fn find_trailing_comment(s: &str, line: usize) -> Result<usize, ParseError> {
    let mut in_quotes = false;
    // `s` starts right after the separator
    let mut prev_is_space = true;
    let mut comment_start = None;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes && prev_is_space => {
                comment_start = Some(i);
                break;
            }
            _ => {}
        }
        prev_is_space = c.is_whitespace();
    }
    if in_quotes {
        return Err(ParseError::UnterminatedQuote { line });
    }
    Ok(comment_start.unwrap_or(s.len()))
}

/// Inner text when the whole value is a single quoted string
fn unquote(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    (!inner.contains('"')).then_some(inner)
}

/// Split a value into whitespace separated arguments, honoring double quotes
fn split_arguments(value: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in value.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}
