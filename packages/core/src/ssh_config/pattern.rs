//! Host patterns
//!
//! A `Host` line carries one or more glob patterns. `*` matches any run of
//! characters, `?` matches exactly one, and a leading `!` negates the pattern.

use std::fmt;

use regex::Regex;

/// A single pattern from a `Host` line
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    negated: bool,
    regex: Regex,
}

/// Compile a glob style pattern into an anchored regex
fn wildcard_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 2);
    pattern.push('^');
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    pattern
}

impl Pattern {
    /// Build a pattern from its text as written on the `Host` line
    pub fn new(text: &str) -> Result<Self, regex::Error> {
        let (negated, glob) = match text.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let regex = Regex::new(&wildcard_to_regex(glob))?;
        Ok(Self {
            text: text.to_string(),
            negated,
            regex,
        })
    }

    /// The pattern as written, including any leading `!`
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Whether the glob part matches `alias`, ignoring negation
    pub fn is_match(&self, alias: &str) -> bool {
        self.regex.is_match(alias)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Pattern {}
