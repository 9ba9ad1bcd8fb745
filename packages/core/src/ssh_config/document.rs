//! In-memory model of an SSH config file
//!
//! The model keeps every line it does not change exactly as it was read,
//! so `decode` followed by `marshal_text` reproduces the input byte for byte.

use std::borrow::Cow;

use super::error::ParseError;
use super::parser;
use super::pattern::Pattern;

/// A parsed SSH config file
#[derive(Debug, Clone)]
pub struct Document {
    hosts: Vec<HostBlock>,
    trailing_newline: bool,
}

impl Document {
    pub(crate) fn from_parts(hosts: Vec<HostBlock>, trailing_newline: bool) -> Self {
        Self {
            hosts,
            trailing_newline,
        }
    }

    /// Parse SSH config text
    pub fn decode(text: &str) -> Result<Self, ParseError> {
        parser::decode(text)
    }

    /// Host blocks in file order
    ///
    /// The first block is always the implicit `*` block holding anything that
    /// appears before the first `Host` line.
    pub fn hosts(&self) -> &[HostBlock] {
        &self.hosts
    }

    pub fn hosts_mut(&mut self) -> &mut [HostBlock] {
        &mut self.hosts
    }

    /// Serialize the document back to SSH config text
    pub fn marshal_text(&self) -> String {
        let lines: Vec<Cow<'_, str>> = self.hosts.iter().flat_map(HostBlock::lines).collect();
        let mut out = lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

/// A `Host` section and the lines that follow it
#[derive(Debug, Clone)]
pub struct HostBlock {
    patterns: Vec<Pattern>,
    /// Raw `Host ...` line; `None` for the implicit leading block
    header: Option<String>,
    nodes: Vec<Node>,
}

impl HostBlock {
    pub(crate) fn implicit() -> Self {
        Self {
            // "*" always compiles
            patterns: Pattern::new("*").into_iter().collect(),
            header: None,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn with_header(patterns: Vec<Pattern>, header: String) -> Self {
        Self {
            patterns,
            header: Some(header),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// True for the block that collects lines before the first `Host` line
    pub fn is_implicit(&self) -> bool {
        self.header.is_none()
    }

    /// True when the block's only pattern is the universal `*`
    pub fn is_wildcard_only(&self) -> bool {
        matches!(self.patterns.as_slice(), [only] if only.as_str() == "*")
    }

    /// Check whether `alias` selects this block
    ///
    /// A matching negated pattern rejects the block outright, otherwise any
    /// matching pattern accepts it.
    pub fn matches(&self, alias: &str) -> bool {
        let mut found = false;
        for pattern in &self.patterns {
            if pattern.is_match(alias) {
                if pattern.is_negated() {
                    return false;
                }
                found = true;
            }
        }
        found
    }

    /// Mutable access to the `Key value` lines of this block
    pub fn key_values_mut(&mut self) -> impl Iterator<Item = &mut KeyValue> {
        self.nodes.iter_mut().filter_map(|node| match node {
            Node::KeyValue(kv) => Some(kv),
            Node::Comment(_) | Node::Other(_) => None,
        })
    }

    fn lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.header
            .as_deref()
            .map(Cow::Borrowed)
            .into_iter()
            .chain(self.nodes.iter().map(Node::render))
    }
}

/// One line inside a host block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    KeyValue(KeyValue),
    Comment(Comment),
    /// Blank lines and directives kept verbatim, such as `Include`
    Other(String),
}

impl Node {
    /// Text of the line without its newline
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Node::KeyValue(kv) => kv.render(),
            Node::Comment(comment) => Cow::Borrowed(comment.raw.as_str()),
            Node::Other(raw) => Cow::Borrowed(raw.as_str()),
        }
    }
}

/// A full-line `#` comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    raw: String,
}

impl Comment {
    pub(crate) fn new(raw: String) -> Self {
        Self { raw }
    }

    /// Comment text after the `#`, trimmed
    pub fn text(&self) -> &str {
        self.raw
            .trim_start()
            .strip_prefix('#')
            .unwrap_or_default()
            .trim()
    }
}

/// A `Key value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    key: String,
    value: String,
    quoted: bool,
    indent: String,
    separator: String,
    /// Trailing whitespace, comment and line ending after the value
    trailing: String,
    /// Original line, dropped once the value changes
    raw: Option<String>,
}

impl KeyValue {
    pub(crate) fn parsed(
        raw: String,
        layout: KeyValueLayout,
        key: String,
        value: String,
        quoted: bool,
    ) -> Self {
        Self {
            key,
            value,
            quoted,
            indent: layout.indent,
            separator: layout.separator,
            trailing: layout.trailing,
            raw: Some(raw),
        }
    }

    /// Key as written in the file
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value with surrounding quotes removed
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Case-insensitive key comparison
    pub fn key_is(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }

    /// Replace the value, keeping indent, separator and trailing comment
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.raw = None;
    }

    fn needs_quotes(&self) -> bool {
        self.quoted || self.value.is_empty() || self.value.contains(char::is_whitespace)
    }

    fn render(&self) -> Cow<'_, str> {
        if let Some(raw) = &self.raw {
            return Cow::Borrowed(raw);
        }
        let value = if self.needs_quotes() {
            Cow::Owned(format!("\"{}\"", self.value))
        } else {
            Cow::Borrowed(self.value.as_str())
        };
        Cow::Owned(format!(
            "{}{}{}{}{}",
            self.indent, self.key, self.separator, value, self.trailing
        ))
    }
}

/// Whitespace and punctuation around a key/value pair
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyValueLayout {
    pub indent: String,
    pub separator: String,
    pub trailing: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::decode(text).unwrap()
    }

    #[test]
    fn test_implicit_block_is_wildcard_only() {
        let d = doc("User root\n");
        let first = &d.hosts()[0];
        assert!(first.is_implicit());
        assert!(first.is_wildcard_only());
    }

    #[test]
    fn test_explicit_star_block_is_wildcard_only() {
        let d = doc("Host *\n    ServerAliveInterval 60\n");
        assert!(d.hosts()[1].is_wildcard_only());
        assert!(!d.hosts()[1].is_implicit());
    }

    #[test]
    fn test_star_with_other_patterns_is_not_wildcard_only() {
        let d = doc("Host * !bastion\n    User ops\n");
        assert!(!d.hosts()[1].is_wildcard_only());
    }

    #[test]
    fn test_matches_any_positive_pattern() {
        let d = doc("Host web db\n    User ops\n");
        let block = &d.hosts()[1];
        assert!(block.matches("web"));
        assert!(block.matches("db"));
        assert!(!block.matches("cache"));
    }

    #[test]
    fn test_negated_pattern_rejects_block() {
        let d = doc("Host *.prod !bastion.prod\n    User ops\n");
        let block = &d.hosts()[1];
        assert!(block.matches("api.prod"));
        assert!(!block.matches("bastion.prod"));
    }

    #[test]
    fn test_set_value_keeps_layout() {
        let mut d = doc("Host box\n\tHostName = old.example.com  # temp\n");
        for kv in d.hosts_mut()[1].key_values_mut() {
            kv.set_value("1.2.3.4");
        }
        assert_eq!(d.marshal_text(), "Host box\n\tHostName = 1.2.3.4  # temp\n");
    }

    #[test]
    fn test_set_value_quotes_whitespace() {
        let mut d = doc("Host box\n    IdentityFile ~/.ssh/id\n");
        for kv in d.hosts_mut()[1].key_values_mut() {
            kv.set_value("~/my keys/id");
        }
        assert_eq!(
            d.marshal_text(),
            "Host box\n    IdentityFile \"~/my keys/id\"\n"
        );
    }

    #[test]
    fn test_set_value_preserves_original_quoting() {
        let mut d = doc("Host box\n    User \"deploy\"\n");
        for kv in d.hosts_mut()[1].key_values_mut() {
            kv.set_value("ubuntu");
        }
        assert_eq!(d.marshal_text(), "Host box\n    User \"ubuntu\"\n");
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let mut d = doc("Host a\n    HostName example.com\n");
        let kv = d.hosts_mut()[1].key_values_mut().next().unwrap();
        assert!(kv.key_is("hostname"));
        assert!(kv.key_is("HOSTNAME"));
        assert!(!kv.key_is("host"));
    }

    #[test]
    fn test_comment_text() {
        let d = doc("  # managed by deploy\nHost a\n    User b\n");
        match &d.hosts()[0].nodes()[0] {
            Node::Comment(c) => assert_eq!(c.text(), "managed by deploy"),
            other => panic!("expected comment, got {other:?}"),
        }
    }
}
