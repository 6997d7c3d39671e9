//! Streaming HTML to plain text conversion
//!
//! The converter makes a single left-to-right pass over the markup without
//! building a DOM. Tags are recognised and dropped, block-level tags turn into
//! line breaks, and the content of script-like elements is skipped.

/// Tags that inject a separator into the output when consumed
const BLOCK_TAGS: &[(&str, &str)] = &[
    ("address", "\n"),
    ("blockquote", "\n"),
    ("div", "\n"),
    ("dl", "\n"),
    ("fieldset", "\n"),
    ("form", "\n"),
    ("h1", "\n"),
    ("/h1", "\n"),
    ("h2", "\n"),
    ("/h2", "\n"),
    ("h3", "\n"),
    ("/h3", "\n"),
    ("h4", "\n"),
    ("/h4", "\n"),
    ("h5", "\n"),
    ("/h5", "\n"),
    ("h6", "\n"),
    ("/h6", "\n"),
    ("p", "\n"),
    ("/p", "\n"),
    ("table", "\n"),
    ("/table", "\n"),
    ("ul", "\n"),
    ("/ul", "\n"),
    ("ol", "\n"),
    ("/ol", "\n"),
    ("/li", "\n"),
    ("br", "\n"),
    ("/td", "\t"),
    ("/tr", "\n"),
    ("/pre", "\n"),
];

/// Elements whose whole content is dropped
const IGNORE_TAGS: &[&str] = &["script", "noscript", "style", "object"];

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn block_separator(tag: &str) -> Option<&'static str> {
    BLOCK_TAGS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, sep)| *sep)
}

fn ignore_tag(tag: &str) -> Option<&'static str> {
    IGNORE_TAGS.iter().copied().find(|name| *name == tag)
}

/// A tag consumed by the scanner
#[derive(Debug, PartialEq, Eq)]
struct Tag {
    /// Lowercased name, with a leading `/` for closing tags
    name: String,
    /// True for `<br/>`-style tags
    self_closing: bool,
}

/// Converts HTML markup into plain text
///
/// # Conversion Rules
///
/// - Comments (`<!-- ... -->`) are dropped
/// - `script`, `noscript`, `style` and `object` elements are dropped with all
///   their content, including nested elements of the same kind
/// - Text before `<body>` and after `</body>` is discarded
/// - Inside `<pre>` whitespace is copied verbatim; elsewhere every whitespace
///   character becomes a single space
/// - Every tag leaves a space behind; block-level tags additionally leave a
///   newline (a tab for `</td>`)
///
/// # Example
///
/// ```
/// use webindex::extract::HtmlToText;
///
/// let text = HtmlToText::new().convert("<p>keep</p><script>drop()</script>");
/// assert!(text.contains("keep"));
/// assert!(!text.contains("drop"));
/// ```
#[derive(Debug, Default)]
pub struct HtmlToText<'a> {
    html: &'a [u8],
    pos: usize,
    text: Vec<u8>,
    preformatted: bool,
}

impl<'a> HtmlToText<'a> {
    /// Creates a converter with an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts `html` to plain text
    ///
    /// The converter can be reused; every call starts from a clean state.
    pub fn convert(&mut self, html: &'a str) -> String {
        self.html = html.as_bytes();
        self.pos = 0;
        self.text = Vec::with_capacity(html.len() / 2);
        self.preformatted = false;

        while !self.at_end() {
            let ch = self.peek();
            if ch == b'<' {
                if self.starts_with(b"<!--") {
                    self.eat_comment();
                    self.text.push(b' ');
                    continue;
                }

                let tag = self.parse_tag();
                match tag.name.as_str() {
                    "body" => self.text.clear(),
                    "/body" => self.pos = self.html.len(),
                    "pre" => {
                        self.preformatted = true;
                        self.eat_whitespace_to_next_line();
                    }
                    "/pre" => self.preformatted = false,
                    _ => {}
                }

                self.text.push(b' ');
                if let Some(sep) = block_separator(&tag.name) {
                    self.text.extend_from_slice(sep.as_bytes());
                }

                if !tag.self_closing {
                    if let Some(name) = ignore_tag(&tag.name) {
                        self.eat_inner_content(name);
                    }
                }
            } else if is_whitespace(ch) {
                self.text.push(if self.preformatted { ch } else { b' ' });
                self.pos += 1;
            } else {
                self.text.push(ch);
                self.pos += 1;
            }
        }

        // Cuts only ever happen on ASCII bytes, so valid input stays valid
        match String::from_utf8(std::mem::take(&mut self.text)) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.html.len()
    }

    fn peek(&self) -> u8 {
        self.html.get(self.pos).copied().unwrap_or(0)
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.html[self.pos..].starts_with(prefix)
    }

    fn eat_whitespace(&mut self) {
        while !self.at_end() && is_whitespace(self.peek()) {
            self.pos += 1;
        }
    }

    fn eat_whitespace_to_next_line(&mut self) {
        while !self.at_end() && is_whitespace(self.peek()) {
            let ch = self.peek();
            self.pos += 1;
            if ch == b'\n' {
                break;
            }
        }
    }

    /// Skips past a quoted attribute value; an unterminated quote ends at the line break
    fn eat_quoted_value(&mut self) {
        let mark = self.peek();
        self.pos += 1;
        while !self.at_end() {
            let ch = self.peek();
            self.pos += 1;
            if ch == mark || ch == b'\r' || ch == b'\n' {
                break;
            }
        }
    }

    fn eat_comment(&mut self) {
        self.pos += 4;
        match find(&self.html[self.pos..], b"-->") {
            Some(offset) => self.pos += offset + 3,
            None => self.pos = self.html.len(),
        }
    }

    /// Consumes one tag starting at `<` and returns its lowercased name
    fn parse_tag(&mut self) -> Tag {
        self.pos += 1;
        self.eat_whitespace();

        let start = self.pos;
        if self.peek() == b'/' {
            self.pos += 1;
        }
        while !self.at_end() {
            let ch = self.peek();
            if is_whitespace(ch) || ch == b'/' || ch == b'>' {
                break;
            }
            self.pos += 1;
        }
        let name = String::from_utf8_lossy(&self.html[start..self.pos]).to_ascii_lowercase();

        let mut last = 0u8;
        while !self.at_end() && self.peek() != b'>' {
            let ch = self.peek();
            if ch == b'"' || ch == b'\'' {
                self.eat_quoted_value();
                last = ch;
            } else {
                self.pos += 1;
                if !is_whitespace(ch) {
                    last = ch;
                }
            }
        }
        if !self.at_end() {
            self.pos += 1;
        }

        Tag {
            name,
            self_closing: last == b'/',
        }
    }

    /// Skips everything up to the close of the ignored element `tag`
    ///
    /// Content is scanned as raw text, so markup-looking fragments inside a
    /// script cannot end the element early. Opening tags of ignored elements
    /// are pushed on an explicit stack and each needs its own closing tag.
    fn eat_inner_content(&mut self, tag: &'static str) {
        let html = self.html;
        let mut open: Vec<&'static str> = vec![tag];

        while !open.is_empty() {
            let Some(offset) = html[self.pos..].iter().position(|&b| b == b'<') else {
                self.pos = html.len();
                return;
            };
            self.pos += offset;

            let rest = &html[self.pos + 1..];
            if let Some(closing) = rest.strip_prefix(b"/") {
                if let Some(depth) = open.iter().rposition(|name| tag_name_at(closing, name)) {
                    self.parse_tag();
                    open.truncate(depth);
                    continue;
                }
            } else if let Some(name) = IGNORE_TAGS.iter().copied().find(|name| tag_name_at(rest, name)) {
                if !self.parse_tag().self_closing {
                    open.push(name);
                }
                continue;
            }

            self.pos += 1;
        }
    }
}

/// True when `bytes` starts with the tag `name` followed by a name terminator
fn tag_name_at(bytes: &[u8], name: &str) -> bool {
    let name = name.as_bytes();
    if bytes.len() < name.len() || !bytes[..name.len()].eq_ignore_ascii_case(name) {
        return false;
    }
    match bytes.get(name.len()) {
        None => true,
        Some(&b) => is_whitespace(b) || b == b'>' || b == b'/',
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
