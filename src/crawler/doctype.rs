//! Doctype sniffing over raw markup
//!
//! The DOM tree does not keep the literal `<!DOCTYPE ...>` text, so the
//! declaration is recovered from a lightweight token scan of the markup before
//! it is parsed. The scan is lazy and stops at the first doctype token.

/// Raw-text elements whose content is never tokenized as markup
const RAW_TEXT_ELEMENTS: &[(&str, &str)] = &[("script", "</script"), ("style", "</style")];

/// A markup token. Only doctypes carry their raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Doctype(&'a str),
    Comment,
    StartTag(&'a str),
    EndTag,
    Text,
}

/// Lazy tokenizer over a markup string
///
/// Iteration ends when the markup is exhausted or a token is malformed
/// beyond recovery (an unterminated doctype).
pub struct Tokens<'a> {
    rest: &'a str,
    raw_text_close: Option<&'static str>,
}

impl<'a> Tokens<'a> {
    pub fn new(markup: &'a str) -> Self {
        Self {
            rest: markup,
            raw_text_close: None,
        }
    }

    fn advance(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes.min(self.rest.len())..];
    }

    /// Skips to just past the next `>` at or after `from`
    fn skip_past_gt(&mut self, from: usize) {
        match self.rest[from..].find('>') {
            Some(i) => self.advance(from + i + 1),
            None => self.rest = "",
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        if let Some(close) = self.raw_text_close.take() {
            match find_ignore_case(self.rest, close) {
                Some(0) => {}
                Some(i) => {
                    self.advance(i);
                    return Some(Token::Text);
                }
                None => {
                    self.rest = "";
                    return Some(Token::Text);
                }
            }
        }

        let rest = self.rest;

        if !rest.starts_with('<') {
            match rest.find('<') {
                Some(i) => self.advance(i),
                None => self.rest = "",
            }
            return Some(Token::Text);
        }

        if rest.starts_with("<!--") {
            match rest[4..].find("-->") {
                Some(i) => self.advance(4 + i + 3),
                None => self.rest = "",
            }
            return Some(Token::Comment);
        }

        if starts_with_ignore_case(rest, "<!doctype") {
            let end = rest.find('>')?;
            self.advance(end + 1);
            return Some(Token::Doctype(&rest[..=end]));
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            self.skip_past_gt(2);
            return Some(Token::Comment);
        }

        if rest.starts_with("</") {
            self.skip_past_gt(2);
            return Some(Token::EndTag);
        }

        if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let name_end = rest[1..]
                .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
                .map(|i| i + 1)
                .unwrap_or(rest.len());
            let name = &rest[1..name_end];

            self.raw_text_close = RAW_TEXT_ELEMENTS
                .iter()
                .find(|(element, _)| element.eq_ignore_ascii_case(name))
                .map(|(_, close)| *close);

            self.skip_past_gt(name_end);
            return Some(Token::StartTag(name));
        }

        // A stray '<' is plain text
        match rest[1..].find('<') {
            Some(i) => self.advance(i + 1),
            None => self.rest = "",
        }
        Some(Token::Text)
    }
}

/// Returns the literal doctype declaration, or an empty string if the
/// markup ends (or a token is malformed) before one is seen
///
/// # Example
///
/// ```
/// use pagemeta::crawler::sniff_doctype;
///
/// let markup = "<!-- banner -->\n<!DOCTYPE html><html></html>";
/// assert_eq!(sniff_doctype(markup), "<!DOCTYPE html>");
/// assert_eq!(sniff_doctype("<html></html>"), "");
/// ```
pub fn sniff_doctype(markup: &str) -> String {
    Tokens::new(markup)
        .find_map(|token| match token {
            Token::Doctype(raw) => Some(raw.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Offset of the first case-insensitive match of a `<`-prefixed ASCII needle
///
/// Only `<` positions are compared, so no copy of the haystack is made.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .match_indices('<')
        .map(|(i, _)| i)
        .find(|&i| starts_with_ignore_case(&haystack[i..], needle))
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
