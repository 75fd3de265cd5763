//! Markup tokenizer for server-rendered pages and response fragments.
//!
//! This is deliberately not an HTML5 state machine. It covers what template
//! engines emit: start/end tags with quoted, unquoted or valueless attributes,
//! comments, a doctype, raw text inside `<script>`/`<style>` and entity-decoded
//! text inside `<textarea>`/`<title>`.
//!
//! Tag and attribute names are lowercased and interned so repeated names share
//! one allocation.
use crate::entities::decode_entities;
use crate::types::{Attribute, Token, is_raw_text_element};
use memchr::memchr;
use std::collections::HashMap;
use std::sync::Arc;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

#[derive(Default)]
struct AtomTable {
    atoms: HashMap<String, Arc<str>>,
}

impl AtomTable {
    fn intern(&mut self, name: &str) -> Arc<str> {
        let lower = name.to_ascii_lowercase();
        if let Some(atom) = self.atoms.get(&lower) {
            return Arc::clone(atom);
        }
        let atom: Arc<str> = Arc::from(lower.as_str());
        self.atoms.insert(lower, Arc::clone(&atom));
        atom
    }
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        out: Vec::new(),
        atoms: AtomTable::default(),
    };
    tokenizer.run();
    log::trace!(target: "dom.tokenizer", "{} tokens from {} bytes", tokenizer.out.len(), input.len());
    tokenizer.out
}

struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: Vec<Token>,
    atoms: AtomTable,
}

// Slices are only cut at ASCII structural bytes, which are always UTF-8 boundaries.
impl<'a> Tokenizer<'a> {
    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] != b'<' {
                self.text();
                continue;
            }
            if self.input[self.pos..].starts_with(COMMENT_START) {
                self.comment();
            } else if starts_with_ignore_ascii_case_at(self.bytes, self.pos, b"<!doctype") {
                self.doctype();
            } else if self.bytes.get(self.pos + 1) == Some(&b'/') {
                self.end_tag();
            } else if self
                .bytes
                .get(self.pos + 1)
                .is_some_and(|b| b.is_ascii_alphabetic())
            {
                self.start_tag();
            } else {
                // A lone `<` is text.
                self.push_text("<");
                self.pos += 1;
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.out.last_mut() {
            Some(Token::Text(existing)) => existing.push_str(text),
            _ => self.out.push(Token::Text(text.to_string())),
        }
    }

    fn text(&mut self) {
        let start = self.pos;
        let end = memchr(b'<', &self.bytes[start..])
            .map(|rel| start + rel)
            .unwrap_or(self.bytes.len());
        let decoded = decode_entities(&self.input[start..end]);
        self.push_text(&decoded);
        self.pos = end;
    }

    fn comment(&mut self) {
        let body_start = self.pos + COMMENT_START.len();
        match self.input[body_start..].find(COMMENT_END) {
            Some(len) => {
                let body = &self.input[body_start..body_start + len];
                self.out.push(Token::Comment(body.to_string()));
                self.pos = body_start + len + COMMENT_END.len();
            }
            None => {
                self.out
                    .push(Token::Comment(self.input[body_start..].to_string()));
                self.pos = self.bytes.len();
            }
        }
    }

    fn doctype(&mut self) {
        let body_start = self.pos + "<!doctype".len();
        let end = self.find_byte(b'>', body_start);
        let body = self.input[body_start..end].trim();
        self.out.push(Token::Doctype(body.to_string()));
        self.pos = (end + 1).min(self.bytes.len());
    }

    fn end_tag(&mut self) {
        let name_start = self.pos + 2;
        let name_end = self.scan_name(name_start);
        let end = self.find_byte(b'>', name_end);
        if name_end > name_start {
            let name = self.atoms.intern(&self.input[name_start..name_end]);
            self.out.push(Token::EndTag(name));
        } else {
            log::trace!(target: "dom.tokenizer", "dropping nameless end tag at byte {}", self.pos);
        }
        self.pos = (end + 1).min(self.bytes.len());
    }

    fn start_tag(&mut self) {
        let name_start = self.pos + 1;
        let name_end = self.scan_name(name_start);
        let name = self.atoms.intern(&self.input[name_start..name_end]);
        self.pos = name_end;

        let mut attributes: Vec<Attribute> = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let Some(&b) = self.bytes.get(self.pos) else {
                break;
            };
            match b {
                b'>' => {
                    self.pos += 1;
                    break;
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self_closing = true;
                    self.pos += 2;
                    break;
                }
                b'/' => self.pos += 1,
                _ => {
                    let attr_start = self.pos;
                    let attr_end = self.scan_attr_name(attr_start);
                    if attr_end == attr_start {
                        // Stray quote or `=`; skip it.
                        self.pos += 1;
                        continue;
                    }
                    let attr_name = self.atoms.intern(&self.input[attr_start..attr_end]);
                    self.pos = attr_end;
                    self.skip_whitespace();
                    let value = if self.bytes.get(self.pos) == Some(&b'=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        Some(self.attr_value())
                    } else {
                        None
                    };
                    attributes.push((attr_name, value));
                }
            }
        }

        let body_kind = (!self_closing).then(|| name.to_string());
        self.out.push(Token::StartTag {
            name: Arc::clone(&name),
            attributes,
            self_closing,
        });

        match body_kind.as_deref() {
            Some(tag) if is_raw_text_element(tag) => self.text_until_close(&name, false),
            Some("textarea" | "title") => self.text_until_close(&name, true),
            _ => {}
        }
    }

    /// Consume everything up to `</name>` as a single text token.
    fn text_until_close(&mut self, name: &Arc<str>, decode: bool) {
        let start = self.pos;
        let (text_end, resume) = self
            .find_close_tag(start, name)
            .unwrap_or((self.bytes.len(), self.bytes.len()));
        let input = self.input;
        let raw = &input[start..text_end];
        if decode {
            let decoded = decode_entities(raw);
            self.push_text(&decoded);
        } else {
            self.push_text(raw);
        }
        if resume > text_end {
            self.out.push(Token::EndTag(Arc::clone(name)));
        }
        self.pos = resume;
    }

    fn find_close_tag(&self, from: usize, name: &str) -> Option<(usize, usize)> {
        let mut i = from;
        while i < self.bytes.len() {
            i += memchr(b'<', &self.bytes[i..])?;
            if self.bytes.get(i + 1) == Some(&b'/')
                && starts_with_ignore_ascii_case_at(self.bytes, i + 2, name.as_bytes())
            {
                let mut k = i + 2 + name.len();
                while k < self.bytes.len() && self.bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                if self.bytes.get(k) == Some(&b'>') {
                    return Some((i, k + 1));
                }
            }
            i += 1;
        }
        None
    }

    fn attr_value(&mut self) -> String {
        match self.bytes.get(self.pos) {
            Some(&(quote @ (b'"' | b'\''))) => {
                let start = self.pos + 1;
                let end = memchr(quote, &self.bytes[start..])
                    .map(|rel| start + rel)
                    .unwrap_or(self.bytes.len());
                self.pos = (end + 1).min(self.bytes.len());
                decode_entities(&self.input[start..end])
            }
            _ => {
                let start = self.pos;
                let mut end = start;
                while end < self.bytes.len()
                    && !self.bytes[end].is_ascii_whitespace()
                    && self.bytes[end] != b'>'
                {
                    end += 1;
                }
                self.pos = end;
                decode_entities(&self.input[start..end])
            }
        }
    }

    fn scan_name(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.bytes.len() {
            let b = self.bytes[i];
            if b.is_ascii_whitespace() || b == b'/' || b == b'>' {
                break;
            }
            i += 1;
        }
        i
    }

    fn scan_attr_name(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.bytes.len() {
            let b = self.bytes[i];
            if b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'') {
                break;
            }
            i += 1;
        }
        i
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Position of `needle` at or after `from`, or the input length.
    fn find_byte(&self, needle: u8, from: usize) -> usize {
        let from = from.min(self.bytes.len());
        memchr(needle, &self.bytes[from..])
            .map(|rel| from + rel)
            .unwrap_or(self.bytes.len())
    }
}
