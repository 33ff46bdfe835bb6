//! On-demand scanner for TypeScript/TSX source.
//!
//! The scanner is stateless: the stripper asks for the token starting at a byte
//! offset and tells it whether a `/` there would begin a regular expression.
//! That keeps backtracking cheap (restoring a position is enough) and lets the
//! JSX parser switch to raw text scanning between tags.
//!
//! `>` is always produced as a single-character token so that nested type
//! argument lists (`Map<string, Array<number>>`) close one level at a time; the
//! expression parser glues `>>`, `>=`, `>>>=` back together where needed.

use super::error::StripError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    PrivateName,
    Number,
    String,
    /// Template literal without substitutions
    Template,
    /// `` `...${ ``
    TemplateHead,
    /// `` }...${ ``
    TemplateMiddle,
    /// `` }...` ``
    TemplateTail,
    Regex,
    Punct,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// A line terminator appears between the previous token and this one
    pub(crate) newline_before: bool,
}

const PUNCTUATORS_3: [&str; 8] = ["...", "===", "!==", "**=", "<<=", "&&=", "||=", "??="];

const PUNCTUATORS_2: [&str; 19] = [
    "=>", "==", "!=", "<=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "**", "++", "--", "<<",
    "&&", "||", "??",
];

const PUNCTUATORS_1: &[u8] = b"{}()[];,<>+-*/%&|^!~?:=.@#";

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

pub(crate) fn is_ident_part(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

pub(crate) struct Scanner<'src> {
    bytes: &'src [u8],
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            bytes: source.as_bytes(),
        }
    }

    fn at(&self, pos: usize) -> u8 {
        self.bytes.get(pos).copied().unwrap_or(0)
    }

    fn eof(&self, pos: usize) -> bool {
        pos >= self.bytes.len()
    }

    /// Skip whitespace and comments from `pos`.
    ///
    /// Returns the first significant offset and whether a line terminator was
    /// crossed on the way.
    pub(crate) fn skip_trivia(&self, mut pos: usize) -> Result<(usize, bool), StripError> {
        let mut newline = false;

        if pos == 0 && self.bytes.starts_with(b"#!") {
            while !self.eof(pos) && self.at(pos) != b'\n' {
                pos += 1;
            }
        }

        while !self.eof(pos) {
            match self.at(pos) {
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => pos += 1,
                b'\n' => {
                    newline = true;
                    pos += 1;
                }
                b'/' if self.at(pos + 1) == b'/' => {
                    while !self.eof(pos) && self.at(pos) != b'\n' {
                        pos += 1;
                    }
                }
                b'/' if self.at(pos + 1) == b'*' => {
                    let start = pos;
                    pos += 2;
                    loop {
                        if self.eof(pos) {
                            return Err(StripError::Unterminated {
                                pos: start,
                                what: "block comment",
                            });
                        }
                        if self.at(pos) == b'*' && self.at(pos + 1) == b'/' {
                            pos += 2;
                            break;
                        }
                        if self.at(pos) == b'\n' {
                            newline = true;
                        }
                        pos += 1;
                    }
                }
                // NBSP
                0xC2 if self.at(pos + 1) == 0xA0 => pos += 2,
                // BOM
                0xEF if self.at(pos + 1) == 0xBB && self.at(pos + 2) == 0xBF => pos += 3,
                // LS / PS
                0xE2 if self.at(pos + 1) == 0x80 && matches!(self.at(pos + 2), 0xA8 | 0xA9) => {
                    newline = true;
                    pos += 3;
                }
                _ => break,
            }
        }

        Ok((pos, newline))
    }

    /// Scan the token starting at or after `pos`.
    pub(crate) fn scan(&self, pos: usize, regex_allowed: bool) -> Result<Token, StripError> {
        let (start, newline_before) = self.skip_trivia(pos)?;
        let token = |kind, end| Token {
            kind,
            start,
            end,
            newline_before,
        };

        if self.eof(start) {
            return Ok(token(TokenKind::Eof, start));
        }

        let c = self.at(start);
        if is_ident_start(c) {
            return Ok(token(TokenKind::Ident, self.ident_end(start)));
        }
        if c == b'#' && is_ident_start(self.at(start + 1)) {
            return Ok(token(TokenKind::PrivateName, self.ident_end(start + 1)));
        }
        if c.is_ascii_digit() || (c == b'.' && self.at(start + 1).is_ascii_digit()) {
            return Ok(token(TokenKind::Number, self.number_end(start)));
        }

        match c {
            b'"' | b'\'' => Ok(token(TokenKind::String, self.string_end(start)?)),
            b'`' => {
                let (end, head) = self.template_end(start + 1, start)?;
                let kind = if head { TokenKind::TemplateHead } else { TokenKind::Template };
                Ok(token(kind, end))
            }
            b'/' if regex_allowed => Ok(token(TokenKind::Regex, self.regex_end(start)?)),
            _ => Ok(token(TokenKind::Punct, self.punct_end(start)?)),
        }
    }

    /// Rescan a `}` at `pos` as the continuation of a template literal.
    pub(crate) fn scan_template_continuation(&self, pos: usize) -> Result<Token, StripError> {
        let (end, head) = self.template_end(pos + 1, pos)?;
        Ok(Token {
            kind: if head { TokenKind::TemplateMiddle } else { TokenKind::TemplateTail },
            start: pos,
            end,
            newline_before: false,
        })
    }

    /// End of a run of JSX text starting at `pos`.
    pub(crate) fn jsx_text_end(&self, mut pos: usize) -> usize {
        while !self.eof(pos) && !matches!(self.at(pos), b'{' | b'<') {
            pos += 1;
        }
        pos
    }

    /// Scan a JSX tag or attribute name (`div`, `aria-label`, `Foo.Bar`, `xlink:href`).
    pub(crate) fn scan_jsx_name(&self, pos: usize) -> Result<Token, StripError> {
        let (start, newline_before) = self.skip_trivia(pos)?;
        if !is_ident_start(self.at(start)) {
            return Err(self.unexpected(start));
        }
        let mut end = start;
        while is_ident_part(self.at(end)) || matches!(self.at(end), b'-' | b'.' | b':') {
            end += 1;
        }
        Ok(Token {
            kind: TokenKind::Ident,
            start,
            end,
            newline_before,
        })
    }

    /// Scan a quoted JSX attribute value (no escape sequences).
    pub(crate) fn scan_jsx_string(&self, pos: usize) -> Result<Token, StripError> {
        let (start, newline_before) = self.skip_trivia(pos)?;
        let quote = self.at(start);
        if !matches!(quote, b'"' | b'\'') {
            return Err(self.unexpected(start));
        }
        let mut end = start + 1;
        while self.at(end) != quote {
            if self.eof(end) {
                return Err(StripError::Unterminated {
                    pos: start,
                    what: "JSX attribute",
                });
            }
            end += 1;
        }
        Ok(Token {
            kind: TokenKind::String,
            start,
            end: end + 1,
            newline_before,
        })
    }

    pub(crate) fn unexpected(&self, pos: usize) -> StripError {
        let found = if self.eof(pos) {
            "end of input".to_string()
        } else {
            String::from_utf8_lossy(&self.bytes[pos..(pos + 1).min(self.bytes.len())]).into_owned()
        };
        StripError::Unexpected {
            pos,
            found,
        }
    }

    fn ident_end(&self, mut pos: usize) -> usize {
        while is_ident_part(self.at(pos)) {
            pos += 1;
        }
        pos
    }

    fn number_end(&self, start: usize) -> usize {
        let mut pos = start;
        let digits = |mut p: usize| {
            while self.at(p).is_ascii_digit() || self.at(p) == b'_' {
                p += 1;
            }
            p
        };

        let radix_prefix = matches!(self.at(pos + 1), b'x' | b'X' | b'o' | b'O' | b'b' | b'B');
        if self.at(pos) == b'0' && radix_prefix {
            pos += 2;
            while self.at(pos).is_ascii_alphanumeric() || self.at(pos) == b'_' {
                pos += 1;
            }
            return pos;
        }

        pos = digits(pos);
        if self.at(pos) == b'.' {
            pos = digits(pos + 1);
        }
        if matches!(self.at(pos), b'e' | b'E') {
            let mut exp = pos + 1;
            if matches!(self.at(exp), b'+' | b'-') {
                exp += 1;
            }
            if self.at(exp).is_ascii_digit() {
                pos = digits(exp);
            }
        }
        if self.at(pos) == b'n' {
            pos += 1;
        }
        pos
    }

    fn string_end(&self, start: usize) -> Result<usize, StripError> {
        let quote = self.at(start);
        let mut pos = start + 1;
        loop {
            match self.at(pos) {
                _ if self.eof(pos) => break,
                b'\\' => pos += 2,
                b'\n' => break,
                c if c == quote => return Ok(pos + 1),
                _ => pos += 1,
            }
        }
        Err(StripError::Unterminated {
            pos: start,
            what: "string literal",
        })
    }

    /// Scan template characters from `pos`; returns the end offset and whether
    /// the scan stopped at a `${` substitution.
    fn template_end(&self, mut pos: usize, start: usize) -> Result<(usize, bool), StripError> {
        while !self.eof(pos) {
            match self.at(pos) {
                b'\\' => pos += 2,
                b'`' => return Ok((pos + 1, false)),
                b'$' if self.at(pos + 1) == b'{' => return Ok((pos + 2, true)),
                _ => pos += 1,
            }
        }
        Err(StripError::Unterminated {
            pos: start,
            what: "template literal",
        })
    }

    fn regex_end(&self, start: usize) -> Result<usize, StripError> {
        let mut pos = start + 1;
        let mut in_class = false;
        loop {
            if self.eof(pos) || self.at(pos) == b'\n' {
                return Err(StripError::Unterminated {
                    pos: start,
                    what: "regular expression",
                });
            }
            match self.at(pos) {
                b'\\' => pos += 2,
                b'[' => {
                    in_class = true;
                    pos += 1;
                }
                b']' => {
                    in_class = false;
                    pos += 1;
                }
                b'/' if !in_class => {
                    pos += 1;
                    break;
                }
                _ => pos += 1,
            }
        }
        Ok(self.ident_end(pos))
    }

    fn punct_end(&self, start: usize) -> Result<usize, StripError> {
        let rest = &self.bytes[start..];
        // `?.` followed by a digit is a conditional and a number (`a?.5:b`)
        if rest.starts_with(b"?.") && !self.at(start + 2).is_ascii_digit() {
            return Ok(start + 2);
        }
        if let Some(p) = PUNCTUATORS_3.iter().find(|p| rest.starts_with(p.as_bytes())) {
            return Ok(start + p.len());
        }
        if let Some(p) = PUNCTUATORS_2.iter().find(|p| rest.starts_with(p.as_bytes())) {
            return Ok(start + p.len());
        }
        if PUNCTUATORS_1.contains(&self.at(start)) {
            return Ok(start + 1);
        }
        Err(self.unexpected(start))
    }
}
