//! Lowering of `enum` declarations to the object-building IIFE that `tsc`
//! emits, so the runtime value keeps both the forward and the reverse mapping.

use super::lexer::{Scanner, TokenKind};
use super::strip::{Result, Stripper};

#[derive(Debug)]
struct EnumMember {
    key: String,
    initializer: Option<Initializer>,
}

#[derive(Debug)]
enum Initializer {
    Number(f64),
    String(String),
    Computed(String),
}

impl Stripper<'_> {
    /// Replace the enum declaration starting at `start` (at `export`, `const`
    /// or `enum`) with its runtime form. The current token is `enum`.
    pub(super) fn lower_enum(&mut self, start: usize, exported: bool) -> Result<()> {
        self.expect_keyword("enum")?;
        let name_token = self.expect_ident()?;
        let name = self.text(name_token);
        self.expect_punct("{")?;

        let mut members = Vec::new();
        while !self.is_punct("}") {
            members.push(self.parse_enum_member()?);
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.expect_punct("}")?;

        let names: Vec<String> = members.iter().map(|m| m.key.clone()).collect();
        for member in &mut members {
            if let Some(Initializer::Computed(expr)) = &mut member.initializer {
                match qualify_members(expr, name, &names) {
                    Some(qualified) => *expr = qualified,
                    None => return Err(self.unsupported("enum member reference")),
                }
            }
        }

        let lines = self.enum_assignments(name, &members)?;
        let indent = line_indent(self.src, start);
        let export = if exported { "export " } else { "" };

        let mut out = format!("{export}var {name};\n{indent}(function ({name}) {{\n");
        for line in lines {
            out.push_str(&format!("{indent}    {line}\n"));
        }
        out.push_str(&format!("{indent}}})({name} || ({name} = {{}}));"));

        self.eat_semicolon()?;
        self.edits.replace_statement(start, self.prev_end, out);
        Ok(())
    }

    fn parse_enum_member(&mut self) -> Result<EnumMember> {
        let key = match self.tok.kind {
            TokenKind::Ident => self.tok_text().to_string(),
            TokenKind::String => {
                let raw = self.tok_text();
                let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
                if raw.starts_with('\'') && inner.contains('"') {
                    return Err(self.unsupported("enum member name"));
                }
                inner.to_string()
            }
            _ => return Err(self.unexpected()),
        };
        self.bump()?;

        if !self.eat_punct("=")? {
            return Ok(EnumMember {
                key,
                initializer: None,
            });
        }

        let first = self.tok;
        let from = first.start;
        self.with_context(false, false, |p| p.parse_assignment())?;
        if self.edits.any_within(from, self.prev_end) {
            return Err(self.unsupported("enum initializer with type syntax"));
        }

        let text = self.src.get(from..self.prev_end).unwrap_or_default().trim();
        let single_token = self.prev_end == first.end;
        let initializer = if let Some(value) = parse_numeric(text) {
            Initializer::Number(value)
        } else if single_token && matches!(first.kind, TokenKind::String | TokenKind::Template) {
            Initializer::String(text.to_string())
        } else {
            Initializer::Computed(text.to_string())
        };

        Ok(EnumMember {
            key,
            initializer: Some(initializer),
        })
    }

    fn enum_assignments(&self, name: &str, members: &[EnumMember]) -> Result<Vec<String>> {
        let mut next = Some(0.0_f64);
        let mut lines = Vec::with_capacity(members.len());
        for member in members {
            let key = format!("\"{}\"", member.key);
            match &member.initializer {
                None => {
                    let Some(value) = next else {
                        return Err(self.unsupported("enum member without initializer"));
                    };
                    let value_text = format_number(value);
                    lines.push(format!("{name}[{name}[{key}] = {value_text}] = {key};"));
                    next = Some(value + 1.0);
                }
                Some(Initializer::Number(value)) => {
                    let value_text = format_number(*value);
                    lines.push(format!("{name}[{name}[{key}] = {value_text}] = {key};"));
                    next = Some(value + 1.0);
                }
                Some(Initializer::String(text)) => {
                    lines.push(format!("{name}[{key}] = {text};"));
                    next = None;
                }
                Some(Initializer::Computed(expr)) => {
                    lines.push(format!("{name}[{name}[{key}] = {expr}] = {key};"));
                    next = None;
                }
            }
        }
        Ok(lines)
    }
}

/// Numeric literal, optionally negated: `3`, `-1`, `0x1F`, `1_000`, `2.5e3`.
fn parse_numeric(text: &str) -> Option<f64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let digits = digits.replace('_', "");
    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let radix = match digits.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    let value = match radix {
        Some(radix) => i64::from_str_radix(&digits[2..], radix).ok()? as f64,
        None => digits.parse::<f64>().ok()?,
    };
    Some(if negative { -value } else { value })
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Rewrite bare references to sibling members in `expr` as property reads on
/// the enum object (`A | B` becomes `Flags.A | Flags.B`).
///
/// Template substitutions are not rescanned, so a member named inside one
/// yields `None`.
fn qualify_members(expr: &str, enum_name: &str, names: &[String]) -> Option<String> {
    let scanner = Scanner::new(expr);
    let mut out = String::with_capacity(expr.len());
    let mut cursor = 0;
    let mut after_dot = false;
    let mut pos = 0;
    loop {
        let token = match scanner.scan(pos, false) {
            Ok(token) if token.kind != TokenKind::TemplateHead => token,
            _ => {
                let rest = expr.get(pos..)?;
                if names.iter().any(|n| rest.contains(n.as_str())) {
                    return None;
                }
                break;
            }
        };
        let text = expr.get(token.start..token.end)?;
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Ident if !after_dot && names.iter().any(|n| n == text) => {
                out.push_str(expr.get(cursor..token.start)?);
                out.push_str(&format!("{enum_name}.{text}"));
                cursor = token.end;
            }
            _ => {}
        }
        after_dot = token.kind == TokenKind::Punct && matches!(text, "." | "?.");
        pos = token.end;
    }
    out.push_str(expr.get(cursor..)?);
    Some(out)
}

fn line_indent(source: &str, pos: usize) -> &str {
    let before = source.get(..pos).unwrap_or_default();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let prefix = before.get(line_start..).unwrap_or_default();
    if prefix.trim().is_empty() { prefix } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("3"), Some(3.0));
        assert_eq!(parse_numeric("-1"), Some(-1.0));
        assert_eq!(parse_numeric("0x1F"), Some(31.0));
        assert_eq!(parse_numeric("1_000"), Some(1000.0));
        assert_eq!(parse_numeric("2.5"), Some(2.5));
        assert_eq!(parse_numeric("1 << 2"), None);
        assert_eq!(parse_numeric("\"a\""), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_qualify_members() {
        let names = vec!["A".to_string(), "B".to_string()];
        assert_eq!(qualify_members("A | B", "E", &names).as_deref(), Some("E.A | E.B"));
        assert_eq!(qualify_members("1 << 2", "E", &names).as_deref(), Some("1 << 2"));
        assert_eq!(qualify_members("\"A\".length", "E", &names).as_deref(), Some("\"A\".length"));
        assert_eq!(qualify_members("other.A + B", "E", &names).as_deref(), Some("other.A + E.B"));
        assert_eq!(qualify_members("A + `${x}`", "E", &names).as_deref(), Some("E.A + `${x}`"));
        assert_eq!(qualify_members("`${A}`", "E", &names), None);
    }
}
