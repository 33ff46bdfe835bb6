//! Expressions, functions, classes and binding patterns.
//!
//! Operator precedence is irrelevant for stripping, so binary and assignment
//! operators are walked as a flat operand/operator sequence. Ambiguities that do
//! matter (arrow functions vs. parenthesized expressions, generic calls vs.
//! comparisons) are resolved by parsing speculatively and rolling back.

use super::lexer::TokenKind;
use super::strip::{Result, Stripper, is_ts_access_modifier};

const BINARY_OPERATORS: [&str; 19] = [
    "+", "-", "*", "/", "%", "**", "==", "!=", "===", "!==", "<", "<=", "<<", "&", "|", "^", "&&",
    "||", "??",
];

const ASSIGNMENT_OPERATORS: [&str; 14] =
    ["=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", "&=", "|=", "^=", "&&=", "||=", "??="];

enum ArrowHead {
    Arrow {
        typed_return: bool,
    },
    NotArrow,
}

impl Stripper<'_> {
    pub(super) fn parse_expression(&mut self) -> Result<()> {
        self.parse_assignment()?;
        while self.eat_punct(",")? {
            self.parse_assignment()?;
        }
        Ok(())
    }

    pub(super) fn parse_assignment(&mut self) -> Result<()> {
        self.guarded(|p| p.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> Result<()> {
        if self.try_arrow_function()? {
            return Ok(());
        }

        if self.is_ident("yield") {
            self.bump()?;
            self.eat_punct("*")?;
            if !self.at_expression_end() {
                self.parse_assignment()?;
            }
            return Ok(());
        }

        self.parse_unary()?;
        loop {
            match self.tok.kind {
                TokenKind::Punct => {
                    let op = self.tok_text();
                    if op == "?" {
                        self.bump()?;
                        let no_in = self.no_in;
                        self.with_context(false, true, |p| p.parse_assignment())?;
                        self.expect_punct(":")?;
                        return self.with_context(no_in, false, |p| p.parse_assignment());
                    }
                    if op == ">" {
                        if self.bump_greater_operator()? {
                            return self.parse_assignment();
                        }
                        self.parse_unary()?;
                    } else if ASSIGNMENT_OPERATORS.contains(&op) {
                        self.bump()?;
                        return self.parse_assignment();
                    } else if BINARY_OPERATORS.contains(&op) {
                        self.bump()?;
                        self.parse_unary()?;
                    } else {
                        return Ok(());
                    }
                }
                TokenKind::Ident => match self.tok_text() {
                    "as" | "satisfies" if !self.tok.newline_before => {
                        let from = self.prev_end;
                        self.bump()?;
                        self.skip_type()?;
                        self.edits.remove(from, self.prev_end);
                    }
                    "instanceof" => {
                        self.bump()?;
                        self.parse_unary()?;
                    }
                    "in" if !self.no_in => {
                        self.bump()?;
                        self.parse_unary()?;
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    /// Consume `>` plus any directly adjacent `>`/`=` that form one operator.
    /// Returns whether the operator is an assignment (`>>=`, `>>>=`).
    fn bump_greater_operator(&mut self) -> Result<bool> {
        self.bump()?;
        let mut count = 1;
        while count < 3 && self.is_punct(">") && self.tok.start == self.prev_end {
            self.bump()?;
            count += 1;
        }
        if self.is_punct("=") && self.tok.start == self.prev_end {
            self.bump()?;
            return Ok(count > 1);
        }
        Ok(false)
    }

    fn parse_unary(&mut self) -> Result<()> {
        self.guarded(|p| {
            match p.tok.kind {
                TokenKind::Punct
                    if ["!", "~", "+", "-", "++", "--"].iter().any(|op| p.is_punct(op)) =>
                {
                    p.bump()?;
                    return p.parse_unary();
                }
                TokenKind::Ident => match p.tok_text() {
                    "typeof" | "void" | "delete" | "await" => {
                        p.bump()?;
                        return p.parse_unary();
                    }
                    "new" => {
                        p.bump()?;
                        if p.eat_punct(".")? {
                            p.expect_ident()?;
                            return p.parse_postfix_operators();
                        }
                        return p.parse_unary();
                    }
                    _ => {}
                },
                _ => {}
            }
            p.parse_postfix_expression()
        })
    }

    pub(super) fn parse_postfix_expression(&mut self) -> Result<()> {
        self.parse_primary()?;
        self.parse_postfix_operators()
    }

    fn parse_postfix_operators(&mut self) -> Result<()> {
        loop {
            match self.tok.kind {
                TokenKind::Punct => match self.tok_text() {
                    "." => {
                        self.bump()?;
                        self.expect_member_name()?;
                    }
                    "?." => {
                        self.bump()?;
                        if self.is_punct("(") {
                            self.parse_arguments()?;
                        } else if self.is_punct("[") {
                            self.parse_index()?;
                        } else {
                            self.expect_member_name()?;
                        }
                    }
                    "[" => self.parse_index()?,
                    "(" => self.parse_arguments()?,
                    "!" if !self.tok.newline_before => {
                        let bang = self.bump()?;
                        self.edits.remove(bang.start, bang.end);
                    }
                    "++" | "--" if !self.tok.newline_before => {
                        self.bump()?;
                    }
                    "<" => {
                        if !self.try_call_type_arguments()? {
                            return Ok(());
                        }
                    }
                    _ => return Ok(()),
                },
                TokenKind::Template => {
                    self.bump()?;
                }
                TokenKind::TemplateHead => self.parse_template()?,
                _ => return Ok(()),
            }
        }
    }

    fn expect_member_name(&mut self) -> Result<()> {
        match self.tok.kind {
            TokenKind::Ident | TokenKind::PrivateName => self.bump().map(|_| ()),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_index(&mut self) -> Result<()> {
        self.expect_punct("[")?;
        self.with_context(false, false, |p| p.parse_expression())?;
        self.expect_punct("]")?;
        Ok(())
    }

    fn parse_arguments(&mut self) -> Result<()> {
        self.expect_punct("(")?;
        self.with_context(false, false, |p| {
            while !p.is_punct(")") {
                p.eat_punct("...")?;
                p.parse_assignment()?;
                if !p.eat_punct(",")? {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect_punct(")")?;
        Ok(())
    }

    /// `f<T>(x)` and ``tag<T>`...` ``; anything else rolls back to a comparison.
    fn try_call_type_arguments(&mut self) -> Result<bool> {
        let snapshot = self.snapshot();
        let from = self.tok.start;
        if self.skip_type_arguments().is_ok()
            && (self.is_punct("(")
                || matches!(self.tok.kind, TokenKind::Template | TokenKind::TemplateHead))
        {
            self.edits.remove(from, self.prev_end);
            return Ok(true);
        }
        self.restore(snapshot);
        Ok(false)
    }

    pub(super) fn parse_template(&mut self) -> Result<()> {
        loop {
            self.bump()?;
            self.with_context(false, false, |p| p.parse_expression())?;
            if !self.is_punct("}") {
                return Err(self.unexpected());
            }
            self.tok = self.scanner.scan_template_continuation(self.tok.start)?;
            if self.tok.kind == TokenKind::TemplateTail {
                self.bump()?;
                return Ok(());
            }
        }
    }

    fn parse_primary(&mut self) -> Result<()> {
        match self.tok.kind {
            TokenKind::Ident => self.parse_identifier_expression(),
            TokenKind::Number
            | TokenKind::String
            | TokenKind::Template
            | TokenKind::Regex
            | TokenKind::PrivateName => self.bump().map(|_| ()),
            TokenKind::TemplateHead => self.parse_template(),
            TokenKind::Punct => match self.tok_text() {
                "(" => {
                    self.bump()?;
                    self.with_context(false, false, |p| p.parse_expression())?;
                    self.expect_punct(")")?;
                    Ok(())
                }
                "[" => self.parse_array_literal(),
                "{" => self.parse_object_literal(),
                "<" => self.parse_angle_expression(),
                "@" => {
                    while self.is_punct("@") {
                        self.parse_decorator()?;
                    }
                    self.parse_class()
                }
                _ => Err(self.unexpected()),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn parse_identifier_expression(&mut self) -> Result<()> {
        match self.tok_text() {
            "function" => {
                self.bump()?;
                if self.parse_function_rest()? { Ok(()) } else { Err(self.unexpected()) }
            }
            "class" => self.parse_class(),
            "async" => {
                let next = self.peek()?;
                self.bump()?;
                if self.token_is(next, "function") && !next.newline_before {
                    self.bump()?;
                    if !self.parse_function_rest()? {
                        return Err(self.unexpected());
                    }
                }
                Ok(())
            }
            _ => self.bump().map(|_| ()),
        }
    }

    /// `<` in operand position: JSX first, then a generic arrow function.
    fn parse_angle_expression(&mut self) -> Result<()> {
        let snapshot = self.snapshot();
        let jsx_error = match self.parse_jsx() {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        self.restore(snapshot);

        match self.parse_arrow_head(false) {
            Ok(ArrowHead::Arrow {
                ..
            }) => self.parse_arrow_body(),
            _ => {
                self.restore(snapshot);
                Err(jsx_error)
            }
        }
    }

    fn parse_array_literal(&mut self) -> Result<()> {
        self.expect_punct("[")?;
        self.with_context(false, false, |p| {
            while !p.is_punct("]") {
                if p.eat_punct(",")? {
                    continue;
                }
                p.eat_punct("...")?;
                p.parse_assignment()?;
                if !p.eat_punct(",")? {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect_punct("]")?;
        Ok(())
    }

    fn parse_object_literal(&mut self) -> Result<()> {
        self.expect_punct("{")?;
        self.with_context(false, false, |p| {
            while !p.is_punct("}") {
                if p.eat_punct("...")? {
                    p.parse_assignment()?;
                } else {
                    p.parse_object_member()?;
                }
                if !p.eat_punct(",")? {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect_punct("}")?;
        Ok(())
    }

    fn parse_object_member(&mut self) -> Result<()> {
        if matches!(self.tok_text(), "get" | "set" | "async") && self.tok.kind == TokenKind::Ident {
            let next = self.peek()?;
            let starts_name = matches!(
                next.kind,
                TokenKind::Ident | TokenKind::String | TokenKind::Number | TokenKind::PrivateName
            ) || self.token_is(next, "[")
                || self.token_is(next, "*");
            if starts_name && !(self.is_ident("async") && next.newline_before) {
                self.bump()?;
            }
        }
        self.eat_punct("*")?;
        self.parse_property_name()?;

        if self.is_punct("(") || self.is_punct("<") {
            self.parse_signature()?;
            return self.parse_function_body();
        }
        if self.eat_punct(":")? || self.eat_punct("=")? {
            return self.parse_assignment();
        }
        Ok(())
    }

    fn parse_property_name(&mut self) -> Result<()> {
        match self.tok.kind {
            TokenKind::Ident | TokenKind::String | TokenKind::Number | TokenKind::PrivateName => {
                self.bump().map(|_| ())
            }
            TokenKind::Punct if self.is_punct("[") => {
                self.bump()?;
                self.with_context(false, false, |p| p.parse_assignment())?;
                self.expect_punct("]")?;
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    pub(super) fn parse_decorator(&mut self) -> Result<()> {
        self.expect_punct("@")?;
        self.parse_postfix_expression()
    }

    // ---- arrow functions ----

    fn try_arrow_function(&mut self) -> Result<bool> {
        let is_async = self.is_ident("async") && {
            let next = self.peek()?;
            !next.newline_before
                && ((next.kind == TokenKind::Ident && self.text(next) != "function")
                    || self.token_is(next, "(")
                    || self.token_is(next, "<"))
        };
        let head = if is_async { self.peek()? } else { self.tok };

        match head.kind {
            TokenKind::Ident => {
                let arrow = self.peek_nth(if is_async { 2 } else { 1 })?;
                if !self.token_is(arrow, "=>") || arrow.newline_before {
                    return Ok(false);
                }
                if is_async {
                    self.bump()?;
                }
                self.bump()?;
                self.parse_arrow_body()?;
                Ok(true)
            }
            TokenKind::Punct if self.token_is(head, "(") => self.speculate_arrow(is_async),
            TokenKind::Punct if self.token_is(head, "<") => {
                // `<T,>` or `<T extends U>`; a bare `<T>` is a JSX tag
                let offset = if is_async { 1 } else { 0 };
                let mut first = self.peek_nth(offset + 1)?;
                let mut lookahead = offset + 2;
                if first.kind == TokenKind::Ident && self.text(first) == "const" {
                    first = self.peek_nth(offset + 2)?;
                    lookahead += 1;
                }
                let second = self.peek_nth(lookahead)?;
                if first.kind == TokenKind::Ident
                    && (self.token_is(second, ",") || self.token_is(second, "extends"))
                {
                    self.speculate_arrow(is_async)
                } else {
                    Ok(false)
                }
            }
            _ => Ok(false),
        }
    }

    fn speculate_arrow(&mut self, is_async: bool) -> Result<bool> {
        let snapshot = self.snapshot();
        match self.parse_arrow_head(is_async) {
            Ok(ArrowHead::Arrow {
                typed_return,
            }) => {
                if self.cond_consequent && typed_return {
                    // `a ? (x): T => y : z` is only an arrow if a `:` follows its body
                    if self.parse_arrow_body().is_ok() && self.is_punct(":") {
                        return Ok(true);
                    }
                    self.restore(snapshot);
                    return Ok(false);
                }
                self.parse_arrow_body()?;
                Ok(true)
            }
            Ok(ArrowHead::NotArrow) | Err(_) => {
                self.restore(snapshot);
                Ok(false)
            }
        }
    }

    fn parse_arrow_head(&mut self, is_async: bool) -> Result<ArrowHead> {
        if is_async {
            self.bump()?;
        }
        self.strip_type_parameters()?;
        if !self.is_punct("(") {
            return Ok(ArrowHead::NotArrow);
        }
        self.parse_parameters()?;
        let typed_return = self.is_punct(":");
        self.strip_type_annotation()?;
        if self.is_punct("=>") && !self.tok.newline_before {
            Ok(ArrowHead::Arrow {
                typed_return,
            })
        } else {
            Ok(ArrowHead::NotArrow)
        }
    }

    fn parse_arrow_body(&mut self) -> Result<()> {
        self.expect_punct("=>")?;
        if self.is_punct("{") {
            self.parse_function_body()
        } else {
            self.parse_assignment()
        }
    }

    // ---- functions ----

    /// Everything after the `function` keyword. Returns whether a body was
    /// present; a missing body marks an overload or ambient signature.
    pub(super) fn parse_function_rest(&mut self) -> Result<bool> {
        self.eat_punct("*")?;
        if self.tok.kind == TokenKind::Ident {
            self.bump()?;
        }
        self.parse_signature()?;
        if self.is_punct("{") {
            self.parse_function_body()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Type parameters, parameter list and return type.
    pub(super) fn parse_signature(&mut self) -> Result<()> {
        self.strip_type_parameters()?;
        self.parse_parameters()?;
        self.strip_type_annotation()
    }

    pub(super) fn parse_function_body(&mut self) -> Result<()> {
        self.with_context(false, false, |p| p.parse_block())
    }

    pub(super) fn parse_parameters(&mut self) -> Result<()> {
        self.expect_punct("(")?;
        self.with_context(false, false, |p| {
            let mut first = true;
            while !p.is_punct(")") {
                let start = p.tok.start;
                while p.is_punct("@") {
                    p.parse_decorator()?;
                }

                if p.tok.kind == TokenKind::Ident && is_ts_access_modifier(p.tok_text()) {
                    let next = p.peek()?;
                    if next.kind == TokenKind::Ident
                        || p.token_is(next, "{")
                        || p.token_is(next, "[")
                    {
                        return Err(p.unsupported("parameter property"));
                    }
                }

                if first && p.is_ident("this") && p.peek_is(":")? {
                    p.bump()?;
                    p.strip_type_annotation()?;
                    if p.eat_punct(",")? {
                        p.edits.remove(start, p.tok.start);
                    } else {
                        p.edits.remove(start, p.prev_end);
                    }
                    first = false;
                    continue;
                }
                first = false;

                p.eat_punct("...")?;
                p.parse_binding()?;
                if p.is_punct("?") {
                    let optional = p.bump()?;
                    p.edits.remove(optional.start, optional.end);
                }
                p.strip_type_annotation()?;
                if p.eat_punct("=")? {
                    p.parse_assignment()?;
                }
                if !p.eat_punct(",")? {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect_punct(")")?;
        Ok(())
    }

    /// Identifier, object pattern or array pattern.
    pub(super) fn parse_binding(&mut self) -> Result<()> {
        self.guarded(|p| match p.tok.kind {
            TokenKind::Ident => p.bump().map(|_| ()),
            TokenKind::Punct if p.is_punct("{") => p.parse_object_pattern(),
            TokenKind::Punct if p.is_punct("[") => p.parse_array_pattern(),
            _ => Err(p.unexpected()),
        })
    }

    fn parse_object_pattern(&mut self) -> Result<()> {
        self.expect_punct("{")?;
        self.with_context(false, false, |p| {
            while !p.is_punct("}") {
                if p.eat_punct("...")? {
                    p.parse_binding()?;
                } else {
                    p.parse_property_name()?;
                    if p.eat_punct(":")? {
                        p.parse_binding()?;
                    }
                    if p.eat_punct("=")? {
                        p.parse_assignment()?;
                    }
                }
                if !p.eat_punct(",")? {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect_punct("}")?;
        Ok(())
    }

    fn parse_array_pattern(&mut self) -> Result<()> {
        self.expect_punct("[")?;
        self.with_context(false, false, |p| {
            while !p.is_punct("]") {
                if p.eat_punct(",")? {
                    continue;
                }
                p.eat_punct("...")?;
                p.parse_binding()?;
                if p.eat_punct("=")? {
                    p.parse_assignment()?;
                }
                if !p.eat_punct(",")? {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect_punct("]")?;
        Ok(())
    }

    // ---- classes ----

    pub(super) fn parse_class(&mut self) -> Result<()> {
        self.expect_keyword("class")?;
        if self.tok.kind == TokenKind::Ident
            && !self.is_ident("extends")
            && !self.is_ident("implements")
        {
            self.bump()?;
        }
        self.strip_type_parameters()?;

        if self.is_ident("extends") {
            self.bump()?;
            self.parse_postfix_expression()?;
            if self.is_punct("<") {
                let from = self.tok.start;
                self.skip_type_arguments()?;
                self.edits.remove(from, self.prev_end);
            }
        }
        if self.is_ident("implements") {
            let from = self.prev_end;
            self.bump()?;
            loop {
                self.skip_type()?;
                if !self.eat_punct(",")? {
                    break;
                }
            }
            self.edits.remove(from, self.prev_end);
        }

        self.expect_punct("{")?;
        self.with_context(false, false, |p| {
            while !p.is_punct("}") {
                if p.tok.kind == TokenKind::Eof {
                    return Err(p.unexpected());
                }
                p.parse_class_member()?;
            }
            Ok(())
        })?;
        self.bump()?;
        Ok(())
    }

    fn parse_class_member(&mut self) -> Result<()> {
        if self.eat_punct(";")? {
            return Ok(());
        }
        let start = self.tok.start;
        let mut remove_member = false;

        while self.is_punct("@") {
            self.parse_decorator()?;
        }

        if self.is_ident("static") && self.peek_is("{")? {
            self.bump()?;
            return self.parse_function_body();
        }

        while self.tok.kind == TokenKind::Ident && self.at_member_modifier()? {
            let modifier = self.bump()?;
            match self.text(modifier) {
                "abstract" | "declare" => remove_member = true,
                word if is_ts_access_modifier(word) => {
                    self.edits.remove(modifier.start, self.tok.start);
                }
                _ => {}
            }
        }

        if self.is_punct("[") && self.is_index_signature()? {
            self.skip_balanced()?;
            self.strip_type_annotation()?;
            self.eat_semicolon()?;
            self.edits.remove_statement(self.src, start, self.prev_end);
            return Ok(());
        }

        self.eat_punct("*")?;
        self.parse_property_name()?;
        if self.is_punct("?") || (self.is_punct("!") && !self.tok.newline_before) {
            let marker = self.bump()?;
            self.edits.remove(marker.start, marker.end);
        }

        if self.is_punct("(") || self.is_punct("<") {
            self.parse_signature()?;
            if self.is_punct("{") {
                self.parse_function_body()?;
            } else {
                // overload or abstract method
                self.eat_semicolon()?;
                remove_member = true;
            }
        } else {
            self.strip_type_annotation()?;
            if self.eat_punct("=")? {
                self.parse_assignment()?;
            }
            self.eat_semicolon()?;
        }

        if remove_member {
            self.edits.remove_statement(self.src, start, self.prev_end);
        }
        Ok(())
    }

    /// Whether the current identifier is a modifier of the member that follows
    /// rather than the member's own name.
    fn at_member_modifier(&self) -> Result<bool> {
        let word = self.tok_text();
        let known = matches!(
            word,
            "static" | "async" | "get" | "set" | "accessor" | "abstract" | "declare"
        ) || is_ts_access_modifier(word);
        if !known {
            return Ok(false);
        }
        let next = self.peek()?;
        if word == "async" && next.newline_before {
            return Ok(false);
        }
        Ok(match next.kind {
            TokenKind::Ident | TokenKind::String | TokenKind::Number | TokenKind::PrivateName => {
                true
            }
            TokenKind::Punct => matches!(self.text(next), "[" | "*" | "#"),
            _ => false,
        })
    }

    /// `[key: string]: T`
    fn is_index_signature(&self) -> Result<bool> {
        let name = self.peek()?;
        let colon = self.peek_nth(2)?;
        Ok(name.kind == TokenKind::Ident && self.token_is(colon, ":"))
    }

    // ---- annotations ----

    /// Remove `: Type` if present, including the whitespace before the colon.
    pub(super) fn strip_type_annotation(&mut self) -> Result<()> {
        if self.is_punct(":") {
            let from = self.prev_end;
            self.bump()?;
            self.skip_type()?;
            self.edits.remove(from, self.prev_end);
        }
        Ok(())
    }

    /// Remove `<T, U extends V>` if present.
    pub(super) fn strip_type_parameters(&mut self) -> Result<()> {
        if self.is_punct("<") {
            let from = self.tok.start;
            self.skip_type_parameters()?;
            self.edits.remove(from, self.prev_end);
        }
        Ok(())
    }
}
