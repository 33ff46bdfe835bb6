//! Recursive-descent walk over TypeScript/TSX that records type-only syntax.
//!
//! The walker does not build a tree. It recognizes enough of the grammar to
//! find every span that exists only for the type checker and records an edit
//! for it; the untouched bytes between edits are copied through verbatim, so
//! formatting and comments survive.
//!
//! Constructs whose type-free form would need code generation beyond removal
//! (parameter properties, runtime namespaces, `import x = require()`,
//! `export =`) are rejected with [`StripError::Unsupported`].

use super::edits::Edits;
use super::error::StripError;
use super::lexer::{Scanner, Token, TokenKind};

pub(super) type Result<T> = std::result::Result<T, StripError>;

const MAX_DEPTH: usize = 128;

const TS_ACCESS_MODIFIERS: [&str; 5] = ["public", "private", "protected", "readonly", "override"];

/// Parse `source` and return it with all type-only syntax removed.
pub(super) fn strip(source: &str) -> Result<String> {
    let mut stripper = Stripper::new(source)?;
    while stripper.tok.kind != TokenKind::Eof {
        let before = stripper.tok.start;
        stripper.parse_statement()?;
        if stripper.tok.start == before && stripper.tok.kind != TokenKind::Eof {
            return Err(stripper.unexpected());
        }
    }
    stripper.edits.apply(source)
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Snapshot {
    tok: Token,
    prev_end: usize,
    depth: usize,
    no_in: bool,
    cond_consequent: bool,
    edits: usize,
}

pub(super) struct Stripper<'src> {
    pub(super) src: &'src str,
    pub(super) scanner: Scanner<'src>,
    /// Current (not yet consumed) token
    pub(super) tok: Token,
    /// End offset of the last consumed token
    pub(super) prev_end: usize,
    pub(super) edits: Edits,
    depth: usize,
    /// `in` is not a binary operator (for-statement heads)
    pub(super) no_in: bool,
    /// Parsing the consequent of a conditional expression
    pub(super) cond_consequent: bool,
}

impl<'src> Stripper<'src> {
    fn new(src: &'src str) -> Result<Self> {
        let scanner = Scanner::new(src);
        let tok = scanner.scan(0, true)?;
        Ok(Self {
            src,
            scanner,
            tok,
            prev_end: 0,
            edits: Edits::default(),
            depth: 0,
            no_in: false,
            cond_consequent: false,
        })
    }

    // ---- token plumbing ----

    pub(super) fn text(&self, token: Token) -> &'src str {
        self.src.get(token.start..token.end).unwrap_or_default()
    }

    pub(super) fn tok_text(&self) -> &'src str {
        self.text(self.tok)
    }

    pub(super) fn byte(&self, pos: usize) -> u8 {
        self.src.as_bytes().get(pos).copied().unwrap_or(0)
    }

    pub(super) fn is_punct(&self, punct: &str) -> bool {
        self.tok.kind == TokenKind::Punct && self.tok_text() == punct
    }

    pub(super) fn is_ident(&self, name: &str) -> bool {
        self.tok.kind == TokenKind::Ident && self.tok_text() == name
    }

    pub(super) fn token_is(&self, token: Token, text: &str) -> bool {
        matches!(token.kind, TokenKind::Punct | TokenKind::Ident) && self.text(token) == text
    }

    pub(super) fn unexpected(&self) -> StripError {
        self.scanner.unexpected(self.tok.start)
    }

    pub(super) fn unsupported(&self, construct: &'static str) -> StripError {
        StripError::Unsupported {
            pos: self.tok.start,
            construct,
        }
    }

    fn regex_allowed_after(&self, token: Token) -> bool {
        match token.kind {
            TokenKind::Punct => !matches!(self.text(token), ")" | "]" | "}"),
            TokenKind::Ident => matches!(
                self.text(token),
                "return"
                    | "typeof"
                    | "instanceof"
                    | "in"
                    | "of"
                    | "new"
                    | "delete"
                    | "void"
                    | "throw"
                    | "case"
                    | "do"
                    | "else"
                    | "yield"
                    | "await"
            ),
            TokenKind::TemplateHead | TokenKind::TemplateMiddle => true,
            _ => false,
        }
    }

    /// Consume the current token and scan the next one.
    pub(super) fn bump(&mut self) -> Result<Token> {
        let consumed = self.tok;
        if consumed.kind == TokenKind::Eof {
            return Err(self.unexpected());
        }
        self.prev_end = consumed.end;
        self.tok = self.scanner.scan(consumed.end, self.regex_allowed_after(consumed))?;
        Ok(consumed)
    }

    /// Restart scanning at `pos`, treating everything before it as consumed.
    pub(super) fn resume_at(&mut self, pos: usize, regex_allowed: bool) -> Result<()> {
        self.prev_end = pos;
        self.tok = self.scanner.scan(pos, regex_allowed)?;
        Ok(())
    }

    pub(super) fn peek(&self) -> Result<Token> {
        self.peek_nth(1)
    }

    pub(super) fn peek_nth(&self, n: usize) -> Result<Token> {
        let mut token = self.tok;
        for _ in 0..n {
            if token.kind == TokenKind::Eof {
                break;
            }
            token = self.scanner.scan(token.end, self.regex_allowed_after(token))?;
        }
        Ok(token)
    }

    pub(super) fn peek_is(&self, text: &str) -> Result<bool> {
        Ok(self.token_is(self.peek()?, text))
    }

    pub(super) fn eat_punct(&mut self, punct: &str) -> Result<bool> {
        if self.is_punct(punct) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(super) fn expect_punct(&mut self, punct: &str) -> Result<Token> {
        if self.is_punct(punct) { self.bump() } else { Err(self.unexpected()) }
    }

    pub(super) fn expect_ident(&mut self) -> Result<Token> {
        if self.tok.kind == TokenKind::Ident { self.bump() } else { Err(self.unexpected()) }
    }

    pub(super) fn expect_keyword(&mut self, keyword: &str) -> Result<Token> {
        if self.is_ident(keyword) { self.bump() } else { Err(self.unexpected()) }
    }

    pub(super) fn snapshot(&self) -> Snapshot {
        Snapshot {
            tok: self.tok,
            prev_end: self.prev_end,
            depth: self.depth,
            no_in: self.no_in,
            cond_consequent: self.cond_consequent,
            edits: self.edits.len(),
        }
    }

    pub(super) fn restore(&mut self, snapshot: Snapshot) {
        self.tok = snapshot.tok;
        self.prev_end = snapshot.prev_end;
        self.depth = snapshot.depth;
        self.no_in = snapshot.no_in;
        self.cond_consequent = snapshot.cond_consequent;
        self.edits.truncate(snapshot.edits);
    }

    /// Run `f` one nesting level deeper.
    pub(super) fn guarded<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(StripError::TooDeep {
                pos: self.tok.start,
            });
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` with the given expression context, restoring the current one after.
    pub(super) fn with_context<R>(
        &mut self,
        no_in: bool,
        cond_consequent: bool,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let saved = (self.no_in, self.cond_consequent);
        self.no_in = no_in;
        self.cond_consequent = cond_consequent;
        let result = f(self);
        (self.no_in, self.cond_consequent) = saved;
        result
    }

    /// Skip a bracketed group starting at the current `(`, `[`, `{` or template head.
    pub(super) fn skip_balanced(&mut self) -> Result<()> {
        let mut stack: Vec<u8> = Vec::new();
        loop {
            match self.tok.kind {
                TokenKind::Eof => return Err(self.unexpected()),
                TokenKind::TemplateHead => stack.push(b'`'),
                TokenKind::Punct => match self.tok_text() {
                    "(" => stack.push(b')'),
                    "[" => stack.push(b']'),
                    "{" => stack.push(b'}'),
                    "}" if stack.last() == Some(&b'`') => {
                        self.tok = self.scanner.scan_template_continuation(self.tok.start)?;
                        if self.tok.kind == TokenKind::TemplateTail {
                            stack.pop();
                        }
                    }
                    close @ (")" | "]" | "}") => {
                        if stack.pop() != close.bytes().next() {
                            return Err(self.unexpected());
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
            self.bump()?;
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    /// Skip tokens up to the end of the current statement.
    pub(super) fn skip_to_statement_end(&mut self) -> Result<()> {
        let first = self.tok.start;
        loop {
            if self.tok.kind == TokenKind::Eof || self.is_punct("}") {
                return Ok(());
            }
            if self.is_punct(";") {
                self.bump()?;
                return Ok(());
            }
            if self.tok.newline_before && self.tok.start != first {
                return Ok(());
            }
            if self.is_punct("(")
                || self.is_punct("[")
                || self.is_punct("{")
                || self.tok.kind == TokenKind::TemplateHead
            {
                self.skip_balanced()?;
            } else {
                self.bump()?;
            }
        }
    }

    pub(super) fn eat_semicolon(&mut self) -> Result<()> {
        self.eat_punct(";").map(|_| ())
    }

    /// Consume an explicit `;` or accept an automatically inserted one.
    pub(super) fn finish_statement(&mut self) -> Result<()> {
        if self.eat_punct(";")?
            || self.is_punct("}")
            || self.tok.kind == TokenKind::Eof
            || self.tok.newline_before
        {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    pub(super) fn remove_statement(&mut self, start: usize) {
        self.edits.remove_statement(self.src, start, self.prev_end);
    }

    // ---- statements ----

    pub(super) fn parse_statement(&mut self) -> Result<()> {
        self.guarded(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<()> {
        let start = self.tok.start;
        match self.tok.kind {
            TokenKind::Punct if self.is_punct("{") => self.parse_block(),
            TokenKind::Punct if self.is_punct(";") => self.bump().map(|_| ()),
            TokenKind::Punct if self.is_punct("@") => {
                while self.is_punct("@") {
                    self.parse_decorator()?;
                }
                self.parse_statement_inner()
            }
            TokenKind::Ident => {
                if self.parse_keyword_statement(start)? {
                    Ok(())
                } else {
                    self.parse_expression()?;
                    self.finish_statement()
                }
            }
            _ => {
                self.parse_expression()?;
                self.finish_statement()
            }
        }
    }

    pub(super) fn parse_block(&mut self) -> Result<()> {
        self.expect_punct("{")?;
        while !self.is_punct("}") {
            if self.tok.kind == TokenKind::Eof {
                return Err(self.unexpected());
            }
            self.parse_statement()?;
        }
        self.bump()?;
        Ok(())
    }

    /// Handle statements introduced by a keyword. Returns `false` when the
    /// identifier starts an expression statement instead.
    fn parse_keyword_statement(&mut self, start: usize) -> Result<bool> {
        let next = self.peek()?;
        let next_text = self.text(next);
        let next_ident_same_line = next.kind == TokenKind::Ident && !next.newline_before;

        match self.tok_text() {
            "const" if next_ident_same_line && next_text == "enum" => {
                self.bump()?;
                self.lower_enum(start, false)?;
            }
            "var" | "const" => {
                self.parse_variable_declaration()?;
                self.finish_statement()?;
            }
            "let" if next.kind == TokenKind::Ident || matches!(next_text, "[" | "{") => {
                self.parse_variable_declaration()?;
                self.finish_statement()?;
            }
            "function" => self.parse_function_declaration(start)?,
            "async" if next_text == "function" && !next.newline_before => {
                self.parse_function_declaration(start)?;
            }
            "class" => self.parse_class()?,
            "abstract" if next_text == "class" && !next.newline_before => {
                let keyword = self.bump()?;
                self.edits.remove(keyword.start, self.tok.start);
                self.parse_class()?;
            }
            "if" => {
                self.bump()?;
                self.parse_paren_expression()?;
                self.parse_statement()?;
                if self.is_ident("else") {
                    self.bump()?;
                    self.parse_statement()?;
                }
            }
            "while" | "with" => {
                self.bump()?;
                self.parse_paren_expression()?;
                self.parse_statement()?;
            }
            "do" => {
                self.bump()?;
                self.parse_statement()?;
                self.expect_keyword("while")?;
                self.parse_paren_expression()?;
                self.eat_semicolon()?;
            }
            "for" => self.parse_for()?,
            "switch" => self.parse_switch()?,
            "try" => self.parse_try()?,
            "return" | "throw" => {
                self.bump()?;
                if !self.at_expression_end() {
                    self.parse_expression()?;
                }
                self.finish_statement()?;
            }
            "break" | "continue" => {
                self.bump()?;
                if self.tok.kind == TokenKind::Ident && !self.tok.newline_before {
                    self.bump()?;
                }
                self.finish_statement()?;
            }
            "debugger" => {
                self.bump()?;
                self.finish_statement()?;
            }
            "import" if !matches!(next_text, "(" | ".") => self.parse_import(start)?,
            "export" => self.parse_export(start)?,
            "interface" if next_ident_same_line => {
                self.skip_interface()?;
                self.remove_statement(start);
            }
            "type" if next_ident_same_line && self.is_type_alias()? => {
                self.skip_type_alias()?;
                self.remove_statement(start);
            }
            "enum" if next_ident_same_line => self.lower_enum(start, false)?,
            "declare" if next_ident_same_line => {
                self.skip_declare()?;
                self.remove_statement(start);
            }
            "namespace" | "module"
                if !next.newline_before
                    && matches!(next.kind, TokenKind::Ident | TokenKind::String) =>
            {
                return Err(self.unsupported("namespace"));
            }
            _ if next.kind == TokenKind::Punct && next_text == ":" => {
                self.bump()?;
                self.bump()?;
                self.parse_statement()?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(super) fn at_expression_end(&self) -> bool {
        self.tok.kind == TokenKind::Eof
            || self.tok.newline_before
            || [")", "]", "}", ",", ";", ":"].iter().any(|p| self.is_punct(p))
    }

    fn parse_paren_expression(&mut self) -> Result<()> {
        self.expect_punct("(")?;
        self.with_context(false, false, |p| p.parse_expression())?;
        self.expect_punct(")")?;
        Ok(())
    }

    pub(super) fn parse_variable_declaration(&mut self) -> Result<()> {
        self.bump()?;
        loop {
            self.parse_binding()?;
            if self.is_punct("!") {
                let definite = self.bump()?;
                self.edits.remove(definite.start, definite.end);
            }
            self.strip_type_annotation()?;
            if self.eat_punct("=")? {
                self.parse_assignment()?;
            }
            if !self.eat_punct(",")? {
                return Ok(());
            }
        }
    }

    fn parse_for(&mut self) -> Result<()> {
        self.bump()?;
        if self.is_ident("await") {
            self.bump()?;
        }
        self.expect_punct("(")?;
        self.with_context(true, false, |p| {
            if p.is_punct(";") {
                return Ok(());
            }
            let declaration = p.is_ident("var")
                || p.is_ident("const")
                || (p.is_ident("let") && !matches!(p.text(p.peek()?), "in" | "of"));
            if declaration { p.parse_variable_declaration() } else { p.parse_expression() }
        })?;
        self.with_context(false, false, |p| {
            if p.is_ident("of") || p.is_ident("in") {
                p.bump()?;
                return p.parse_expression();
            }
            p.expect_punct(";")?;
            if !p.is_punct(";") {
                p.parse_expression()?;
            }
            p.expect_punct(";")?;
            if !p.is_punct(")") {
                p.parse_expression()?;
            }
            Ok(())
        })?;
        self.expect_punct(")")?;
        self.parse_statement()
    }

    fn parse_switch(&mut self) -> Result<()> {
        self.bump()?;
        self.parse_paren_expression()?;
        self.expect_punct("{")?;
        while !self.is_punct("}") {
            if self.is_ident("case") {
                self.bump()?;
                self.parse_expression()?;
                self.expect_punct(":")?;
            } else if self.is_ident("default") {
                self.bump()?;
                self.expect_punct(":")?;
            } else if self.tok.kind == TokenKind::Eof {
                return Err(self.unexpected());
            } else {
                self.parse_statement()?;
            }
        }
        self.bump()?;
        Ok(())
    }

    fn parse_try(&mut self) -> Result<()> {
        self.bump()?;
        self.parse_block()?;
        if self.is_ident("catch") {
            self.bump()?;
            if self.eat_punct("(")? {
                self.parse_binding()?;
                self.strip_type_annotation()?;
                self.expect_punct(")")?;
            }
            self.parse_block()?;
        }
        if self.is_ident("finally") {
            self.bump()?;
            self.parse_block()?;
        }
        Ok(())
    }

    pub(super) fn parse_function_declaration(&mut self, start: usize) -> Result<()> {
        if self.is_ident("async") {
            self.bump()?;
        }
        self.expect_keyword("function")?;
        if !self.parse_function_rest()? {
            // overload signature
            self.finish_statement()?;
            self.remove_statement(start);
        }
        Ok(())
    }

    // ---- type-only declarations ----

    /// `type Name =` or `type Name<`
    fn is_type_alias(&self) -> Result<bool> {
        let after_name = self.peek_nth(2)?;
        Ok(self.token_is(after_name, "=") || self.token_is(after_name, "<"))
    }

    fn skip_type_alias(&mut self) -> Result<()> {
        self.bump()?;
        self.expect_ident()?;
        if self.is_punct("<") {
            self.skip_type_parameters()?;
        }
        self.expect_punct("=")?;
        self.skip_type()?;
        self.finish_statement()
    }

    fn skip_interface(&mut self) -> Result<()> {
        self.bump()?;
        while !self.is_punct("{") {
            match self.tok.kind {
                TokenKind::Eof => return Err(self.unexpected()),
                TokenKind::Punct if self.is_punct("(") || self.is_punct("[") => {
                    self.skip_balanced()?;
                }
                _ => {
                    self.bump()?;
                }
            }
        }
        self.skip_balanced()
    }

    fn skip_declare(&mut self) -> Result<()> {
        self.bump()?;
        let braced = matches!(
            self.tok_text(),
            "module" | "namespace" | "global" | "class" | "abstract" | "enum" | "interface"
        );
        let first = self.tok.start;
        loop {
            if self.tok.kind == TokenKind::Eof || self.is_punct("}") {
                return Ok(());
            }
            if self.is_punct(";") {
                self.bump()?;
                return Ok(());
            }
            if !braced && self.tok.newline_before && self.tok.start != first {
                return Ok(());
            }
            if braced && self.is_punct("{") {
                return self.skip_balanced();
            }
            if self.is_punct("(")
                || self.is_punct("[")
                || self.is_punct("{")
                || self.tok.kind == TokenKind::TemplateHead
            {
                self.skip_balanced()?;
            } else {
                self.bump()?;
            }
        }
    }

    // ---- modules ----

    fn parse_import(&mut self, start: usize) -> Result<()> {
        self.bump()?;

        if self.tok.kind == TokenKind::String {
            self.bump()?;
            self.skip_import_attributes()?;
            return self.finish_statement();
        }

        if self.is_ident("type") {
            let next = self.peek()?;
            let type_only = match next.kind {
                TokenKind::Punct => matches!(self.text(next), "{" | "*"),
                TokenKind::Ident => {
                    self.text(next) != "from" || self.token_is(self.peek_nth(2)?, "from")
                }
                _ => false,
            };
            if type_only {
                self.skip_to_statement_end()?;
                self.remove_statement(start);
                return Ok(());
            }
        }

        let mut default_end = None;
        if self.tok.kind == TokenKind::Ident {
            let binding = self.bump()?;
            if self.is_punct("=") {
                return Err(self.unsupported("import alias"));
            }
            default_end = Some(binding.end);
            self.eat_punct(",")?;
        }

        let mut specifiers = None;
        if self.eat_punct("*")? {
            self.expect_keyword("as")?;
            self.expect_ident()?;
        } else if self.is_punct("{") {
            specifiers = Some(self.parse_specifier_list()?);
        }

        self.expect_keyword("from")?;
        if self.tok.kind != TokenKind::String {
            return Err(self.unexpected());
        }
        self.bump()?;
        self.skip_import_attributes()?;
        self.finish_statement()?;

        if let Some(list) = specifiers {
            match (list.all_type_only(), default_end) {
                (true, None) => self.remove_statement(start),
                (true, Some(end)) => self.edits.remove(end, list.close_end),
                (false, _) => self.strip_type_specifiers(&list),
            }
        }
        Ok(())
    }

    fn skip_import_attributes(&mut self) -> Result<()> {
        if (self.is_ident("with") || (self.is_ident("assert") && !self.tok.newline_before))
            && self.peek_is("{")?
        {
            self.bump()?;
            self.skip_balanced()?;
        }
        Ok(())
    }

    fn parse_export(&mut self, start: usize) -> Result<()> {
        self.bump()?;
        let next = self.peek()?;
        let next_text = self.text(next);

        match self.tok.kind {
            TokenKind::Punct if self.is_punct("=") => Err(self.unsupported("export assignment")),
            TokenKind::Punct if self.is_punct("*") => {
                self.bump()?;
                if self.eat_keyword("as")? {
                    self.bump()?;
                }
                self.parse_from_clause()?;
                self.finish_statement()
            }
            TokenKind::Punct if self.is_punct("{") => {
                let list = self.parse_specifier_list()?;
                if self.is_ident("from") {
                    self.parse_from_clause()?;
                }
                self.finish_statement()?;
                if list.all_type_only() {
                    self.remove_statement(start);
                } else {
                    self.strip_type_specifiers(&list);
                }
                Ok(())
            }
            TokenKind::Ident => match self.tok_text() {
                "import" => Err(self.unsupported("import alias")),
                "as" if next_text == "namespace" => {
                    self.skip_to_statement_end()?;
                    self.remove_statement(start);
                    Ok(())
                }
                "type" if matches!(next_text, "{" | "*") => {
                    self.skip_to_statement_end()?;
                    self.remove_statement(start);
                    Ok(())
                }
                "type" if next.kind == TokenKind::Ident => {
                    self.skip_type_alias()?;
                    self.remove_statement(start);
                    Ok(())
                }
                "interface" => {
                    self.skip_interface()?;
                    self.remove_statement(start);
                    Ok(())
                }
                "declare" => {
                    self.skip_declare()?;
                    self.remove_statement(start);
                    Ok(())
                }
                "enum" => self.lower_enum(start, true),
                "const" if next_text == "enum" => {
                    self.bump()?;
                    self.lower_enum(start, true)
                }
                "function" => self.parse_function_declaration(start),
                "async" if next_text == "function" => self.parse_function_declaration(start),
                "default" => self.parse_export_default(start),
                _ => self.parse_statement(),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn parse_export_default(&mut self, start: usize) -> Result<()> {
        self.bump()?;
        let next = self.peek()?;
        match self.tok_text() {
            "interface" if self.tok.kind == TokenKind::Ident => {
                self.skip_interface()?;
                self.remove_statement(start);
                Ok(())
            }
            "function" => self.parse_function_declaration(start),
            "async" if self.token_is(next, "function") && !next.newline_before => {
                self.parse_function_declaration(start)
            }
            "class" => self.parse_class(),
            "abstract" if self.token_is(next, "class") => {
                let keyword = self.bump()?;
                self.edits.remove(keyword.start, self.tok.start);
                self.parse_class()
            }
            _ => {
                self.parse_assignment()?;
                self.finish_statement()
            }
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> Result<bool> {
        if self.is_ident(keyword) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_from_clause(&mut self) -> Result<()> {
        self.expect_keyword("from")?;
        if self.tok.kind != TokenKind::String {
            return Err(self.unexpected());
        }
        self.bump()?;
        self.skip_import_attributes()
    }

    /// `{ a, type B, c as d }`
    fn parse_specifier_list(&mut self) -> Result<SpecifierList> {
        self.expect_punct("{")?;
        let mut specifiers = Vec::new();
        while !self.is_punct("}") {
            let start = self.tok.start;
            let type_only = self.is_type_specifier_modifier()?;
            if type_only {
                self.bump()?;
            }
            self.expect_module_export_name()?;
            if self.eat_keyword("as")? {
                self.expect_module_export_name()?;
            }
            specifiers.push(Specifier {
                start,
                end: self.prev_end,
                type_only,
            });
            if !self.eat_punct(",")? {
                break;
            }
        }
        let close = self.expect_punct("}")?;
        Ok(SpecifierList {
            specifiers,
            close_end: close.end,
        })
    }

    fn expect_module_export_name(&mut self) -> Result<Token> {
        match self.tok.kind {
            TokenKind::Ident | TokenKind::String => self.bump(),
            _ => Err(self.unexpected()),
        }
    }

    /// Whether the current `type` is a modifier rather than the imported name.
    fn is_type_specifier_modifier(&self) -> Result<bool> {
        if !self.is_ident("type") {
            return Ok(false);
        }
        let first = self.peek()?;
        if self.token_is(first, ",") || self.token_is(first, "}") {
            return Ok(false);
        }
        if first.kind == TokenKind::Ident && self.text(first) == "as" {
            // `type as`, `type as as x` vs. `type as x`
            let second = self.peek_nth(2)?;
            return Ok(self.token_is(second, ",")
                || self.token_is(second, "}")
                || (second.kind == TokenKind::Ident && self.text(second) == "as"));
        }
        Ok(matches!(first.kind, TokenKind::Ident | TokenKind::String))
    }

    fn strip_type_specifiers(&mut self, list: &SpecifierList) {
        let specs = &list.specifiers;
        let Some(last_kept) = specs.iter().rposition(|s| !s.type_only) else {
            return;
        };
        for pair in specs.windows(2).take(last_kept) {
            if pair[0].type_only {
                self.edits.remove(pair[0].start, pair[1].start);
            }
        }
        if let (Some(kept), Some(last)) = (specs.get(last_kept), specs.last()) {
            self.edits.remove(kept.end, last.end);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Specifier {
    start: usize,
    end: usize,
    type_only: bool,
}

#[derive(Debug)]
struct SpecifierList {
    specifiers: Vec<Specifier>,
    close_end: usize,
}

impl SpecifierList {
    fn all_type_only(&self) -> bool {
        !self.specifiers.is_empty() && self.specifiers.iter().all(|s| s.type_only)
    }
}

/// Access modifiers that only exist for the type checker.
pub(super) fn is_ts_access_modifier(word: &str) -> bool {
    TS_ACCESS_MODIFIERS.contains(&word)
}
