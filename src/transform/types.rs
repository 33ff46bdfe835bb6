//! Type expressions. These are only ever skipped: every caller removes the
//! span it walked over.

use super::lexer::TokenKind;
use super::strip::{Result, Stripper};

impl Stripper<'_> {
    pub(super) fn skip_type(&mut self) -> Result<()> {
        self.guarded(|p| p.skip_type_inner())
    }

    fn skip_type_inner(&mut self) -> Result<()> {
        if self.is_ident("abstract") && self.peek_is("new")? {
            self.bump()?;
        }
        if self.is_ident("new") {
            self.bump()?;
            if self.is_punct("<") {
                self.skip_type_parameters()?;
            }
            return self.skip_function_type_rest();
        }

        self.skip_union_type()?;

        if self.is_ident("extends") && !self.tok.newline_before {
            self.bump()?;
            self.skip_union_type()?;
            self.expect_punct("?")?;
            self.skip_type()?;
            self.expect_punct(":")?;
            self.skip_type()?;
        }
        Ok(())
    }

    fn skip_union_type(&mut self) -> Result<()> {
        if self.is_punct("|") || self.is_punct("&") {
            self.bump()?;
        }
        loop {
            self.skip_postfix_type()?;
            if !(self.is_punct("|") || self.is_punct("&")) {
                return Ok(());
            }
            self.bump()?;
        }
    }

    fn skip_postfix_type(&mut self) -> Result<()> {
        self.skip_type_operand()?;
        while self.is_punct("[") && !self.tok.newline_before {
            self.skip_balanced()?;
        }
        Ok(())
    }

    fn skip_type_operand(&mut self) -> Result<()> {
        match self.tok.kind {
            TokenKind::Ident => self.skip_named_type(),
            TokenKind::Number | TokenKind::String | TokenKind::Template => self.bump().map(|_| ()),
            TokenKind::TemplateHead => self.skip_template_literal_type(),
            TokenKind::Punct => match self.tok_text() {
                "-" => {
                    self.bump()?;
                    if self.tok.kind != TokenKind::Number {
                        return Err(self.unexpected());
                    }
                    self.bump().map(|_| ())
                }
                "{" | "[" => self.skip_balanced(),
                "(" => {
                    if self.is_function_type_start()? {
                        return self.skip_function_type_rest();
                    }
                    self.bump()?;
                    self.skip_type()?;
                    self.expect_punct(")").map(|_| ())
                }
                "<" => {
                    self.skip_type_parameters()?;
                    self.skip_function_type_rest()
                }
                _ => Err(self.unexpected()),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn skip_named_type(&mut self) -> Result<()> {
        let next = self.peek()?;
        match self.tok_text() {
            "keyof" | "unique" | "readonly" if !next.newline_before && starts_type(self, next) => {
                self.bump()?;
                self.skip_postfix_type()
            }
            "infer" if next.kind == TokenKind::Ident => {
                self.bump()?;
                self.bump().map(|_| ())
            }
            "typeof" => {
                self.bump()?;
                if self.is_ident("import") {
                    self.bump()?;
                    self.skip_balanced()?;
                } else {
                    self.expect_ident()?;
                }
                self.skip_qualified_rest()
            }
            "asserts" if next.kind == TokenKind::Ident && !next.newline_before => {
                self.bump()?;
                self.bump()?;
                if self.is_ident("is") && !self.tok.newline_before {
                    self.bump()?;
                    self.skip_type()?;
                }
                Ok(())
            }
            "import" if self.token_is(next, "(") => {
                self.bump()?;
                self.skip_balanced()?;
                self.skip_qualified_rest()
            }
            _ => {
                self.bump()?;
                self.skip_qualified_rest()?;
                if self.is_ident("is") && !self.tok.newline_before {
                    self.bump()?;
                    self.skip_type()?;
                }
                Ok(())
            }
        }
    }

    /// `.Name` segments and type arguments after an entity name.
    fn skip_qualified_rest(&mut self) -> Result<()> {
        while self.is_punct(".") {
            self.bump()?;
            self.expect_ident()?;
        }
        if self.is_punct("<") && !self.tok.newline_before {
            self.skip_type_arguments()?;
        }
        Ok(())
    }

    fn skip_template_literal_type(&mut self) -> Result<()> {
        loop {
            self.bump()?;
            self.skip_type()?;
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

    /// At `(`: does a balanced group followed by `=>` start here?
    fn is_function_type_start(&mut self) -> Result<bool> {
        let snapshot = self.snapshot();
        let is_function = self.skip_balanced().is_ok() && self.is_punct("=>");
        self.restore(snapshot);
        Ok(is_function)
    }

    fn skip_function_type_rest(&mut self) -> Result<()> {
        if !self.is_punct("(") {
            return Err(self.unexpected());
        }
        self.skip_balanced()?;
        self.expect_punct("=>")?;
        self.skip_type()
    }

    /// `<A, B<C>>`
    pub(super) fn skip_type_arguments(&mut self) -> Result<()> {
        self.expect_punct("<")?;
        loop {
            self.skip_type()?;
            if !self.eat_punct(",")? || self.is_punct(">") {
                break;
            }
        }
        self.expect_punct(">").map(|_| ())
    }

    /// `<const T extends U = V, in out W>`
    pub(super) fn skip_type_parameters(&mut self) -> Result<()> {
        self.expect_punct("<")?;
        while !self.is_punct(">") {
            while matches!(self.tok_text(), "const" | "in" | "out")
                && self.tok.kind == TokenKind::Ident
                && self.peek()?.kind == TokenKind::Ident
            {
                self.bump()?;
            }
            self.expect_ident()?;
            if self.is_ident("extends") {
                self.bump()?;
                self.skip_type()?;
            }
            if self.eat_punct("=")? {
                self.skip_type()?;
            }
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.expect_punct(">").map(|_| ())
    }
}

fn starts_type(stripper: &Stripper<'_>, token: super::lexer::Token) -> bool {
    match token.kind {
        TokenKind::Ident
        | TokenKind::String
        | TokenKind::Number
        | TokenKind::Template
        | TokenKind::TemplateHead => true,
        TokenKind::Punct => matches!(stripper.text(token), "(" | "[" | "{" | "-"),
        _ => false,
    }
}
