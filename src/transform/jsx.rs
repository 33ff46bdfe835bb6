//! JSX elements. Tag structure is scanned byte-wise; embedded expressions go
//! back through the regular expression parser so type syntax inside them is
//! stripped too.

use super::error::StripError;
use super::strip::{Result, Stripper};

impl<'src> Stripper<'src> {
    /// Parse the element or fragment at the current `<` and continue scanning
    /// right after it.
    pub(super) fn parse_jsx(&mut self) -> Result<()> {
        let end = self.jsx_element(self.tok.start)?;
        self.resume_at(end, false)
    }

    /// Parse an element whose `<` sits at `lt`; returns the offset after it.
    fn jsx_element(&mut self, lt: usize) -> Result<usize> {
        self.guarded(|p| p.jsx_element_inner(lt))
    }

    fn jsx_element_inner(&mut self, lt: usize) -> Result<usize> {
        let (pos, _) = self.scanner.skip_trivia(lt + 1)?;
        if self.byte(pos) == b'>' {
            return self.jsx_children(pos + 1, None);
        }

        let name = self.scanner.scan_jsx_name(pos)?;
        let name_text = self.text(name);
        let mut pos = name.end;

        let (after_name, _) = self.scanner.skip_trivia(pos)?;
        if self.byte(after_name) == b'<' {
            self.resume_at(after_name, false)?;
            self.skip_type_arguments()?;
            self.edits.remove(after_name, self.prev_end);
            pos = self.prev_end;
        }

        loop {
            let (at, _) = self.scanner.skip_trivia(pos)?;
            match self.byte(at) {
                b'/' => {
                    let (gt, _) = self.scanner.skip_trivia(at + 1)?;
                    if self.byte(gt) != b'>' {
                        return Err(self.scanner.unexpected(gt));
                    }
                    return Ok(gt + 1);
                }
                b'>' => return self.jsx_children(at + 1, Some(name_text)),
                b'{' => pos = self.jsx_expression_container(at)?,
                _ => pos = self.jsx_attribute(at)?,
            }
        }
    }

    fn jsx_attribute(&mut self, at: usize) -> Result<usize> {
        let name = self.scanner.scan_jsx_name(at)?;
        let (eq, _) = self.scanner.skip_trivia(name.end)?;
        if self.byte(eq) != b'=' {
            return Ok(name.end);
        }
        let (value, _) = self.scanner.skip_trivia(eq + 1)?;
        match self.byte(value) {
            b'"' | b'\'' => Ok(self.scanner.scan_jsx_string(value)?.end),
            b'{' => self.jsx_expression_container(value),
            b'<' => self.jsx_element(value),
            _ => Err(self.scanner.unexpected(value)),
        }
    }

    /// `{expr}`, `{...spread}` or `{/* comment */}` at `at`; returns the offset
    /// after the closing brace.
    fn jsx_expression_container(&mut self, at: usize) -> Result<usize> {
        self.resume_at(at, false)?;
        self.expect_punct("{")?;
        if !self.is_punct("}") {
            self.with_context(false, false, |p| {
                p.eat_punct("...")?;
                p.parse_expression()
            })?;
        }
        if !self.is_punct("}") {
            return Err(self.unexpected());
        }
        Ok(self.tok.end)
    }

    fn jsx_children(&mut self, mut pos: usize, tag: Option<&'src str>) -> Result<usize> {
        loop {
            let text_end = self.scanner.jsx_text_end(pos);
            match self.byte(text_end) {
                b'{' => pos = self.jsx_expression_container(text_end)?,
                b'<' => {
                    let (after, _) = self.scanner.skip_trivia(text_end + 1)?;
                    if self.byte(after) == b'/' {
                        return self.jsx_closing_tag(after + 1, tag);
                    }
                    pos = self.jsx_element(text_end)?;
                }
                _ => {
                    return Err(StripError::Unterminated {
                        pos,
                        what: "JSX element",
                    });
                }
            }
        }
    }

    fn jsx_closing_tag(&mut self, pos: usize, tag: Option<&'src str>) -> Result<usize> {
        let (name_start, _) = self.scanner.skip_trivia(pos)?;
        let end = match tag {
            None => name_start,
            Some(expected) => {
                let name = self.scanner.scan_jsx_name(name_start)?;
                if self.text(name) != expected {
                    return Err(self.scanner.unexpected(name.start));
                }
                name.end
            }
        };
        let (gt, _) = self.scanner.skip_trivia(end)?;
        if self.byte(gt) != b'>' {
            return Err(self.scanner.unexpected(gt));
        }
        Ok(gt + 1)
    }
}
