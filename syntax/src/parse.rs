//! Text → tree for the Swift-flavored member-declaration subset.
//!
//! This is deliberately not a full Swift parser. It covers exactly the
//! declaration forms the engine evolves: bindings (stored or computed),
//! initializers, functions, structs, extensions, and `#if` blocks. Bodies and
//! accessor blocks are captured as raw balanced-brace text. Brace balancing
//! skips over double-quoted string literals but not multi-line literals.

use thiserror::Error;

use crate::decl::{
    BindingKeyword, Decl, DeclList, ExtensionDecl, FuncDecl, IfConfigClause, IfConfigDecl,
    IfConfigKeyword, InitDecl, Parameter, SourceFile, StructDecl, VarDecl,
};

/// Declaration modifiers the parser recognizes and records verbatim.
const MODIFIERS: &[&str] = &[
    "static",
    "class",
    "lazy",
    "public",
    "private",
    "internal",
    "fileprivate",
    "open",
    "final",
    "weak",
    "unowned",
    "override",
    "mutating",
    "nonmutating",
    "required",
    "convenience",
    "indirect",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}")]
    Expected { line: usize, expected: &'static str },
    #[error("line {line}: unexpected `{token}`")]
    UnexpectedToken { line: usize, token: String },
    #[error("line {line}: unbalanced braces")]
    UnbalancedBraces { line: usize },
    #[error("line {line}: `{directive}` without a matching `#if`")]
    DanglingDirective { line: usize, directive: String },
}

/// Parse a whole source file of member-style declarations.
pub fn parse_source(text: &str) -> Result<SourceFile, ParseError> {
    let mut parser = Parser::new(text);
    let decls = parser.parse_decl_list(ListEnd::Eof)?;
    Ok(SourceFile::new(decls))
}

/// What terminates the declaration list currently being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListEnd {
    /// Top level: end of input.
    Eof,
    /// Type or extension body: a closing `}`.
    Brace,
    /// Conditional clause: `#elseif`, `#else`, or `#endif` (left unconsumed).
    IfConfig,
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }

    // ------------------------------------------------------------------
    // Cursor primitives
    // ------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        if ch == '\n' {
            self.line += 1;
        }
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.starts_with("//") => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip spaces and tabs only, never newlines. Used where a newline would
    /// terminate the construct being parsed.
    fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
    }

    fn at_ident(&self) -> bool {
        matches!(self.peek(), Some(ch) if ch.is_alphabetic() || ch == '_')
    }

    fn read_ident(&mut self) -> Option<&'a str> {
        if !self.at_ident() {
            return None;
        }
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_alphanumeric() || ch == '_') {
            self.bump();
        }
        Some(&self.text[start..self.pos])
    }

    fn peek_ident(&self) -> Option<&'a str> {
        let mut probe = Parser {
            text: self.text,
            pos: self.pos,
            line: self.line,
        };
        probe.read_ident()
    }

    /// Read raw text until one of `stops` appears at zero paren/bracket
    /// depth, or until end of input. The stop character is not consumed.
    fn read_until(&mut self, stops: &[char]) -> &'a str {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(ch) = self.peek() {
            if depth == 0 && stops.contains(&ch) {
                break;
            }
            match ch {
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                '"' => {
                    self.skip_string_literal();
                    continue;
                }
                _ => {}
            }
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// Like [`Self::read_until`], but additionally balances `<...>` so
    /// generic arguments do not terminate a type early. Only safe in type
    /// position, where `<` is never a comparison.
    fn read_type(&mut self, stops: &[char]) -> &'a str {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(ch) = self.peek() {
            if depth == 0 && stops.contains(&ch) {
                break;
            }
            match ch {
                '(' | '[' | '<' => depth += 1,
                ')' | ']' | '>' => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// Consume a double-quoted string literal, backslash escapes honored.
    fn skip_string_literal(&mut self) {
        debug_assert_eq!(self.peek(), Some('"'));
        self.bump();
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    self.bump();
                }
                '"' => break,
                _ => {}
            }
        }
    }

    /// Capture a balanced `{ ... }` block, returning the inner text with
    /// surrounding whitespace trimmed.
    fn parse_block(&mut self) -> Result<String, ParseError> {
        let open_line = self.line;
        if !self.eat('{') {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "`{`",
            });
        }
        let start = self.pos;
        let mut depth = 1usize;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnbalancedBraces { line: open_line });
                }
                Some('"') => self.skip_string_literal(),
                Some('{') => {
                    depth += 1;
                    self.bump();
                }
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = self.text[start..self.pos].trim().to_string();
                        self.bump();
                        return Ok(inner);
                    }
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_decl_list(&mut self, end: ListEnd) -> Result<DeclList, ParseError> {
        let mut decls = Vec::new();
        loop {
            self.skip_ws();
            match end {
                ListEnd::Eof => {
                    if self.peek().is_none() {
                        break;
                    }
                }
                ListEnd::Brace => {
                    if self.peek() == Some('}') || self.peek().is_none() {
                        break;
                    }
                }
                ListEnd::IfConfig => {
                    if self.at_clause_boundary() || self.peek().is_none() {
                        break;
                    }
                }
            }
            decls.push(self.parse_decl()?);
        }
        Ok(DeclList::from_vec(decls))
    }

    fn at_clause_boundary(&self) -> bool {
        self.starts_with("#elseif") || self.starts_with("#else") || self.starts_with("#endif")
    }

    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        if self.starts_with("#if") {
            return self.parse_ifconfig().map(Decl::IfConfig);
        }
        if self.starts_with("#") {
            let directive: String = self
                .rest()
                .chars()
                .take_while(|ch| *ch == '#' || ch.is_alphanumeric())
                .collect();
            return Err(ParseError::DanglingDirective {
                line: self.line,
                directive,
            });
        }

        let attributes = self.parse_attributes()?;
        let modifiers = self.parse_modifiers();

        let Some(keyword) = self.peek_ident() else {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "a declaration keyword",
            });
        };

        match keyword {
            "var" | "let" => self.parse_var(attributes, modifiers),
            "init" => {
                if !attributes.is_empty() {
                    return Err(ParseError::Expected {
                        line: self.line,
                        expected: "no attributes before `init`",
                    });
                }
                self.parse_init(modifiers)
            }
            "func" => self.parse_func(attributes, modifiers),
            "struct" => self.parse_struct(attributes, modifiers),
            "extension" => {
                if !attributes.is_empty() || !modifiers.is_empty() {
                    return Err(ParseError::Expected {
                        line: self.line,
                        expected: "a plain `extension`",
                    });
                }
                self.parse_extension()
            }
            other => Err(ParseError::UnexpectedToken {
                line: self.line,
                token: other.to_string(),
            }),
        }
    }

    fn parse_attributes(&mut self) -> Result<Vec<String>, ParseError> {
        let mut attributes = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() != Some('@') {
                break;
            }
            let start = self.pos;
            self.bump();
            if self.read_ident().is_none() {
                return Err(ParseError::Expected {
                    line: self.line,
                    expected: "an attribute name after `@`",
                });
            }
            if self.peek() == Some('(') {
                // Arguments are kept raw inside the attribute text.
                let mut depth = 0usize;
                while let Some(ch) = self.peek() {
                    match ch {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            self.bump();
                            if depth == 0 {
                                break;
                            }
                            continue;
                        }
                        _ => {}
                    }
                    self.bump();
                }
            }
            attributes.push(self.text[start..self.pos].to_string());
        }
        Ok(attributes)
    }

    fn parse_modifiers(&mut self) -> Vec<String> {
        let mut modifiers = Vec::new();
        loop {
            self.skip_ws();
            match self.peek_ident() {
                Some(ident) if MODIFIERS.contains(&ident) => {
                    self.read_ident();
                    modifiers.push(ident.to_string());
                }
                _ => break,
            }
        }
        modifiers
    }

    fn parse_var(
        &mut self,
        attributes: Vec<String>,
        modifiers: Vec<String>,
    ) -> Result<Decl, ParseError> {
        let keyword = match self.read_ident() {
            Some("var") => BindingKeyword::Var,
            Some("let") => BindingKeyword::Let,
            _ => unreachable!("dispatched on `var`/`let`"),
        };
        self.skip_ws();
        let Some(name) = self.read_ident() else {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "a binding name",
            });
        };

        self.skip_inline_ws();
        let ty = if self.eat(':') {
            let ty = self.read_type(&['=', '{', '}', '\n']).trim().to_string();
            if ty.is_empty() {
                return Err(ParseError::Expected {
                    line: self.line,
                    expected: "a type annotation after `:`",
                });
            }
            Some(ty)
        } else {
            None
        };

        self.skip_inline_ws();
        let initializer = if self.eat('=') {
            let expr = self.read_until(&['{', '}', '\n']).trim().to_string();
            if expr.is_empty() {
                return Err(ParseError::Expected {
                    line: self.line,
                    expected: "an initializer expression after `=`",
                });
            }
            Some(expr)
        } else {
            None
        };

        self.skip_inline_ws();
        let accessor = if self.peek() == Some('{') {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Decl::Var(VarDecl {
            attributes,
            modifiers,
            keyword,
            name: name.to_string(),
            ty,
            initializer,
            accessor,
        }))
    }

    fn parse_init(&mut self, modifiers: Vec<String>) -> Result<Decl, ParseError> {
        self.read_ident();
        let failable = self.eat('?');
        self.skip_ws();
        if !self.eat('(') {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "`(` after `init`",
            });
        }
        let mut parameters = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(')') {
                break;
            }
            parameters.push(self.parse_parameter()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if !self.eat(')') {
                return Err(ParseError::Expected {
                    line: self.line,
                    expected: "`,` or `)` in parameter list",
                });
            }
            break;
        }
        self.skip_ws();
        let body = self.parse_block()?;
        Ok(Decl::Init(InitDecl {
            modifiers,
            failable,
            parameters,
            body,
        }))
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let first = self.read_ident().ok_or(ParseError::Expected {
            line: self.line,
            expected: "a parameter name",
        })?;
        self.skip_ws();
        let (label, name) = if let Some(second) = self.read_ident() {
            (Some(first.to_string()), second.to_string())
        } else {
            (None, first.to_string())
        };
        self.skip_ws();
        if !self.eat(':') {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "`:` after a parameter name",
            });
        }
        let ty = self.read_type(&['=', ',', ')']).trim().to_string();
        if ty.is_empty() {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "a parameter type",
            });
        }
        let default = if self.eat('=') {
            let expr = self.read_until(&[',', ')']).trim().to_string();
            if expr.is_empty() {
                return Err(ParseError::Expected {
                    line: self.line,
                    expected: "a default value after `=`",
                });
            }
            Some(expr)
        } else {
            None
        };
        Ok(Parameter {
            label,
            name,
            ty,
            default,
        })
    }

    fn parse_func(
        &mut self,
        attributes: Vec<String>,
        modifiers: Vec<String>,
    ) -> Result<Decl, ParseError> {
        self.read_ident();
        self.skip_ws();
        let Some(name) = self.read_ident() else {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "a function name",
            });
        };
        let signature = self.read_until(&['{', '}', '\n']).trim().to_string();
        self.skip_ws();
        let body = self.parse_block()?;
        Ok(Decl::Func(FuncDecl {
            attributes,
            modifiers,
            name: name.to_string(),
            signature,
            body,
        }))
    }

    fn parse_struct(
        &mut self,
        attributes: Vec<String>,
        modifiers: Vec<String>,
    ) -> Result<Decl, ParseError> {
        self.read_ident();
        self.skip_ws();
        let Some(name) = self.read_ident() else {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "a struct name",
            });
        };
        self.skip_ws();
        if !self.eat('{') {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "`{` to open a struct body",
            });
        }
        let members = self.parse_decl_list(ListEnd::Brace)?;
        if !self.eat('}') {
            return Err(ParseError::UnbalancedBraces { line: self.line });
        }
        Ok(Decl::Struct(StructDecl {
            attributes,
            modifiers,
            name: name.to_string(),
            members,
        }))
    }

    fn parse_extension(&mut self) -> Result<Decl, ParseError> {
        self.read_ident();
        let extended = self.read_until(&['{', '}', '\n']).trim().to_string();
        if extended.is_empty() {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "an extended type name",
            });
        }
        self.skip_ws();
        if !self.eat('{') {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "`{` to open an extension body",
            });
        }
        let members = self.parse_decl_list(ListEnd::Brace)?;
        if !self.eat('}') {
            return Err(ParseError::UnbalancedBraces { line: self.line });
        }
        Ok(Decl::Extension(ExtensionDecl { extended, members }))
    }

    fn parse_ifconfig(&mut self) -> Result<IfConfigDecl, ParseError> {
        let mut clauses = Vec::new();
        debug_assert!(self.starts_with("#if"));
        self.pos += "#if".len();
        let condition = self.read_until(&['\n']).trim().to_string();
        if condition.is_empty() {
            return Err(ParseError::Expected {
                line: self.line,
                expected: "a condition after `#if`",
            });
        }
        let members = self.parse_decl_list(ListEnd::IfConfig)?;
        clauses.push(IfConfigClause {
            keyword: IfConfigKeyword::If,
            condition: Some(condition),
            members,
        });

        loop {
            if self.starts_with("#elseif") {
                self.pos += "#elseif".len();
                let condition = self.read_until(&['\n']).trim().to_string();
                if condition.is_empty() {
                    return Err(ParseError::Expected {
                        line: self.line,
                        expected: "a condition after `#elseif`",
                    });
                }
                let members = self.parse_decl_list(ListEnd::IfConfig)?;
                clauses.push(IfConfigClause {
                    keyword: IfConfigKeyword::ElseIf,
                    condition: Some(condition),
                    members,
                });
            } else if self.starts_with("#else") {
                self.pos += "#else".len();
                let members = self.parse_decl_list(ListEnd::IfConfig)?;
                clauses.push(IfConfigClause {
                    keyword: IfConfigKeyword::Else,
                    condition: None,
                    members,
                });
            } else if self.starts_with("#endif") {
                self.pos += "#endif".len();
                return Ok(IfConfigDecl { clauses });
            } else {
                return Err(ParseError::Expected {
                    line: self.line,
                    expected: "`#endif`",
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::DeclKind;

    #[test]
    fn parses_stored_and_computed_bindings() {
        let file = parse_source("var a: Int\nvar b: Int { fatalError() }\nlet c = 3\n").unwrap();
        let decls: Vec<&Decl> = file.decls().iter().collect();
        assert_eq!(decls.len(), 3);

        let Decl::Var(a) = decls[0] else { panic!() };
        assert_eq!(a.name, "a");
        assert_eq!(a.ty.as_deref(), Some("Int"));
        assert!(!a.is_computed());

        let Decl::Var(b) = decls[1] else { panic!() };
        assert_eq!(b.accessor.as_deref(), Some("fatalError()"));

        let Decl::Var(c) = decls[2] else { panic!() };
        assert_eq!(c.keyword, BindingKeyword::Let);
        assert_eq!(c.ty, None);
        assert_eq!(c.initializer.as_deref(), Some("3"));
    }

    #[test]
    fn parses_struct_with_attribute_and_members() {
        let file = parse_source(
            "@_fixed_layout struct X {\n    var p0: Int\n    var p1: Int\n}\n",
        )
        .unwrap();
        let Some(Decl::Struct(x)) = file.decls().get(0) else {
            panic!("expected a struct");
        };
        assert_eq!(x.attributes, vec!["@_fixed_layout".to_string()]);
        assert_eq!(x.name, "X");
        assert_eq!(x.members.len(), 2);
    }

    #[test]
    fn parses_ifconfig_clauses() {
        let file = parse_source(
            "#if os(iOS)\nvar a: Int\n#elseif os(macOS)\nvar b: Int\n#else\nvar c: Int\n#endif\n",
        )
        .unwrap();
        let Some(Decl::IfConfig(block)) = file.decls().get(0) else {
            panic!("expected a #if block");
        };
        assert_eq!(block.clauses.len(), 3);
        assert_eq!(block.clauses[0].condition.as_deref(), Some("os(iOS)"));
        assert_eq!(block.clauses[1].keyword, IfConfigKeyword::ElseIf);
        assert_eq!(block.clauses[2].condition, None);
        assert_eq!(block.clauses[2].members.len(), 1);
    }

    #[test]
    fn parses_init_with_parameters_and_defaults() {
        let file = parse_source("init(a: Int, b: Int = 42) { self.a = a\nself.b = b }\n").unwrap();
        let Some(Decl::Init(init)) = file.decls().get(0) else {
            panic!("expected an init");
        };
        assert!(!init.failable);
        assert_eq!(init.parameters.len(), 2);
        assert_eq!(init.parameters[1].default.as_deref(), Some("42"));
    }

    #[test]
    fn parses_func_and_extension() {
        let file = parse_source(
            "func f(x: Int) -> Int { x }\nextension X: Equatable {\n    func g() { }\n}\n",
        )
        .unwrap();
        assert_eq!(file.decls().get(0).map(Decl::kind), Some(DeclKind::Func));
        let Some(Decl::Extension(ext)) = file.decls().get(1) else {
            panic!("expected an extension");
        };
        assert_eq!(ext.extended, "X: Equatable");
        assert_eq!(ext.members.len(), 1);
    }

    #[test]
    fn rejects_dangling_endif() {
        let err = parse_source("#endif\n").unwrap_err();
        assert!(matches!(err, ParseError::DanglingDirective { .. }));
    }

    #[test]
    fn rejects_unbalanced_body() {
        let err = parse_source("struct X {\nvar a: Int\n").unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedBraces { .. }));
    }

    #[test]
    fn brace_matching_skips_string_literals() {
        let file = parse_source("var s: String { \"}\" }\n").unwrap();
        let Some(Decl::Var(v)) = file.decls().get(0) else {
            panic!()
        };
        assert_eq!(v.accessor.as_deref(), Some("\"}\""));
    }
}
