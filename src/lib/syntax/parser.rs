use crate::syntax::*;
use crate::*;
use TokenKind::*;

type ParseResult<T> = Result<T, Diagnostic>;

macro_rules! consume {
    ($self: expr, $kind: pat) => {{
        if !matches!($self.peek(), $kind) {
            return Err($self.unexpected(stringify!($kind)));
        }
        $self.advance()
    }};
}

macro_rules! sees {
    ($self: expr, $kind: pat, $ahead: expr) => {{
        matches!($self.peek_at($ahead), $kind)
    }};

    ($self: expr, $kind: pat) => {{
        sees!($self, $kind, 0)
    }};
}

macro_rules! sees_semicolon {
    ($self: expr) => {
        sees!($self, Semicolon | ImplicitSemicolon)
    };
}

pub struct Parser {
    tokens: Vec<Token>,
    offset: usize,
    last_end: Location,
    tree: Tree,
    diagnostics: Vec<Diagnostic>,

    /// Negative while parsing the header of an `if`, `for` or
    /// `switch`, where `T{` opens the body rather than a literal.
    expression_level: i32,
}

impl Parser {
    pub fn new(source: &Arc<Source>) -> Parser {
        Parser {
            tokens: tokenize(source.clone())
                .into_iter()
                .filter(|t| !t.kind.is_trivia())
                .collect(),
            offset: 0,
            last_end: Location::at_offset(source, 0),
            tree: Tree::new(source.clone()),
            diagnostics: vec![],
            expression_level: 0,
        }
    }

    pub fn parse(mut self) -> (Arc<Tree>, Vec<Diagnostic>) {
        let root = self.parse_source_file();
        self.tree.set_root(root);
        (Arc::new(self.tree), self.diagnostics)
    }

    /// Parses the whole source as a single expression.
    pub fn parse_standalone_expression(mut self) -> (Arc<Tree>, Vec<Diagnostic>) {
        match self.parse_expression() {
            Ok(id) => {
                self.skip_semicolons();
                if !sees!(self, EOF) {
                    let d = self.unexpected("end of expression");
                    self.diagnostics.push(d);
                }
                self.tree.set_root(id);
            }
            Err(d) => self.diagnostics.push(d),
        }
        (Arc::new(self.tree), self.diagnostics)
    }

    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        let index = (self.offset + ahead).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.offset].clone();
        if token.kind != EOF {
            self.offset += 1;
            self.last_end = token.span.end.clone();
        }
        token
    }

    fn start(&self) -> Location {
        self.tokens[self.offset].span.start.clone()
    }

    fn finish(&mut self, start: Location, kind: NodeKind) -> Id {
        let end = if self.last_end.offset < start.offset {
            start.clone()
        } else {
            self.last_end.clone()
        };
        self.insert(Span::new(start, end), kind)
    }

    fn insert(&mut self, span: Span, kind: NodeKind) -> Id {
        let id = Id::new();
        self.tree.add(Node {
            id,
            parent_id: None,
            span,
            kind,
        });
        id
    }

    fn unexpected(&self, expected: &str) -> Diagnostic {
        let token = &self.tokens[self.offset];
        let found = match token.kind {
            EOF => "end of file".into(),
            ImplicitSemicolon => "newline".into(),
            _ => format!("`{}`", token.lexeme()),
        };
        Diagnostic::SyntaxError(
            token.span.clone(),
            format!("Expected {}, found {}.", expected, found),
        )
    }

    fn skip_semicolons(&mut self) {
        while sees_semicolon!(self) {
            self.advance();
        }
    }

    fn expect_semicolon(&mut self) -> ParseResult<()> {
        if sees_semicolon!(self) {
            self.advance();
            Ok(())
        } else if sees!(self, CloseParen | CloseCurly | EOF) {
            Ok(())
        } else {
            Err(self.unexpected("end of statement"))
        }
    }

    /// Skips to the end of the current statement, leaving any
    /// closing brace of the enclosing block in place.
    fn recover(&mut self, from: usize) {
        let mut depth = 0;
        loop {
            match self.peek() {
                EOF => break,
                OpenParen | OpenBracket | OpenCurly => depth += 1,
                CloseParen | CloseBracket => {
                    if depth > 0 {
                        depth -= 1;
                    }
                }
                CloseCurly => {
                    if depth == 0 {
                        if self.offset == from {
                            self.advance();
                        }
                        break;
                    }
                    depth -= 1;
                }
                Semicolon | ImplicitSemicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn report(&mut self, diagnostic: Diagnostic, from: usize) {
        debug!("Syntax error: {:?}", diagnostic);
        self.diagnostics.push(diagnostic);
        self.recover(from);
    }

    fn parse_source_file(&mut self) -> Id {
        let start = self.start();
        self.skip_semicolons();

        let package_clause = match self.parse_package_clause() {
            Ok(id) => id,
            Err(d) => {
                let from = self.offset;
                self.report(d, from);
                Id::NULL
            }
        };
        self.skip_semicolons();

        let mut imports = vec![];
        while sees!(self, ImportKeyword) {
            let from = self.offset;
            match self
                .parse_import_decl()
                .and_then(|id| self.expect_semicolon().map(|_| id))
            {
                Ok(id) => imports.push(id),
                Err(d) => self.report(d, from),
            }
            self.skip_semicolons();
        }

        let mut declarations = vec![];
        while !sees!(self, EOF) {
            let from = self.offset;
            let declaration = match self.peek() {
                FuncKeyword => self.parse_function_decl(),
                VarKeyword => self.parse_var_decl(),
                ConstKeyword => self.parse_const_decl(),
                TypeKeyword => self.parse_type_decl(),
                _ => Err(self.unexpected("declaration")),
            };
            match declaration.and_then(|id| self.expect_semicolon().map(|_| id)) {
                Ok(id) => declarations.push(id),
                Err(d) => self.report(d, from),
            }
            self.skip_semicolons();
        }

        self.finish(
            start,
            SourceFile {
                package_clause,
                imports,
                declarations,
            },
        )
    }

    fn parse_package_clause(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let package_keyword = consume!(self, PackageKeyword);
        let name = consume!(self, Identifier(_));
        Ok(self.finish(
            start,
            PackageClause {
                package_keyword: Some(package_keyword),
                name,
            },
        ))
    }

    fn parse_grouped<F: Fn(&mut Self) -> ParseResult<Id>>(&mut self, f: F) -> ParseResult<Vec<Id>> {
        if !sees!(self, OpenParen) {
            return Ok(vec![f(self)?]);
        }

        self.advance();
        let mut specs = vec![];
        loop {
            self.skip_semicolons();
            if sees!(self, CloseParen | EOF) {
                break;
            }
            specs.push(f(self)?);
            self.expect_semicolon()?;
        }
        consume!(self, CloseParen);
        Ok(specs)
    }

    fn parse_import_decl(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let import_keyword = consume!(self, ImportKeyword);
        let specs = self.parse_grouped(Self::parse_import_spec)?;
        Ok(self.finish(
            start,
            ImportDecl {
                import_keyword: Some(import_keyword),
                specs,
            },
        ))
    }

    fn parse_import_spec(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let alias = if sees!(self, Identifier(_) | Period) {
            Some(self.advance())
        } else {
            None
        };
        let path = consume!(self, StringLiteral(_));
        Ok(self.finish(start, ImportSpec { alias, path }))
    }

    fn parse_function_decl(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let func_keyword = consume!(self, FuncKeyword);
        let receiver = if sees!(self, OpenParen) {
            self.parse_parameters()?
        } else {
            Id::NULL
        };
        let name = consume!(self, Identifier(_));
        let signature = self.parse_signature()?;
        let body = if sees!(self, OpenCurly) {
            self.parse_function_body()?
        } else {
            Id::NULL
        };
        Ok(self.finish(
            start,
            FunctionDecl {
                func_keyword: Some(func_keyword),
                receiver,
                name,
                signature,
                body,
            },
        ))
    }

    fn parse_function_body(&mut self) -> ParseResult<Id> {
        let level = std::mem::replace(&mut self.expression_level, 0);
        let body = self.parse_block();
        self.expression_level = level;
        body
    }

    fn parse_signature(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let parameters = self.parse_parameters()?;
        let result = if sees!(self, OpenParen) {
            self.parse_parameters()?
        } else if self.sees_type() {
            self.parse_type()?
        } else {
            Id::NULL
        };
        Ok(self.finish(start, Signature { parameters, result }))
    }

    /// Parameter lists are ambiguous until the whole list is seen:
    /// in `(a, b int)` both `a` and `b` are names, while in
    /// `(a, b)` both are types.
    fn parse_parameters(&mut self) -> ParseResult<Id> {
        let start = self.start();
        consume!(self, OpenParen);

        let mut entries: Vec<(Option<Token>, Option<Token>, Id)> = vec![];
        while !sees!(self, CloseParen | EOF) {
            let named = sees!(self, Identifier(_))
                && !sees!(self, Comma | CloseParen | Period | ImplicitSemicolon, 1);
            let name = if named { Some(self.advance()) } else { None };
            let ellipsis = if sees!(self, Ellipsis) {
                Some(self.advance())
            } else {
                None
            };
            let type_expression = self.parse_type()?;
            entries.push((name, ellipsis, type_expression));

            if sees!(self, Comma) {
                self.advance();
            } else {
                break;
            }
        }
        consume!(self, CloseParen);

        let any_named = entries.iter().any(|(name, _, _)| name.is_some());
        let mut declarations = vec![];
        let mut pending_names = vec![];

        for (name, ellipsis, type_expression) in entries {
            if !any_named {
                let span = self.span_of(type_expression);
                declarations.push(self.insert(
                    span,
                    ParameterDecl {
                        names: vec![],
                        ellipsis,
                        type_expression,
                    },
                ));
                continue;
            }

            match name {
                None => match self.single_identifier_type(type_expression) {
                    Some(token) => {
                        self.tree.remove(type_expression);
                        pending_names.push(token);
                    }
                    None => {
                        return Err(Diagnostic::SyntaxError(
                            self.span_of(type_expression),
                            "Mixed named and unnamed parameters.".into(),
                        ))
                    }
                },
                Some(name) => {
                    pending_names.push(name);
                    let mut names = vec![];
                    let first = pending_names[0].span.clone();
                    for name in pending_names.drain(..) {
                        let span = name.span.clone();
                        names.push(self.insert(span, ParamDefinition(name)));
                    }
                    let span = first.through(&self.span_of(type_expression));
                    declarations.push(self.insert(
                        span,
                        ParameterDecl {
                            names,
                            ellipsis,
                            type_expression,
                        },
                    ));
                }
            }
        }

        if !pending_names.is_empty() {
            return Err(Diagnostic::SyntaxError(
                pending_names[0].span.clone(),
                "Mixed named and unnamed parameters.".into(),
            ));
        }

        Ok(self.finish(start, Parameters { declarations }))
    }

    fn span_of(&self, id: Id) -> Span {
        self.tree
            .get(id)
            .map(|n| n.span)
            .unwrap_or_else(|| Span::new(self.last_end.clone(), self.last_end.clone()))
    }

    fn single_identifier_type(&self, id: Id) -> Option<Token> {
        match self.tree.get(id)?.kind {
            TypeExpression(ref tokens) if tokens.len() == 1 => match tokens[0].kind {
                Identifier(_) => Some(tokens[0].clone()),
                _ => None,
            },
            _ => None,
        }
    }

    fn sees_type(&self) -> bool {
        sees!(
            self,
            Identifier(_)
                | OpenBracket
                | Asterisk
                | MapKeyword
                | ChanKeyword
                | FuncKeyword
                | StructKeyword
                | InterfaceKeyword
                | Arrow
                | OpenParen
        )
    }

    pub fn parse_type(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let mut tokens = vec![];
        self.collect_type(&mut tokens)?;
        Ok(self.finish(start, TypeExpression(tokens)))
    }

    fn collect_type(&mut self, tokens: &mut Vec<Token>) -> ParseResult<()> {
        match self.peek() {
            Identifier(_) => {
                tokens.push(self.advance());
                if sees!(self, Period) && sees!(self, Identifier(_), 1) {
                    tokens.push(self.advance());
                    tokens.push(self.advance());
                }
                Ok(())
            }
            Asterisk => {
                tokens.push(self.advance());
                self.collect_type(tokens)
            }
            OpenBracket => {
                if sees!(self, CloseBracket, 1) {
                    tokens.push(self.advance());
                    tokens.push(self.advance());
                } else {
                    self.collect_balanced(tokens)?;
                }
                self.collect_type(tokens)
            }
            MapKeyword => {
                tokens.push(self.advance());
                tokens.push(consume!(self, OpenBracket));
                self.collect_type(tokens)?;
                tokens.push(consume!(self, CloseBracket));
                self.collect_type(tokens)
            }
            ChanKeyword => {
                tokens.push(self.advance());
                if sees!(self, Arrow) {
                    tokens.push(self.advance());
                }
                self.collect_type(tokens)
            }
            Arrow => {
                tokens.push(self.advance());
                tokens.push(consume!(self, ChanKeyword));
                self.collect_type(tokens)
            }
            FuncKeyword => {
                tokens.push(self.advance());
                if !sees!(self, OpenParen) {
                    return Err(self.unexpected("parameters"));
                }
                self.collect_balanced(tokens)?;
                if sees!(self, OpenParen) {
                    self.collect_balanced(tokens)
                } else if sees!(self, Identifier(_) | OpenBracket | Asterisk | MapKeyword | ChanKeyword)
                {
                    self.collect_type(tokens)
                } else {
                    Ok(())
                }
            }
            StructKeyword | InterfaceKeyword => {
                tokens.push(self.advance());
                if !sees!(self, OpenCurly) {
                    return Err(self.unexpected("`{`"));
                }
                self.collect_balanced(tokens)
            }
            OpenParen => {
                tokens.push(self.advance());
                self.collect_type(tokens)?;
                tokens.push(consume!(self, CloseParen));
                Ok(())
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// Collects tokens from an opening bracket through its matching
    /// closing bracket.
    fn collect_balanced(&mut self, tokens: &mut Vec<Token>) -> ParseResult<()> {
        let mut depth = 0;
        loop {
            match self.peek() {
                EOF => return Err(self.unexpected("closing bracket")),
                OpenParen | OpenBracket | OpenCurly => depth += 1,
                CloseParen | CloseBracket | CloseCurly => depth -= 1,
                _ => {}
            }
            tokens.push(self.advance());
            if depth == 0 {
                return Ok(());
            }
        }
    }

    fn parse_var_decl(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let var_keyword = consume!(self, VarKeyword);
        let specs = self.parse_grouped(Self::parse_var_spec)?;
        Ok(self.finish(
            start,
            VarDecl {
                var_keyword: Some(var_keyword),
                specs,
            },
        ))
    }

    fn parse_definitions<F: Fn(Token) -> NodeKind>(&mut self, f: F) -> ParseResult<Vec<Id>> {
        let mut names = vec![];
        loop {
            let name = consume!(self, Identifier(_));
            let span = name.span.clone();
            names.push(self.insert(span, f(name)));
            if sees!(self, Comma) {
                self.advance();
            } else {
                return Ok(names);
            }
        }
    }

    fn parse_var_spec(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let names = self.parse_definitions(VarDefinition)?;
        let type_expression = if !sees!(self, EqualSign) && self.sees_type() {
            self.parse_type()?
        } else {
            Id::NULL
        };
        let values = if sees!(self, EqualSign) {
            self.advance();
            self.parse_expression_list()?
        } else {
            vec![]
        };
        Ok(self.finish(
            start,
            VarSpec {
                names,
                type_expression,
                values,
            },
        ))
    }

    fn parse_const_decl(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let const_keyword = consume!(self, ConstKeyword);
        let specs = self.parse_grouped(Self::parse_const_spec)?;
        Ok(self.finish(
            start,
            ConstDecl {
                const_keyword: Some(const_keyword),
                specs,
            },
        ))
    }

    fn parse_const_spec(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let names = self.parse_definitions(ConstDefinition)?;
        let type_expression = if !sees!(self, EqualSign) && self.sees_type() {
            self.parse_type()?
        } else {
            Id::NULL
        };
        let values = if sees!(self, EqualSign) {
            self.advance();
            self.parse_expression_list()?
        } else {
            vec![]
        };
        Ok(self.finish(
            start,
            ConstSpec {
                names,
                type_expression,
                values,
            },
        ))
    }

    fn parse_type_decl(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let type_keyword = consume!(self, TypeKeyword);
        let specs = self.parse_grouped(Self::parse_type_spec)?;
        Ok(self.finish(
            start,
            TypeDecl {
                type_keyword: Some(type_keyword),
                specs,
            },
        ))
    }

    fn parse_type_spec(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let name = consume!(self, Identifier(_));
        if sees!(self, EqualSign) {
            self.advance();
        }
        let type_expression = self.parse_type()?;
        Ok(self.finish(
            start,
            TypeSpec {
                name,
                type_expression,
            },
        ))
    }

    pub fn parse_block(&mut self) -> ParseResult<Id> {
        let start = self.start();
        consume!(self, OpenCurly);
        let statements = self.parse_statement_list();
        consume!(self, CloseCurly);
        Ok(self.finish(start, Block { statements }))
    }

    fn parse_statement_list(&mut self) -> Vec<Id> {
        let mut statements = vec![];
        loop {
            self.skip_semicolons();
            if sees!(self, CloseCurly | CaseKeyword | DefaultKeyword | EOF) {
                return statements;
            }
            let from = self.offset;
            match self
                .parse_statement()
                .and_then(|id| self.expect_semicolon().map(|_| id))
            {
                Ok(id) => statements.push(id),
                Err(d) => self.report(d, from),
            }
        }
    }

    pub fn parse_statement(&mut self) -> ParseResult<Id> {
        match self.peek() {
            VarKeyword => self.parse_var_decl(),
            ConstKeyword => self.parse_const_decl(),
            TypeKeyword => self.parse_type_decl(),
            ReturnKeyword => {
                let start = self.start();
                self.advance();
                let values = if sees_semicolon!(self) || sees!(self, CloseCurly) {
                    vec![]
                } else {
                    self.parse_expression_list()?
                };
                Ok(self.finish(start, ReturnStatement { values }))
            }
            BreakKeyword | ContinueKeyword | FallthroughKeyword | GotoKeyword => {
                let start = self.start();
                let keyword = self.advance();
                let label = if sees!(self, Identifier(_)) {
                    Some(self.advance())
                } else {
                    None
                };
                Ok(self.finish(start, BranchStatement { keyword, label }))
            }
            GoKeyword | DeferKeyword => {
                let start = self.start();
                let keyword = self.advance();
                let expression = self.parse_expression()?;
                Ok(self.finish(start, DeferredCall { keyword, expression }))
            }
            IfKeyword => self.parse_if_statement(),
            ForKeyword => self.parse_for_statement(),
            SwitchKeyword => self.parse_switch_statement(),
            OpenCurly => self.parse_block(),
            SelectKeyword => Err(self.unexpected("supported statement")),
            _ => self.parse_simple_statement(false),
        }
    }

    fn parse_simple_statement(&mut self, range_allowed: bool) -> ParseResult<Id> {
        let start = self.start();

        if range_allowed && sees!(self, RangeKeyword) {
            self.advance();
            let expression = self.parse_expression()?;
            return Ok(self.finish(
                start,
                RangeClause {
                    keys: vec![],
                    operator: None,
                    expression,
                },
            ));
        }

        let left = self.parse_expression_list()?;

        match self.peek().clone() {
            ColonEqual => {
                let operator = self.advance();
                let names = self.references_to_definitions(left)?;
                if range_allowed && sees!(self, RangeKeyword) {
                    self.advance();
                    let expression = self.parse_expression()?;
                    return Ok(self.finish(
                        start,
                        RangeClause {
                            keys: names,
                            operator: Some(operator),
                            expression,
                        },
                    ));
                }
                let values = self.parse_expression_list()?;
                Ok(self.finish(start, ShortVarDecl { names, values }))
            }
            kind if kind.is_assign_operator() => {
                let operator = self.advance();
                if range_allowed && kind == EqualSign && sees!(self, RangeKeyword) {
                    self.advance();
                    let expression = self.parse_expression()?;
                    return Ok(self.finish(
                        start,
                        RangeClause {
                            keys: left,
                            operator: Some(operator),
                            expression,
                        },
                    ));
                }
                let values = self.parse_expression_list()?;
                Ok(self.finish(
                    start,
                    Assignment {
                        targets: left,
                        operator,
                        values,
                    },
                ))
            }
            Increment | Decrement if left.len() == 1 => {
                let operator = self.advance();
                Ok(self.finish(
                    start,
                    IncDecStatement {
                        expression: left[0],
                        operator,
                    },
                ))
            }
            Arrow if left.len() == 1 => {
                self.advance();
                let value = self.parse_expression()?;
                Ok(self.finish(
                    start,
                    SendStatement {
                        channel: left[0],
                        value,
                    },
                ))
            }
            Colon if left.len() == 1 && self.is_reference(left[0]) => {
                // Labels are not tracked; the labeled statement stands alone.
                self.advance();
                self.tree.remove(left[0]);
                self.skip_semicolons();
                if sees!(self, CloseCurly) {
                    return Err(self.unexpected("statement"));
                }
                self.parse_statement()
            }
            _ if left.len() == 1 => Ok(self.finish(
                start,
                ExpressionStatement {
                    expression: left[0],
                },
            )),
            _ => Err(self.unexpected("`:=` or `=`")),
        }
    }

    fn is_reference(&self, id: Id) -> bool {
        self.tree.get(id).map(|n| n.is_reference()).unwrap_or(false)
    }

    fn references_to_definitions(&mut self, ids: Vec<Id>) -> ParseResult<Vec<Id>> {
        let mut names = vec![];
        for id in ids {
            match self.tree.get(id) {
                Some(Node {
                    kind: Reference(token),
                    span,
                    ..
                }) => {
                    self.tree.remove(id);
                    names.push(self.insert(span, VarDefinition(token)));
                }
                _ => {
                    return Err(Diagnostic::SyntaxError(
                        self.span_of(id),
                        "Expected name on the left side of `:=`.".into(),
                    ))
                }
            }
        }
        Ok(names)
    }

    /// Unwraps a statement that must be a plain expression,
    /// such as the condition of an `if`.
    fn statement_to_expression(&mut self, id: Id) -> ParseResult<Id> {
        match self.tree.get(id) {
            Some(Node {
                kind: ExpressionStatement { expression },
                ..
            }) => {
                self.tree.remove(id);
                Ok(expression)
            }
            _ => Err(Diagnostic::SyntaxError(
                self.span_of(id),
                "Expected expression.".into(),
            )),
        }
    }

    fn parse_if_statement(&mut self) -> ParseResult<Id> {
        let start = self.start();
        consume!(self, IfKeyword);

        let level = std::mem::replace(&mut self.expression_level, -1);
        let header = self.parse_if_header();
        self.expression_level = level;
        let (init, condition) = header?;

        let body = self.parse_block()?;
        let else_branch = if sees!(self, ElseKeyword) {
            self.advance();
            if sees!(self, IfKeyword) {
                self.parse_if_statement()?
            } else {
                self.parse_block()?
            }
        } else {
            Id::NULL
        };

        Ok(self.finish(
            start,
            IfStatement {
                init,
                condition,
                body,
                else_branch,
            },
        ))
    }

    fn parse_if_header(&mut self) -> ParseResult<(Id, Id)> {
        let statement = self.parse_simple_statement(false)?;
        if sees!(self, Semicolon) {
            self.advance();
            let condition = self.parse_expression()?;
            Ok((statement, condition))
        } else {
            Ok((Id::NULL, self.statement_to_expression(statement)?))
        }
    }

    fn parse_for_statement(&mut self) -> ParseResult<Id> {
        let start = self.start();
        consume!(self, ForKeyword);

        let level = std::mem::replace(&mut self.expression_level, -1);
        let header = self.parse_for_header();
        self.expression_level = level;
        let (init, condition, post) = header?;

        let body = self.parse_block()?;
        Ok(self.finish(
            start,
            ForStatement {
                init,
                condition,
                post,
                body,
            },
        ))
    }

    fn parse_for_header(&mut self) -> ParseResult<(Id, Id, Id)> {
        if sees!(self, OpenCurly) {
            return Ok((Id::NULL, Id::NULL, Id::NULL));
        }

        let init = if sees!(self, Semicolon) {
            Id::NULL
        } else {
            let statement = self.parse_simple_statement(true)?;
            let is_range = matches!(
                self.tree.get(statement).map(|n| n.kind),
                Some(RangeClause { .. })
            );
            if is_range {
                return Ok((Id::NULL, statement, Id::NULL));
            }
            if !sees!(self, Semicolon) {
                return Ok((Id::NULL, self.statement_to_expression(statement)?, Id::NULL));
            }
            statement
        };

        consume!(self, Semicolon);
        let condition = if sees!(self, Semicolon) {
            Id::NULL
        } else {
            self.parse_expression()?
        };
        consume!(self, Semicolon);
        let post = if sees!(self, OpenCurly) {
            Id::NULL
        } else {
            self.parse_simple_statement(false)?
        };
        Ok((init, condition, post))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Id> {
        let start = self.start();
        consume!(self, SwitchKeyword);

        let level = std::mem::replace(&mut self.expression_level, -1);
        let header = self.parse_switch_header();
        self.expression_level = level;
        let (init, tag) = header?;

        consume!(self, OpenCurly);
        let mut clauses = vec![];
        loop {
            self.skip_semicolons();
            if !sees!(self, CaseKeyword | DefaultKeyword) {
                break;
            }
            clauses.push(self.parse_case_clause()?);
        }
        consume!(self, CloseCurly);

        Ok(self.finish(start, SwitchStatement { init, tag, clauses }))
    }

    fn parse_switch_header(&mut self) -> ParseResult<(Id, Id)> {
        if sees!(self, OpenCurly) {
            return Ok((Id::NULL, Id::NULL));
        }
        let statement = if sees!(self, Semicolon) {
            Id::NULL
        } else {
            self.parse_simple_statement(false)?
        };
        if !sees!(self, Semicolon) {
            return Ok((Id::NULL, statement));
        }
        self.advance();
        let tag = if sees!(self, OpenCurly) {
            Id::NULL
        } else {
            self.parse_simple_statement(false)?
        };
        Ok((statement, tag))
    }

    fn parse_case_clause(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let keyword = self.advance();
        let expressions = if keyword.kind == CaseKeyword {
            self.parse_expression_list()?
        } else {
            vec![]
        };
        consume!(self, Colon);
        let statements = self.parse_statement_list();
        Ok(self.finish(
            start,
            CaseClause {
                keyword,
                expressions,
                statements,
            },
        ))
    }

    pub fn parse_expression_list(&mut self) -> ParseResult<Vec<Id>> {
        let mut expressions = vec![self.parse_expression()?];
        while sees!(self, Comma) {
            self.advance();
            expressions.push(self.parse_expression()?);
        }
        Ok(expressions)
    }

    pub fn parse_expression(&mut self) -> ParseResult<Id> {
        self.parse_binary_expression(1)
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> ParseResult<Id> {
        let start = self.start();
        let mut left = self.parse_unary_expression()?;

        while let Some(precedence) = self.peek().binary_precedence() {
            if precedence < min_precedence {
                break;
            }
            let operator = self.advance();
            let right = self.parse_binary_expression(precedence + 1)?;
            left = self.finish(
                start.clone(),
                Binary {
                    left,
                    operator,
                    right,
                },
            );
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Id> {
        if sees!(
            self,
            Plus | Minus | Bang | Caret | Asterisk | Ampersand | Arrow
        ) {
            let start = self.start();
            let operator = self.advance();
            let operand = self.parse_unary_expression()?;
            return Ok(self.finish(start, Unary { operator, operand }));
        }
        self.parse_primary_expression()
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Id> {
        let start = self.start();
        let mut operand = self.parse_operand()?;

        loop {
            match self.peek() {
                Period => {
                    self.advance();
                    if sees!(self, OpenParen) {
                        self.advance();
                        let type_expression = if sees!(self, TypeKeyword) {
                            self.advance();
                            Id::NULL
                        } else {
                            self.parse_type()?
                        };
                        consume!(self, CloseParen);
                        operand = self.finish(
                            start.clone(),
                            TypeAssertion {
                                operand,
                                type_expression,
                            },
                        );
                    } else {
                        let selector = consume!(self, Identifier(_));
                        operand = self.finish(start.clone(), Selector { operand, selector });
                    }
                }
                OpenParen => {
                    operand = self.parse_call(start.clone(), operand)?;
                }
                OpenBracket => {
                    operand = self.parse_index_or_slice(start.clone(), operand)?;
                }
                OpenCurly if self.is_literal_type(operand) => {
                    operand = self.parse_literal_value(start.clone(), operand)?;
                }
                _ => return Ok(operand),
            }
        }
    }

    /// Whether `{` after this operand opens a composite literal.
    fn is_literal_type(&self, id: Id) -> bool {
        match self.tree.get(id).map(|n| n.kind) {
            Some(Reference(_)) => self.expression_level >= 0,
            Some(Selector { operand, .. }) => {
                self.expression_level >= 0 && self.is_reference(operand)
            }
            Some(TypeExpression(ref tokens)) => match tokens.first().map(|t| &t.kind) {
                Some(OpenBracket) | Some(MapKeyword) | Some(StructKeyword) => true,
                _ => false,
            },
            _ => false,
        }
    }

    fn parse_call(&mut self, start: Location, callee: Id) -> ParseResult<Id> {
        consume!(self, OpenParen);
        let level = self.expression_level;
        self.expression_level = level.max(0) + 1;

        let mut arguments = vec![];
        let mut ellipsis = None;
        let result = loop {
            if sees!(self, CloseParen | EOF) {
                break Ok(());
            }
            match self.parse_expression() {
                Ok(argument) => arguments.push(argument),
                Err(d) => break Err(d),
            }
            if sees!(self, Ellipsis) {
                ellipsis = Some(self.advance());
            }
            if sees!(self, Comma) {
                self.advance();
            } else {
                break Ok(());
            }
        };
        self.expression_level = level;
        result?;

        consume!(self, CloseParen);
        Ok(self.finish(
            start,
            Call {
                callee,
                arguments,
                ellipsis,
            },
        ))
    }

    fn parse_index_or_slice(&mut self, start: Location, operand: Id) -> ParseResult<Id> {
        consume!(self, OpenBracket);
        let level = self.expression_level;
        self.expression_level = level.max(0) + 1;
        let result = self.parse_index_or_slice_body(start, operand);
        self.expression_level = level;
        result
    }

    fn parse_index_or_slice_body(&mut self, start: Location, operand: Id) -> ParseResult<Id> {
        let low = if sees!(self, Colon) {
            Id::NULL
        } else {
            self.parse_expression()?
        };

        if !sees!(self, Colon) {
            consume!(self, CloseBracket);
            return Ok(self.finish(start, Index { operand, index: low }));
        }

        self.advance();
        let high = if sees!(self, Colon | CloseBracket) {
            Id::NULL
        } else {
            self.parse_expression()?
        };
        let max = if sees!(self, Colon) {
            self.advance();
            self.parse_expression()?
        } else {
            Id::NULL
        };
        consume!(self, CloseBracket);
        Ok(self.finish(
            start,
            Slice {
                operand,
                low,
                high,
                max,
            },
        ))
    }

    fn parse_literal_value(&mut self, start: Location, type_expression: Id) -> ParseResult<Id> {
        consume!(self, OpenCurly);
        let level = self.expression_level;
        self.expression_level = level.max(0) + 1;
        let elements = self.parse_elements();
        self.expression_level = level;
        let elements = elements?;
        consume!(self, CloseCurly);

        Ok(self.finish(
            start,
            CompositeLiteral {
                type_expression,
                elements,
            },
        ))
    }

    fn parse_elements(&mut self) -> ParseResult<Vec<Id>> {
        let mut elements = vec![];
        loop {
            self.skip_semicolons();
            if sees!(self, CloseCurly | EOF) {
                return Ok(elements);
            }

            let start = self.start();
            let key = self.parse_element()?;
            let element = if sees!(self, Colon) {
                self.advance();
                let value = self.parse_element()?;
                self.finish(start, KeyedElement { key, value })
            } else {
                key
            };
            elements.push(element);

            self.skip_semicolons();
            if sees!(self, Comma) {
                self.advance();
            } else {
                self.skip_semicolons();
                return Ok(elements);
            }
        }
    }

    fn parse_element(&mut self) -> ParseResult<Id> {
        if sees!(self, OpenCurly) {
            let start = self.start();
            self.parse_literal_value(start, Id::NULL)
        } else {
            self.parse_expression()
        }
    }

    fn parse_operand(&mut self) -> ParseResult<Id> {
        let start = self.start();
        match self.peek() {
            IntLiteral(_) => {
                let t = self.advance();
                Ok(self.finish(start, IntegerExpression(t)))
            }
            FloatLiteral(_) => {
                let t = self.advance();
                Ok(self.finish(start, FloatExpression(t)))
            }
            ImaginaryLiteral(_) => {
                let t = self.advance();
                Ok(self.finish(start, ImaginaryExpression(t)))
            }
            RuneLiteral(_) => {
                let t = self.advance();
                Ok(self.finish(start, RuneExpression(t)))
            }
            StringLiteral(_) => {
                let t = self.advance();
                Ok(self.finish(start, StringExpression(t)))
            }
            Identifier(_) => {
                let t = self.advance();
                Ok(self.finish(start, Reference(t)))
            }
            OpenParen => {
                self.advance();
                let level = self.expression_level;
                self.expression_level = level.max(0) + 1;
                let expression = self.parse_expression();
                self.expression_level = level;
                let expression = expression?;
                consume!(self, CloseParen);
                Ok(self.finish(start, Paren { expression }))
            }
            FuncKeyword => {
                self.advance();
                let signature = self.parse_signature()?;
                let body = if sees!(self, OpenCurly) {
                    self.parse_function_body()?
                } else {
                    Id::NULL
                };
                Ok(self.finish(start, FuncLiteral { signature, body }))
            }
            OpenBracket | MapKeyword | ChanKeyword | StructKeyword | InterfaceKeyword => {
                self.parse_type()
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    fn parse(code: &str) -> Arc<Tree> {
        let (tree, diagnostics) = Parser::new(&Source::test(code)).parse();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        tree
    }

    fn parse_expression(code: &str) -> (Arc<Tree>, Node) {
        let (tree, diagnostics) = Parser::new(&Source::test(code)).parse_standalone_expression();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let root = tree.root().cloned().unwrap();
        (tree, root)
    }

    fn texts_of<F: Fn(&Node) -> bool>(tree: &Tree, f: F) -> Vec<String> {
        tree.root()
            .unwrap()
            .all_downwards(tree, &f)
            .iter()
            .map(|n| tree.text_of(n))
            .collect()
    }

    #[test]
    fn package_and_imports() {
        let tree = parse("package main\n\nimport (\n\t\"fmt\"\n\trt \"runtime\"\n)\n");
        let root = tree.root().unwrap();
        assert_matches!(root.kind, SourceFile { ref imports, .. } if imports.len() == 1);
        let names: Vec<_> = root
            .all_declarations_downwards(&tree)
            .iter()
            .filter_map(Node::declared_name)
            .collect();
        assert_eq!(names, vec!["fmt".to_string(), "rt".to_string()]);
    }

    #[test]
    fn selector_call() {
        let (tree, call) = parse_expression("runtime.GOMAXPROCS(512)");
        match call.kind {
            Call {
                callee,
                ref arguments,
                ..
            } => {
                assert_eq!(tree.text_of(&tree.get(callee).unwrap()), "runtime.GOMAXPROCS");
                assert_eq!(arguments.len(), 1);
                assert_matches!(
                    tree.get(arguments[0]).unwrap().kind,
                    IntegerExpression(Token { kind: TokenKind::IntLiteral(ref s), .. }) if s == "512"
                );
            }
            _ => panic!("expected a call, got {:?}", call),
        }
    }

    #[test]
    fn binary_precedence() {
        let (tree, binary) = parse_expression("1 + 2 * 3");
        match binary.kind {
            Binary { left, right, .. } => {
                assert_eq!(tree.text_of(&tree.get(left).unwrap()), "1");
                assert_eq!(tree.text_of(&tree.get(right).unwrap()), "2 * 3");
            }
            _ => panic!("expected a binary expression, got {:?}", binary),
        }
    }

    #[test]
    fn unary_literal() {
        let (_, unary) = parse_expression("+512");
        assert_matches!(unary.kind, Unary { .. });
    }

    #[test]
    fn short_var_declarations_define_variables() {
        let tree = parse("package main\n\nfunc main() {\n\tn := 300\n\tf(n)\n}\n");
        assert_eq!(
            texts_of(&tree, |n| matches!(n.kind, VarDefinition(_))),
            vec!["n"]
        );
        assert_eq!(texts_of(&tree, |n| n.is_reference()), vec!["f", "n"]);
    }

    #[test]
    fn parameters_share_types() {
        let tree = parse("package main\n\nfunc f(a, b int, c string) {}\n");
        let declarations = tree
            .root()
            .unwrap()
            .all_downwards(&tree, &|n| matches!(n.kind, ParameterDecl { .. }));
        assert_eq!(declarations.len(), 2);
        assert_eq!(
            texts_of(&tree, |n| matches!(n.kind, ParamDefinition(_))),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            texts_of(&tree, |n| matches!(n.kind, TypeExpression(_))),
            vec!["int", "string"]
        );
    }

    #[test]
    fn unnamed_parameters() {
        let tree = parse("package main\n\nfunc f(int, string) (int, error)\n");
        assert!(texts_of(&tree, |n| matches!(n.kind, ParamDefinition(_))).is_empty());
        assert_eq!(
            texts_of(&tree, |n| matches!(n.kind, TypeExpression(_))),
            vec!["int", "string", "int", "error"]
        );
    }

    #[test]
    fn grouped_var_and_const() {
        let tree = parse(
            "package main\n\nvar (\n\ta = 1\n\tb int64 = 2\n)\n\nconst (\n\tc = 3\n\td\n)\n",
        );
        assert_eq!(
            texts_of(&tree, |n| matches!(n.kind, VarDefinition(_))),
            vec!["a", "b"]
        );
        assert_eq!(
            texts_of(&tree, |n| matches!(n.kind, ConstDefinition(_))),
            vec!["c", "d"]
        );
    }

    #[test]
    fn control_flow() {
        let tree = parse(
            r#"package main

func main() {
	if x := f(); x > 0 {
		g(x)
	} else if y {
	} else {
	}
	for i := 0; i < 10; i++ {
	}
	for k, v := range m {
		h(k, v)
	}
	for cond {
	}
	switch t := v.(type) {
	case int, string:
		return
	default:
		fallthrough
	}
}
"#,
        );
        assert_eq!(
            texts_of(&tree, |n| matches!(n.kind, VarDefinition(_))),
            vec!["x", "i", "k", "v", "t"]
        );
    }

    #[test]
    fn composite_literals() {
        let tree = parse(
            "package main\n\nvar p = Point{X: 1, Y: 2}\nvar s = []int{1, 2,\n\t3,\n}\nvar m = map[string]int{\"a\": 1}\n",
        );
        assert_eq!(
            tree.root()
                .unwrap()
                .all_downwards(&tree, &|n| matches!(n.kind, CompositeLiteral { .. }))
                .len(),
            3
        );
    }

    #[test]
    fn composite_literal_is_not_parsed_in_if_header() {
        let tree = parse("package main\n\nfunc main() {\n\tif x == y {\n\t}\n}\n");
        assert!(tree
            .root()
            .unwrap()
            .all_downwards(&tree, &|n| matches!(n.kind, CompositeLiteral { .. }))
            .is_empty());
    }

    #[test]
    fn func_literals_and_deferred_calls() {
        let tree = parse(
            "package main\n\nfunc main() {\n\tgo func(n int) {\n\t\tdefer done()\n\t}(1)\n}\n",
        );
        assert_eq!(tree.root().unwrap().all_calls_downwards(&tree).len(), 2);
    }

    #[test]
    fn recovers_from_unsupported_statements() {
        let (tree, diagnostics) = Parser::new(&Source::test(
            "package main\n\nfunc main() {\n\tselect {\n\tcase <-c:\n\t}\n\truntime.GOMAXPROCS(512)\n}\n",
        ))
        .parse();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            texts_of(&tree, |n| n.is_call()),
            vec!["runtime.GOMAXPROCS(512)"]
        );
    }

    #[test]
    fn reports_missing_package_clause() {
        let (_, diagnostics) = Parser::new(&Source::test("func main() {}\n")).parse();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "Expected PackageKeyword, found `func`."
        );
    }
}
