use crate::syntax::*;
use crate::*;

#[derive(Clone)]
pub struct Node {
    pub id: Id,
    pub parent_id: Option<Id>,
    pub span: Span,
    pub kind: NodeKind,
}

impl Node {
    pub fn children(&self) -> Vec<Id> {
        self.kind.children()
    }

    pub fn child_nodes(&self, tree: &Tree) -> Vec<Node> {
        let mut out = vec![];
        for child_id in self.children() {
            if let Some(n) = tree.get(child_id) {
                out.push(n);
            }
        }
        out
    }

    /// Traverses all nodes in the tree below this point.
    /// If the callback returns true for a given node, the
    /// traversal will continue down its children. Otherwise,
    /// the traversal will not traverse down that path.
    pub fn traverse<F: FnMut(&Node) -> bool>(&self, tree: &Tree, f: &mut F) {
        if !f(self) {
            return;
        }

        for child in self.child_nodes(tree) {
            child.traverse(tree, f);
        }
    }

    pub fn closest_upwards<F: Fn(&Node) -> bool>(&self, tree: &Tree, f: F) -> Option<Node> {
        if f(self) {
            return Some(self.clone());
        }
        let mut parent = self.parent_id?;
        loop {
            let parent_node = tree.get(parent)?;
            if f(&parent_node) {
                return Some(parent_node);
            }
            parent = parent_node.parent_id?;
        }
    }

    pub fn all_downwards<F: Fn(&Node) -> bool>(&self, tree: &Tree, f: &F) -> Vec<Node> {
        let mut nodes = vec![];

        if f(self) {
            nodes.push(self.clone());
        }

        for child in self.child_nodes(tree) {
            nodes.extend(child.all_downwards(tree, f));
        }

        nodes
    }

    pub fn is_declaration(&self) -> bool {
        match self.kind {
            ImportSpec { .. }
            | FunctionDecl { .. }
            | ParamDefinition(_)
            | VarDefinition(_)
            | ConstDefinition(_)
            | TypeSpec { .. } => true,
            _ => false,
        }
    }

    /// The name a declaration node introduces into its scope.
    pub fn declared_name(&self) -> Option<String> {
        match self.kind {
            ImportSpec {
                ref alias,
                ref path,
            } => match alias {
                Some(alias) => Some(alias.lexeme()),
                None => {
                    let path = path.lexeme();
                    let path = path.trim_matches(|c| c == '"' || c == '`');
                    path.rsplit('/').next().map(String::from)
                }
            },
            FunctionDecl { ref name, .. } | TypeSpec { ref name, .. } => Some(name.lexeme()),
            ParamDefinition(ref t) | VarDefinition(ref t) | ConstDefinition(ref t) => {
                Some(t.lexeme())
            }
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, Reference(_))
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, Call { .. })
    }

    pub fn is_expression(&self) -> bool {
        match self.kind {
            IntegerExpression(_)
            | FloatExpression(_)
            | ImaginaryExpression(_)
            | RuneExpression(_)
            | StringExpression(_)
            | Reference(_)
            | Selector { .. }
            | Call { .. }
            | Index { .. }
            | Slice { .. }
            | TypeAssertion { .. }
            | Unary { .. }
            | Binary { .. }
            | Paren { .. }
            | CompositeLiteral { .. }
            | FuncLiteral { .. } => true,
            _ => false,
        }
    }

    pub fn all_calls_downwards(&self, tree: &Tree) -> Vec<Node> {
        self.all_downwards(tree, &|n| n.is_call())
    }

    pub fn all_references_downwards(&self, tree: &Tree) -> Vec<Node> {
        self.all_downwards(tree, &|n| n.is_reference())
    }

    pub fn all_declarations_downwards(&self, tree: &Tree) -> Vec<Node> {
        self.all_downwards(tree, &|n| n.is_declaration())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} @ {}: {:?}", self.id, self.span, self.kind)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// ```bnf
    /// SourceFile ::=
    ///   PackageClause SEMICOLON
    ///   (ImportDecl SEMICOLON)*
    ///   (TopLevelDecl SEMICOLON)*
    /// ```
    SourceFile {
        package_clause: Id,
        imports: Vec<Id>,
        declarations: Vec<Id>,
    },

    /// ```bnf
    /// PackageClause ::=
    ///   PACKAGE_KEYWORD IDENTIFIER
    /// ```
    PackageClause {
        package_keyword: Option<Token>,
        name: Token,
    },

    /// ```bnf
    /// ImportDecl ::=
    ///   IMPORT_KEYWORD (ImportSpec | OPEN_PAREN (ImportSpec SEMICOLON)* CLOSE_PAREN)
    /// ```
    ImportDecl {
        import_keyword: Option<Token>,
        specs: Vec<Id>,
    },

    /// ```bnf
    /// ImportSpec ::=
    ///   (PERIOD | IDENTIFIER)? STRING_LITERAL
    /// ```
    ImportSpec { alias: Option<Token>, path: Token },

    /// ```bnf
    /// FunctionDecl ::=
    ///   FUNC_KEYWORD Parameters? IDENTIFIER Signature Block?
    /// ```
    FunctionDecl {
        func_keyword: Option<Token>,
        receiver: Id,
        name: Token,
        signature: Id,
        body: Id,
    },

    /// ```bnf
    /// Signature ::=
    ///   Parameters (Parameters | TypeExpression)?
    /// ```
    Signature { parameters: Id, result: Id },

    /// ```bnf
    /// Parameters ::=
    ///   OPEN_PAREN (ParameterDecl (COMMA ParameterDecl)* COMMA?)? CLOSE_PAREN
    /// ```
    Parameters { declarations: Vec<Id> },

    /// ```bnf
    /// ParameterDecl ::=
    ///   (ParamDefinition (COMMA ParamDefinition)*)? ELLIPSIS? TypeExpression
    /// ```
    ParameterDecl {
        names: Vec<Id>,
        ellipsis: Option<Token>,
        type_expression: Id,
    },

    /// ```bnf
    /// ParamDefinition ::= IDENTIFIER
    /// ```
    ParamDefinition(Token),

    /// Type expressions are kept opaque; their text
    /// is all the analysis ever needs.
    TypeExpression(Vec<Token>),

    /// ```bnf
    /// VarDecl ::=
    ///   VAR_KEYWORD (VarSpec | OPEN_PAREN (VarSpec SEMICOLON)* CLOSE_PAREN)
    /// ```
    VarDecl {
        var_keyword: Option<Token>,
        specs: Vec<Id>,
    },

    /// ```bnf
    /// VarSpec ::=
    ///   VarDefinition (COMMA VarDefinition)*
    ///   (TypeExpression (EQUAL_SIGN ExpressionList)? | EQUAL_SIGN ExpressionList)
    /// ```
    VarSpec {
        names: Vec<Id>,
        type_expression: Id,
        values: Vec<Id>,
    },

    /// ```bnf
    /// VarDefinition ::= IDENTIFIER
    /// ```
    VarDefinition(Token),

    /// ```bnf
    /// ConstDecl ::=
    ///   CONST_KEYWORD (ConstSpec | OPEN_PAREN (ConstSpec SEMICOLON)* CLOSE_PAREN)
    /// ```
    ConstDecl {
        const_keyword: Option<Token>,
        specs: Vec<Id>,
    },

    /// ```bnf
    /// ConstSpec ::=
    ///   ConstDefinition (COMMA ConstDefinition)*
    ///   (TypeExpression? EQUAL_SIGN ExpressionList)?
    /// ```
    ConstSpec {
        names: Vec<Id>,
        type_expression: Id,
        values: Vec<Id>,
    },

    /// ```bnf
    /// ConstDefinition ::= IDENTIFIER
    /// ```
    ConstDefinition(Token),

    /// ```bnf
    /// TypeDecl ::=
    ///   TYPE_KEYWORD (TypeSpec | OPEN_PAREN (TypeSpec SEMICOLON)* CLOSE_PAREN)
    /// ```
    TypeDecl {
        type_keyword: Option<Token>,
        specs: Vec<Id>,
    },

    /// ```bnf
    /// TypeSpec ::=
    ///   IDENTIFIER EQUAL_SIGN? TypeExpression
    /// ```
    TypeSpec { name: Token, type_expression: Id },

    /// ```bnf
    /// Block ::=
    ///   OPEN_CURLY (Statement SEMICOLON)* CLOSE_CURLY
    /// ```
    Block { statements: Vec<Id> },

    ExpressionStatement { expression: Id },

    /// ```bnf
    /// ShortVarDecl ::=
    ///   VarDefinition (COMMA VarDefinition)* COLON_EQUAL ExpressionList
    /// ```
    ShortVarDecl { names: Vec<Id>, values: Vec<Id> },

    /// ```bnf
    /// Assignment ::=
    ///   ExpressionList ASSIGN_OP ExpressionList
    /// ```
    Assignment {
        targets: Vec<Id>,
        operator: Token,
        values: Vec<Id>,
    },

    IncDecStatement { expression: Id, operator: Token },

    SendStatement { channel: Id, value: Id },

    ReturnStatement { values: Vec<Id> },

    /// `break`, `continue` and `fallthrough`, with an optional label.
    BranchStatement {
        keyword: Token,
        label: Option<Token>,
    },

    /// `go` and `defer` statements.
    DeferredCall { keyword: Token, expression: Id },

    /// ```bnf
    /// IfStatement ::=
    ///   IF_KEYWORD (SimpleStatement SEMICOLON)? Expression Block
    ///   (ELSE_KEYWORD (IfStatement | Block))?
    /// ```
    IfStatement {
        init: Id,
        condition: Id,
        body: Id,
        else_branch: Id,
    },

    /// ```bnf
    /// ForStatement ::=
    ///   FOR_KEYWORD
    ///   (Expression | SimpleStatement? SEMICOLON Expression? SEMICOLON SimpleStatement? | RangeClause)?
    ///   Block
    /// ```
    ForStatement {
        init: Id,
        condition: Id,
        post: Id,
        body: Id,
    },

    /// ```bnf
    /// RangeClause ::=
    ///   (ExpressionList (EQUAL_SIGN | COLON_EQUAL))? RANGE_KEYWORD Expression
    /// ```
    /// When the operator is `:=`, the keys are `VarDefinition` nodes.
    RangeClause {
        keys: Vec<Id>,
        operator: Option<Token>,
        expression: Id,
    },

    /// ```bnf
    /// SwitchStatement ::=
    ///   SWITCH_KEYWORD (SimpleStatement SEMICOLON)? SimpleStatement?
    ///   OPEN_CURLY CaseClause* CLOSE_CURLY
    /// ```
    SwitchStatement {
        init: Id,
        tag: Id,
        clauses: Vec<Id>,
    },

    /// ```bnf
    /// CaseClause ::=
    ///   (CASE_KEYWORD ExpressionList | DEFAULT_KEYWORD) COLON (Statement SEMICOLON)*
    /// ```
    CaseClause {
        keyword: Token,
        expressions: Vec<Id>,
        statements: Vec<Id>,
    },

    IntegerExpression(Token),
    FloatExpression(Token),
    ImaginaryExpression(Token),
    RuneExpression(Token),
    StringExpression(Token),

    /// A bare identifier in expression position.
    Reference(Token),

    Selector { operand: Id, selector: Token },

    /// ```bnf
    /// Call ::=
    ///   Expression OPEN_PAREN (Expression (COMMA Expression)* ELLIPSIS? COMMA?)? CLOSE_PAREN
    /// ```
    Call {
        callee: Id,
        arguments: Vec<Id>,
        ellipsis: Option<Token>,
    },

    Index { operand: Id, index: Id },

    Slice {
        operand: Id,
        low: Id,
        high: Id,
        max: Id,
    },

    /// `x.(T)`, or `x.(type)` when the type expression is absent.
    TypeAssertion { operand: Id, type_expression: Id },

    Unary { operator: Token, operand: Id },

    Binary {
        left: Id,
        operator: Token,
        right: Id,
    },

    Paren { expression: Id },

    /// ```bnf
    /// CompositeLiteral ::=
    ///   TypeExpression? OPEN_CURLY (Element (COMMA Element)* COMMA?)? CLOSE_CURLY
    /// ```
    CompositeLiteral {
        type_expression: Id,
        elements: Vec<Id>,
    },

    KeyedElement { key: Id, value: Id },

    FuncLiteral { signature: Id, body: Id },
}

pub use NodeKind::*;

impl NodeKind {
    pub fn children(&self) -> Vec<Id> {
        let mut children = vec![];

        match self {
            SourceFile {
                package_clause,
                imports,
                declarations,
            } => {
                children.push(package_clause);
                children.extend(imports);
                children.extend(declarations);
            }
            ImportDecl { specs, .. }
            | VarDecl { specs, .. }
            | ConstDecl { specs, .. }
            | TypeDecl { specs, .. } => {
                children.extend(specs);
            }
            FunctionDecl {
                receiver,
                signature,
                body,
                ..
            } => {
                children.push(receiver);
                children.push(signature);
                children.push(body);
            }
            Signature { parameters, result } => {
                children.push(parameters);
                children.push(result);
            }
            Parameters { declarations } => {
                children.extend(declarations);
            }
            ParameterDecl {
                names,
                type_expression,
                ..
            } => {
                children.extend(names);
                children.push(type_expression);
            }
            VarSpec {
                names,
                type_expression,
                values,
            }
            | ConstSpec {
                names,
                type_expression,
                values,
            } => {
                children.extend(names);
                children.push(type_expression);
                children.extend(values);
            }
            TypeSpec {
                type_expression, ..
            } => {
                children.push(type_expression);
            }
            Block { statements } => {
                children.extend(statements);
            }
            ExpressionStatement { expression }
            | IncDecStatement { expression, .. }
            | DeferredCall { expression, .. }
            | Paren { expression } => {
                children.push(expression);
            }
            ShortVarDecl { names, values } => {
                children.extend(names);
                children.extend(values);
            }
            Assignment {
                targets, values, ..
            } => {
                children.extend(targets);
                children.extend(values);
            }
            SendStatement { channel, value } => {
                children.push(channel);
                children.push(value);
            }
            ReturnStatement { values } => {
                children.extend(values);
            }
            IfStatement {
                init,
                condition,
                body,
                else_branch,
            } => {
                children.push(init);
                children.push(condition);
                children.push(body);
                children.push(else_branch);
            }
            ForStatement {
                init,
                condition,
                post,
                body,
            } => {
                children.push(init);
                children.push(condition);
                children.push(post);
                children.push(body);
            }
            RangeClause {
                keys, expression, ..
            } => {
                children.extend(keys);
                children.push(expression);
            }
            SwitchStatement { init, tag, clauses } => {
                children.push(init);
                children.push(tag);
                children.extend(clauses);
            }
            CaseClause {
                expressions,
                statements,
                ..
            } => {
                children.extend(expressions);
                children.extend(statements);
            }
            Selector { operand, .. } => {
                children.push(operand);
            }
            Call {
                callee, arguments, ..
            } => {
                children.push(callee);
                children.extend(arguments);
            }
            Index { operand, index } => {
                children.push(operand);
                children.push(index);
            }
            Slice {
                operand,
                low,
                high,
                max,
            } => {
                children.push(operand);
                children.push(low);
                children.push(high);
                children.push(max);
            }
            TypeAssertion {
                operand,
                type_expression,
            } => {
                children.push(operand);
                children.push(type_expression);
            }
            Unary { operand, .. } => {
                children.push(operand);
            }
            Binary { left, right, .. } => {
                children.push(left);
                children.push(right);
            }
            CompositeLiteral {
                type_expression,
                elements,
            } => {
                children.push(type_expression);
                children.extend(elements);
            }
            KeyedElement { key, value } => {
                children.push(key);
                children.push(value);
            }
            FuncLiteral { signature, body } => {
                children.push(signature);
                children.push(body);
            }
            PackageClause { .. }
            | ImportSpec { .. }
            | ParamDefinition(_)
            | TypeExpression(_)
            | VarDefinition(_)
            | ConstDefinition(_)
            | BranchStatement { .. }
            | IntegerExpression(_)
            | FloatExpression(_)
            | ImaginaryExpression(_)
            | RuneExpression(_)
            | StringExpression(_)
            | Reference(_) => {}
        }

        children
            .into_iter()
            .cloned()
            .filter(|i| !i.is_null())
            .collect::<Vec<_>>()
    }
}
