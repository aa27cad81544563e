use crate::syntax::*;
use crate::*;

pub fn get_references(tree: &Tree) -> References {
    get_package_references(&[tree])
}

/// Resolves the references of all files of one package. Top-level
/// declarations are shared by the files; imports are visible only in
/// the file that declares them.
pub fn get_package_references(trees: &[&Tree]) -> References {
    let mut references = References::new();
    let mut package_scope = Scope::new();

    for tree in trees {
        if let Some(root) = tree.root() {
            register_source_file(tree, root, &mut package_scope);
        }
    }

    for tree in trees {
        if let Some(root) = tree.root() {
            let mut file_scope = package_scope.inner();
            register_imports(tree, root, &mut file_scope);
            resolve_source_file(tree, root, &mut file_scope, &mut references);
        }
    }

    references
}

fn register_source_file(tree: &Tree, root: &Node, scope: &mut Scope) {
    if let SourceFile {
        ref declarations, ..
    } = root.kind
    {
        for declaration in declarations.iter().filter_map(|d| tree.get(*d)) {
            register_top_level_declaration(tree, &declaration, scope);
        }
    }
}

fn register_imports(tree: &Tree, root: &Node, scope: &mut Scope) {
    if let SourceFile { ref imports, .. } = root.kind {
        for import in imports.iter().filter_map(|i| tree.get(*i)) {
            for spec in import.child_nodes(tree) {
                register_declaration(&spec, scope);
            }
        }
    }
}

fn register_top_level_declaration(tree: &Tree, declaration: &Node, scope: &mut Scope) {
    match declaration.kind {
        // Methods live in their receiver's method set, not the package scope.
        FunctionDecl { receiver, .. } if receiver == Id::NULL => {
            register_declaration(declaration, scope)
        }
        FunctionDecl { .. } => {}
        VarDecl { ref specs, .. } | ConstDecl { ref specs, .. } | TypeDecl { ref specs, .. } => {
            for spec in specs.iter().filter_map(|s| tree.get(*s)) {
                register_spec(tree, &spec, scope);
            }
        }
        _ => {}
    }
}

fn register_spec(tree: &Tree, spec: &Node, scope: &mut Scope) {
    match spec.kind {
        VarSpec { ref names, .. } | ConstSpec { ref names, .. } => {
            for name in names.iter().filter_map(|n| tree.get(*n)) {
                register_declaration(&name, scope);
            }
        }
        TypeSpec { .. } => register_declaration(spec, scope),
        _ => {}
    }
}

fn register_declaration(declaration: &Node, scope: &mut Scope) {
    if let ImportSpec {
        alias: Some(ref alias),
        ..
    } = declaration.kind
    {
        // Dot imports merge another package's scope into this one.
        if alias.kind == TokenKind::Period {
            return;
        }
    }

    if let Some(name) = declaration.declared_name() {
        scope.declare(name, declaration.id);
    }
}

fn resolve_source_file(tree: &Tree, root: &Node, scope: &mut Scope, references: &mut References) {
    if let SourceFile {
        ref declarations, ..
    } = root.kind
    {
        for declaration in declarations {
            resolve(tree, *declaration, scope, references);
        }
    }
}

fn resolve_all(tree: &Tree, ids: &[Id], scope: &mut Scope, references: &mut References) {
    for id in ids {
        resolve(tree, *id, scope, references);
    }
}

fn declare_all(tree: &Tree, ids: &[Id], scope: &mut Scope) {
    for declaration in ids.iter().filter_map(|i| tree.get(*i)) {
        register_declaration(&declaration, scope);
    }
}

/// Declares the parameters (and named results) of a signature.
fn declare_signature(tree: &Tree, signature: Id, scope: &mut Scope) {
    if let Some(signature) = tree.get(signature) {
        for parameter in signature.all_downwards(tree, &|n| matches!(n.kind, ParamDefinition(_))) {
            register_declaration(&parameter, scope);
        }
    }
}

fn resolve(tree: &Tree, id: Id, scope: &mut Scope, references: &mut References) {
    let node = match tree.get(id) {
        Some(node) => node,
        None => return,
    };

    match node.kind {
        Reference(ref token) => {
            if let Some(declaration) = scope.refer(token.lexeme().as_str()) {
                references.register_reference(node.id, declaration);
            }
        }

        FunctionDecl {
            receiver,
            signature,
            body,
            ..
        } => {
            let mut function_scope = scope.inner();
            declare_signature(tree, receiver, &mut function_scope);
            declare_signature(tree, signature, &mut function_scope);
            resolve(tree, body, &mut function_scope, references);
        }

        FuncLiteral { signature, body } => {
            let mut function_scope = scope.inner();
            declare_signature(tree, signature, &mut function_scope);
            resolve(tree, body, &mut function_scope, references);
        }

        Block { ref statements } => {
            let mut block_scope = scope.inner();
            resolve_all(tree, statements, &mut block_scope, references);
        }

        VarDecl { ref specs, .. } | ConstDecl { ref specs, .. } | TypeDecl { ref specs, .. } => {
            resolve_all(tree, specs, scope, references);
        }

        // The values are evaluated before the names come into scope.
        ShortVarDecl {
            ref names,
            ref values,
        }
        | VarSpec {
            ref names,
            ref values,
            ..
        }
        | ConstSpec {
            ref names,
            ref values,
            ..
        } => {
            resolve_all(tree, values, scope, references);
            declare_all(tree, names, scope);
        }

        TypeSpec { .. } => register_declaration(&node, scope),

        IfStatement {
            init,
            condition,
            body,
            else_branch,
        } => {
            let mut if_scope = scope.inner();
            resolve_all(
                tree,
                &[init, condition, body, else_branch],
                &mut if_scope,
                references,
            );
        }

        ForStatement {
            init,
            condition,
            post,
            body,
        } => {
            let mut for_scope = scope.inner();
            resolve_all(
                tree,
                &[init, condition, post, body],
                &mut for_scope,
                references,
            );
        }

        RangeClause {
            ref keys,
            ref operator,
            expression,
        } => {
            resolve(tree, expression, scope, references);
            match operator {
                Some(Token {
                    kind: TokenKind::ColonEqual,
                    ..
                }) => declare_all(tree, keys, scope),
                _ => resolve_all(tree, keys, scope, references),
            }
        }

        SwitchStatement {
            init,
            tag,
            ref clauses,
        } => {
            let mut switch_scope = scope.inner();
            resolve_all(tree, &[init, tag], &mut switch_scope, references);
            resolve_all(tree, clauses, &mut switch_scope, references);
        }

        CaseClause {
            ref expressions,
            ref statements,
            ..
        } => {
            let mut clause_scope = scope.inner();
            resolve_all(tree, expressions, &mut clause_scope, references);
            resolve_all(tree, statements, &mut clause_scope, references);
        }

        // Bare keys in composite literals name struct fields.
        KeyedElement { key, value } => {
            if !tree.get(key).map(|k| k.is_reference()).unwrap_or(false) {
                resolve(tree, key, scope, references);
            }
            resolve(tree, value, scope, references);
        }

        _ => {
            let children = node.children();
            resolve_all(tree, &children, scope, references);
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

    fn resolved(code: &str) -> (Arc<Tree>, References) {
        let (tree, diagnostics) = Parser::new(&Source::test(code)).parse();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let references = get_references(&tree);
        (tree, references)
    }

    /// The declarations every reference named `name` resolves to, in order.
    fn declarations_of(tree: &Tree, references: &References, name: &str) -> Vec<Option<Node>> {
        tree.root()
            .unwrap()
            .all_references_downwards(tree)
            .into_iter()
            .filter(|r| tree.text_of(r) == name)
            .map(|r| references.declaration_of(r.id).and_then(|d| tree.get(d)))
            .collect()
    }

    #[test]
    fn local_variable() {
        let (tree, references) =
            resolved("package main\n\nfunc main() {\n\tn := 300\n\tf(n)\n}\n");
        let declarations = declarations_of(&tree, &references, "n");
        assert_eq!(declarations.len(), 1);
        assert_matches!(declarations[0], Some(Node { kind: VarDefinition(_), .. }));
    }

    #[test]
    fn package_level_declarations_are_visible_before_declaration() {
        let (tree, references) =
            resolved("package main\n\nfunc main() {\n\tf(n)\n}\n\nvar n = 512\n");
        assert_matches!(
            declarations_of(&tree, &references, "n")[0],
            Some(Node { kind: VarDefinition(_), .. })
        );
    }

    #[test]
    fn local_declarations_are_not_visible_before_declaration() {
        let (tree, references) =
            resolved("package main\n\nfunc main() {\n\tf(n)\n\tn := 1\n}\n");
        assert_matches!(declarations_of(&tree, &references, "n")[0], None);
    }

    #[test]
    fn initializer_refers_to_outer_declaration() {
        let (tree, references) = resolved(
            "package main\n\nvar n = 1\n\nfunc main() {\n\tn := n\n\tf(n)\n}\n",
        );
        let declarations = declarations_of(&tree, &references, "n");
        assert_eq!(declarations.len(), 2);
        let outer = declarations[0].clone().unwrap();
        let inner = declarations[1].clone().unwrap();
        assert_ne!(outer.id, inner.id);
        assert_eq!(outer.span.start.line, 3);
        assert_eq!(inner.span.start.line, 6);
    }

    #[test]
    fn parameters_constants_and_imports() {
        let (tree, references) = resolved(
            "package main\n\nimport \"runtime\"\n\nconst c = 512\n\nfunc f(p int) {\n\truntime.GOMAXPROCS(p)\n\tg(c)\n}\n",
        );
        assert_matches!(
            declarations_of(&tree, &references, "p")[0],
            Some(Node { kind: ParamDefinition(_), .. })
        );
        assert_matches!(
            declarations_of(&tree, &references, "c")[0],
            Some(Node { kind: ConstDefinition(_), .. })
        );
        assert_matches!(
            declarations_of(&tree, &references, "runtime")[0],
            Some(Node { kind: ImportSpec { .. }, .. })
        );
    }

    #[test]
    fn block_scopes_end_with_their_block() {
        let (tree, references) = resolved(
            "package main\n\nfunc main() {\n\tif true {\n\t\tn := 1\n\t\tf(n)\n\t}\n\tf(n)\n}\n",
        );
        let declarations = declarations_of(&tree, &references, "n");
        assert!(declarations[0].is_some());
        assert!(declarations[1].is_none());
    }

    #[test]
    fn range_keys() {
        let (tree, references) = resolved(
            "package main\n\nfunc main() {\n\tfor i := range xs {\n\t\tf(i)\n\t}\n}\n",
        );
        assert_matches!(
            declarations_of(&tree, &references, "i")[0],
            Some(Node { kind: VarDefinition(_), .. })
        );
    }

    #[test]
    fn struct_field_keys_are_not_resolved() {
        let (tree, references) = resolved(
            "package main\n\nvar X = 1\n\nvar p = Point{X: X}\n",
        );
        let declarations = declarations_of(&tree, &references, "X");
        assert_eq!(declarations.len(), 2);
        assert!(declarations[0].is_none());
        assert!(declarations[1].is_some());
    }

    #[test]
    fn package_declarations_are_shared_between_files() {
        let main = parse("package main\n\nfunc main() {\n\tf(procs)\n\tf(runtime)\n}\n");
        let other = parse("package main\n\nimport \"runtime\"\n\nvar procs = 512\n");
        let references = get_package_references(&[&*main, &*other]);

        let procs = declarations_of(&main, &references, "procs");
        assert_eq!(procs.len(), 1);
        assert!(procs[0].is_none());
        let declaration = references
            .declaration_of(
                main.root()
                    .unwrap()
                    .all_references_downwards(&main)
                    .into_iter()
                    .find(|r| main.text_of(r) == "procs")
                    .unwrap()
                    .id,
            )
            .and_then(|id| other.get(id));
        assert_matches!(declaration, Some(Node { kind: VarDefinition(_), .. }));

        let runtime = main
            .root()
            .unwrap()
            .all_references_downwards(&main)
            .into_iter()
            .find(|r| main.text_of(r) == "runtime")
            .unwrap();
        assert_eq!(references.declaration_of(runtime.id), None);
    }
}
