use crate::semantics::Navigator;
use crate::syntax::*;
use crate::*;
use std::sync::Mutex;

const PREDECLARED_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// A type as written in source, e.g. `int` or `[]string`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type(String);

impl Type {
    pub fn named<S: Into<String>>(name: S) -> Type {
        Type(name.into())
    }

    pub fn name(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_predeclared(&self) -> bool {
        PREDECLARED_TYPES.contains(&self.name())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Type({})", self.0)
    }
}

/// Best-effort static types of expressions. Anything that would need
/// real type checking is reported as unknown.
#[derive(Clone)]
pub struct Types {
    navigator: Navigator,
    references: Arc<References>,
    types_cache: Arc<Mutex<HashMap<Id, Option<Type>>>>,
}

impl Types {
    pub fn new(navigator: Navigator, references: Arc<References>) -> Types {
        Types {
            navigator,
            references,
            types_cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Memoizes the type of a node. A node whose type is being computed
    /// reads as unknown, which cuts initialization cycles like `var a = b; var b = a`.
    fn type_gate<F: FnOnce() -> Option<Type>>(&self, node: &Node, f: F) -> Option<Type> {
        {
            if let Ok(mut cache) = self.types_cache.lock() {
                if let Some(type_) = cache.get(&node.id) {
                    return type_.clone();
                }
                cache.insert(node.id, None);
            }
        }

        let type_ = f();

        {
            if let Ok(mut cache) = self.types_cache.lock() {
                cache.insert(node.id, type_.clone());
            }
        }

        type_
    }

    fn declaration_of(&self, reference: &Node) -> Option<Node> {
        let declaration = self.references.declaration_of(reference.id)?;
        self.navigator.find_node(declaration)
    }

    pub fn get_type_of_expression(&self, expression: &Node) -> Option<Type> {
        self.type_gate(expression, || match expression.kind {
            IntegerExpression(_) => Some(Type::named("int")),
            FloatExpression(_) => Some(Type::named("float64")),
            ImaginaryExpression(_) => Some(Type::named("complex128")),
            RuneExpression(_) => Some(Type::named("rune")),
            StringExpression(_) => Some(Type::named("string")),

            Reference(ref name) => match self.declaration_of(expression) {
                Some(declaration) => self.get_type_of_declaration(&declaration),
                None => match name.lexeme().as_str() {
                    "true" | "false" => Some(Type::named("bool")),
                    _ => None,
                },
            },

            Call {
                callee,
                ref arguments,
                ..
            } if arguments.len() == 1 => {
                let callee = self.navigator.find_child(expression, callee)?;
                self.get_conversion_type(&callee)
            }

            Paren { expression: inner } => {
                let inner = self.navigator.find_child(expression, inner)?;
                self.get_type_of_expression(&inner)
            }

            Unary {
                ref operator,
                operand,
            } => match operator.kind {
                TokenKind::Plus | TokenKind::Minus | TokenKind::Caret => {
                    let operand = self.navigator.find_child(expression, operand)?;
                    self.get_type_of_expression(&operand)
                }
                TokenKind::Bang => Some(Type::named("bool")),
                _ => None,
            },

            Binary {
                left,
                ref operator,
                right,
            } => match operator.kind {
                TokenKind::DoubleEqual
                | TokenKind::NotEqual
                | TokenKind::OpenAngle
                | TokenKind::CloseAngle
                | TokenKind::LessEqual
                | TokenKind::GreaterEqual
                | TokenKind::LogicalAnd
                | TokenKind::LogicalOr => Some(Type::named("bool")),

                TokenKind::ShiftLeft | TokenKind::ShiftRight => {
                    let left = self.navigator.find_child(expression, left)?;
                    self.get_type_of_expression(&left)
                }

                _ => {
                    let left = self.navigator.find_child(expression, left)?;
                    let right = self.navigator.find_child(expression, right)?;
                    let left_type = self.get_type_of_expression(&left)?;
                    let right_type = self.get_type_of_expression(&right)?;
                    if left_type == right_type {
                        Some(left_type)
                    } else {
                        None
                    }
                }
            },

            _ => None,
        })
    }

    pub fn get_type_of_declaration(&self, declaration: &Node) -> Option<Type> {
        self.type_gate(declaration, || match declaration.kind {
            VarDefinition(_) | ParamDefinition(_) | ConstDefinition(_) => {
                if let Some(type_expression) = self.navigator.declared_type_of(declaration) {
                    let name = self.navigator.text_of(&type_expression)?;
                    return if self.navigator.is_variadic_parameter(declaration) {
                        Some(Type::named(format!("[]{}", name)))
                    } else {
                        Some(Type::named(name))
                    };
                }

                let initializer = self.navigator.initializer_of(declaration)?;
                self.get_type_of_expression(&initializer)
            }
            _ => None,
        })
    }

    /// `T(x)` converts to `T` when `T` names a type.
    fn get_conversion_type(&self, callee: &Node) -> Option<Type> {
        let name = match callee.kind {
            Reference(ref name) => name.lexeme(),
            _ => return None,
        };

        match self.declaration_of(callee) {
            Some(Node {
                kind: TypeSpec { .. },
                ..
            }) => Some(Type::named(name)),
            Some(_) => None,
            None => Some(Type::named(name)).filter(Type::is_predeclared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::*;

    fn type_of_argument(code: &str) -> Option<Type> {
        let (tree, diagnostics) = syntax::Parser::new(&Source::test(code)).parse();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let analysis: Analysis = vec![(tree.source.uri.clone(), tree)].into_iter().into();

        let call = analysis
            .navigator
            .all_calls()
            .into_iter()
            .find(|c| {
                analysis
                    .navigator
                    .text_of(c)
                    .unwrap()
                    .starts_with("check(")
            })
            .unwrap();
        let argument = analysis.navigator.children(&call).remove(1);
        analysis.types.get_type_of_expression(&argument)
    }

    fn in_main(body: &str) -> String {
        format!("package main\n\nfunc main() {{\n{}\n}}\n", body)
    }

    #[test]
    fn literals() {
        assert_eq!(type_of_argument(&in_main("check(1)")), Some(Type::named("int")));
        assert_eq!(
            type_of_argument(&in_main("check(1.5)")),
            Some(Type::named("float64"))
        );
        assert_eq!(
            type_of_argument(&in_main("check(2i)")),
            Some(Type::named("complex128"))
        );
        assert_eq!(
            type_of_argument(&in_main("check('a')")),
            Some(Type::named("rune"))
        );
        assert_eq!(
            type_of_argument(&in_main("check(\"a\")")),
            Some(Type::named("string"))
        );
    }

    #[test]
    fn declared_types_win_over_initializers() {
        assert_eq!(
            type_of_argument(&in_main("var n int64 = 512\ncheck(n)")),
            Some(Type::named("int64"))
        );
        assert_eq!(
            type_of_argument(&in_main("n := 512\ncheck(n)")),
            Some(Type::named("int"))
        );
    }

    #[test]
    fn parameters() {
        assert_eq!(
            type_of_argument("package main\n\nfunc f(n uint) {\n\tcheck(n)\n}\n"),
            Some(Type::named("uint"))
        );
        assert_eq!(
            type_of_argument("package main\n\nfunc f(ns ...int) {\n\tcheck(ns)\n}\n"),
            Some(Type::named("[]int"))
        );
    }

    #[test]
    fn conversions() {
        assert_eq!(
            type_of_argument(&in_main("check(int64(512))")),
            Some(Type::named("int64"))
        );
        assert_eq!(
            type_of_argument("package main\n\ntype Procs int\n\nfunc main() {\n\tcheck(Procs(3))\n}\n"),
            Some(Type::named("Procs"))
        );
        assert_eq!(type_of_argument(&in_main("check(f(512))")), None);
    }

    #[test]
    fn operators() {
        assert_eq!(type_of_argument(&in_main("check(-512)")), Some(Type::named("int")));
        assert_eq!(type_of_argument(&in_main("check((512))")), Some(Type::named("int")));
        assert_eq!(type_of_argument(&in_main("check(1 + 2)")), Some(Type::named("int")));
        assert_eq!(type_of_argument(&in_main("check(1 + 2.5)")), None);
        assert_eq!(type_of_argument(&in_main("check(1 < 2)")), Some(Type::named("bool")));
        assert_eq!(type_of_argument(&in_main("check(!true)")), Some(Type::named("bool")));
    }

    #[test]
    fn unknowns() {
        assert_eq!(type_of_argument(&in_main("check(x)")), None);
        assert_eq!(type_of_argument(&in_main("check(a.b)")), None);
    }

    #[test]
    fn initialization_cycles_are_unknown() {
        assert_eq!(
            type_of_argument("package main\n\nvar a = b\nvar b = a\n\nfunc main() {\n\tcheck(a)\n}\n"),
            None
        );
    }
}
