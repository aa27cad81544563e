use crate::semantics::*;
use crate::syntax::*;
use crate::*;

pub const GO_MAX_PROCS_FUNCTION: &str = "runtime.GOMAXPROCS";
pub const MAX_PROCS_BOUND: i32 = 256;
pub const MAX_PROCS_MESSAGE: &str = "Max is 256";

/// Flags `runtime.GOMAXPROCS(n)` calls where `n` is known to exceed
/// the supported number of processors, and offers to clamp it.
pub struct MaxProcsInspection;

impl MaxProcsInspection {
    pub fn inspect_call<H>(call: &Node, host: &H, problems: &mut dyn ProblemSink) -> Option<()>
    where
        H: Navigate + Resolve + TypeOf + ?Sized,
    {
        let (callee, arguments) = match call.kind {
            Call {
                callee,
                ref arguments,
                ..
            } => (callee, arguments),
            _ => return None,
        };

        let callee = host.find_node(callee)?;
        if host.text_of(&callee)? != GO_MAX_PROCS_FUNCTION {
            return None;
        }

        if arguments.len() != 1 {
            return None;
        }
        let argument = host.find_node(arguments[0])?;

        if let Some(type_) = host.type_of(&argument) {
            if type_.name() != "int" {
                return None;
            }
        }

        let value = Self::value_of(&argument, host)?;
        let value = host.text_of(&value)?.parse::<i32>().ok()?;

        if value > MAX_PROCS_BOUND {
            problems.register_problem(
                Problem::new(&argument, MAX_PROCS_MESSAGE, HighlightType::WeakWarning)
                    .with_fix(Arc::new(ReplaceWithLiteral::new(MAX_PROCS_BOUND.to_string()))),
            );
        }

        Some(())
    }

    /// Follows a bare variable reference to its initializer, one hop only.
    fn value_of<H>(argument: &Node, host: &H) -> Option<Node>
    where
        H: Navigate + Resolve + ?Sized,
    {
        if !argument.is_reference() {
            return Some(argument.clone());
        }

        let declaration = host.resolve(argument)?;
        match declaration.kind {
            VarDefinition(_) => host.initializer_of(&declaration),
            _ => {
                info!(
                    "{} refers to {:?}, which is not a variable.",
                    host.text_of(argument).unwrap_or_default(),
                    declaration
                );
                None
            }
        }
    }
}

impl Checker for MaxProcsInspection {
    fn name(&self) -> &'static str {
        "GoMaxProcs"
    }

    fn check(&self, analysis: &Analysis, problems: &mut dyn ProblemSink) {
        for call in analysis.navigator.all_calls() {
            Self::inspect_call(&call, analysis, problems);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    fn analysis(code: &str) -> Analysis {
        let (tree, diagnostics) = Parser::new(&Source::test(code)).parse();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        vec![(tree.source.uri.clone(), tree)].into_iter().into()
    }

    fn problems(code: &str) -> Vec<Problem> {
        let mut problems: Vec<Problem> = vec![];
        MaxProcsInspection.check(&analysis(code), &mut problems);
        problems
    }

    fn in_main(body: &str) -> String {
        format!(
            "package main\n\nimport \"runtime\"\n\nfunc main() {{\n{}\n}}\n",
            body
        )
    }

    fn flagged(body: &str) -> Vec<String> {
        let code = in_main(body);
        let source = Source::test(code.as_str());
        problems(code.as_str())
            .into_iter()
            .map(|p| source.text(&p.span))
            .collect()
    }

    #[test]
    fn literal_above_bound() {
        let problems = problems(&in_main("\truntime.GOMAXPROCS(300)"));
        assert_eq!(problems.len(), 1);

        let problem = &problems[0];
        assert_eq!(problem.message, "Max is 256");
        assert_eq!(problem.highlight, HighlightType::WeakWarning);
        assert_eq!(problem.fix_label(), Some("Replace by 256".into()));
        assert_eq!(problem.span.start.line, 6);
        assert_eq!(problem.span.start.character, 21);
    }

    #[test]
    fn literals_at_or_below_bound() {
        assert!(flagged("\truntime.GOMAXPROCS(256)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(4)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(-512)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(0)").is_empty());
    }

    #[test]
    fn signed_literal() {
        assert_eq!(flagged("\truntime.GOMAXPROCS(+512)"), vec!["+512"]);
    }

    #[test]
    fn literals_that_do_not_parse_as_decimal_i32() {
        assert!(flagged("\truntime.GOMAXPROCS(0x200)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(1_000)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(99999999999)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS((512))").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(200 + 100)").is_empty());
    }

    #[test]
    fn variable_initialized_above_bound() {
        assert_eq!(flagged("\tn := 512\n\truntime.GOMAXPROCS(n)"), vec!["n"]);
        assert_eq!(flagged("\tvar n = 1000\n\truntime.GOMAXPROCS(n)"), vec!["n"]);
    }

    #[test]
    fn package_level_variable() {
        let code = "package main\n\nimport \"runtime\"\n\nvar procs = 1024\n\nfunc main() {\n\truntime.GOMAXPROCS(procs)\n}\n";
        assert_eq!(problems(code).len(), 1);
    }

    #[test]
    fn variable_initialized_within_bound() {
        assert!(flagged("\tn := 8\n\truntime.GOMAXPROCS(n)").is_empty());
    }

    #[test]
    fn variable_without_initializer() {
        assert!(flagged("\tvar n int\n\truntime.GOMAXPROCS(n)").is_empty());
        assert!(flagged("\tn, m := f()\n\truntime.GOMAXPROCS(n)").is_empty());
    }

    #[test]
    fn resolution_is_one_hop() {
        assert!(flagged("\tm := 512\n\tn := m\n\truntime.GOMAXPROCS(n)").is_empty());
    }

    #[test]
    fn non_int_types_are_skipped() {
        assert!(flagged("\tvar n int64 = 512\n\truntime.GOMAXPROCS(n)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(int64(512))").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(512.0)").is_empty());
    }

    #[test]
    fn constants_and_parameters_are_skipped() {
        let code = "package main\n\nimport \"runtime\"\n\nconst procs = 512\n\nfunc main() {\n\truntime.GOMAXPROCS(procs)\n}\n\nfunc set(n int) {\n\truntime.GOMAXPROCS(n)\n}\n";
        assert!(problems(code).is_empty());
    }

    #[test]
    fn unresolved_references_are_skipped() {
        assert!(flagged("\truntime.GOMAXPROCS(procs)").is_empty());
    }

    #[test]
    fn other_functions_are_skipped() {
        assert!(flagged("\tos.GOMAXPROCS(512)").is_empty());
        assert!(flagged("\truntime.NumCPU(512)").is_empty());
        assert!(flagged("\tGOMAXPROCS(512)").is_empty());
        assert!(flagged("\truntime . GOMAXPROCS(512)").is_empty());
        assert!(flagged("\truntime.GOMAXPROCSx(512)").is_empty());
        assert!(flagged("\txruntime.GOMAXPROCS(512)").is_empty());
    }

    #[test]
    fn wrong_arity_is_skipped() {
        assert!(flagged("\truntime.GOMAXPROCS()").is_empty());
        assert!(flagged("\truntime.GOMAXPROCS(512, 512)").is_empty());
    }

    #[test]
    fn nested_calls() {
        assert_eq!(
            flagged("\tfmt.Println(runtime.GOMAXPROCS(1024))\n\tgo func() {\n\t\truntime.GOMAXPROCS(2048)\n\t}()"),
            vec!["1024", "2048"]
        );
    }

    /// Substitutes the type lookup of a real analysis.
    struct FixedTypes<'a> {
        analysis: &'a Analysis,
        type_: Option<Type>,
    }

    impl<'a> Navigate for FixedTypes<'a> {
        fn find_node(&self, id: Id) -> Option<Node> {
            self.analysis.find_node(id)
        }

        fn text_of(&self, node: &Node) -> Option<String> {
            Navigate::text_of(self.analysis, node)
        }
    }

    impl<'a> Resolve for FixedTypes<'a> {
        fn resolve(&self, reference: &Node) -> Option<Node> {
            self.analysis.resolve(reference)
        }

        fn initializer_of(&self, definition: &Node) -> Option<Node> {
            Resolve::initializer_of(self.analysis, definition)
        }
    }

    impl<'a> TypeOf for FixedTypes<'a> {
        fn type_of(&self, _expression: &Node) -> Option<Type> {
            self.type_.clone()
        }
    }

    fn inspect_with_type(type_: Option<Type>) -> Vec<Problem> {
        let analysis = analysis(&in_main("\truntime.GOMAXPROCS(512)"));
        let host = FixedTypes {
            analysis: &analysis,
            type_,
        };
        let mut problems: Vec<Problem> = vec![];
        for call in analysis.navigator.all_calls() {
            MaxProcsInspection::inspect_call(&call, &host, &mut problems);
        }
        problems
    }

    #[test]
    fn unknown_types_never_block() {
        assert_eq!(inspect_with_type(None).len(), 1);
        assert_eq!(inspect_with_type(Some(Type::named("int"))).len(), 1);
        assert!(inspect_with_type(Some(Type::named("uint"))).is_empty());
    }

    #[test]
    fn inspect_call_ignores_non_calls() {
        let analysis = analysis(&in_main("\tx := 512"));
        let tree = analysis.navigator.trees().remove(0);
        let literal = tree
            .root()
            .unwrap()
            .all_downwards(&tree, &|n| matches!(n.kind, IntegerExpression(_)))
            .remove(0);
        let mut problems: Vec<Problem> = vec![];
        assert_matches!(
            MaxProcsInspection::inspect_call(&literal, &analysis, &mut problems),
            None
        );
        assert!(problems.is_empty());
    }

    #[test]
    fn disabled_by_config() {
        let analysis = analysis(&in_main("\truntime.GOMAXPROCS(512)"));
        assert_eq!(analysis.check(&Config::default()).len(), 1);

        let config = Config {
            disabled: vec!["GoMaxProcs".into()],
            ..Config::default()
        };
        assert!(analysis.check(&config).is_empty());
    }
}
