use crate::semantics::{HighlightType, Problem};
use crate::*;

#[derive(Clone, IntoStaticStr)]
pub enum Diagnostic {
    SyntaxError(Span, String),
    Inspection(Problem),
}

impl Diagnostic {
    pub fn span(&self) -> &Span {
        use Diagnostic::*;

        match self {
            SyntaxError(ref s, _) => s,
            Inspection(ref problem) => &problem.span,
        }
    }

    pub fn level(&self) -> DiagnosticLevel {
        use Diagnostic::*;

        match self {
            SyntaxError(_, _) => DiagnosticLevel::Error,
            Inspection(ref problem) => match problem.highlight {
                HighlightType::Warning => DiagnosticLevel::Warning,
                HighlightType::WeakWarning => DiagnosticLevel::WeakWarning,
            },
        }
    }

    pub fn code(&self) -> usize {
        use Diagnostic::*;

        match self {
            SyntaxError(_, _) => 1,
            Inspection(_) => 2,
        }
    }

    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Diagnostic::Inspection(ref problem) => Some(problem),
            _ => None,
        }
    }

    pub fn failed(diagnostics: &Vec<Diagnostic>) -> bool {
        let mut failed = false;
        for diagnostic in diagnostics.iter() {
            if let DiagnosticLevel::Error = diagnostic.level() {
                failed = true;
            }
        }
        failed
    }
}

impl From<Problem> for Diagnostic {
    fn from(problem: Problem) -> Self {
        Diagnostic::Inspection(problem)
    }
}

impl fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name: &'static str = self.into();
        write!(
            f,
            "{:?} ({} @ {}:{})",
            self.to_string(),
            name,
            self.span().start.uri,
            self.span().start.line,
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Diagnostic::*;

        match self {
            SyntaxError(_, s) => write!(f, "{}", s),
            Inspection(problem) => write!(f, "{}", problem),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    WeakWarning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::WeakWarning => write!(f, "weak warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::*;
    use crate::syntax::*;

    #[test]
    fn syntax_errors_fail() {
        let (_, diagnostics) = Parser::new(&Source::test("package main\n\nfunc {\n")).parse();
        assert!(!diagnostics.is_empty());
        assert!(Diagnostic::failed(&diagnostics));
        assert_eq!(diagnostics[0].code(), 1);

        let name: &'static str = (&diagnostics[0]).into();
        assert_eq!(name, "SyntaxError");
    }

    #[test]
    fn inspections_do_not_fail() {
        let (tree, _) = Parser::new(&Source::test("package main\n\nvar n = 512\n")).parse();
        let literal = tree
            .root()
            .unwrap()
            .all_downwards(&tree, &|n| matches!(n.kind, IntegerExpression(_)))
            .remove(0);
        let diagnostic: Diagnostic =
            Problem::new(&literal, "Max is 256", HighlightType::WeakWarning).into();

        assert_eq!(diagnostic.level(), DiagnosticLevel::WeakWarning);
        assert_eq!(diagnostic.code(), 2);
        assert_eq!(diagnostic.to_string(), "Max is 256");
        assert_eq!(diagnostic.span().start.line, 3);
        assert!(!Diagnostic::failed(&vec![diagnostic]));
    }

    #[test]
    fn levels_follow_highlights() {
        let (tree, _) = Parser::new(&Source::test("package main\n\nvar n = 512\n")).parse();
        let literal = tree
            .root()
            .unwrap()
            .all_downwards(&tree, &|n| matches!(n.kind, IntegerExpression(_)))
            .remove(0);
        let warning: Diagnostic = Problem::new(&literal, "w", HighlightType::Warning).into();

        assert_eq!(warning.level(), DiagnosticLevel::Warning);
        assert_eq!(warning.level().to_string(), "warning");
        assert_eq!(DiagnosticLevel::WeakWarning.to_string(), "weak warning");
        assert_eq!(DiagnosticLevel::Error.to_string(), "error");
    }
}
