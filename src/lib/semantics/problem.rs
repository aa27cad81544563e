use crate::semantics::QuickFix;
use crate::syntax::Node;
use crate::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HighlightType {
    Warning,
    WeakWarning,
}

/// A finding anchored on a syntax node, optionally carrying a fix.
#[derive(Clone)]
pub struct Problem {
    pub anchor: Id,
    pub span: Span,
    pub message: String,
    pub highlight: HighlightType,
    pub fix: Option<Arc<dyn QuickFix>>,
}

impl Problem {
    pub fn new<S: Into<String>>(anchor: &Node, message: S, highlight: HighlightType) -> Problem {
        Problem {
            anchor: anchor.id,
            span: anchor.span.clone(),
            message: message.into(),
            highlight,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Arc<dyn QuickFix>) -> Problem {
        self.fix = Some(fix);
        self
    }

    pub fn fix_label(&self) -> Option<String> {
        self.fix.as_ref().map(|f| f.label())
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:?} @ {} ({:?}, anchored on {})",
            self.message, self.span, self.highlight, self.anchor
        )?;
        if let Some(label) = self.fix_label() {
            write!(f, ", fix: {:?}", label)?;
        }
        Ok(())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

pub trait ProblemSink {
    fn register_problem(&mut self, problem: Problem);
}

impl ProblemSink for Vec<Problem> {
    fn register_problem(&mut self, problem: Problem) {
        self.push(problem);
    }
}
