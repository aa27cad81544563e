use crate::semantics::Problem;
use crate::syntax::ElementFactory;
use crate::*;

pub trait QuickFix {
    fn label(&self) -> String;

    /// Applies the fix to the workspace. Returns `false` without touching
    /// anything if the problem's anchor is no longer part of a live tree.
    fn apply(&self, workspace: &mut Workspace, problem: &Problem) -> bool;
}

/// Replaces the anchor of a problem with a literal expression.
pub struct ReplaceWithLiteral {
    literal: String,
}

impl ReplaceWithLiteral {
    pub fn new<S: Into<String>>(literal: S) -> ReplaceWithLiteral {
        ReplaceWithLiteral {
            literal: literal.into(),
        }
    }
}

impl QuickFix for ReplaceWithLiteral {
    fn label(&self) -> String {
        format!("Replace by {}", self.literal)
    }

    fn apply(&self, workspace: &mut Workspace, problem: &Problem) -> bool {
        if !workspace.is_live(problem.anchor) {
            debug!("Not applying {:?} to stale {:?}.", self.label(), problem);
            return false;
        }

        match ElementFactory::create_expression(self.literal.as_str()) {
            Some((replacement_tree, replacement)) => {
                workspace.replace(problem.anchor, &replacement, &replacement_tree)
            }
            None => {
                warn!("{:?} is not a valid expression.", self.literal);
                false
            }
        }
    }
}
