use crate::semantics::*;

pub trait Checker {
    /// The name the inspection is enabled and disabled by.
    fn name(&self) -> &'static str;

    fn check(&self, analysis: &Analysis, problems: &mut dyn ProblemSink);
}
