use crate::semantics::Navigator;
use crate::*;

pub trait Reporter {
    fn report(diagnostics: Vec<Diagnostic>, navigator: &Navigator);
}
