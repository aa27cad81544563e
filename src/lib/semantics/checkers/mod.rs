use crate::semantics::Checker;

mod max_procs;
pub use self::max_procs::*;

const MAX_PROCS_INSPECTION: MaxProcsInspection = MaxProcsInspection;

#[inline]
pub fn checkers() -> Vec<&'static dyn Checker> {
    vec![&MAX_PROCS_INSPECTION]
}
