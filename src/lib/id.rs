use crate::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identifies a syntax node across every tree parsed in this process.
/// Re-parsing a file hands out fresh ids, so an id that outlives its
/// tree no longer resolves to a node.
#[derive(Eq, PartialEq, Copy, Clone, Hash, Debug)]
pub struct Id(usize);

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

impl Id {
    /// Stands in for an absent optional child.
    pub const NULL: Id = Id(0);

    pub fn new() -> Id {
        Id(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_null(&self) -> bool {
        *self == Id::NULL
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_never_null() {
        let a = Id::new();
        let b = Id::new();
        assert_ne!(a, b);
        assert!(!a.is_null());
        assert!(Id::NULL.is_null());
    }
}
