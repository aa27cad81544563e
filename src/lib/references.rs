use crate::*;

/// Identifier references resolved to the definitions they name.
/// Identifiers that resolve to nothing in the package (builtins,
/// imported members) have no entry.
#[derive(Clone, Debug, Default)]
pub struct References {
    declarations: HashMap<Id, Id>,
}

impl References {
    pub fn new() -> References {
        References::default()
    }

    pub fn declaration_of(&self, reference: Id) -> Option<Id> {
        self.declarations.get(&reference).copied()
    }

    pub fn register_reference(&mut self, reference: Id, declaration: Id) {
        self.declarations.insert(reference, declaration);
    }

    /// Merges in the references of another package.
    pub fn extend(&mut self, other: References) {
        self.declarations.extend(other.declarations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merging_packages() {
        let (a, a_decl, b, b_decl) = (Id::new(), Id::new(), Id::new(), Id::new());

        let mut main = References::new();
        main.register_reference(a, a_decl);
        let mut other = References::new();
        other.register_reference(b, b_decl);
        main.extend(other);

        assert_eq!(main.declaration_of(a), Some(a_decl));
        assert_eq!(main.declaration_of(b), Some(b_decl));
        assert_eq!(main.declaration_of(a_decl), None);
    }
}
