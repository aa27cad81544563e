use crate::*;

pub struct Scope<'a> {
    parent: Option<&'a Scope<'a>>,

    declarations: HashMap<String, Id>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Scope<'a> {
        Scope {
            parent: None,
            declarations: HashMap::new(),
        }
    }

    pub fn inner(&self) -> Scope {
        Scope {
            parent: Some(self),
            declarations: HashMap::new(),
        }
    }

    /// Declares a name in this scope. The blank identifier
    /// declares nothing.
    pub fn declare(&mut self, name: String, declaration: Id) {
        if name != "_" {
            self.declarations.insert(name, declaration);
        }
    }

    pub fn refer(&self, name: &str) -> Option<Id> {
        if let Some(id) = self.declarations.get(name) {
            return Some(*id);
        }
        if let Some(ref parent) = self.parent {
            parent.refer(name)
        } else {
            None
        }
    }
}
