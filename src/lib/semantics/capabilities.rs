use crate::semantics::Type;
use crate::syntax::Node;
use crate::*;

/// Access to nodes and their source text across all parsed files.
pub trait Navigate {
    fn find_node(&self, id: Id) -> Option<Node>;

    fn text_of(&self, node: &Node) -> Option<String>;
}

pub trait Resolve {
    /// The declaration a bare identifier refers to, if any.
    fn resolve(&self, reference: &Node) -> Option<Node>;

    /// The expression a variable or constant definition is initialized with.
    fn initializer_of(&self, definition: &Node) -> Option<Node>;
}

pub trait TypeOf {
    fn type_of(&self, expression: &Node) -> Option<Type>;
}
