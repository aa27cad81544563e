use crate::syntax::*;
use crate::*;

/// Builds fresh syntax nodes from text.
pub struct ElementFactory;

impl ElementFactory {
    /// Parses the text as a standalone expression. Returns the tree
    /// owning the new node along with the node itself, or `None` if
    /// the text is not a single valid expression.
    pub fn create_expression(text: &str) -> Option<(Arc<Tree>, Node)> {
        let source = Source::scratch(text);
        let (tree, diagnostics) = Parser::new(&source).parse_standalone_expression();
        if !diagnostics.is_empty() {
            debug!("Cannot create expression from {:?}: {:?}", text, diagnostics);
            return None;
        }
        let node = tree.root()?.clone();
        Some((tree, node))
    }
}
