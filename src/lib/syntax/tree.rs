use crate::syntax::*;
use crate::*;

pub struct Tree {
    pub source: Arc<Source>,
    nodes: HashMap<Id, Node>,
    root: Id,
}

impl Tree {
    pub fn new(source: Arc<Source>) -> Tree {
        Tree {
            source,
            nodes: HashMap::new(),
            root: Id::NULL,
        }
    }

    pub fn get(&self, id: Id) -> Option<Node> {
        self.nodes.get(&id).cloned()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Adds a node, adopting all of its children.
    pub fn add(&mut self, node: Node) {
        let id = node.id;
        for child in node.children() {
            if let Some(child) = self.nodes.get_mut(&child) {
                child.parent_id = Some(id);
            }
        }
        self.nodes.insert(id, node);
    }

    pub fn remove(&mut self, id: Id) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn set_root(&mut self, root: Id) {
        self.root = root;
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&self.root)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_id.and_then(|p| self.get(p))
    }

    /// Whether the node is still part of this tree, i.e. it
    /// exists and its chain of parents leads to the root.
    pub fn is_attached(&self, id: Id) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return self.nodes.contains_key(&current);
            }
            match self.nodes.get(&current).and_then(|n| n.parent_id) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn text_of(&self, node: &Node) -> String {
        self.source.text(&node.span)
    }

    pub fn traverse_all<F: FnMut(&Node) -> bool>(&self, f: &mut F) {
        if let Some(root) = self.root() {
            root.traverse(self, f);
        }
    }

    pub fn node_at(&self, location: Location) -> Option<&Node> {
        let mut current_node = self.root;
        'children: loop {
            if let Some(node) = self.nodes.get(&current_node) {
                if node.span.contains_location(&location) {
                    for child in node
                        .children()
                        .into_iter()
                        .filter_map(|child| self.nodes.get(&child))
                    {
                        if child.span.contains_location(&location) {
                            current_node = child.id;
                            continue 'children;
                        }
                    }
                }
            }
            break;
        }
        self.nodes.get(&current_node)
    }

    /// The outermost node covering exactly the given span.
    pub fn node_spanning(&self, span: &Span) -> Option<Node> {
        let range = span.range();
        let innermost = self.node_at(span.start.clone())?;
        innermost
            .closest_upwards(self, |n| n.span.range() == range)
            .map(|n| {
                let mut outermost = n;
                while let Some(parent) = self.parent(&outermost) {
                    if parent.span.range() != range {
                        break;
                    }
                    outermost = parent;
                }
                outermost
            })
    }

    pub fn package_name(&self) -> Option<String> {
        if let SourceFile { package_clause, .. } = self.root()?.kind {
            if let PackageClause { name, .. } = self.get(package_clause)?.kind {
                return Some(name.lexeme());
            }
        }
        None
    }

    /// Replaces the node with the given expression, producing a new
    /// tree. All ids of this tree are invalid in the new one.
    pub fn replace(&self, id: Id, replacement: &Node, replacement_tree: &Tree) -> Option<Arc<Tree>> {
        let target = self.get(id)?;
        let text = replacement_tree.text_of(replacement);
        let source = self.source.splice(target.span.range(), text.as_str());
        let (tree, diagnostics) = Parser::new(&source).parse();
        if !diagnostics.is_empty() {
            debug!(
                "Replacing {:?} in {} introduced diagnostics: {:?}",
                target, self.source, diagnostics
            );
        }
        Some(tree)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tree({}, {} nodes)", self.source.uri, self.nodes.len())
    }
}
