use crate::syntax::*;
use crate::*;
use std::path::PathBuf;

#[derive(Clone)]
pub struct Navigator {
    modules: Arc<HashMap<URI, Arc<Tree>>>,
}

impl Navigator {
    pub fn new(modules: Arc<HashMap<URI, Arc<Tree>>>) -> Navigator {
        Navigator { modules }
    }

    pub fn traverse_all<F: FnMut(&Node) -> bool>(&self, f: &mut F) {
        for module in self.modules.values() {
            module.traverse_all(f);
        }
    }

    pub fn trees(&self) -> Vec<Arc<Tree>> {
        self.modules.values().cloned().collect()
    }

    pub fn tree(&self, uri: &URI) -> Option<&Arc<Tree>> {
        self.modules.get(uri)
    }

    /// Groups the trees by package: files in the same directory
    /// declaring the same package name.
    pub fn packages(&self) -> Vec<Vec<Arc<Tree>>> {
        let mut packages: HashMap<(Option<PathBuf>, Option<String>), Vec<Arc<Tree>>> =
            HashMap::new();

        for (uri, tree) in self.modules.iter() {
            let directory = uri.path().and_then(|p| p.parent()).map(PathBuf::from);
            packages
                .entry((directory, tree.package_name()))
                .or_insert_with(Vec::new)
                .push(tree.clone());
        }

        packages.into_iter().map(|(_, trees)| trees).collect()
    }

    pub fn source(&self, uri: &URI) -> Option<Arc<Source>> {
        self.modules.get(uri).map(|t| t.source.clone())
    }

    pub fn sources(&self) -> Vec<Arc<Source>> {
        self.modules
            .iter()
            .map(|(_, t)| &t.source)
            .cloned()
            .collect()
    }

    /// The tree a node was parsed into.
    pub fn tree_of(&self, node: &Node) -> Option<&Arc<Tree>> {
        self.modules
            .get(&node.span.start.uri)
            .filter(|tree| tree.contains(node.id))
    }

    pub fn find_node(&self, id: Id) -> Option<Node> {
        for (_, tree) in self.modules.iter() {
            if let Some(node) = tree.get(id) {
                return Some(node);
            }
        }
        None
    }

    pub fn find_child(&self, parent: &Node, child_id: Id) -> Option<Node> {
        self.tree_of(parent)?.get(child_id)
    }

    pub fn parent(&self, child: &Node) -> Option<Node> {
        self.tree_of(child)?.parent(child)
    }

    pub fn children(&self, parent: &Node) -> Vec<Node> {
        match self.tree_of(parent) {
            Some(tree) => parent.child_nodes(tree),
            None => vec![],
        }
    }

    pub fn text_of(&self, node: &Node) -> Option<String> {
        Some(self.tree_of(node)?.text_of(node))
    }

    pub fn all_calls(&self) -> Vec<Node> {
        self.all_matching(Node::is_call)
    }

    fn all_matching<F: Fn(&Node) -> bool>(&self, f: F) -> Vec<Node> {
        let mut nodes = vec![];
        self.traverse_all(&mut |n| {
            if f(n) {
                nodes.push(n.clone());
            }
            true
        });
        nodes
    }

    /// The expression a variable or constant is initialized with. Definitions
    /// assigned from a single multi-valued expression (`a, b := f()`) and
    /// range keys have no initializer of their own.
    pub fn initializer_of(&self, definition: &Node) -> Option<Node> {
        let parent = self.parent(definition)?;

        let (names, values) = match parent.kind {
            VarSpec {
                ref names,
                ref values,
                ..
            }
            | ConstSpec {
                ref names,
                ref values,
                ..
            }
            | ShortVarDecl {
                ref names,
                ref values,
            } => (names, values),
            _ => return None,
        };

        if names.len() != values.len() {
            return None;
        }

        let index = names.iter().position(|n| *n == definition.id)?;
        self.find_child(&parent, values[index])
    }

    /// The type expression a variable, parameter or constant is declared with.
    pub fn declared_type_of(&self, definition: &Node) -> Option<Node> {
        let parent = self.parent(definition)?;

        match parent.kind {
            VarSpec {
                type_expression, ..
            }
            | ConstSpec {
                type_expression, ..
            }
            | ParameterDecl {
                type_expression, ..
            } => self.find_child(&parent, type_expression),
            _ => None,
        }
    }

    pub fn is_variadic_parameter(&self, definition: &Node) -> bool {
        match self.parent(definition) {
            Some(Node {
                kind: ParameterDecl { ellipsis, .. },
                ..
            }) => ellipsis.is_some(),
            _ => false,
        }
    }
}
