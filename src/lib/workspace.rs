use crate::semantics::{Analysis, Problem};
use crate::syntax::*;
use crate::*;

/// The set of parsed files problems are found in and fixes are applied to.
pub struct Workspace {
    trees: HashMap<URI, Arc<Tree>>,
}

impl Workspace {
    pub fn new() -> Workspace {
        Workspace {
            trees: HashMap::new(),
        }
    }

    /// Parses the source into the workspace, replacing any earlier
    /// version of the same file.
    pub fn add(&mut self, source: Arc<Source>) -> Vec<Diagnostic> {
        let (tree, diagnostics) = Parser::new(&source).parse();
        self.trees.insert(source.uri.clone(), tree);
        diagnostics
    }

    pub fn tree(&self, uri: &URI) -> Option<&Arc<Tree>> {
        self.trees.get(uri)
    }

    pub fn sources(&self) -> Vec<Arc<Source>> {
        self.trees.values().map(|t| t.source.clone()).collect()
    }

    pub fn analysis(&self) -> Analysis {
        Analysis::new(Arc::new(self.trees.clone()))
    }

    pub fn tree_containing(&self, id: Id) -> Option<&Arc<Tree>> {
        self.trees.values().find(|tree| tree.is_attached(id))
    }

    pub fn is_live(&self, id: Id) -> bool {
        self.tree_containing(id).is_some()
    }

    /// Replaces a live node with the given expression and re-parses its file.
    pub fn replace(&mut self, id: Id, replacement: &Node, replacement_tree: &Tree) -> bool {
        let new_tree = match self.tree_containing(id) {
            Some(tree) => tree.replace(id, replacement, replacement_tree),
            None => return false,
        };

        match new_tree {
            Some(tree) => {
                self.trees.insert(tree.source.uri.clone(), tree);
                true
            }
            None => false,
        }
    }

    pub fn apply_fix(&mut self, problem: &Problem) -> bool {
        match problem.fix.clone() {
            Some(fix) => fix.apply(self, problem),
            None => false,
        }
    }

    /// Applies the fix of every problem, last in file first, so that
    /// the spans of the problems not yet fixed stay valid. Each problem
    /// is re-anchored on the node covering its span in the current tree.
    /// Returns the number of fixes applied.
    pub fn fix_all(&mut self, problems: &[Problem]) -> usize {
        let mut problems = problems.to_vec();
        problems.sort_by(|a, b| b.span.start.offset.cmp(&a.span.start.offset));

        let mut applied = 0;
        for problem in problems {
            let anchor = match self
                .trees
                .get(&problem.span.start.uri)
                .and_then(|tree| tree.node_spanning(&problem.span))
            {
                Some(node) => node.id,
                None => {
                    warn!("Lost track of {:?}.", problem);
                    continue;
                }
            };

            if self.apply_fix(&Problem { anchor, ..problem }) {
                applied += 1;
            }
        }
        applied
    }
}

impl<I: Iterator<Item = Arc<Source>>> From<I> for Workspace {
    fn from(sources: I) -> Self {
        let mut workspace = Workspace::new();
        for source in sources {
            let diagnostics = workspace.add(source);
            if !diagnostics.is_empty() {
                debug!("{:?}", diagnostics);
            }
        }
        workspace
    }
}
