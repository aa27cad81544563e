use crate::semantics::*;
use crate::syntax::Node;
use crate::*;

#[derive(Clone)]
pub struct Analysis {
    pub navigator: Navigator,
    pub types: Types,
    references: Arc<References>,
}

impl Analysis {
    pub fn new(modules: Arc<HashMap<URI, Arc<syntax::Tree>>>) -> Analysis {
        let navigator = Navigator::new(modules);

        let mut references = References::new();
        for package in navigator.packages() {
            let trees: Vec<&syntax::Tree> = package.iter().map(|t| t.as_ref()).collect();
            references.extend(syntax::reference_resolver::get_package_references(&trees));
        }
        let references = Arc::new(references);

        let types = Types::new(navigator.clone(), references.clone());

        Analysis {
            navigator,
            types,
            references,
        }
    }

    pub fn check(&self, config: &Config) -> Vec<Problem> {
        let mut problems: Vec<Problem> = vec![];

        for checker in checkers::checkers().iter() {
            if config.is_disabled(checker.name()) {
                debug!("Skipping disabled inspection {}.", checker.name());
                continue;
            }
            checker.check(self, &mut problems);
        }

        problems
    }

    pub fn find_declaration(&self, reference: &Node) -> Option<Node> {
        let declaration = self.references.declaration_of(reference.id)?;
        self.navigator.find_node(declaration)
    }
}

impl Navigate for Analysis {
    fn find_node(&self, id: Id) -> Option<Node> {
        self.navigator.find_node(id)
    }

    fn text_of(&self, node: &Node) -> Option<String> {
        self.navigator.text_of(node)
    }
}

impl Resolve for Analysis {
    fn resolve(&self, reference: &Node) -> Option<Node> {
        self.find_declaration(reference)
    }

    fn initializer_of(&self, definition: &Node) -> Option<Node> {
        self.navigator.initializer_of(definition)
    }
}

impl TypeOf for Analysis {
    fn type_of(&self, expression: &Node) -> Option<Type> {
        self.types.get_type_of_expression(expression)
    }
}

impl<I: Iterator<Item = (URI, Arc<syntax::Tree>)>> From<I> for Analysis {
    fn from(iterator: I) -> Self {
        Self::new(Arc::new(iterator.collect()))
    }
}
