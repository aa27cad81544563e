mod tokens;
pub use self::tokens::*;

mod lexer;
pub use self::lexer::*;

mod node;
pub use self::node::*;

mod tree;
pub use self::tree::*;

mod parser;
pub use self::parser::*;

mod scope;
pub use self::scope::*;

mod element_factory;
pub use self::element_factory::*;

pub mod reference_resolver;
