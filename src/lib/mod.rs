pub use std::collections::HashMap;
pub use std::fmt;
pub use std::sync::Arc;

#[macro_use]
extern crate log;

#[macro_use]
extern crate strum_macros;

mod id;
pub use self::id::*;

mod source;
pub use self::source::*;

mod error;
pub use self::error::*;

mod config;
pub use self::config::*;

mod references;
pub use self::references::*;

mod diagnostics;
pub use self::diagnostics::*;

pub mod syntax;

pub mod semantics;

mod workspace;
pub use self::workspace::*;
