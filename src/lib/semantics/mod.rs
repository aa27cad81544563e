mod analysis;
pub use self::analysis::*;

mod capabilities;
pub use self::capabilities::*;

mod navigator;
pub use self::navigator::*;

mod types;
pub use self::types::*;

mod problem;
pub use self::problem::*;

mod quick_fix;
pub use self::quick_fix::*;

mod checker;
pub use self::checker::*;

pub mod checkers;
