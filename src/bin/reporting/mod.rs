mod highlight;
pub use self::highlight::*;

mod pretty_reporter;
pub use self::pretty_reporter::*;

mod json_reporter;
pub use self::json_reporter::*;
