pub mod project;
pub mod table;
pub mod transaction;

pub use project::*;
pub use table::*;
pub use transaction::*;
