pub mod completion;
pub mod ledger;

pub use completion::*;
pub use ledger::*;
