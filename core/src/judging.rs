pub mod batch;
pub mod communicator;
pub mod compare;
pub mod custom;
pub mod error;
pub mod lines;
pub mod verdict;

pub use batch::*;
pub use communicator::*;
pub use compare::*;
pub use custom::*;
pub use error::{Error, Result};
pub use lines::*;
pub use verdict::*;
