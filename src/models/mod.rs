pub mod request;
pub mod stats;
pub mod task;

pub use request::*;
pub use stats::*;
pub use task::*;
