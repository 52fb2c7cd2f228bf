pub mod controller;
pub mod edit;
pub mod error;

pub use controller::*;
pub use edit::*;
pub use error::*;
