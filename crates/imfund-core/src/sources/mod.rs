//! Source plugins for the external services the core talks to

pub mod crossref;
pub mod nsf;
pub mod traits;

pub use crossref::*;
pub use nsf::*;
pub use traits::*;
