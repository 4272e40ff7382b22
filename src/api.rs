mod core;
mod signature;
mod spec;

pub use self::core::*;
pub use signature::*;
pub use spec::*;

pub(crate) use signature::Handler;
