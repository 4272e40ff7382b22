mod base;
mod interface;
mod middleware;
mod resolve;

pub use base::ConfigError;
pub use middleware::GeneralParser;

pub(crate) use interface::{ConsoleInterface, UserInterface};
pub(crate) use middleware::{BindUnit, ParseMode};
pub(crate) use resolve::spec_coercion;

#[cfg(test)]
pub(crate) use interface::util;
