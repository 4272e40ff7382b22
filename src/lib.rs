//! `funcli` derives a command line parser from a declared function signature.
//!
//! Many command line parsers ask you to describe the flags first and wire them to your program
//! second.
//! `funcli` turns that around: declare the signature of the function you want to expose (its
//! parameters, their types, their defaults, and its documentation), and the command line parser
//! falls out.
//! Specifically, `funcli` attempts to prioritize the following design concerns:
//! * *Signature driven*:
//! One [`Signature`] declaration produces the flags, the coercions, the defaults, and the help
//! message, with nothing repeated.
//! * *Conventional Cli surface*:
//! Every parameter becomes a `--name` flag with a single-character alias where available, bool
//! parameters become switches with a hidden `--no-name` inverse, and help is generated from the
//! documentation.
//! * *Refinement over configuration*:
//! The derived arguments are inspectable and adjustable via [`ArgOverride`] for the cases the
//! convention does not cover (a custom coercion, a restricted choice set, a flipped default).
//! * *Multi-command paradigm*:
//! A [`MultiFunctionParser`] collects several signatures into a single Cli, one sub-command
//! each.
//!
//! # Usage
//! Declare the signature, attach a handler, build, parse:
//!
//! ```
//! use funcli::{FunctionParser, Param, Signature, Ty, Value};
//!
//! let mut copies: i64 = 2;
//! let mut verbose: bool = false;
//!
//! let parser = FunctionParser::new(
//!     Signature::new("replicate")
//!         .doc(
//!             "Replicate a dataset.\n\
//!              \n\
//!              copies: how many copies to keep\n\
//!              verbose: print progress",
//!         )
//!         .param(Param::new("copies", Ty::Int).default(Value::Int(2)))
//!         .param(Param::new("verbose", Ty::Bool))
//!         .handler(|args| {
//!             copies = args.get("copies").and_then(Value::as_int).unwrap();
//!             verbose = args.get("verbose").and_then(Value::as_bool).unwrap();
//!         }),
//! )
//! .build_parser()
//! .unwrap();
//!
//! parser.parse_tokens(&["--copies", "5", "--verbose"]).unwrap();
//! assert_eq!(copies, 5);
//! assert!(verbose);
//! ```
//!
//! The same declaration drives the help message:
//!
//! ```console
//! $ replicate --help
//! Replicate a dataset.
//!
//! Usage: replicate [OPTIONS]
//!
//! Options:
//!   -c, --copies <COPIES>  how many copies to keep (default=2)
//!   -v, --verbose          print progress (default=false)
//!   -h, --help             Print help
//! ```
//!
//! # Parameter typing
//! The closed type set [`Ty`] covers scalars (`int`, `float`, `str`, `bool`), declared
//! enumerations, `list[T]` for repeatable flags, `option[T]` for parameters that may be left
//! unset, and unions tried left to right.
//! Parsed values surface as [`Value`] entries in [`ParsedArgs`], in parameter declaration
//! order.
//!
//! # Requiredness
//! A parameter without a default must be provided on the Cli; one with a default (and any
//! `bool` or `option[T]` parameter) may be omitted.
//! [`ArgOverride::default`] and [`ArgOverride::required`] adjust this after derivation.
//!
//! # Multi-command
//! ```no_run
//! use funcli::{MultiFunctionParser, Param, Signature, Ty, Value};
//!
//! MultiFunctionParser::new("tool")
//!     .description("My program that does awesome stuff.")
//!     .add(
//!         Signature::new("pack")
//!             .doc("Pack the archive.\n\nlevel: compression level")
//!             .param(Param::new("level", Ty::Int).default(Value::Int(6)))
//!             .handler(|args| { /* pack */ }),
//!     )
//!     .add(
//!         Signature::new("unpack")
//!             .doc("Unpack the archive.")
//!             .handler(|args| { /* unpack */ }),
//!     )
//!     .build()
//!     .parse();
//! ```
//!
//! Invoked as `tool pack --level 9`; `tool --help` lists the commands with their one-line
//! descriptions, in insertion order.
#![deny(missing_docs)]
mod api;
mod model;
mod parser;

pub use api::*;
pub use model::*;
pub use parser::{ConfigError, GeneralParser};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
