//! Descriptor-driven command-line option parsing.
//!
//! A static table of [`Descriptor`] rows says which options exist, how they
//! are spelled and which [`Check`] judges their values. Parsing runs in two
//! steps:
//! - [`Stats`] bounds the storage one argument vector needs,
//! - [`Parser::parse_into`] classifies every token into that storage,
//!   threading repeated options into per-index chains.
//!
//! [`Parser::parse`] does both; [`App`] adds the help option and mandatory
//! options on top.
//!
//! ```
//! use optparse::{Check, Descriptor, Parser, Silent};
//!
//! const VERBOSE: usize = 1;
//! const OUTPUT: usize = 2;
//! const USAGE: &[Descriptor] = &[
//!     Descriptor::new(0, "", "", Check::Unknown, "USAGE: demo [options] FILE..."),
//!     Descriptor::new(VERBOSE, "v", "verbose", Check::None, "  -v, --verbose  \tSay more."),
//!     Descriptor::new(OUTPUT, "o", "output", Check::NonEmpty, "  -o, --output=FILE  \tWrite here."),
//!     Descriptor::END,
//! ];
//!
//! let args = ["-vv", "in.txt", "--out=result.txt"];
//! let parsed = Parser::new(USAGE).parse(&args, &mut Silent).unwrap();
//! assert!(!parsed.error());
//! assert_eq!(parsed.count(VERBOSE), 2);
//! assert_eq!(parsed.value(OUTPUT).unwrap(), "result.txt");
//! assert_eq!(parsed.positional(), &["in.txt"]);
//! ```

pub mod app;
pub mod check;
pub mod descriptor;
pub mod diag;
pub mod error;
pub mod parsed;
pub mod parser;
pub mod stats;
pub mod store;
pub mod usage;

pub use app::{App, Outcome};
pub use check::{ArgStatus, Candidate, Check};
pub use descriptor::Descriptor;
pub use diag::{Diagnostics, Silent, Stderr};
pub use error::{fatal, Error, Result};
pub use parsed::{Chain, Group, Parsed};
pub use parser::Parser;
pub use stats::Stats;
pub use store::{Occurrence, OccurrenceId, Slot, Storage};
pub use usage::{print_usage, usage_string};
