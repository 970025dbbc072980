//! Front end: parse, then handle the help option and mandatory options.

use std::io::Write;

use crate::descriptor::Descriptor;
use crate::diag::{Diagnostics, Stderr};
use crate::error::{fatal, Error, Result};
use crate::parsed::Parsed;
use crate::parser::Parser;
use crate::usage;

pub const DEFAULT_COLUMNS: usize = 80;

/// What the caller should do next.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// The help option was given; show this text and stop.
    Help(String),
    /// Parsing succeeded and every mandatory option is there.
    Ready(Parsed<'a>),
}

#[derive(Debug, Clone)]
pub struct App<'t> {
    parser: Parser<'t>,
    help: Option<usize>,
    mandatory: Vec<usize>,
    columns: usize,
}

impl<'t> App<'t> {
    pub fn new(table: &'t [Descriptor]) -> Self {
        App {
            parser: Parser::new(table),
            help: None,
            mandatory: Vec::new(),
            columns: DEFAULT_COLUMNS,
        }
    }

    /// Use a configured parser instead of the defaults.
    pub fn parser(mut self, parser: Parser<'t>) -> Self {
        self.parser = parser;
        self
    }

    /// Option index that asks for the usage text.
    pub fn help(mut self, index: usize) -> Self {
        self.help = Some(index);
        self
    }

    /// Option indices that must be given at least once.
    pub fn mandatory(mut self, indices: &[usize]) -> Self {
        self.mandatory = indices.to_vec();
        self
    }

    /// Width the usage text is wrapped to.
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn usage(&self) -> String {
        usage::usage_string(self.parser.table(), self.columns)
    }

    pub fn print_usage<W: Write>(&self, out: &mut W) -> Result<()> {
        usage::print_usage(out, self.parser.table(), self.columns)?;
        Ok(())
    }

    /// Parse `args`. The help option wins over everything else, including
    /// rejected tokens; mandatory options are only checked once the parse
    /// is known to be clean.
    pub fn run<'a, S: AsRef<str>>(&self, args: &'a [S], diag: &mut dyn Diagnostics) -> Result<Outcome<'a>>
    where
        't: 'a,
    {
        let parsed = self.parser.parse(args, diag)?;
        if let Some(help) = self.help {
            if parsed.is_present(help) {
                return Ok(Outcome::Help(self.usage()));
            }
        }
        if parsed.error() {
            return Err(Error::Rejected(parsed.rejected()));
        }
        parsed.check_mandatory(&self.mandatory, diag)?;
        Ok(Outcome::Ready(parsed))
    }

    /// [`App::run`] for `main`: diagnostics go to stderr, help exits 0,
    /// any failure exits 1. Rejected tokens also get the usage text on
    /// stdout.
    pub fn parse_or_exit<'a, S: AsRef<str>>(&self, args: &'a [S]) -> Parsed<'a>
    where
        't: 'a,
    {
        match self.run(args, &mut Stderr) {
            Ok(Outcome::Ready(parsed)) => parsed,
            Ok(Outcome::Help(text)) => {
                print!("{}", text);
                std::process::exit(0);
            }
            Err(e) => {
                if let Error::Rejected(_) = e {
                    print!("{}", self.usage());
                }
                fatal(&e.to_string())
            }
        }
    }
}
