//! Matching and linking pass.
//!
//! Walks the argument vector once, decides for each token whether it is an
//! option (long, short cluster, glued or attached value), a value consumed
//! by the previous option, or a positional argument, and files every option
//! token into pre-sized [`Storage`].

use tracing::debug;

use crate::check::{ArgStatus, Candidate, Check};
use crate::descriptor::{self, Descriptor, LongMatch};
use crate::diag::{Diagnostics, Recorder};
use crate::error::Result;
use crate::parsed::Parsed;
use crate::stats::Stats;
use crate::store::{Occurrence, Storage};

/// Parser settings over one option table.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'t> {
    table: &'t [Descriptor],
    gnu: bool,
    min_abbr_len: usize,
    single_minus_longopt: bool,
}

impl<'t> Parser<'t> {
    pub fn new(table: &'t [Descriptor]) -> Self {
        Parser {
            table,
            gnu: true,
            min_abbr_len: 1,
            single_minus_longopt: false,
        }
    }

    /// Keep looking for options after positional arguments (the default).
    /// When off, the first positional argument ends option processing.
    pub fn gnu(mut self, on: bool) -> Self {
        self.gnu = on;
        self
    }

    /// Shortest accepted long-option abbreviation; 0 turns abbreviations off.
    pub fn min_abbr_len(mut self, len: usize) -> Self {
        self.min_abbr_len = len;
        self
    }

    /// Try `-name` as a long option before splitting it into short options.
    pub fn single_minus_longopt(mut self, on: bool) -> Self {
        self.single_minus_longopt = on;
        self
    }

    pub fn table(&self) -> &'t [Descriptor] {
        self.table
    }

    pub fn stats<S: AsRef<str>>(&self, args: &[S]) -> Stats {
        Stats::new(self.table, args)
    }

    /// Size, allocate and parse in one go.
    pub fn parse<'a, S: AsRef<str>>(
        &self,
        args: &'a [S],
        diag: &mut dyn Diagnostics,
    ) -> Result<Parsed<'a>>
    where
        't: 'a,
    {
        let storage = Storage::new(&self.stats(args));
        self.parse_into(args, storage, diag)
    }

    /// Parse into storage sized by [`Parser::stats`] for the same input.
    ///
    /// Rejected tokens do not make this fail; they are reported through
    /// `diag` and flagged on the result. The only error is storage that
    /// turns out too small, which means it was sized for something else.
    pub fn parse_into<'a, S: AsRef<str>>(
        &self,
        args: &'a [S],
        storage: Storage<'a>,
        diag: &mut dyn Diagnostics,
    ) -> Result<Parsed<'a>>
    where
        't: 'a,
    {
        let args: Vec<&'a str> = args.iter().map(AsRef::as_ref).collect();
        let mut pass = Pass {
            parser: self,
            args: &args,
            pos: 0,
            storage,
            positional: Vec::with_capacity(args.len()),
            diag: Recorder::new(diag),
            rejected: 0,
        };
        pass.run()?;
        pass.storage.relink();

        let Pass {
            storage,
            positional,
            diag,
            rejected,
            ..
        } = pass;
        let lines = diag.lines;
        Ok(Parsed::new(self.table, args, storage, positional, lines, rejected))
    }

    /// Whether `token` would be read as a known option rather than as text.
    fn looks_like_option(&self, token: &str) -> bool {
        if token == "--" {
            return true;
        }
        if let Some(body) = token.strip_prefix("--") {
            let name = body.split('=').next().unwrap_or(body);
            return self.long_row(name).is_some();
        }
        match token.strip_prefix('-') {
            Some(body) if !body.is_empty() => {
                if self.single_minus_longopt {
                    let name = body.split('=').next().unwrap_or(body);
                    if self.long_row(name).is_some() {
                        return true;
                    }
                }
                body.chars()
                    .next()
                    .and_then(|c| descriptor::find_short(self.table, c))
                    .is_some()
            }
            _ => false,
        }
    }

    fn long_row(&self, name: &str) -> Option<usize> {
        descriptor::find_long(self.table, name, self.min_abbr_len).row()
    }
}

/// Where a candidate value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Part of the option token (`-ovalue`, `--opt=value`).
    Attached,
    /// The next argument.
    Following,
}

struct Pass<'p, 't, 'a, 'd> {
    parser: &'p Parser<'t>,
    args: &'p [&'a str],
    pos: usize,
    storage: Storage<'a>,
    positional: Vec<&'a str>,
    diag: Recorder<'d>,
    rejected: usize,
}

impl<'a> Pass<'_, '_, 'a, '_> {
    fn run(&mut self) -> Result<()> {
        let mut options_done = false;
        while self.pos < self.args.len() {
            let token = self.args[self.pos];
            self.pos += 1;

            if options_done {
                self.positional.push(token);
                continue;
            }
            if token == "--" {
                options_done = true;
                continue;
            }
            if token.len() < 2 || !token.starts_with('-') {
                debug!(token, "positional");
                self.positional.push(token);
                if !self.parser.gnu {
                    options_done = true;
                }
                continue;
            }

            if let Some(body) = token.strip_prefix("--") {
                self.long_option(&token[..2], body)?;
            } else {
                let body = &token[1..];
                if self.parser.single_minus_longopt && self.is_long(body) {
                    self.long_option(&token[..1], body)?;
                } else {
                    self.short_cluster(body)?;
                }
            }
        }
        Ok(())
    }

    fn is_long(&self, body: &str) -> bool {
        let name = body.split('=').next().unwrap_or(body);
        self.parser.long_row(name).is_some()
    }

    /// `dashes` is the prefix that introduced the option, `body` the rest.
    fn long_option(&mut self, dashes: &str, body: &'a str) -> Result<()> {
        let (name, attached) = match body.find('=') {
            Some(eq) => (&body[..eq], Some(&body[eq + 1..])),
            None => (body, None),
        };
        let found = descriptor::find_long(self.parser.table, name, self.parser.min_abbr_len);
        if found == LongMatch::Ambiguous {
            debug!(name, "ambiguous abbreviation");
        }
        let row = found.row();
        let typed = format!("{}{}", dashes, name);

        let (candidate, source) = match attached {
            Some(text) => (Some(text), Some(Source::Attached)),
            None => self.following(row),
        };
        let status = self.file(row, typed, candidate, source)?;

        match status {
            ArgStatus::Accepted => {
                if source == Some(Source::Following) {
                    self.pos += 1;
                }
            }
            ArgStatus::AcceptedWithoutValue => {
                // `--flag=text` on an option without a value: the text is
                // not the option's, so it stands on its own.
                if let (Some(text), Some(Source::Attached)) = (candidate, source) {
                    self.positional.push(text);
                }
            }
            ArgStatus::Rejected => {}
        }
        Ok(())
    }

    fn short_cluster(&mut self, body: &'a str) -> Result<()> {
        let mut rest = body;
        while let Some(c) = rest.chars().next() {
            let after = &rest[c.len_utf8()..];
            let row = descriptor::find_short(self.parser.table, c);
            let typed = format!("-{}", c);

            let (candidate, source) = if after.is_empty() {
                self.following(row)
            } else {
                (Some(after), Some(Source::Attached))
            };
            let known = row.is_some();
            let status = self.file(row, typed, candidate, source)?;

            match status {
                ArgStatus::Accepted => {
                    if source == Some(Source::Following) {
                        self.pos += 1;
                    }
                    return Ok(());
                }
                ArgStatus::AcceptedWithoutValue => rest = after,
                // a known option keeps its bad glued value; after an unknown
                // character the cluster carries on
                ArgStatus::Rejected if known => return Ok(()),
                ArgStatus::Rejected => rest = after,
            }
        }
        Ok(())
    }

    /// The next argument, offered as a value unless it reads as an option.
    /// Options that never take values are not offered anything.
    fn following(&self, row: Option<usize>) -> (Option<&'a str>, Option<Source>) {
        if let Some(row) = row {
            if !self.parser.table[row].check.takes_value() {
                return (None, None);
            }
        }
        match self.args.get(self.pos) {
            Some(&next) if !self.parser.looks_like_option(next) => (Some(next), Some(Source::Following)),
            _ => (None, None),
        }
    }

    /// Judge one option token and store it. `row` is the matched table row;
    /// `None` sends the token to the catch-all row if there is one.
    fn file(
        &mut self,
        row: Option<usize>,
        typed: String,
        candidate: Option<&'a str>,
        source: Option<Source>,
    ) -> Result<ArgStatus> {
        let table = self.parser.table;
        let known = row.is_some();
        let row = row.or_else(|| descriptor::catch_all(table));
        let check = row.map_or(Check::Unknown, |r| table[r].check);

        let status = check.check(&Candidate::new(&typed, candidate), Some(&mut self.diag));
        let arg = match status {
            ArgStatus::Accepted => candidate,
            ArgStatus::AcceptedWithoutValue => None,
            // only text typed as part of a known option stays with it
            ArgStatus::Rejected if known && source == Some(Source::Attached) => candidate,
            ArgStatus::Rejected => None,
        };
        let illegal = status == ArgStatus::Rejected;
        if illegal {
            self.rejected += 1;
        }

        debug!(option = %typed, ?row, ?status, ?arg, "option");
        let index = row.map(|r| table[r].index);
        let kind = row.map_or(0, |r| table[r].kind);
        self.storage
            .record(Occurrence::new(index, row, kind, typed, arg, illegal))?;
        Ok(status)
    }
}
