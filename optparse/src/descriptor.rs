//! The static option table.

use crate::check::Check;

/// One row of an option table.
///
/// Rows sharing an `index` are aliases of one logical option, or extra help
/// lines for it. The first row with both `short` and `long` empty is the
/// catch-all: unknown options are filed under its index. A table may end
/// with [`Descriptor::END`]; rows after it are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub index: usize,
    /// Distinguishes rows that share an index, e.g. `--enable-x` and
    /// `--disable-x`.
    pub kind: i32,
    /// Characters accepted after a single dash. Each one matches.
    pub short: &'static str,
    /// Name accepted after a double dash.
    pub long: &'static str,
    pub check: Check,
    pub help: &'static str,
}

impl Descriptor {
    pub const END: Descriptor = Descriptor {
        index: 0,
        kind: 0,
        short: "",
        long: "",
        check: Check::None,
        help: "",
    };

    pub const fn new(
        index: usize,
        short: &'static str,
        long: &'static str,
        check: Check,
        help: &'static str,
    ) -> Self {
        Descriptor {
            index,
            kind: 0,
            short,
            long,
            check,
            help,
        }
    }

    pub const fn with_kind(mut self, kind: i32) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_end(&self) -> bool {
        *self == Descriptor::END
    }

    pub fn is_catch_all(&self) -> bool {
        self.short.is_empty() && self.long.is_empty()
    }

    /// How the option is usually written, for messages about rows rather
    /// than about typed tokens.
    pub fn display_name(&self) -> String {
        if !self.long.is_empty() {
            format!("--{}", self.long)
        } else if let Some(c) = self.short.chars().next() {
            format!("-{}", c)
        } else {
            format!("#{}", self.index)
        }
    }
}

/// The live rows of `table`: everything before the first `END`.
pub fn rows(table: &[Descriptor]) -> &[Descriptor] {
    let end = table.iter().position(Descriptor::is_end).unwrap_or(table.len());
    &table[..end]
}

/// One slot per index from 0 to the largest index in the table.
pub fn slot_count(table: &[Descriptor]) -> usize {
    rows(table).iter().map(|d| d.index + 1).max().unwrap_or(0)
}

pub(crate) fn catch_all(table: &[Descriptor]) -> Option<usize> {
    rows(table).iter().position(Descriptor::is_catch_all)
}

pub(crate) fn find_short(table: &[Descriptor], c: char) -> Option<usize> {
    rows(table).iter().position(|d| d.short.contains(c))
}

/// Outcome of looking up a long option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LongMatch {
    Exact(usize),
    Abbrev(usize),
    Ambiguous,
    NotFound,
}

impl LongMatch {
    pub(crate) fn row(self) -> Option<usize> {
        match self {
            LongMatch::Exact(row) | LongMatch::Abbrev(row) => Some(row),
            LongMatch::Ambiguous | LongMatch::NotFound => None,
        }
    }
}

/// Exact name first; otherwise a prefix of exactly one distinct long name,
/// provided it is at least `min_abbr_len` long (0 turns prefixes off).
pub(crate) fn find_long(table: &[Descriptor], name: &str, min_abbr_len: usize) -> LongMatch {
    let rows = rows(table);
    if name.is_empty() {
        return LongMatch::NotFound;
    }
    if let Some(row) = rows.iter().position(|d| d.long == name) {
        return LongMatch::Exact(row);
    }
    if min_abbr_len == 0 || name.chars().count() < min_abbr_len {
        return LongMatch::NotFound;
    }
    let mut found: Option<usize> = None;
    for (row, d) in rows.iter().enumerate() {
        if d.long.is_empty() || !d.long.starts_with(name) {
            continue;
        }
        match found {
            None => found = Some(row),
            Some(prev) if rows[prev].long == d.long => {}
            Some(_) => return LongMatch::Ambiguous,
        }
    }
    match found {
        Some(row) => LongMatch::Abbrev(row),
        None => LongMatch::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[Descriptor] = &[
        Descriptor::new(0, "", "", Check::Unknown, "USAGE: t [options]"),
        Descriptor::new(1, "h?", "help", Check::None, "  -h, --help  \tHelp."),
        Descriptor::new(2, "v", "verbose", Check::None, "  -v, --verbose  \tMore."),
        Descriptor::new(5, "", "version", Check::None, "  --version  \tVersion."),
        Descriptor::new(2, "", "", Check::None, "  \tSecond help line for verbose."),
        Descriptor::new(3, "q", "quiet", Check::None, "").with_kind(1),
        Descriptor::END,
        Descriptor::new(9, "z", "zzz", Check::None, "after the end"),
    ];

    #[test]
    fn rows_stop_at_end() {
        assert_eq!(rows(TABLE).len(), 6);
        assert_eq!(rows(&TABLE[..2]).len(), 2);
    }

    #[test]
    fn slot_count_uses_largest_index() {
        assert_eq!(slot_count(TABLE), 6);
        assert_eq!(slot_count(&[Descriptor::END]), 0);
        assert_eq!(slot_count(&[]), 0);
    }

    #[test]
    fn catch_all_is_first_nameless_row() {
        assert_eq!(catch_all(TABLE), Some(0));
        assert_eq!(catch_all(&TABLE[1..4]), None);
    }

    #[test]
    fn short_lookup_any_char() {
        assert_eq!(find_short(TABLE, 'h'), Some(1));
        assert_eq!(find_short(TABLE, '?'), Some(1));
        assert_eq!(find_short(TABLE, 'q'), Some(5));
        assert_eq!(find_short(TABLE, 'z'), None);
    }

    #[test]
    fn long_lookup() {
        assert_eq!(find_long(TABLE, "verbose", 1), LongMatch::Exact(2));
        assert_eq!(find_long(TABLE, "verb", 1), LongMatch::Abbrev(2));
        assert_eq!(find_long(TABLE, "ver", 1), LongMatch::Ambiguous);
        assert_eq!(find_long(TABLE, "h", 1), LongMatch::Abbrev(1));
        assert_eq!(find_long(TABLE, "h", 2), LongMatch::NotFound);
        assert_eq!(find_long(TABLE, "verb", 0), LongMatch::NotFound);
        assert_eq!(find_long(TABLE, "zzz", 1), LongMatch::NotFound);
        assert_eq!(find_long(TABLE, "", 1), LongMatch::NotFound);
    }

    #[test]
    fn display_names() {
        assert_eq!(TABLE[1].display_name(), "--help");
        assert_eq!(Descriptor::new(4, "x", "", Check::None, "").display_name(), "-x");
        assert_eq!(TABLE[0].display_name(), "#0");
        assert_eq!(TABLE[5].kind, 1);
    }
}
