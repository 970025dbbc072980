//! The result of one parse and read-only views over it.

use std::iter::FusedIterator;

use crate::descriptor::{self, Descriptor};
use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::store::{Occurrence, OccurrenceId, Slot, Storage};

/// Everything one parse produced. Owns its storage; values borrow from the
/// argument vector.
#[derive(Debug)]
pub struct Parsed<'a> {
    table: &'a [Descriptor],
    args: Vec<&'a str>,
    storage: Storage<'a>,
    positional: Vec<&'a str>,
    diagnostics: Vec<String>,
    rejected: usize,
}

impl<'a> Parsed<'a> {
    pub(crate) fn new(
        table: &'a [Descriptor],
        args: Vec<&'a str>,
        storage: Storage<'a>,
        positional: Vec<&'a str>,
        diagnostics: Vec<String>,
        rejected: usize,
    ) -> Self {
        Parsed {
            table,
            args,
            storage,
            positional,
            diagnostics,
            rejected,
        }
    }

    /// Whether any token was rejected. Check this before trusting values.
    pub fn error(&self) -> bool {
        self.rejected > 0
    }

    /// Number of rejected tokens.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Diagnostic lines emitted while parsing, in order.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn table(&self) -> &'a [Descriptor] {
        self.table
    }

    /// The arguments as handed in.
    pub fn raw_args(&self) -> &[&'a str] {
        &self.args
    }

    /// Arguments that were neither options nor option values, in order.
    pub fn positional(&self) -> &[&'a str] {
        &self.positional
    }

    /// Every option token, in the order given.
    pub fn occurrences(&self) -> std::slice::Iter<'_, Occurrence<'a>> {
        self.storage.records.iter()
    }

    pub fn occurrence(&self, id: OccurrenceId) -> Option<&Occurrence<'a>> {
        self.storage.records.get(id)
    }

    /// Number of descriptor slots.
    pub fn slots(&self) -> usize {
        self.storage.slots.len()
    }

    /// The occurrences filed under `index`. Out-of-range indices give an
    /// empty group.
    pub fn group(&self, index: usize) -> Group<'_, 'a> {
        Group {
            parsed: self,
            index,
            slot: self.storage.slots.get(index).copied().unwrap_or_default(),
        }
    }

    /// One group per slot, by index.
    pub fn groups(&self) -> impl Iterator<Item = Group<'_, 'a>> + '_ {
        (0..self.slots()).map(move |index| self.group(index))
    }

    pub fn count(&self, index: usize) -> usize {
        self.group(index).count()
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.count(index) > 0
    }

    /// Value of the first occurrence of `index`.
    pub fn value(&self, index: usize) -> Result<&'a str> {
        self.value_of(index, |g| g.first())
    }

    /// Value of the last occurrence of `index`.
    pub fn last_value(&self, index: usize) -> Result<&'a str> {
        self.value_of(index, |g| g.last())
    }

    fn value_of<'p>(
        &'p self,
        index: usize,
        pick: impl FnOnce(&Group<'p, 'a>) -> Option<&'p Occurrence<'a>>,
    ) -> Result<&'a str> {
        if index >= self.slots() {
            return Err(Error::IndexOutOfRange {
                index,
                slots: self.slots(),
            });
        }
        let group = self.group(index);
        let occ = pick(&group).ok_or(Error::Absent(index))?;
        occ.arg().ok_or_else(|| Error::NoValue(occ.name().to_string()))
    }

    /// Table row an occurrence matched.
    pub fn descriptor(&self, occ: &Occurrence<'_>) -> Option<&'a Descriptor> {
        occ.row().and_then(|row| descriptor::rows(self.table).get(row))
    }

    /// Report every listed index that was never given, and fail if any was
    /// missing.
    pub fn check_mandatory(&self, indices: &[usize], diag: &mut dyn Diagnostics) -> Result<()> {
        let mut missing = Vec::new();
        for &index in indices {
            if self.is_present(index) {
                continue;
            }
            let name = self.option_name(index);
            diag.report(&Error::MissingMandatory(name.clone()).to_string());
            missing.push(name);
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Mandatory(missing))
        }
    }

    fn option_name(&self, index: usize) -> String {
        descriptor::rows(self.table)
            .iter()
            .find(|d| d.index == index && !d.is_catch_all())
            .map(Descriptor::display_name)
            .unwrap_or_else(|| format!("#{}", index))
    }
}

/// All occurrences of one option index.
#[derive(Debug, Clone, Copy)]
pub struct Group<'p, 'a> {
    parsed: &'p Parsed<'a>,
    index: usize,
    slot: Slot,
}

impl<'p, 'a> Group<'p, 'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.slot.count()
    }

    pub fn is_present(&self) -> bool {
        self.count() > 0
    }

    pub fn first(&self) -> Option<&'p Occurrence<'a>> {
        self.slot.first().and_then(|id| self.parsed.occurrence(id))
    }

    pub fn last(&self) -> Option<&'p Occurrence<'a>> {
        self.slot.last().and_then(|id| self.parsed.occurrence(id))
    }

    /// Value of the first occurrence.
    pub fn arg(&self) -> Option<&'a str> {
        self.first().and_then(Occurrence::arg)
    }

    /// Walk the chain; reversible.
    pub fn iter(&self) -> Chain<'p, 'a> {
        Chain {
            records: &self.parsed.storage.records,
            front: self.slot.first(),
            back: self.slot.last(),
            remaining: self.slot.count(),
        }
    }
}

impl<'p, 'a> IntoIterator for Group<'p, 'a> {
    type Item = &'p Occurrence<'a>;
    type IntoIter = Chain<'p, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over one option's occurrences, following the links.
#[derive(Debug, Clone)]
pub struct Chain<'p, 'a> {
    records: &'p [Occurrence<'a>],
    front: Option<OccurrenceId>,
    back: Option<OccurrenceId>,
    remaining: usize,
}

impl<'p, 'a> Iterator for Chain<'p, 'a> {
    type Item = &'p Occurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let occ = self.records.get(self.front?)?;
        self.remaining -= 1;
        self.front = occ.next();
        Some(occ)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Chain<'_, '_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let occ = self.records.get(self.back?)?;
        self.remaining -= 1;
        self.back = occ.prev();
        Some(occ)
    }
}

impl ExactSizeIterator for Chain<'_, '_> {}

impl FusedIterator for Chain<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;
    use crate::diag::Silent;
    use crate::parser::Parser;

    const UNKNOWN: usize = 0;
    const HELP: usize = 1;
    const REQUIRED: usize = 2;
    const FLAG: usize = 3;
    const UNUSED: usize = 5;

    const USAGE: &[Descriptor] = &[
        Descriptor::new(UNKNOWN, "", "", Check::Unknown, ""),
        Descriptor::new(HELP, "h", "help", Check::None, ""),
        Descriptor::new(REQUIRED, "r", "required", Check::Required, ""),
        Descriptor::new(FLAG, "f", "flag", Check::Optional, ""),
        Descriptor::new(UNUSED, "", "unused", Check::None, ""),
        Descriptor::END,
    ];

    fn parse<'a>(args: &'a [&'a str]) -> Parsed<'a> {
        Parser::new(USAGE).parse(args, &mut Silent).unwrap()
    }

    #[test]
    fn chain_walks_both_ways() {
        let args = ["-r", "a", "-h", "-r", "b", "x", "--required=c"];
        let p = parse(&args);
        let group = p.group(REQUIRED);
        assert_eq!(group.count(), 3);

        let forward: Vec<_> = group.iter().filter_map(Occurrence::arg).collect();
        assert_eq!(forward, vec!["a", "b", "c"]);
        let backward: Vec<_> = group.iter().rev().filter_map(Occurrence::arg).collect();
        assert_eq!(backward, vec!["c", "b", "a"]);
        assert_eq!(group.iter().len(), 3);

        // k steps along next() end on the last record, then nothing
        let mut id = group.slot.first();
        for _ in 1..group.count() {
            id = p.occurrence(id.unwrap()).unwrap().next();
        }
        assert_eq!(id, group.slot.last());
        assert_eq!(p.occurrence(id.unwrap()).unwrap().next(), None);

        let mut id = group.slot.last();
        for _ in 1..group.count() {
            id = p.occurrence(id.unwrap()).unwrap().prev();
        }
        assert_eq!(id, group.slot.first());
        assert_eq!(p.occurrence(id.unwrap()).unwrap().prev(), None);
    }

    #[test]
    fn chain_meets_in_the_middle() {
        let args = ["-r1", "-r2", "-r3"];
        let p = parse(&args);
        let mut it = p.group(REQUIRED).iter();
        assert_eq!(it.next().and_then(Occurrence::arg), Some("1"));
        assert_eq!(it.next_back().and_then(Occurrence::arg), Some("3"));
        assert_eq!(it.next().and_then(Occurrence::arg), Some("2"));
        assert!(it.next().is_none());
        assert!(it.next_back().is_none());
    }

    #[test]
    fn values() {
        let args = ["-r", "a", "-f", "-r", "b"];
        let p = parse(&args);
        assert_eq!(p.value(REQUIRED).unwrap(), "a");
        assert_eq!(p.last_value(REQUIRED).unwrap(), "b");
        assert!(matches!(p.value(FLAG), Err(Error::NoValue(name)) if name == "-f"));
        assert!(matches!(p.value(HELP), Err(Error::Absent(HELP))));
        assert!(matches!(
            p.value(42),
            Err(Error::IndexOutOfRange { index: 42, slots: 6 })
        ));
    }

    #[test]
    fn groups_cover_every_slot() {
        let args = ["-h", "-h"];
        let p = parse(&args);
        let counts: Vec<_> = p.groups().map(|g| g.count()).collect();
        assert_eq!(counts, vec![0, 2, 0, 0, 0, 0]);
        assert!(p.is_present(HELP));
        assert!(!p.group(99).is_present());
        assert_eq!(p.group(99).iter().count(), 0);
    }

    #[test]
    fn descriptor_of_occurrence() {
        let args = ["--req=1"];
        let p = parse(&args);
        let occ = p.occurrences().next().unwrap();
        assert_eq!(p.descriptor(occ).map(|d| d.long), Some("required"));
    }

    #[test]
    fn mandatory_options() {
        let args = ["-r", "x"];
        let p = parse(&args);
        let mut lines: Vec<String> = Vec::new();
        assert!(p.check_mandatory(&[REQUIRED], &mut lines).is_ok());
        assert!(lines.is_empty());

        match p.check_mandatory(&[HELP, REQUIRED, UNUSED], &mut lines) {
            Err(Error::Mandatory(missing)) => assert_eq!(missing, vec!["--help", "--unused"]),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            lines,
            vec![
                "Option '--help' is mandatory and was not given",
                "Option '--unused' is mandatory and was not given",
            ]
        );
    }
}
