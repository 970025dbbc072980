//! Occurrence storage.
//!
//! Records live in one flat arena in encounter order. Records that share an
//! option index are additionally threaded into a doubly linked chain through
//! arena ids, and each descriptor slot points at the ends of its chain.

use tracing::warn;

use crate::error::{Error, Result};
use crate::stats::Stats;

/// Arena id of an occurrence record.
pub type OccurrenceId = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    pub(crate) first: Option<OccurrenceId>,
    pub(crate) last: Option<OccurrenceId>,
    pub(crate) count: usize,
}

impl Slot {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn first(&self) -> Option<OccurrenceId> {
        self.first
    }

    pub fn last(&self) -> Option<OccurrenceId> {
        self.last
    }
}

/// One option token as found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub(crate) index: Option<usize>,
    pub(crate) row: Option<usize>,
    pub(crate) kind: i32,
    pub(crate) name: String,
    pub(crate) arg: Option<&'a str>,
    pub(crate) illegal: bool,
    pub(crate) prev: Option<OccurrenceId>,
    pub(crate) next: Option<OccurrenceId>,
}

impl<'a> Occurrence<'a> {
    pub(crate) fn new(
        index: Option<usize>,
        row: Option<usize>,
        kind: i32,
        name: String,
        arg: Option<&'a str>,
        illegal: bool,
    ) -> Self {
        Occurrence {
            index,
            row,
            kind,
            name,
            arg,
            illegal,
            prev: None,
            next: None,
        }
    }

    /// Option index this token was filed under; `None` for an unknown
    /// option when the table has no catch-all row.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Table row that matched.
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn kind(&self) -> i32 {
        self.kind
    }

    /// The option as typed, dashes included.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg(&self) -> Option<&'a str> {
        self.arg
    }

    /// Whether the checker rejected this token.
    pub fn is_illegal(&self) -> bool {
        self.illegal
    }

    pub fn prev(&self) -> Option<OccurrenceId> {
        self.prev
    }

    pub fn next(&self) -> Option<OccurrenceId> {
        self.next
    }
}

/// The two buffers a parse writes into: descriptor slots and occurrence
/// records. Both are sized up front and never grow.
#[derive(Debug)]
pub struct Storage<'a> {
    pub(crate) slots: Vec<Slot>,
    pub(crate) records: Vec<Occurrence<'a>>,
    capacity: usize,
}

impl<'a> Storage<'a> {
    pub fn new(stats: &Stats) -> Self {
        Storage {
            slots: vec![Slot::default(); stats.slots],
            records: Vec::with_capacity(stats.occurrences),
            capacity: stats.occurrences,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record and link it behind the last record of its slot.
    pub(crate) fn record(&mut self, occ: Occurrence<'a>) -> Result<OccurrenceId> {
        if self.records.len() == self.capacity {
            return Err(Error::BufferSize {
                what: "occurrence",
                needed: self.records.len() + 1,
                capacity: self.capacity,
            });
        }
        if let Some(index) = occ.index {
            if index >= self.slots.len() {
                return Err(Error::BufferSize {
                    what: "descriptor slot",
                    needed: index + 1,
                    capacity: self.slots.len(),
                });
            }
        }
        let id = self.records.len();
        let index = occ.index;
        self.records.push(occ);
        if let Some(index) = index {
            self.append(index, id);
        }
        Ok(id)
    }

    fn append(&mut self, index: usize, id: OccurrenceId) {
        let slot = &mut self.slots[index];
        match slot.last {
            Some(last) => {
                self.records[last].next = Some(id);
                self.records[id].prev = Some(last);
            }
            None => slot.first = Some(id),
        }
        slot.last = Some(id);
        slot.count += 1;
    }

    /// Repair pass: make every slot's chain hold every record filed under
    /// it. Records missing from a chain are appended to its end in arena
    /// order. Returns how many records had to be relinked.
    pub fn relink(&mut self) -> usize {
        let mut counts = vec![0usize; self.slots.len()];
        for occ in &self.records {
            if let Some(index) = occ.index {
                if index < counts.len() {
                    counts[index] += 1;
                }
            }
        }

        let mut repaired = 0;
        for (index, &expected) in counts.iter().enumerate() {
            if self.chain_len(index) == expected && self.slots[index].count == expected {
                continue;
            }
            let appended = self.relink_slot(index);
            warn!(index, appended, "relinked occurrence chain");
            repaired += appended;
        }
        repaired
    }

    /// Rebuild one slot's chain; returns how many records were appended.
    fn relink_slot(&mut self, index: usize) -> usize {
        let mut linked = vec![false; self.records.len()];
        let mut cursor = self.slots[index].first;
        let mut len = 0;
        while let Some(id) = cursor {
            if linked[id] {
                break;
            }
            linked[id] = true;
            len += 1;
            self.slots[index].last = Some(id);
            cursor = self.records[id].next;
        }
        if let Some(last) = self.slots[index].last {
            if linked[last] {
                self.records[last].next = None;
            }
        }
        self.slots[index].count = len;
        if len == 0 {
            self.slots[index].first = None;
            self.slots[index].last = None;
        }
        let mut appended = 0;
        for id in 0..self.records.len() {
            if self.records[id].index == Some(index) && !linked[id] {
                self.records[id].prev = None;
                self.records[id].next = None;
                self.append(index, id);
                appended += 1;
            }
        }
        appended
    }

    fn chain_len(&self, index: usize) -> usize {
        let mut n = 0;
        let mut cursor = self.slots[index].first;
        while let Some(id) = cursor {
            n += 1;
            if n > self.records.len() {
                break;
            }
            cursor = self.records[id].next;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(index: usize, arg: &str) -> Occurrence<'_> {
        Occurrence::new(Some(index), Some(index), 0, format!("-{}", index), Some(arg), false)
    }

    fn chain<'s>(store: &'s Storage<'_>, index: usize) -> Vec<&'s str> {
        let mut out = Vec::new();
        let mut cursor = store.slots[index].first;
        while let Some(id) = cursor {
            out.push(store.records[id].arg.unwrap_or(""));
            cursor = store.records[id].next;
        }
        out
    }

    #[test]
    fn links_in_encounter_order() {
        let mut store = Storage::new(&Stats { slots: 3, occurrences: 4 });
        store.record(occ(1, "a")).unwrap();
        store.record(occ(2, "x")).unwrap();
        store.record(occ(1, "b")).unwrap();
        store.record(occ(1, "c")).unwrap();

        assert_eq!(chain(&store, 1), vec!["a", "b", "c"]);
        assert_eq!(store.slots[1].count(), 3);
        assert_eq!(store.slots[1].first(), Some(0));
        assert_eq!(store.slots[1].last(), Some(3));
        assert_eq!(store.records[3].prev(), Some(2));
        assert_eq!(store.records[2].prev(), Some(0));
        assert_eq!(store.records[0].prev(), None);
        assert_eq!(store.slots[0].count(), 0);
        assert_eq!(store.relink(), 0);
    }

    #[test]
    fn unindexed_records_stay_unlinked() {
        let mut store = Storage::new(&Stats { slots: 1, occurrences: 1 });
        let id = store
            .record(Occurrence::new(None, None, 0, "-z".into(), None, true))
            .unwrap();
        assert_eq!(id, 0);
        assert_eq!(store.slots[0].count(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut store = Storage::new(&Stats { slots: 2, occurrences: 1 });
        store.record(occ(1, "a")).unwrap();
        match store.record(occ(1, "b")) {
            Err(Error::BufferSize { what, needed, capacity }) => {
                assert_eq!(what, "occurrence");
                assert_eq!((needed, capacity), (2, 1));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn slot_out_of_range_is_an_error() {
        let mut store = Storage::new(&Stats { slots: 2, occurrences: 4 });
        assert!(matches!(
            store.record(occ(2, "a")),
            Err(Error::BufferSize { what: "descriptor slot", .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn relink_appends_stray_records() {
        let mut store = Storage::new(&Stats { slots: 2, occurrences: 4 });
        store.record(occ(1, "a")).unwrap();
        // written into the arena without being threaded
        store.records.push(occ(1, "b"));
        store.records.push(occ(0, "z"));
        store.record(occ(1, "c")).unwrap();

        assert_eq!(chain(&store, 1), vec!["a", "c"]);
        assert_eq!(store.relink(), 2);
        assert_eq!(chain(&store, 1), vec!["a", "c", "b"]);
        assert_eq!(store.slots[1].count(), 3);
        assert_eq!(chain(&store, 0), vec!["z"]);
        assert_eq!(store.slots[0].count(), 1);
        assert_eq!(store.relink(), 0);
    }

    #[test]
    fn relink_counts_per_slot() {
        let mut store = Storage::new(&Stats { slots: 3, occurrences: 5 });
        store.record(occ(1, "a")).unwrap();
        store.records.push(occ(1, "b"));
        store.records.push(occ(1, "c"));
        store.records.push(occ(2, "x"));

        assert_eq!(store.relink_slot(1), 2);
        assert_eq!(store.relink_slot(2), 1);
        assert_eq!(store.relink_slot(1), 0);
        assert_eq!(chain(&store, 1), vec!["a", "b", "c"]);
    }

    #[test]
    fn capacity_comes_from_stats() {
        let stats = Stats { slots: 2, occurrences: 3 };
        let mut store = Storage::new(&stats);
        assert_eq!(store.capacity(), stats.occurrences);
        assert!(store.is_empty());
        store.record(occ(1, "a")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.capacity(), 3);
    }

    #[test]
    fn relink_rebuilds_lost_head() {
        let mut store = Storage::new(&Stats { slots: 2, occurrences: 2 });
        store.record(occ(1, "a")).unwrap();
        store.record(occ(1, "b")).unwrap();
        store.slots[1] = Slot::default();

        assert_eq!(store.relink(), 2);
        assert_eq!(chain(&store, 1), vec!["a", "b"]);
        assert_eq!(store.slots[1].last(), Some(1));
        assert_eq!(store.records[1].prev(), Some(0));
    }
}
