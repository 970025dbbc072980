//! Sizing pass.
//!
//! Bounds the storage the matching pass will need for one input, before
//! anything is allocated. The bound may be loose but never too small.

use tracing::debug;

use crate::descriptor::{self, Descriptor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Descriptor slots: one past the largest index in the table.
    pub slots: usize,
    /// Upper bound on occurrence records.
    pub occurrences: usize,
}

impl Stats {
    pub fn new<S: AsRef<str>>(table: &[Descriptor], args: &[S]) -> Self {
        let mut stats = Stats::default();
        stats.add(table, args);
        stats
    }

    /// Widen the sizes to also cover `args`, so one storage can hold the
    /// result of parsing several argument vectors with the same table.
    pub fn add<S: AsRef<str>>(&mut self, table: &[Descriptor], args: &[S]) {
        self.slots = self.slots.max(descriptor::slot_count(table));
        self.occurrences += max_occurrences(args);
        debug!(slots = self.slots, occurrences = self.occurrences, "sized option storage");
    }
}

/// Every `--name` can yield one record and every `-abc` one per character.
/// Nothing after `--` can be an option.
fn max_occurrences<S: AsRef<str>>(args: &[S]) -> usize {
    let mut n = 0;
    for arg in args {
        let arg = arg.as_ref();
        if arg == "--" {
            break;
        }
        if arg.starts_with("--") {
            n += 1;
        } else if let Some(cluster) = arg.strip_prefix('-') {
            n += cluster.chars().count();
        }
    }
    n
}
