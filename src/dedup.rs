use std::rc::Rc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::error::MergeResult;
use crate::record::{Field, IdentityKey, Record};
use crate::report;

/// Fields compared when describing a conflict, in report order.
pub const DIFF_FIELDS: [Field; 3] = [Field::Password, Field::Notes, Field::Url];

/// Retained records keyed by identity, in first-encounter order.
#[derive(Default, Debug)]
pub struct Store {
    entries: IndexMap<IdentityKey, Rc<Record>>,
    discarded: usize,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Retained records in the order their identity was first seen.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.values().map(|r| r.as_ref())
    }

    /// Exact duplicates dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

/// Two records sharing an identity key but not their contents.
#[derive(Clone, Debug)]
pub struct Conflict {
    pub incoming: Rc<Record>,
    pub existing: Rc<Record>,
}

/// A diff-worthy field whose value differs between the two sides of a
/// conflict.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldDiff<'a> {
    pub field: Field,
    pub incoming: &'a [u8],
    pub existing: &'a [u8],
}

impl Conflict {
    pub fn key(&self) -> IdentityKey {
        self.existing.identity_key()
    }

    pub fn diffs(&self) -> Vec<FieldDiff<'_>> {
        DIFF_FIELDS
            .iter()
            .filter_map(|&field| {
                let incoming = self.incoming.get(field);
                let existing = self.existing.get(field);
                (incoming != existing).then_some(FieldDiff {
                    field,
                    incoming,
                    existing,
                })
            })
            .collect()
    }
}

/// Fold one pass of records into `store`, returning the conflicts found.
///
/// The first record seen for an identity stays in the store; later records
/// with identical contents are dropped and differing ones are reported as
/// conflicts. Stops at the first error.
pub fn merge<I>(store: &mut Store, records: I) -> MergeResult<Vec<Conflict>>
where
    I: IntoIterator<Item = MergeResult<Record>>,
{
    let mut conflicts = Vec::new();

    for record in records {
        let record = record?;
        match store.entries.entry(record.identity_key()) {
            Entry::Vacant(slot) => {
                debug!(origin = %record.origin(), key = %slot.key(), "retained");
                slot.insert(Rc::new(record));
            }
            Entry::Occupied(slot) => {
                let existing = slot.get();
                if existing.content_key() == record.content_key() {
                    debug!(origin = %record.origin(), key = %slot.key(), "exact duplicate dropped");
                    store.discarded += 1;
                    continue;
                }
                let conflict = Conflict {
                    incoming: Rc::new(record),
                    existing: Rc::clone(existing),
                };
                report::log_conflict(&conflict);
                conflicts.push(conflict);
            }
        }
    }

    Ok(conflicts)
}
