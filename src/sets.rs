// src/sets.rs
//! Ordered set lists with two-tier numbering.
//!
//! Every exercise owns one `SetSequence`: warmup sets carry number 0 and sit
//! in front, working sets are numbered 1..N contiguously in display order.
//! All mutating operations renumber before returning, so callers can always
//! render the sequence as-is.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("an exercise must keep at least one set")]
    LastSet,
}

/// Process-unique handle to a set inside its sequence.
///
/// Ids are never reused, so a handle from another sequence (or a removed set)
/// simply fails to resolve instead of aliasing a different record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetId(u64);

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

impl SetId {
    fn next() -> Self {
        Self(NEXT_SET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One set record: display number, warmup flag, and the variant payload
/// (strength or running metrics).
#[derive(Debug, Clone)]
pub struct SetRecord<P> {
    id: SetId,
    number: u32,
    warmup: bool,
    pub payload: P,
}

impl<P> SetRecord<P> {
    pub const fn id(&self) -> SetId {
        self.id
    }

    /// Display number: 0 for warmups, 1..N for working sets.
    pub const fn number(&self) -> u32 {
        self.number
    }

    pub const fn is_warmup(&self) -> bool {
        self.warmup
    }

    /// Row label the way the detail view shows it.
    pub fn label(&self) -> String {
        if self.warmup {
            "W".to_string()
        } else {
            format!("Set {}", self.number)
        }
    }
}

/// Ordered collection of sets for a single exercise.
pub struct SetSequence<P> {
    records: Vec<SetRecord<P>>,
    revision: u64,
    on_change: Option<Box<dyn FnMut()>>,
}

impl<P> Default for SetSequence<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: fmt::Debug> fmt::Debug for SetSequence<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetSequence")
            .field("records", &self.records)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl<P> SetSequence<P> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            revision: 0,
            on_change: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bumped once per call that actually changed the sequence. No-op calls
    /// leave it untouched.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback fired once after every effective mutation,
    /// carrying no payload beyond "this sequence changed".
    pub fn set_on_change(&mut self, listener: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn iter(&self) -> impl Iterator<Item = &SetRecord<P>> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SetRecord<P>> {
        self.records.iter_mut()
    }

    #[must_use]
    pub fn get(&self, id: SetId) -> Option<&SetRecord<P>> {
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: SetId) -> Option<&mut SetRecord<P>> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Id of the set at display row `index` (0-based), if any.
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<SetId> {
        self.records.get(index).map(|r| r.id)
    }

    #[must_use]
    pub fn last(&self) -> Option<&SetRecord<P>> {
        self.records.last()
    }

    fn index_of(&self, id: SetId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    fn working_count(&self) -> u32 {
        self.records.iter().filter(|r| !r.warmup).count() as u32
    }

    fn touch(&mut self) {
        self.revision += 1;
        if let Some(listener) = self.on_change.as_mut() {
            listener();
        }
    }

    /// Appends a working set at the end. The new set is numbered after the
    /// existing working sets.
    pub fn append(&mut self, payload: P) -> SetId {
        let id = SetId::next();
        let number = self.working_count() + 1;
        self.records.push(SetRecord {
            id,
            number,
            warmup: false,
            payload,
        });
        self.touch();
        id
    }

    /// Removes a set, refusing to leave the sequence empty.
    ///
    /// An id that does not belong to this sequence is a silent no-op.
    ///
    /// # Errors
    /// `SequenceError::LastSet` if `id` names the only remaining set; the
    /// set stays in place.
    pub fn remove(&mut self, id: SetId) -> Result<(), SequenceError> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };
        if self.records.len() == 1 {
            return Err(SequenceError::LastSet);
        }
        self.records.remove(index);
        self.renumber();
        self.touch();
        Ok(())
    }

    /// Relocates `id` to the slot `target` occupies once `id` has been taken
    /// out. No-op when either id is absent or both name the same set.
    pub fn move_to(&mut self, id: SetId, target: SetId) {
        if id == target {
            return;
        }
        let Some(from) = self.index_of(id) else {
            return;
        };
        if self.index_of(target).is_none() {
            return;
        }
        let record = self.records.remove(from);
        // Target index is resolved after removal, per drag-and-drop slot
        // semantics: the moved set lands where the target currently renders.
        let to = self
            .index_of(target)
            .expect("target still present after removing a different set");
        self.records.insert(to, record);
        self.renumber();
        self.touch();
    }

    /// Flips the warmup state of a set, cascading to keep warmups a prefix.
    ///
    /// Marking a working set also marks every set at or before it. Unmarking
    /// a warmup set also unmarks the contiguous warmup run right after it,
    /// leaving any earlier warmups alone. The asymmetry is intentional and
    /// matched by the tests; do not straighten it out.
    pub fn toggle_warmup(&mut self, id: SetId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if self.records[index].warmup {
            self.records[index].warmup = false;
            for record in &mut self.records[index + 1..] {
                if record.warmup {
                    record.warmup = false;
                } else {
                    break;
                }
            }
        } else {
            for record in &mut self.records[..=index] {
                record.warmup = true;
            }
        }
        self.renumber();
        self.touch();
    }

    /// Recomputes every set number from the warmup flags and current order:
    /// warmups get 0, working sets get 1..N in their relative order.
    /// Idempotent, and invoked by every mutating operation above.
    pub fn renumber(&mut self) {
        let mut next = 1;
        for record in &mut self.records {
            if record.warmup {
                record.number = 0;
            } else {
                record.number = next;
                next += 1;
            }
        }
    }
}
