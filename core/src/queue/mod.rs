//! Ordered job queue
//!
//! A doubly-linked sequence of jobs backed by a slotmap arena. Entries are
//! addressed by stable, versioned handles (`EntryId`): removal by handle is
//! O(1), and a handle that is foreign to the queue or already removed fails
//! key lookup instead of touching unrelated memory.
//!
//! The queue runs in one of two disciplines:
//! - **unordered**: new entries are linked at the front, so a forward
//!   traversal sees reverse insertion order; head/tail choice is left to the
//!   caller (front removal gives LIFO, tail removal gives FIFO);
//! - **ordered**: entries are kept sorted by a numeric key chosen at
//!   construction (`QueueOrder`), with job identity breaking all ties. The
//!   key and the id together form a strict total order, so insertion
//!   position is unambiguous: before the first entry not preceding the new
//!   job.
//!
//! Insertion is O(n) worst case; all traversal accessors are read-only.

use crate::models::job::{Job, JobId};
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Stable handle to a queue entry. Versioned: a handle goes stale the
    /// moment its entry is removed and never aliases a later insertion.
    pub struct EntryId;
}

/// Errors reported for queue-contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The handle does not name a live entry of this queue.
    #[error("queue entry {0:?} is foreign or already removed")]
    UnknownEntry(EntryId),
}

/// Total order applied to an ordered queue: the numeric key compared first,
/// job identity as the deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOrder {
    /// Sort by remaining service time.
    RemainingTime,
    /// Sort by nominal service time.
    ServiceTime,
}

impl QueueOrder {
    fn key(self, job: &Job) -> (u64, JobId) {
        match self {
            QueueOrder::RemainingTime => (job.remaining_time(), job.id()),
            QueueOrder::ServiceTime => (job.service_time(), job.id()),
        }
    }
}

#[derive(Debug)]
struct Node {
    job: Job,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

/// The queue itself. Owns the jobs while they are queued; `remove` hands the
/// job back by value.
#[derive(Debug)]
pub struct JobQueue {
    nodes: SlotMap<EntryId, Node>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    order: Option<QueueOrder>,
}

impl JobQueue {
    /// Create a queue with no ordering; new entries link at the front.
    pub fn unordered() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            order: None,
        }
    }

    /// Create a queue kept sorted by `order`.
    pub fn ordered(order: QueueOrder) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            order: Some(order),
        }
    }

    /// Insert `job`, returning the handle to its entry.
    ///
    /// Unordered queues link the entry at the front. Ordered queues place it
    /// before the first entry whose (key, id) is not less than the new
    /// job's, keeping the traversal order non-decreasing.
    pub fn insert(&mut self, job: Job) -> EntryId {
        let id = self.nodes.insert(Node {
            job,
            prev: None,
            next: None,
        });

        let before = match self.order {
            None => self.head,
            Some(order) => {
                let new_key = order.key(&self.nodes[id].job);
                let mut cursor = self.head;
                while let Some(e) = cursor {
                    if new_key <= order.key(&self.nodes[e].job) {
                        break;
                    }
                    cursor = self.nodes[e].next;
                }
                cursor
            }
        };

        self.link_before(id, before);
        id
    }

    /// Detach the entry named by `entry` and return its job.
    ///
    /// O(1). A foreign or stale handle is a programming error on the
    /// caller's side, reported as `QueueError::UnknownEntry`.
    pub fn remove(&mut self, entry: EntryId) -> Result<Job, QueueError> {
        let node = self
            .nodes
            .remove(entry)
            .ok_or(QueueError::UnknownEntry(entry))?;

        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.nodes[n].prev = node.prev,
            None => self.tail = node.prev,
        }

        Ok(node.job)
    }

    /// First entry in traversal order, or `None` when empty.
    pub fn head(&self) -> Option<EntryId> {
        self.head
    }

    /// Last entry in traversal order, or `None` when empty.
    pub fn tail(&self) -> Option<EntryId> {
        self.tail
    }

    /// Entry after `entry`, `None` at the end or for a stale handle.
    pub fn next(&self, entry: EntryId) -> Option<EntryId> {
        self.nodes.get(entry).and_then(|n| n.next)
    }

    /// Entry before `entry`, `None` at the front or for a stale handle.
    pub fn prev(&self, entry: EntryId) -> Option<EntryId> {
        self.nodes.get(entry).and_then(|n| n.prev)
    }

    /// The job held by `entry`, if the handle is live.
    pub fn job(&self, entry: EntryId) -> Option<&Job> {
        self.nodes.get(entry).map(|n| &n.job)
    }

    /// Mutable access to the job held by `entry`.
    pub fn job_mut(&mut self, entry: EntryId) -> Option<&mut Job> {
        self.nodes.get_mut(entry).map(|n| &mut n.job)
    }

    /// Head entry together with its job.
    pub fn head_job(&self) -> Option<(EntryId, &Job)> {
        self.head.map(|e| (e, &self.nodes[e].job))
    }

    /// Tail entry together with its job.
    pub fn tail_job(&self) -> Option<(EntryId, &Job)> {
        self.tail.map(|e| (e, &self.nodes[e].job))
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the queue holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First entry (in traversal order) whose job satisfies `pred`.
    pub fn find(&self, mut pred: impl FnMut(&Job) -> bool) -> Option<EntryId> {
        self.iter().find(|&(_, job)| pred(job)).map(|(e, _)| e)
    }

    /// Traverse head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            queue: self,
            cursor: self.head,
        }
    }

    /// Apply `f` to every queued job, head to tail.
    ///
    /// A uniform adjustment (the fair-share decrement) preserves the sorted
    /// order of an ordered queue, so no re-linking happens here.
    pub fn for_each_job_mut(&mut self, mut f: impl FnMut(&mut Job)) {
        let mut cursor = self.head;
        while let Some(e) = cursor {
            cursor = self.nodes[e].next;
            f(&mut self.nodes[e].job);
        }
    }

    fn link_before(&mut self, id: EntryId, before: Option<EntryId>) {
        match before {
            Some(next_id) => {
                let prev = self.nodes[next_id].prev;
                self.nodes[id].prev = prev;
                self.nodes[id].next = Some(next_id);
                self.nodes[next_id].prev = Some(id);
                match prev {
                    Some(p) => self.nodes[p].next = Some(id),
                    None => self.head = Some(id),
                }
            }
            None => {
                let prev = self.tail;
                self.nodes[id].prev = prev;
                self.nodes[id].next = None;
                match prev {
                    Some(p) => self.nodes[p].next = Some(id),
                    None => self.head = Some(id),
                }
                self.tail = Some(id);
            }
        }
    }
}

/// Head-to-tail traversal over `(EntryId, &Job)` pairs.
pub struct Iter<'a> {
    queue: &'a JobQueue,
    cursor: Option<EntryId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (EntryId, &'a Job);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.cursor?;
        self.cursor = self.queue.nodes[e].next;
        Some((e, &self.queue.nodes[e].job))
    }
}
