//! Deferred actions keyed by simulation time
//!
//! Staggered group spawns and multi-shot volleys are queued here with a
//! deadline in simulated seconds and drained once per frame. Every entry is
//! tagged with the run and the wave or encounter that created it; entries
//! whose owner is no longer live are dropped instead of executed.

use serde::{Deserialize, Serialize};

/// What created a deferred action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Wave(u32),
    Encounter(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub run: u32,
    pub owner: Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled<A> {
    due: f64,
    /// Insertion order, keeps same-deadline entries stable
    seq: u64,
    tag: Tag,
    action: A,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<A> {
    run: u32,
    now: f64,
    next_seq: u64,
    queue: Vec<Scheduled<A>>,
}

impl<A> Scheduler<A> {
    pub fn new(run: u32) -> Self {
        Self {
            run,
            now: 0.0,
            next_seq: 0,
            queue: Vec::new(),
        }
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    /// Accumulated simulated time
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn tag(&self, owner: Owner) -> Tag {
        Tag {
            run: self.run,
            owner,
        }
    }

    pub fn schedule(&mut self, delay: f32, tag: Tag, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due: self.now + delay.max(0.0) as f64,
            seq,
            tag,
            action,
        });
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += dt as f64;
    }

    /// Remove every entry whose deadline has passed. Entries from another
    /// run or from an owner `is_live` rejects are discarded silently.
    pub fn drain_due(&mut self, is_live: impl Fn(Owner) -> bool) -> Vec<A> {
        let now = self.now;
        let run = self.run;
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.queue.len() {
            if self.queue[i].due <= now {
                due.push(self.queue.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));

        due.into_iter()
            .filter_map(|entry| {
                if entry.tag.run == run && is_live(entry.tag.owner) {
                    Some(entry.action)
                } else {
                    log::debug!("Dropping stale deferred action from {:?}", entry.tag);
                    None
                }
            })
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
