//! Spawn-group bookkeeping for the group-clear bonus
//!
//! A group pays out once, when every member it started with has been killed.
//! Escaped members are tracked separately so wave completion can tell when a
//! group has no members left on the field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnGroup {
    pub id: u32,
    /// Members the group was spawned with
    pub size: u32,
    pub kills: u32,
    pub escaped: u32,
    /// One-shot latch for the bonus
    pub paid: bool,
}

impl SpawnGroup {
    /// Members still on the field (or not yet spawned)
    pub fn outstanding(&self) -> u32 {
        self.size.saturating_sub(self.kills + self.escaped)
    }
}

/// Bonus owed for clearing a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupClear {
    pub group: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupTracker {
    groups: BTreeMap<u32, SpawnGroup>,
}

impl GroupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a group. Re-registering a known id is ignored.
    pub fn register(&mut self, id: u32, size: u32) {
        self.groups.entry(id).or_insert(SpawnGroup {
            id,
            size,
            kills: 0,
            escaped: 0,
            paid: false,
        });
    }

    /// Count a member's death; returns the bonus if this kill cleared the group
    pub fn record_kill(&mut self, id: u32) -> Option<GroupClear> {
        let group = self.groups.get_mut(&id)?;
        if group.kills + group.escaped >= group.size {
            return None;
        }
        group.kills += 1;
        if group.kills == group.size && group.size > 1 && !group.paid {
            group.paid = true;
            log::debug!("Group {} cleared ({} members)", id, group.size);
            return Some(GroupClear {
                group: id,
                size: group.size,
            });
        }
        None
    }

    pub fn record_escape(&mut self, id: u32) {
        if let Some(group) = self.groups.get_mut(&id) {
            if group.kills + group.escaped < group.size {
                group.escaped += 1;
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<&SpawnGroup> {
        self.groups.get(&id)
    }

    /// Members of the given groups not yet killed or escaped
    pub fn outstanding<'a>(&self, ids: impl IntoIterator<Item = &'a u32>) -> u32 {
        ids.into_iter()
            .filter_map(|id| self.groups.get(id))
            .map(SpawnGroup::outstanding)
            .sum()
    }

    /// Forget groups with nothing left to resolve
    pub fn prune(&mut self) {
        self.groups.retain(|_, g| g.outstanding() > 0);
    }
}
