//! Task board - the single source of truth for what work exists right now.
//!
//! Stored in a `BTreeMap` so iteration order is ascending task id, which is
//! what makes bidding tie-breaks stable across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Task, TaskId};

/// Registry of live tasks, passed by reference into every producer, scorer,
/// and executor call - never an ambient singleton.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskBoard {
    tasks: BTreeMap<TaskId, Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh a task. If an entry with this id already exists,
    /// its claim is copied into the incoming record before storing: routine
    /// re-production must never bump an in-progress worker.
    pub fn upsert(&mut self, mut task: Task) {
        if let Some(existing) = self.tasks.get(&task.id) {
            task.claimed_by = existing.claimed_by;
        }
        self.tasks.insert(task.id.clone(), task);
    }

    /// Insert a task with its claim taken verbatim, overwriting any existing
    /// entry's claim. Used for chained successors, which arrive pre-claimed.
    pub fn insert_claimed(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        self.tasks.remove(id)
    }

    /// All live tasks in ascending id order.
    pub fn all(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Drop every task whose deadline has passed, claimed or not.
    pub fn expire(&mut self, now: f64) {
        self.tasks.retain(|_, task| !task.is_expired(now));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;
    use crate::tasks::{Target, TaskKind};

    fn task(creator: u64, kind: TaskKind, valid_until: f64) -> Task {
        Task::new(
            TaskId::derived(creator, kind),
            kind,
            creator,
            Target::Point(Vec2::ZERO),
            valid_until,
        )
    }

    #[test]
    fn test_upsert_preserves_claim() {
        let mut board = TaskBoard::new();

        let mut original = task(1, TaskKind::Gather, 10.0);
        original.claimed_by = Some(99);
        board.upsert(original);

        // Re-production refreshes fields but must not clear the claim
        let refreshed = task(1, TaskKind::Gather, 20.0);
        assert!(refreshed.claimed_by.is_none());
        board.upsert(refreshed);

        let stored = board.get(&TaskId::derived(1, TaskKind::Gather)).unwrap();
        assert_eq!(stored.claimed_by, Some(99));
        assert_eq!(stored.valid_until, 20.0);
    }

    #[test]
    fn test_insert_claimed_overwrites_claim() {
        let mut board = TaskBoard::new();
        board.upsert(task(1, TaskKind::HaulWood, 10.0));

        let mut chained = task(1, TaskKind::HaulWood, 10.0);
        chained.claimed_by = Some(7);
        board.insert_claimed(chained);

        let stored = board.get(&TaskId::derived(1, TaskKind::HaulWood)).unwrap();
        assert_eq!(stored.claimed_by, Some(7));
    }

    #[test]
    fn test_expire_removes_regardless_of_claim() {
        let mut board = TaskBoard::new();

        let mut claimed = task(1, TaskKind::Gather, 5.0);
        claimed.claimed_by = Some(2);
        board.upsert(claimed);
        board.upsert(task(3, TaskKind::Chop, 50.0));

        board.expire(10.0);

        assert!(board.get(&TaskId::derived(1, TaskKind::Gather)).is_none());
        assert!(board.get(&TaskId::derived(3, TaskKind::Chop)).is_some());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_all_iterates_in_id_order() {
        let mut board = TaskBoard::new();
        board.upsert(task(30, TaskKind::Gather, 10.0));
        board.upsert(task(2, TaskKind::Gather, 10.0));
        board.upsert(task(11, TaskKind::Gather, 10.0));

        let ids: Vec<String> = board.all().map(|t| t.id.to_string()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
