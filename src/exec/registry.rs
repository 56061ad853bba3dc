// src/exec/registry.rs

//! Process registry: run id → live process handle.
//!
//! One mutex guards the whole map and is only held for the map operation
//! itself. A run id can be occupied by at most one entry; a second
//! registration fails until the first is removed.
//!
//! Launching goes through [`ProcessRegistry::try_reserve`]: the slot is
//! claimed before anything is spawned, so two identical concurrent requests
//! cannot both start a process. The returned [`RunGuard`] is the single
//! owner of the entry and removes it exactly once, on drop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Identity of a live child process, as needed by the cancel path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunHandle {
    pub pid: u32,
    /// Process-group id; equal to `pid` since the child leads its own group.
    pub pgid: u32,
}

impl RunHandle {
    pub fn new(pid: u32) -> Self {
        Self { pid, pgid: pid }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    /// Claimed, process not started yet.
    Reserved,
    Live(RunHandle),
}

/// Shared, cloneable registry of running processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    inner: Arc<Mutex<HashMap<String, Slot>>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `handle` under `run_id` unless the id is already taken.
    pub fn try_register(&self, run_id: &str, handle: RunHandle) -> bool {
        let mut map = self.map();
        if map.contains_key(run_id) {
            return false;
        }
        map.insert(run_id.to_string(), Slot::Live(handle));
        debug!(run_id, pid = handle.pid, "registered run");
        true
    }

    /// Claim `run_id` for a process that is about to start.
    ///
    /// Returns `None` if the id is already taken. Dropping the guard frees
    /// the slot again, whether or not a process was ever attached.
    pub fn try_reserve(&self, run_id: &str) -> Option<RunGuard> {
        let mut map = self.map();
        if map.contains_key(run_id) {
            return None;
        }
        map.insert(run_id.to_string(), Slot::Reserved);
        debug!(run_id, "reserved run slot");
        Some(RunGuard {
            registry: self.clone(),
            run_id: run_id.to_string(),
        })
    }

    /// Live handle for `run_id`. Reserved-but-unstarted slots are invisible.
    pub fn lookup(&self, run_id: &str) -> Option<RunHandle> {
        match self.map().get(run_id) {
            Some(Slot::Live(handle)) => Some(*handle),
            _ => None,
        }
    }

    /// Remove the entry for `run_id`. Returns whether one existed.
    pub fn remove(&self, run_id: &str) -> bool {
        let removed = self.map().remove(run_id).is_some();
        if removed {
            debug!(run_id, "removed run from registry");
        }
        removed
    }

    /// Snapshot of every live run, for shutdown.
    pub fn live_handles(&self) -> Vec<(String, RunHandle)> {
        self.map()
            .iter()
            .filter_map(|(id, slot)| match slot {
                Slot::Live(handle) => Some((id.clone(), *handle)),
                Slot::Reserved => None,
            })
            .collect()
    }

    /// Whether `run_id` has any entry, reserved or live.
    pub fn contains(&self, run_id: &str) -> bool {
        self.map().contains_key(run_id)
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    fn attach(&self, run_id: &str, handle: RunHandle) {
        if let Some(slot) = self.map().get_mut(run_id) {
            *slot = Slot::Live(handle);
            debug!(run_id, pid = handle.pid, "registered run");
        }
    }
}

/// Ownership of one registry slot. Removes the slot when dropped.
#[derive(Debug)]
pub struct RunGuard {
    registry: ProcessRegistry,
    run_id: String,
}

impl RunGuard {
    /// Publish the started process so cancel requests can find it.
    pub fn attach(&self, handle: RunHandle) {
        self.registry.attach(&self.run_id, handle);
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.run_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_registration_fails_until_removed() {
        let reg = ProcessRegistry::new();

        assert!(reg.try_register("job", RunHandle::new(10)));
        assert!(!reg.try_register("job", RunHandle::new(11)));
        assert_eq!(reg.lookup("job"), Some(RunHandle::new(10)));

        assert!(reg.remove("job"));
        assert!(!reg.remove("job"));
        assert!(reg.try_register("job", RunHandle::new(12)));
    }

    #[test]
    fn reservation_blocks_registration_and_is_invisible_to_lookup() {
        let reg = ProcessRegistry::new();
        let guard = reg.try_reserve("job").expect("slot free");

        assert!(reg.try_reserve("job").is_none());
        assert!(!reg.try_register("job", RunHandle::new(1)));
        assert_eq!(reg.lookup("job"), None);

        guard.attach(RunHandle::new(42));
        assert_eq!(reg.lookup("job"), Some(RunHandle::new(42)));
    }

    #[test]
    fn guard_drop_removes_entry_once() {
        let reg = ProcessRegistry::new();
        {
            let guard = reg.try_reserve("job").unwrap();
            guard.attach(RunHandle::new(7));
            assert_eq!(reg.len(), 1);
        }
        assert!(reg.is_empty());
        assert!(reg.try_reserve("job").is_some());
    }

    #[test]
    fn live_handles_skips_reservations() {
        let reg = ProcessRegistry::new();
        let _pending = reg.try_reserve("pending").unwrap();
        let live = reg.try_reserve("live").unwrap();
        live.attach(RunHandle::new(99));

        assert_eq!(
            reg.live_handles(),
            vec![("live".to_string(), RunHandle::new(99))]
        );
    }

    #[test]
    fn distinct_ids_do_not_conflict() {
        let reg = ProcessRegistry::new();
        let _a = reg.try_reserve("a").unwrap();
        let _b = reg.try_reserve("b").unwrap();
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn concurrent_reservations_admit_exactly_one() {
        let reg = ProcessRegistry::new();
        let barrier = Arc::new(std::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = reg.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    reg.try_reserve("same").map(std::mem::forget).is_some()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
