//! Task identifier → output path table.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use tracing::info;

use crate::{TaskId, TaskLogEntry};

/// Thread-safe association of task identifiers to output file paths.
///
/// Entries live as long as the registry; there is no removal. A later
/// registration for the same task replaces the earlier path.
///
/// Construct one per process, wrap it in an `Arc` and hand it to whatever
/// serves reads.
#[derive(Debug, Default)]
pub struct TaskLogRegistry {
    paths: RwLock<HashMap<TaskId, PathBuf>>,
}

impl TaskLogRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where `task_id` writes its output, replacing any earlier path.
    ///
    /// The path is not checked; tasks may register before producing output.
    /// The mapping is visible to every `resolve` that starts after this
    /// returns.
    pub fn register(&self, task_id: impl Into<TaskId>, path: impl Into<PathBuf>) {
        let task_id = task_id.into();
        let path = path.into();

        info!(task_id = %task_id, path = %path.display(), "Registering task output");

        // A panic while holding the lock cannot leave the map half-updated,
        // so a poisoned lock is still safe to use.
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(task_id, path);
    }

    /// Register a prepared entry.
    pub fn register_entry(&self, entry: TaskLogEntry) {
        self.register(entry.task_id, entry.path);
    }

    /// Look up the current output path of `task_id`.
    pub fn resolve(&self, task_id: &str) -> Option<PathBuf> {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task_id)
            .cloned()
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no task has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_resolve_unregistered() {
        let registry = TaskLogRegistry::new();
        assert!(registry.resolve("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = TaskLogRegistry::new();
        registry.register("t1", "/tmp/out.log");

        assert_eq!(registry.resolve("t1").as_deref(), Some(Path::new("/tmp/out.log")));
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_register_does_not_require_existing_file() {
        let registry = TaskLogRegistry::new();
        registry.register("t1", "/definitely/not/here/stdout.txt");
        assert!(registry.resolve("t1").is_some());
    }

    #[test]
    fn test_reregistration_last_write_wins() {
        let registry = TaskLogRegistry::new();
        registry.register("t1", "/tmp/a.log");
        registry.register("t1", "/tmp/b.log");

        assert_eq!(registry.resolve("t1").as_deref(), Some(Path::new("/tmp/b.log")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_entry() {
        let registry = TaskLogRegistry::new();
        registry.register_entry(TaskLogEntry::new("t9", "/var/log/t9"));
        assert_eq!(registry.resolve("t9").as_deref(), Some(Path::new("/var/log/t9")));
    }

    #[test]
    fn test_concurrent_registration_distinct_ids() {
        let registry = Arc::new(TaskLogRegistry::new());

        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|id| {
                let registry = registry.clone();
                thread::spawn(move || registry.register(id, format!("/logs/{id}.txt")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.resolve("a").as_deref(), Some(Path::new("/logs/a.txt")));
        assert_eq!(registry.resolve("b").as_deref(), Some(Path::new("/logs/b.txt")));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_register_and_resolve() {
        let registry = Arc::new(TaskLogRegistry::new());
        registry.register("stable", "/logs/stable.txt");

        thread::scope(|s| {
            for i in 0..4 {
                let registry = &registry;
                s.spawn(move || {
                    for j in 0..100 {
                        registry.register(format!("w{i}-{j}"), format!("/logs/{i}/{j}"));
                    }
                });
            }
            for _ in 0..4 {
                let registry = &registry;
                s.spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(
                            registry.resolve("stable").as_deref(),
                            Some(Path::new("/logs/stable.txt"))
                        );
                    }
                });
            }
        });

        assert_eq!(registry.len(), 401);
        assert_eq!(registry.resolve("w3-99").as_deref(), Some(Path::new("/logs/3/99")));
    }
}
