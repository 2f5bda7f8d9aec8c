//! ACID-durable task store backed by redb.
//!
//! Two tables: `tasks` maps the uuid to the bincode-encoded record, and
//! `task_names` maps the lowercased name back to the uuid, enforcing
//! case-insensitive name uniqueness inside the same write transaction.

use std::cmp::Reverse;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{DoneFilter, StoreResult, TaskSort};
use crate::task::Task;

/// Table mapping task uuid → bincode-encoded [`Task`].
const TASKS: TableDefinition<&str, &[u8]> = TableDefinition::new("tasks");

/// Table mapping lowercased task name → task uuid.
const NAME_INDEX: TableDefinition<&str, &str> = TableDefinition::new("task_names");

fn redb_err(op: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Redb {
        message: format!("{op} failed: {e}"),
    }
}

fn encode(task: &Task) -> StoreResult<Vec<u8>> {
    bincode::serialize(task).map_err(|e| StoreError::Serialization {
        message: format!("failed to serialize task: {e}"),
    })
}

fn decode(bytes: &[u8]) -> StoreResult<Task> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization {
        message: format!("failed to deserialize task: {e}"),
    })
}

/// ACID-durable task store.
///
/// All writes go through transactions; reads use MVCC snapshots, so the
/// store is safe to share across threads behind its internal `Arc`.
#[derive(Clone)]
pub struct TaskStore {
    db: Arc<Database>,
}

impl TaskStore {
    /// Open or create a task store in the given directory.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::Io { source: e })?;
        let db_path = data_dir.join("taskling.redb");
        let db = Database::create(&db_path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", db_path.display()),
        })?;

        let store = Self { db: Arc::new(db) };
        // Materialize both tables so a fresh database can serve reads.
        let txn = store.db.begin_write().map_err(|e| redb_err("begin_write", e))?;
        txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;
        txn.open_table(NAME_INDEX)
            .map_err(|e| redb_err("open_table", e))?;
        txn.commit().map_err(|e| redb_err("commit", e))?;
        Ok(store)
    }

    /// Insert a new task.
    ///
    /// Rejects a task whose name already exists, compared case-insensitively.
    pub fn insert(&self, task: &Task) -> StoreResult<()> {
        let name_key = task.name.to_lowercase();
        let id = task.id.to_string();
        let encoded = encode(task)?;

        let txn = self.db.begin_write().map_err(|e| redb_err("begin_write", e))?;
        {
            let mut names = txn
                .open_table(NAME_INDEX)
                .map_err(|e| redb_err("open_table", e))?;
            let taken = names
                .get(name_key.as_str())
                .map_err(|e| redb_err("get", e))?
                .is_some();
            if taken {
                // Dropping the transaction aborts it.
                return Err(StoreError::DuplicateName {
                    name: task.name.clone(),
                });
            }
            names
                .insert(name_key.as_str(), id.as_str())
                .map_err(|e| redb_err("insert", e))?;

            let mut tasks = txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;
            tasks
                .insert(id.as_str(), encoded.as_slice())
                .map_err(|e| redb_err("insert", e))?;
        }
        txn.commit().map_err(|e| redb_err("commit", e))?;
        Ok(())
    }

    /// Look up a task by id. Returns `Ok(None)` when it does not exist.
    pub fn get(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let txn = self.db.begin_read().map_err(|e| redb_err("begin_read", e))?;
        let tasks = txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;
        let found = tasks
            .get(id.to_string().as_str())
            .map_err(|e| redb_err("get", e))?;
        match found {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a task by name, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> StoreResult<Option<Task>> {
        let name_key = name.trim().to_lowercase();
        let txn = self.db.begin_read().map_err(|e| redb_err("begin_read", e))?;
        let names = txn
            .open_table(NAME_INDEX)
            .map_err(|e| redb_err("open_table", e))?;
        let id = match names.get(name_key.as_str()).map_err(|e| redb_err("get", e))? {
            Some(guard) => guard.value().to_string(),
            None => return Ok(None),
        };
        let tasks = txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;
        match tasks.get(id.as_str()).map_err(|e| redb_err("get", e))? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    /// List tasks matching `filter`, ordered by `sort`.
    pub fn list(&self, filter: DoneFilter, sort: TaskSort) -> StoreResult<Vec<Task>> {
        let txn = self.db.begin_read().map_err(|e| redb_err("begin_read", e))?;
        let table = txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;

        let mut tasks = Vec::new();
        for entry in table.iter().map_err(|e| redb_err("iter", e))? {
            let (_, value) = entry.map_err(|e| redb_err("iter", e))?;
            let task = decode(value.value())?;
            if filter.admits(task.done) {
                tasks.push(task);
            }
        }

        match sort {
            TaskSort::Created => tasks.sort_by_key(|t| t.created_at),
            TaskSort::Priority => tasks.sort_by_key(|t| (Reverse(t.priority), t.created_at)),
            TaskSort::Due => {
                // Absent due dates sort last.
                tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.created_at));
            }
            TaskSort::Category => {
                tasks.sort_by(|a, b| {
                    (a.category.as_str(), a.created_at).cmp(&(b.category.as_str(), b.created_at))
                });
            }
        }
        Ok(tasks)
    }

    /// Overwrite an existing task record (same id, same name).
    fn put(&self, task: &Task) -> StoreResult<()> {
        let id = task.id.to_string();
        let encoded = encode(task)?;
        let txn = self.db.begin_write().map_err(|e| redb_err("begin_write", e))?;
        {
            let mut tasks = txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;
            tasks
                .insert(id.as_str(), encoded.as_slice())
                .map_err(|e| redb_err("insert", e))?;
        }
        txn.commit().map_err(|e| redb_err("commit", e))?;
        Ok(())
    }

    /// Flip a task's done flag by id. Returns the updated task.
    pub fn toggle(&self, id: Uuid) -> StoreResult<Task> {
        let mut task = self.get(id)?.ok_or_else(|| StoreError::NotFound {
            wanted: id.to_string(),
        })?;
        task.done = !task.done;
        self.put(&task)?;
        Ok(task)
    }

    /// Mark a task as done by name, case-insensitively. Returns the updated
    /// task.
    pub fn set_done_by_name(&self, name: &str) -> StoreResult<Task> {
        let mut task = self
            .find_by_name(name)?
            .ok_or_else(|| StoreError::NotFound {
                wanted: name.to_string(),
            })?;
        task.done = true;
        self.put(&task)?;
        Ok(task)
    }

    /// Delete a task by id. Returns the removed task.
    pub fn remove(&self, id: Uuid) -> StoreResult<Task> {
        let task = self.get(id)?.ok_or_else(|| StoreError::NotFound {
            wanted: id.to_string(),
        })?;
        self.remove_record(&task)?;
        Ok(task)
    }

    /// Delete a task by name, case-insensitively. Returns the removed task.
    pub fn remove_by_name(&self, name: &str) -> StoreResult<Task> {
        let task = self
            .find_by_name(name)?
            .ok_or_else(|| StoreError::NotFound {
                wanted: name.to_string(),
            })?;
        self.remove_record(&task)?;
        Ok(task)
    }

    fn remove_record(&self, task: &Task) -> StoreResult<()> {
        let id = task.id.to_string();
        let name_key = task.name.to_lowercase();
        let txn = self.db.begin_write().map_err(|e| redb_err("begin_write", e))?;
        {
            let mut tasks = txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;
            tasks.remove(id.as_str()).map_err(|e| redb_err("remove", e))?;
            let mut names = txn
                .open_table(NAME_INDEX)
                .map_err(|e| redb_err("open_table", e))?;
            names
                .remove(name_key.as_str())
                .map_err(|e| redb_err("remove", e))?;
        }
        txn.commit().map_err(|e| redb_err("commit", e))?;
        Ok(())
    }

    /// Delete all completed tasks. Returns how many were removed.
    pub fn clear_completed(&self) -> StoreResult<usize> {
        let done = self.list(DoneFilter::Done, TaskSort::Created)?;
        for task in &done {
            self.remove_record(task)?;
        }
        Ok(done.len())
    }

    /// Delete every task. Returns how many were removed.
    pub fn clear_all(&self) -> StoreResult<usize> {
        let all = self.list(DoneFilter::Any, TaskSort::Created)?;
        for task in &all {
            self.remove_record(task)?;
        }
        Ok(all.len())
    }

    /// Number of stored tasks.
    pub fn len(&self) -> StoreResult<usize> {
        let txn = self.db.begin_read().map_err(|e| redb_err("begin_read", e))?;
        let table = txn.open_table(TASKS).map_err(|e| redb_err("open_table", e))?;
        let n = table.len().map_err(|e| redb_err("len", e))?;
        Ok(n as usize)
    }

    /// Whether the store holds no tasks.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> TaskStore {
        TaskStore::open(dir.path()).unwrap()
    }

    fn task(name: &str, priority: Priority) -> Task {
        Task::new(name, priority, "general", None)
    }

    #[test]
    fn insert_get_and_find_by_name() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let t = task("Buy Milk", Priority::Low);
        store.insert(&t).unwrap();

        let by_id = store.get(t.id).unwrap().unwrap();
        assert_eq!(by_id.name, "Buy Milk");

        // Name lookup is case-insensitive.
        let by_name = store.find_by_name("buy milk").unwrap().unwrap();
        assert_eq!(by_name.id, t.id);
        assert!(store.find_by_name("buy bread").unwrap().is_none());
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.insert(&task("Buy Milk", Priority::Low)).unwrap();
        let err = store.insert(&task("buy milk", Priority::High)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn toggle_flips_done_both_ways() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let t = task("laundry", Priority::Low);
        store.insert(&t).unwrap();

        assert!(store.toggle(t.id).unwrap().done);
        assert!(!store.toggle(t.id).unwrap().done);

        let missing = Uuid::new_v4();
        assert!(matches!(
            store.toggle(missing),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn set_done_by_name_marks_done() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.insert(&task("Water Plants", Priority::Low)).unwrap();
        let updated = store.set_done_by_name("water plants").unwrap();
        assert!(updated.done);
    }

    #[test]
    fn remove_frees_the_name_for_reuse() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.insert(&task("buy milk", Priority::Low)).unwrap();
        store.remove_by_name("BUY MILK").unwrap();
        assert!(store.is_empty().unwrap());

        // The name index entry is gone too.
        store.insert(&task("buy milk", Priority::Low)).unwrap();
    }

    #[test]
    fn clear_completed_leaves_open_tasks() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let a = task("a", Priority::Low);
        let b = task("b", Priority::Low);
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();
        store.toggle(a.id).unwrap();

        assert_eq!(store.clear_completed().unwrap(), 1);
        let rest = store.list(DoneFilter::Any, TaskSort::Created).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "b");

        assert_eq!(store.clear_all().unwrap(), 1);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn persistence_across_reopens() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            store.insert(&task("persist me", Priority::Medium)).unwrap();
        }
        let store = open_store(&dir);
        let found = store.find_by_name("persist me").unwrap().unwrap();
        assert_eq!(found.priority, Priority::Medium);
    }
}
