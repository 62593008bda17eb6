use rusqlite::{params, OptionalExtension};

use super::*;
use crate::types::{Category, Priority, TaskRecord};

const TASK_COLUMNS: &str = "id, title, content, priority, is_done, due_date, reminder_time,
     category, image_uris, completed_at, is_incubated, is_from_inspiration, audio_path";

impl TaskDb {
    // =========================================================================
    // Tasks
    // =========================================================================

    /// Insert a task. A positive `id` replaces any existing row with that id;
    /// otherwise SQLite assigns one. Returns the stored id.
    pub fn insert_task(&self, task: &TaskRecord) -> Result<i64, DbError> {
        let id = (task.id > 0).then_some(task.id);
        self.conn.execute(
            "INSERT OR REPLACE INTO tasks (id, title, content, priority, is_done, due_date,
                 reminder_time, category, image_uris, completed_at, is_incubated,
                 is_from_inspiration, audio_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                id,
                task.title,
                task.body,
                i64::from(task.priority),
                task.done,
                task.due_at,
                task.reminder_at,
                task.category,
                join_image_uris(&task.image_uris),
                task.completed_at,
                task.incubated,
                task.from_inspiration,
                task.audio_path,
            ],
        )?;
        Ok(id.unwrap_or_else(|| self.conn.last_insert_rowid()))
    }

    /// Overwrite every column of an existing task.
    pub fn update_task(&self, task: &TaskRecord) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?1, content = ?2, priority = ?3, is_done = ?4,
                 due_date = ?5, reminder_time = ?6, category = ?7, image_uris = ?8,
                 completed_at = ?9, is_incubated = ?10, is_from_inspiration = ?11,
                 audio_path = ?12
             WHERE id = ?13",
            params![
                task.title,
                task.body,
                i64::from(task.priority),
                task.done,
                task.due_at,
                task.reminder_at,
                task.category,
                join_image_uris(&task.image_uris),
                task.completed_at,
                task.incubated,
                task.from_inspiration,
                task.audio_path,
                task.id,
            ],
        )?;
        if changed == 0 {
            return Err(DbError::TaskNotFound(task.id));
        }
        Ok(())
    }

    /// Delete a task. Returns whether a row was removed.
    pub fn delete_task(&self, id: i64) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<TaskRecord>, DbError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let task = self
            .conn
            .query_row(&sql, params![id], Self::map_task_row)
            .optional()?;
        Ok(task)
    }

    /// Every task and inspiration, newest first.
    pub fn get_all_tasks(&self) -> Result<Vec<TaskRecord>, DbError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id DESC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::map_task_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    fn require_task(&self, id: i64) -> Result<TaskRecord, DbError> {
        self.get_task(id)?.ok_or(DbError::TaskNotFound(id))
    }

    /// Flip a task's done state. `completed_at` is set to `now_millis` when it
    /// becomes done and cleared when it is reopened.
    pub fn toggle_done(&self, id: i64, now_millis: i64) -> Result<TaskRecord, DbError> {
        self.with_transaction(|db| {
            let mut task = db.require_task(id)?;
            task.done = !task.done;
            task.completed_at = task.done.then_some(now_millis);
            db.update_task(&task)?;
            log::debug!(
                "Task {} marked {}",
                id,
                if task.done { "done" } else { "open" }
            );
            Ok(task)
        })
    }

    /// Promote an inspiration into an actionable task due `now_millis`.
    ///
    /// The idea is flagged as incubated and kept; the new task copies its
    /// text and attachments. Returns the new task.
    pub fn incubate(&self, idea_id: i64, now_millis: i64) -> Result<TaskRecord, DbError> {
        self.with_transaction(|db| {
            let mut idea = db.require_task(idea_id)?;
            if !idea.is_idea() {
                log::warn!("Incubating task {} which is not an inspiration", idea_id);
            }
            idea.incubated = true;
            db.update_task(&idea)?;

            let mut task = TaskRecord {
                body: idea.body.clone(),
                priority: Priority::Medium,
                due_at: Some(now_millis),
                image_uris: idea.image_uris.clone(),
                audio_path: idea.audio_path.clone(),
                from_inspiration: true,
                ..TaskRecord::new(idea.title.clone(), Category::Other.app_label())
            };
            task.id = db.insert_task(&task)?;
            log::info!("Incubated idea {} into task {}", idea_id, task.id);
            Ok(task)
        })
    }

    /// Attach an image URI to a task.
    pub fn add_image(&self, id: i64, uri: &str) -> Result<TaskRecord, DbError> {
        self.with_transaction(|db| {
            let mut task = db.require_task(id)?;
            task.image_uris.push(uri.to_string());
            db.update_task(&task)?;
            Ok(task)
        })
    }

    /// Detach an image URI. Removing a URI that is not attached is a no-op.
    pub fn remove_image(&self, id: i64, uri: &str) -> Result<TaskRecord, DbError> {
        self.with_transaction(|db| {
            let mut task = db.require_task(id)?;
            if let Some(pos) = task.image_uris.iter().position(|u| u == uri) {
                task.image_uris.remove(pos);
                db.update_task(&task)?;
            }
            Ok(task)
        })
    }

    pub(crate) fn map_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRecord> {
        let packed_images: String = row.get(8)?;
        Ok(TaskRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get(2)?,
            priority: Priority::from(row.get::<_, i64>(3)?),
            done: row.get(4)?,
            due_at: row.get(5)?,
            reminder_at: row.get(6)?,
            category: row.get(7)?,
            image_uris: split_image_uris(&packed_images),
            completed_at: row.get(9)?,
            incubated: row.get(10)?,
            from_inspiration: row.get(11)?,
            audio_path: row.get(12)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_db;
    use super::*;

    fn sample_task(title: &str, category: &str) -> TaskRecord {
        TaskRecord {
            body: format!("{} details", title),
            priority: Priority::High,
            due_at: Some(1_772_445_600_000),
            reminder_at: Some(1_772_442_000_000),
            image_uris: vec!["content://media/1".to_string()],
            ..TaskRecord::new(title, category)
        }
    }

    #[test]
    fn test_insert_and_get_task() {
        let db = test_db();
        let id = db
            .insert_task(&sample_task("Write report", "work"))
            .expect("insert");
        assert!(id > 0);

        let stored = db.get_task(id).expect("query").expect("task exists");
        assert_eq!(stored.id, id);
        assert_eq!(stored.title, "Write report");
        assert_eq!(stored.body, "Write report details");
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.image_uris, vec!["content://media/1".to_string()]);
        assert!(!stored.done);
        assert_eq!(stored.completed_at, None);
    }

    #[test]
    fn test_insert_with_id_replaces() {
        let db = test_db();
        let mut task = sample_task("Original", "work");
        task.id = 7;
        assert_eq!(db.insert_task(&task).expect("insert"), 7);

        task.title = "Replaced".to_string();
        db.insert_task(&task).expect("replace");

        let all = db.get_all_tasks().expect("all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Replaced");
    }

    #[test]
    fn test_get_all_tasks_newest_first() {
        let db = test_db();
        let first = db.insert_task(&sample_task("first", "work")).unwrap();
        let second = db.insert_task(&sample_task("second", "life")).unwrap();
        let ids: Vec<i64> = db
            .get_all_tasks()
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_update_missing_task_errors() {
        let db = test_db();
        let mut ghost = sample_task("ghost", "work");
        ghost.id = 99;
        assert!(matches!(db.update_task(&ghost), Err(DbError::TaskNotFound(99))));
    }

    #[test]
    fn test_delete_task() {
        let db = test_db();
        let id = db.insert_task(&sample_task("temp", "work")).unwrap();
        assert!(db.delete_task(id).unwrap());
        assert!(!db.delete_task(id).unwrap());
        assert!(db.get_task(id).unwrap().is_none());
    }

    #[test]
    fn test_toggle_done_keeps_completed_at_in_sync() {
        let db = test_db();
        let id = db.insert_task(&sample_task("Gym", "fitness")).unwrap();

        let done = db.toggle_done(id, 1_772_460_000_000).expect("toggle on");
        assert!(done.done);
        assert_eq!(done.completed_at, Some(1_772_460_000_000));

        let reopened = db.toggle_done(id, 1_772_470_000_000).expect("toggle off");
        assert!(!reopened.done);
        assert_eq!(reopened.completed_at, None);

        let stored = db.get_task(id).unwrap().unwrap();
        assert_eq!(stored.done, stored.completed_at.is_some());
    }

    #[test]
    fn test_toggle_missing_task() {
        let db = test_db();
        assert!(matches!(db.toggle_done(5, 0), Err(DbError::TaskNotFound(5))));
    }

    #[test]
    fn test_incubate_promotes_idea() {
        let db = test_db();
        let mut idea = sample_task("Podcast about gardening", "灵感");
        idea.audio_path = Some("/recordings/idea.m4a".to_string());
        let idea_id = db.insert_task(&idea).unwrap();

        let task = db.incubate(idea_id, 1_772_445_600_000).expect("incubate");
        assert_ne!(task.id, idea_id);
        assert_eq!(task.title, "Podcast about gardening");
        assert_eq!(task.category, "其他");
        assert_eq!(task.category_kind(), Category::Other);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_at, Some(1_772_445_600_000));
        assert!(task.from_inspiration);
        assert_eq!(task.audio_path.as_deref(), Some("/recordings/idea.m4a"));

        let stored_idea = db.get_task(idea_id).unwrap().unwrap();
        assert!(stored_idea.incubated);
        let stored_task = db.get_task(task.id).unwrap().unwrap();
        assert_eq!(stored_task.category, "其他");
        assert_eq!(db.get_all_tasks().unwrap().len(), 2);
    }

    #[test]
    fn test_add_and_remove_image() {
        let db = test_db();
        let id = db.insert_task(&sample_task("Receipt", "life")).unwrap();

        let task = db.add_image(id, "file:///img/2.jpg").unwrap();
        assert_eq!(task.image_uris.len(), 2);

        let task = db.remove_image(id, "content://media/1").unwrap();
        assert_eq!(task.image_uris, vec!["file:///img/2.jpg".to_string()]);

        let task = db.remove_image(id, "not-attached").unwrap();
        assert_eq!(task.image_uris.len(), 1);
        assert_eq!(db.get_task(id).unwrap().unwrap().image_uris.len(), 1);
    }
}
