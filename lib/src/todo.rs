use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::collection::{self, Document};
use crate::db::{Collectable, Identifiable};
use crate::{Database, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub task: String,
    #[serde(default)]
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoInput {
    pub task: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoUpdate {
    pub completed: bool,
}

impl Collectable for Todo {
    fn get_collection_name() -> &'static str {
        "todos"
    }
}

impl Identifiable for Todo {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Document for Todo {
    type Input = TodoInput;
    const NAME: &'static str = "todo";

    fn from_input(input: TodoInput, id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            task: input.task,
            completed: false,
            timestamp,
        }
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Sets the completion flag, leaving the rest of the todo untouched.
pub fn set_completed(db: &Database, id: &str, update: TodoUpdate) -> Result<Todo> {
    collection::update::<Todo, _>(db, id, |todo| todo.completed = update.completed)
}

#[cfg(test)]
mod tests {
    use crate::ErrorKind;

    use super::*;

    fn todo(db: &Database, task: &str) -> Todo {
        collection::create::<Todo>(
            db,
            TodoInput {
                task: task.to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn new_todos_are_not_completed() {
        let db = Database::memory();
        assert!(!todo(&db, "buy flowers").completed);
    }

    #[test]
    fn todos_list_newest_first() {
        let db = Database::memory();
        let t1 = todo(&db, "T1");
        let t2 = todo(&db, "T2");
        let t3 = todo(&db, "T3");

        let ids: Vec<_> = collection::list::<Todo>(&db)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, [t3.id, t2.id, t1.id]);
    }

    #[test]
    fn completing_only_changes_the_flag() {
        let db = Database::memory();
        let before = todo(&db, "water plants");

        let after =
            set_completed(&db, &before.id.to_string(), TodoUpdate { completed: true }).unwrap();
        assert!(after.completed);
        assert_eq!(after.id, before.id);
        assert_eq!(after.task, before.task);
        assert_eq!(after.timestamp, before.timestamp);

        let listed = collection::list::<Todo>(&db).unwrap();
        assert_eq!(listed, vec![after.clone()]);

        let reopened =
            set_completed(&db, &before.id.to_string(), TodoUpdate { completed: false }).unwrap();
        assert_eq!(reopened, before);
    }

    #[test]
    fn completing_missing_todo_is_not_found() {
        let db = Database::memory();
        let gone = todo(&db, "gone");
        collection::delete::<Todo>(&db, &gone.id.to_string()).unwrap();

        let err =
            set_completed(&db, &gone.id.to_string(), TodoUpdate { completed: true }).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NotFound(_)));
        assert!(collection::list::<Todo>(&db).unwrap().is_empty());
    }

    #[test]
    fn update_requires_boolean_flag() {
        assert!(serde_json::from_str::<TodoUpdate>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<TodoUpdate>(r#"{"completed": "yes"}"#).is_err());
        assert!(serde_json::from_str::<TodoUpdate>(r#"{"completed": true, "task": "x"}"#).is_ok());
    }
}
