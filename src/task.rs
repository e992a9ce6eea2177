use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Lowest and highest value an urgency or importance rating can hold.
pub const RATING_MIN: u8 = 0;
pub const RATING_MAX: u8 = 100;

/// Clamp an arbitrary integer into the rating range. Out-of-range input is
/// sanitized, never rejected.
pub fn clamp_rating(value: i64) -> u8 {
    value.clamp(RATING_MIN as i64, RATING_MAX as i64) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    label: String,
    urgency: u8,
    importance: u8,
    completed: bool,
    moving: bool,
}

impl Task {
    pub fn new(id: TaskId, label: impl Into<String>, urgency: i64, importance: i64) -> Self {
        Self {
            id,
            label: label.into(),
            urgency: clamp_rating(urgency),
            importance: clamp_rating(importance),
            completed: false,
            moving: false,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn urgency(&self) -> u8 {
        self.urgency
    }

    pub fn importance(&self) -> u8 {
        self.importance
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// True while the task is being dragged; moving tasks are left out of layout.
    pub fn moving(&self) -> bool {
        self.moving
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_urgency(&mut self, urgency: i64) {
        self.urgency = clamp_rating(urgency);
    }

    pub fn set_importance(&mut self, importance: i64) {
        self.importance = clamp_rating(importance);
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }
}

/// Fields needed to create a task; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub label: String,
    pub urgency: i64,
    pub importance: i64,
    pub completed: bool,
}

/// Storage collaborator: owns the tasks and hands them out by id.
pub trait TaskStore {
    fn tasks(&self) -> &[Task];
    fn get(&self, id: TaskId) -> Option<&Task>;
    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task>;
    fn create(&mut self, task: NewTask) -> TaskId;

    /// Apply `update` to the task with `id`. Returns false when no such task exists.
    fn update<F>(&mut self, id: TaskId, update: F) -> bool
    where
        F: FnOnce(&mut Task),
        Self: Sized,
    {
        match self.get_mut(id) {
            Some(task) => {
                update(task);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.0 + 1).max().unwrap_or(1);
        Self { tasks, next_id }
    }
}

impl TaskStore for MemoryStore {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn create(&mut self, task: NewTask) -> TaskId {
        let id = TaskId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.tasks.push(
            Task::new(id, task.label, task.urgency, task.importance).with_completed(task.completed),
        );
        id
    }
}

#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("failed to read task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed task file: {0}")]
    Parse(#[from] json5::Error),
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),
}

/// One entry of a task file. Ratings are read as wide integers so that
/// out-of-range values can be clamped instead of failing deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: Option<u64>,
    label: String,
    #[serde(default)]
    urgency: i64,
    #[serde(default)]
    importance: i64,
    #[serde(default)]
    completed: bool,
}

/// Parse a JSON5 array of task records. Records without an id get the next
/// free one, in file order.
pub fn parse_tasks(input: &str) -> Result<Vec<Task>, TaskFileError> {
    let records: Vec<TaskRecord> = json5::from_str(input)?;
    let mut next_id = records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
    let mut tasks: Vec<Task> = Vec::with_capacity(records.len());
    for record in records {
        let id = match record.id {
            Some(id) => TaskId(id),
            None => {
                let id = TaskId(next_id);
                next_id += 1;
                id
            }
        };
        if tasks.iter().any(|t| t.id == id) {
            return Err(TaskFileError::DuplicateId(id));
        }
        tasks.push(
            Task::new(id, record.label, record.urgency, record.importance)
                .with_completed(record.completed),
        );
    }
    Ok(tasks)
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, TaskFileError> {
    let contents = std::fs::read_to_string(path)?;
    parse_tasks(&contents)
}
