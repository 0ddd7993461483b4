use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use daybook_core::{DomainError, DomainResult, Entity, NoteId, OwnerId, TaskId, WorkspaceId, text};
use daybook_tasks::NewTask;

/// Longest task title produced by [`Note::convert_to_task`].
pub const TASK_TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Text,
    Idea,
    Reminder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    owner_id: OwnerId,
    content: String,
    #[serde(rename = "type")]
    kind: NoteKind,
    converted_to_task: bool,
    task_id: Option<TaskId>,
    workspace: Option<WorkspaceId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub content: String,
    pub kind: Option<NoteKind>,
    pub workspace: Option<WorkspaceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub workspace: Option<WorkspaceId>,
    pub converted_to_task: Option<bool>,
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        if self.workspace.is_some() && note.workspace != self.workspace {
            return false;
        }
        !self
            .converted_to_task
            .is_some_and(|c| c != note.converted_to_task)
    }
}

impl Note {
    pub fn create(id: NoteId, owner_id: OwnerId, input: NewNote, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id,
            owner_id,
            content: text::required("content", &input.content)?,
            kind: input.kind.unwrap_or_default(),
            converted_to_task: false,
            task_id: None,
            workspace: input.workspace,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn is_converted(&self) -> bool {
        self.converted_to_task
    }

    pub fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    pub fn workspace(&self) -> Option<WorkspaceId> {
        self.workspace
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Mark the note as promoted to `task_id` and describe the task to create.
    ///
    /// A note converts at most once.
    pub fn convert_to_task(&mut self, task_id: TaskId, now: DateTime<Utc>) -> DomainResult<NewTask> {
        if self.converted_to_task {
            return Err(DomainError::conflict("note already converted to task"));
        }

        let title: String = self.content.chars().take(TASK_TITLE_MAX_CHARS).collect();
        self.converted_to_task = true;
        self.task_id = Some(task_id);
        self.updated_at = now;

        Ok(NewTask {
            title,
            description: Some(self.content.clone()),
            workspace: self.workspace,
            ..NewTask::default()
        })
    }
}

impl Entity for Note {
    type Id = NoteId;
    const COLLECTION: &'static str = "notes";
    const KIND: &'static str = "note";

    fn id(&self) -> NoteId {
        self.id
    }

    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}
