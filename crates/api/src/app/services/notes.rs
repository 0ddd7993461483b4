use tracing::info;

use daybook_core::{DomainError, NoteId, OwnerId, TaskId};
use daybook_infra::{DocumentStore, StoreResult};
use daybook_notes::{NewNote, Note, NoteFilter};
use daybook_tasks::{NewTask, Task};

use super::{AppServices, found};

impl AppServices {
    /// Newest first.
    pub async fn notes_list(&self, owner: &OwnerId, filter: &NoteFilter) -> StoreResult<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .list(owner)
            .await?
            .into_iter()
            .filter(|n| filter.matches(n))
            .collect();
        notes.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(notes)
    }

    pub async fn notes_create(&self, owner: &OwnerId, input: NewNote) -> StoreResult<Note> {
        let note = Note::create(NoteId::new(), owner.clone(), input, self.clock.now())?;
        self.notes.insert(note).await
    }

    pub async fn notes_delete(&self, owner: &OwnerId, id: NoteId) -> StoreResult<Note> {
        found(self.notes.remove(owner, id).await?)
    }

    /// Promote a note to a task.
    ///
    /// The note is marked first, under the store's guard, so a second
    /// conversion fails with a conflict even when requests race.
    pub async fn notes_convert(&self, owner: &OwnerId, id: NoteId) -> StoreResult<(Task, Note)> {
        let now = self.clock.now();
        let task_id = TaskId::new();
        let mut spec: Option<NewTask> = None;

        let note = self
            .notes
            .update(owner, id, &mut |n: &mut Note| {
                spec = Some(n.convert_to_task(task_id, now)?);
                Ok(())
            })
            .await?;

        let spec = spec.ok_or_else(|| DomainError::invariant("note conversion produced no task"))?;
        let task = Task::create(task_id, owner.clone(), spec, now)?;
        let task = self.tasks.insert(task).await?;

        info!(owner = %owner, note = %id, task = %task_id, "note converted to task");
        Ok((task, note))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use daybook_core::{Entity, FixedClock};
    use daybook_infra::StoreError;

    use super::*;

    #[tokio::test]
    async fn note_converts_once() {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()));
        let svc = AppServices::in_memory(clock);
        let alice = OwnerId::new("alice").unwrap();

        let content = "x".repeat(150);
        let note = svc
            .notes_create(
                &alice,
                NewNote {
                    content: content.clone(),
                    ..NewNote::default()
                },
            )
            .await
            .unwrap();

        let (task, converted) = svc.notes_convert(&alice, note.id()).await.unwrap();
        assert_eq!(task.title().chars().count(), 100);
        assert_eq!(task.description(), content);
        assert!(converted.is_converted());
        assert_eq!(converted.task_id(), Some(task.id()));
        assert_eq!(svc.tasks_get(&alice, task.id()).await.unwrap().id(), task.id());

        let again = svc.notes_convert(&alice, note.id()).await;
        assert!(matches!(again, Err(StoreError::Domain(DomainError::Conflict(_)))));

        let open = svc
            .notes_list(
                &alice,
                &NoteFilter {
                    converted_to_task: Some(false),
                    ..NoteFilter::default()
                },
            )
            .await
            .unwrap();
        assert!(open.is_empty());
    }
}
