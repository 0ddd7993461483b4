use daybook_core::{OwnerId, SubtaskId, TaskId};
use daybook_infra::{DocumentStore, StoreResult};
use daybook_tasks::{NewTask, Task, TaskChanges, TaskFilter, due_today, upcoming};

use super::{AppServices, found};

impl AppServices {
    /// Newest first.
    pub async fn tasks_list(&self, owner: &OwnerId, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .list(owner)
            .await?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        tasks.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(tasks)
    }

    pub async fn tasks_get(&self, owner: &OwnerId, id: TaskId) -> StoreResult<Task> {
        found(self.tasks.get(owner, id).await?)
    }

    pub async fn tasks_create(&self, owner: &OwnerId, input: NewTask) -> StoreResult<Task> {
        let task = Task::create(TaskId::new(), owner.clone(), input, self.clock.now())?;
        self.tasks.insert(task).await
    }

    pub async fn tasks_update(&self, owner: &OwnerId, id: TaskId, changes: TaskChanges) -> StoreResult<Task> {
        let now = self.clock.now();
        self.tasks
            .update(owner, id, &mut |t: &mut Task| t.apply_changes(changes.clone(), now))
            .await
    }

    pub async fn tasks_delete(&self, owner: &OwnerId, id: TaskId) -> StoreResult<Task> {
        found(self.tasks.remove(owner, id).await?)
    }

    pub async fn tasks_toggle(&self, owner: &OwnerId, id: TaskId) -> StoreResult<Task> {
        let now = self.clock.now();
        self.tasks
            .update(owner, id, &mut |t: &mut Task| {
                t.toggle_complete(now);
                Ok(())
            })
            .await
    }

    pub async fn tasks_add_subtask(&self, owner: &OwnerId, id: TaskId, title: &str) -> StoreResult<Task> {
        let now = self.clock.now();
        self.tasks
            .update(owner, id, &mut |t: &mut Task| t.add_subtask(title, now).map(|_| ()))
            .await
    }

    pub async fn tasks_toggle_subtask(
        &self,
        owner: &OwnerId,
        id: TaskId,
        subtask: SubtaskId,
    ) -> StoreResult<Task> {
        let now = self.clock.now();
        self.tasks
            .update(owner, id, &mut |t: &mut Task| t.toggle_subtask(subtask, now).map(|_| ()))
            .await
    }

    pub async fn tasks_today(&self, owner: &OwnerId) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.list(owner).await?;
        Ok(due_today(tasks, self.clock.today()))
    }

    pub async fn tasks_upcoming(&self, owner: &OwnerId) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.list(owner).await?;
        Ok(upcoming(tasks, self.clock.today()))
    }
}
