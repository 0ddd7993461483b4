use tracing::info;

use daybook_core::{Entity, OwnerId, ProjectId, TaskId};
use daybook_infra::{DocumentStore, StoreResult};
use daybook_projects::{NewProject, Project, ProjectChanges, ProjectFilter, ProjectProgress};
use daybook_tasks::Task;

use super::{AppServices, found};

impl AppServices {
    /// Newest first, each with progress over the owner's tasks.
    pub async fn projects_list(
        &self,
        owner: &OwnerId,
        filter: &ProjectFilter,
    ) -> StoreResult<Vec<(Project, ProjectProgress)>> {
        let tasks = self.tasks.list(owner).await?;
        let mut projects: Vec<Project> = self
            .projects
            .list(owner)
            .await?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        projects.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(projects
            .into_iter()
            .map(|p| {
                let progress = ProjectProgress::of(p.id(), &tasks);
                (p, progress)
            })
            .collect())
    }

    /// The project with its tasks and progress.
    pub async fn projects_detail(
        &self,
        owner: &OwnerId,
        id: ProjectId,
    ) -> StoreResult<(Project, Vec<Task>, ProjectProgress)> {
        let project = found(self.projects.get(owner, id).await?)?;
        let tasks: Vec<Task> = self
            .tasks
            .list(owner)
            .await?
            .into_iter()
            .filter(|t| t.project() == Some(id))
            .collect();
        let progress = ProjectProgress::of(id, &tasks);
        Ok((project, tasks, progress))
    }

    pub async fn projects_create(&self, owner: &OwnerId, input: NewProject) -> StoreResult<Project> {
        let project = Project::create(ProjectId::new(), owner.clone(), input, self.clock.now())?;
        self.projects.insert(project).await
    }

    pub async fn projects_update(
        &self,
        owner: &OwnerId,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> StoreResult<Project> {
        let now = self.clock.now();
        self.projects
            .update(owner, id, &mut |p: &mut Project| p.apply_changes(changes.clone(), now))
            .await
    }

    /// Remove the project and detach it from every task that referenced it.
    pub async fn projects_delete(&self, owner: &OwnerId, id: ProjectId) -> StoreResult<Project> {
        let project = found(self.projects.remove(owner, id).await?)?;

        let now = self.clock.now();
        let mut detached = 0usize;
        self.tasks
            .update_all(owner, &mut |tasks: &mut Vec<Task>| {
                detached = 0;
                for task in tasks.iter_mut().filter(|t| t.project() == Some(id)) {
                    task.assign_project(None, now);
                    detached += 1;
                }
                Ok(())
            })
            .await?;

        info!(owner = %owner, project = %id, detached, "project deleted");
        Ok(project)
    }

    /// Point `task_id` at the project. Both must exist for this owner.
    pub async fn projects_add_task(&self, owner: &OwnerId, id: ProjectId, task_id: TaskId) -> StoreResult<Task> {
        found(self.projects.get(owner, id).await?)?;
        let now = self.clock.now();
        self.tasks
            .update(owner, task_id, &mut |t: &mut Task| {
                t.assign_project(Some(id), now);
                Ok(())
            })
            .await
    }

    pub async fn projects_remove_task(
        &self,
        owner: &OwnerId,
        id: ProjectId,
        task_id: TaskId,
    ) -> StoreResult<Task> {
        found(self.projects.get(owner, id).await?)?;
        let now = self.clock.now();
        self.tasks
            .update(owner, task_id, &mut |t: &mut Task| {
                if t.project() == Some(id) {
                    t.assign_project(None, now);
                }
                Ok(())
            })
            .await
    }
}
