use tracing::info;

use daybook_core::{DomainError, Entity, OwnerId, WorkspaceId};
use daybook_infra::{DocumentStore, StoreResult};
use daybook_workspaces::{NewWorkspace, Workspace, WorkspaceChanges, set_default, sort_for_listing};

use super::{AppServices, found};

impl AppServices {
    /// Default first, then oldest first.
    pub async fn workspaces_list(&self, owner: &OwnerId) -> StoreResult<Vec<Workspace>> {
        let mut workspaces = self.workspaces.list(owner).await?;
        sort_for_listing(&mut workspaces);
        Ok(workspaces)
    }

    pub async fn workspaces_get(&self, owner: &OwnerId, id: WorkspaceId) -> StoreResult<Workspace> {
        found(self.workspaces.get(owner, id).await?)
    }

    /// Create a workspace; a new default replaces the previous one in the same step.
    pub async fn workspaces_create(&self, owner: &OwnerId, input: NewWorkspace) -> StoreResult<Workspace> {
        let now = self.clock.now();
        let workspace = Workspace::create(WorkspaceId::new(), owner.clone(), &input, now)?;

        if !input.is_default {
            return self.workspaces.insert(workspace).await;
        }

        let id = workspace.id();
        let mut pending = Some(workspace);
        let all = self
            .workspaces
            .update_all(owner, &mut |workspaces: &mut Vec<Workspace>| {
                if let Some(ws) = pending.take() {
                    workspaces.push(ws);
                }
                set_default(workspaces, id, now)
            })
            .await?;

        info!(owner = %owner, workspace = %id, "default workspace switched");
        found(all.into_iter().find(|w| w.id() == id))
    }

    pub async fn workspaces_update(
        &self,
        owner: &OwnerId,
        id: WorkspaceId,
        changes: WorkspaceChanges,
    ) -> StoreResult<Workspace> {
        let now = self.clock.now();

        if changes.is_default != Some(true) {
            return self
                .workspaces
                .update(owner, id, &mut |w: &mut Workspace| w.apply_changes(&changes, now))
                .await;
        }

        let all = self
            .workspaces
            .update_all(owner, &mut |workspaces: &mut Vec<Workspace>| {
                let target = workspaces
                    .iter_mut()
                    .find(|w| w.id() == id)
                    .ok_or(DomainError::not_found(Workspace::KIND))?;
                target.apply_changes(&changes, now)?;
                set_default(workspaces, id, now)
            })
            .await?;

        info!(owner = %owner, workspace = %id, "default workspace switched");
        found(all.into_iter().find(|w| w.id() == id))
    }

    /// The default workspace cannot be deleted.
    pub async fn workspaces_delete(&self, owner: &OwnerId, id: WorkspaceId) -> StoreResult<Workspace> {
        let workspace = self.workspaces_get(owner, id).await?;
        workspace.ensure_deletable()?;
        found(self.workspaces.remove(owner, id).await?)
    }

    pub async fn workspaces_set_default(&self, owner: &OwnerId, id: WorkspaceId) -> StoreResult<Workspace> {
        let now = self.clock.now();
        let all = self
            .workspaces
            .update_all(owner, &mut |workspaces: &mut Vec<Workspace>| set_default(workspaces, id, now))
            .await?;

        info!(owner = %owner, workspace = %id, "default workspace switched");
        found(all.into_iter().find(|w| w.id() == id))
    }
}
