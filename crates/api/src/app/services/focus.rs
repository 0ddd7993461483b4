use tracing::info;

use daybook_core::{FocusSessionId, OwnerId, WorkspaceId};
use daybook_focus::{FocusFilter, FocusSession, FocusStats, NewFocusSession};
use daybook_infra::{DocumentStore, StoreResult};

use super::AppServices;

impl AppServices {
    /// Most recently started first, truncated to `limit` when given.
    pub async fn focus_list(
        &self,
        owner: &OwnerId,
        filter: &FocusFilter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<FocusSession>> {
        let mut sessions: Vec<FocusSession> = self
            .focus
            .list(owner)
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();
        sessions.sort_by(|a, b| b.start_time().cmp(&a.start_time()));
        if let Some(limit) = limit {
            sessions.truncate(limit);
        }
        Ok(sessions)
    }

    pub async fn focus_start(&self, owner: &OwnerId, input: NewFocusSession) -> StoreResult<FocusSession> {
        let session = FocusSession::start(FocusSessionId::new(), owner.clone(), input, self.clock.now())?;
        self.focus.insert(session).await
    }

    /// Close a running session. Ending it twice is a conflict.
    pub async fn focus_end(&self, owner: &OwnerId, id: FocusSessionId) -> StoreResult<FocusSession> {
        let now = self.clock.now();
        let session = self
            .focus
            .update(owner, id, &mut |s: &mut FocusSession| s.end(now).map(|_| ()))
            .await?;

        info!(
            owner = %owner,
            session = %id,
            minutes = session.actual_duration(),
            "focus session ended"
        );
        Ok(session)
    }

    pub async fn focus_stats(
        &self,
        owner: &OwnerId,
        days: i64,
        workspace: Option<WorkspaceId>,
    ) -> StoreResult<FocusStats> {
        let sessions = self.focus.list(owner).await?;
        Ok(FocusStats::compute(&sessions, self.clock.now(), days, workspace)?)
    }
}
