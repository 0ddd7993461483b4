use daybook_analytics::{AchievementReport, DashboardStats, Timeline};
use daybook_core::{OwnerId, WorkspaceId};
use daybook_infra::{DocumentStore, StoreResult};

use super::AppServices;

impl AppServices {
    pub async fn analytics_timeline(
        &self,
        owner: &OwnerId,
        days: i64,
        workspace: Option<WorkspaceId>,
    ) -> StoreResult<Timeline> {
        let tasks = self.tasks.list(owner).await?;
        Ok(Timeline::build(tasks, self.clock.now(), days, workspace)?)
    }

    pub async fn analytics_achievements(&self, owner: &OwnerId) -> StoreResult<AchievementReport> {
        let tasks = self.tasks.list(owner).await?;
        let habits = self.habits.list(owner).await?;
        let sessions = self.focus.list(owner).await?;
        Ok(AchievementReport::compute(&tasks, &habits, &sessions))
    }

    pub async fn analytics_dashboard(
        &self,
        owner: &OwnerId,
        workspace: Option<WorkspaceId>,
    ) -> StoreResult<DashboardStats> {
        let tasks = self.tasks.list(owner).await?;
        let habits = self.habits.list(owner).await?;
        let sessions = self.focus.list(owner).await?;
        Ok(DashboardStats::compute(
            &tasks,
            &habits,
            &sessions,
            self.clock.now(),
            workspace,
        ))
    }
}
