use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use daybook_core::{DomainError, DomainResult, Entity, OwnerId, WorkspaceId, text};

pub const DEFAULT_ICON: &str = "Briefcase";
pub const DEFAULT_COLOR: &str = "#8b5cf6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    id: WorkspaceId,
    owner_id: OwnerId,
    name: String,
    description: String,
    icon: String,
    color: String,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWorkspace {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// `Some(true)` must be applied through [`set_default`], which sees the
    /// whole collection; `apply_changes` only honours `Some(false)`.
    pub is_default: Option<bool>,
}

impl Workspace {
    /// Build a workspace. The default flag is left unset; callers that want a
    /// new default push it into the collection and call [`set_default`].
    pub fn create(
        id: WorkspaceId,
        owner_id: OwnerId,
        input: &NewWorkspace,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            owner_id,
            name: text::required("name", &input.name)?,
            description: text::optional(input.description.as_deref()),
            icon: input.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
            color: input.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            is_default: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn apply_changes(&mut self, changes: &WorkspaceChanges, now: DateTime<Utc>) -> DomainResult<()> {
        let name = changes
            .name
            .as_deref()
            .map(|n| text::required("name", n))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = &changes.description {
            self.description = description.trim().to_string();
        }
        if let Some(icon) = &changes.icon {
            self.icon = icon.clone();
        }
        if let Some(color) = &changes.color {
            self.color = color.clone();
        }
        if changes.is_default == Some(false) {
            self.is_default = false;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn ensure_deletable(&self) -> DomainResult<()> {
        if self.is_default {
            return Err(DomainError::validation("cannot delete default workspace"));
        }
        Ok(())
    }
}

/// Make `id` the only default workspace in `workspaces`.
///
/// Runs over the owner's whole collection so the previous default is cleared
/// in the same step. Fails with not-found (and changes nothing) if `id` is
/// not in the collection.
pub fn set_default(workspaces: &mut [Workspace], id: WorkspaceId, now: DateTime<Utc>) -> DomainResult<()> {
    if !workspaces.iter().any(|w| w.id == id) {
        return Err(DomainError::not_found("workspace"));
    }
    for ws in workspaces.iter_mut() {
        let should_be_default = ws.id == id;
        if ws.is_default != should_be_default {
            ws.is_default = should_be_default;
            ws.updated_at = now;
        }
    }
    Ok(())
}

/// Default workspace first, then oldest first.
pub fn sort_for_listing(workspaces: &mut [Workspace]) {
    workspaces.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then(a.created_at.cmp(&b.created_at))
    });
}

impl Entity for Workspace {
    type Id = WorkspaceId;
    const COLLECTION: &'static str = "workspaces";
    const KIND: &'static str = "workspace";

    fn id(&self) -> WorkspaceId {
        self.id
    }

    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}
