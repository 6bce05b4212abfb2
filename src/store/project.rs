use super::backend::ProjectBackend;
use crate::error::StoreError;
use crate::model::LifeMap;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A named map owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub project_name: String,
    pub project_data: LifeMap,
    /// RFC 3339 timestamp of the first save.
    pub created_at: String,
    /// RFC 3339 timestamp of the latest save.
    pub updated_at: String,
}

impl Project {
    /// Short description such as `"3 nodes, 2 connections"`.
    pub fn summary(&self) -> String {
        format!(
            "{} nodes, {} connections",
            self.project_data.nodes.len(),
            self.project_data.edges.len()
        )
    }

    fn updated(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.updated_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Project persistence over a [`ProjectBackend`].
pub struct ProjectStore<B: ProjectBackend> {
    backend: B,
}

impl<B: ProjectBackend> ProjectStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create or update a project, stamped with the current time.
    ///
    /// Without `project_id` a new id is generated. An existing project keeps
    /// its `created_at` and can only be updated by the user who owns it.
    pub fn save_project(
        &mut self,
        user_id: &str,
        project_name: &str,
        map: &LifeMap,
        project_id: Option<&str>,
    ) -> Result<Project> {
        self.save_project_at(user_id, project_name, map, project_id, Utc::now())
    }

    /// Like [`Self::save_project`] with an explicit timestamp.
    pub fn save_project_at(
        &mut self,
        user_id: &str,
        project_name: &str,
        map: &LifeMap,
        project_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Project> {
        if project_name.trim().is_empty() {
            return Err(StoreError::EmptyName.into());
        }
        let id = match project_id {
            Some(id) => {
                validate_id(id)?;
                id.to_string()
            }
            None => uuid::Uuid::new_v4().to_string(),
        };
        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let created_at = match self.read_project(&id)? {
            Some(existing) if existing.user_id != user_id => {
                tracing::warn!(%id, user = %user_id, "refusing to save over another user's project");
                return Err(StoreError::NotOwner { id }.into());
            }
            Some(existing) => existing.created_at,
            None => stamp.clone(),
        };

        let project = Project {
            id: id.clone(),
            user_id: user_id.to_string(),
            project_name: project_name.to_string(),
            project_data: map.clone(),
            created_at,
            updated_at: stamp,
        };
        let text = serde_json::to_string_pretty(&project)?;
        self.backend
            .write(&id, &text)
            .with_context(|| format!("Failed to save project {}", id))?;
        tracing::debug!(%id, user = %user_id, name = %project_name, "saved project");
        Ok(project)
    }

    /// All projects of `user_id`, most recently updated first.
    pub fn load_projects(&mut self, user_id: &str) -> Result<Vec<Project>> {
        let mut projects = Vec::new();
        for id in self.backend.list_ids()? {
            match self.read_project(&id) {
                Ok(Some(p)) if p.user_id == user_id => projects.push(p),
                Ok(_) => {}
                Err(err) => tracing::warn!(%id, "skipping unreadable project: {:#}", err),
            }
        }
        projects.sort_by(|a, b| {
            b.updated()
                .cmp(&a.updated())
                .then_with(|| b.updated_at.cmp(&a.updated_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(projects)
    }

    pub fn get_project(&mut self, project_id: &str) -> Result<Project> {
        validate_id(project_id)?;
        self.read_project(project_id)?.ok_or_else(|| {
            StoreError::NotFound {
                id: project_id.to_string(),
            }
            .into()
        })
    }

    /// Delete a project. Deleting a missing project is not an error.
    pub fn delete_project(&mut self, project_id: &str) -> Result<()> {
        validate_id(project_id)?;
        let removed = self.backend.remove(project_id)?;
        tracing::debug!(id = %project_id, removed, "delete project");
        Ok(())
    }

    fn read_project(&mut self, id: &str) -> Result<Option<Project>> {
        let Some(text) = self.backend.read(id)? else {
            return Ok(None);
        };
        let project = serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            id: id.to_string(),
            source,
        })?;
        Ok(Some(project))
    }
}

/// Ids become file names, so only allow a conservative character set.
fn validate_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidId { id: id.to_string() })
    }
}
