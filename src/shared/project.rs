/**
 * Project Data Structure
 *
 * A project groups tasks and the users allowed to see them. The owner is
 * always part of the member list; every constructor and mutation here keeps
 * that invariant, so code holding a `Project` never has to re-check it.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::patch::{self, double_option};

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(ProjectStatus::Active),
            "completed" => Some(ProjectStatus::Completed),
            "archived" => Some(ProjectStatus::Archived),
            _ => None,
        }
    }
}

/// A collaborative project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID, also used as the real-time room key
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// User who created the project; the only one allowed to edit, delete or invite
    pub owner: Uuid,
    /// Users allowed to read and work on the project, in the order they joined
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project owned by `owner`, who becomes its first member
    pub fn new(owner: Uuid, request: CreateProjectRequest) -> Result<Self, SharedError> {
        let title = validate_title(request.title)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: request.description.unwrap_or_default(),
            status: ProjectStatus::Active,
            due_date: request.due_date,
            owner,
            members: vec![owner],
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }

    /// Add a member; returns `false` if the user already belongs to the project
    pub fn add_member(&mut self, user_id: Uuid) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.members.push(user_id);
        self.updated_at = Utc::now();
        true
    }

    /// Apply an update request, leaving absent fields untouched
    pub fn apply_update(&mut self, update: UpdateProjectRequest) -> Result<(), SharedError> {
        if let Some(title) = update.title {
            self.title = validate_title(title)?;
        }
        if let Some(description) = update.description {
            self.description = description.unwrap_or_default();
        }
        patch::apply(&mut self.status, update.status);
        patch::apply_nullable(&mut self.due_date, update.due_date);
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_title(title: String) -> Result<String, SharedError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("title", "Title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Body of `POST /api/projects`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/projects/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Body of `POST /api/projects/{id}/members`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprint(owner: Uuid) -> Project {
        Project::new(
            owner,
            CreateProjectRequest {
                title: "Sprint 1".to_string(),
                description: None,
                due_date: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_owner_is_first_member() {
        let owner = Uuid::new_v4();
        let project = sprint(owner);
        assert_eq!(project.members, vec![owner]);
        assert!(project.is_owner(owner));
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[test]
    fn test_add_member_rejects_duplicates() {
        let owner = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut project = sprint(owner);

        assert!(project.add_member(bob));
        assert!(!project.add_member(bob));
        assert!(!project.add_member(owner));
        assert_eq!(project.members, vec![owner, bob]);
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = Project::new(
            Uuid::new_v4(),
            CreateProjectRequest {
                title: "   ".to_string(),
                description: None,
                due_date: None,
            },
        );
        assert!(matches!(result, Err(SharedError::ValidationError { .. })));
    }

    #[test]
    fn test_update_applies_empty_description() {
        let mut project = sprint(Uuid::new_v4());
        project.description = "Two week sprint".to_string();

        let update: UpdateProjectRequest =
            serde_json::from_str(r#"{"description": "", "status": "completed"}"#).unwrap();
        project.apply_update(update).unwrap();

        assert_eq!(project.description, "");
        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(project.title, "Sprint 1");
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ProjectStatus::from_str("ARCHIVED"), Some(ProjectStatus::Archived));
        assert_eq!(ProjectStatus::Completed.as_str(), "completed");
        assert_eq!(ProjectStatus::from_str("paused"), None);
    }
}
