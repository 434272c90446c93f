/*
 * Responsibility
 * - Assignment request/response DTOs (lecturer area + student listing)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::assignment_repo::{AssignmentRow, ResourceRow};

pub const LEVELS: [&str; 5] = ["100", "200", "300", "400", "500"];

/// A resource file attached to a new assignment, carried inline as base64.
#[derive(Debug, Deserialize)]
pub struct UploadResource {
    pub display_name: String,
    pub file_name: String,
    pub content_type: String,
    pub data_base64: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    /// Optional; derived from the title when absent.
    pub slug: Option<String>,
    pub course: Option<String>,
    pub department_id: String,
    pub level: String,
    pub due_date: Option<DateTime<Utc>>,
    pub question: Option<String>,
    #[serde(default)]
    pub resources: Vec<UploadResource>,
}

impl CreateAssignmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.department_id.trim().is_empty() {
            return Err("department_id is required");
        }
        if !LEVELS.contains(&self.level.as_str()) {
            return Err("level must be one of 100..500");
        }
        for resource in &self.resources {
            if resource.file_name.trim().is_empty() {
                return Err("resource file_name is required");
            }
            if resource.data_base64.is_empty() {
                return Err("resource data is required");
            }
        }
        Ok(())
    }

    /// The slug to store: explicit value, or derived from the title.
    pub fn slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&self.title),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub course: Option<String>,
    pub level: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub question: Option<String>,
}

impl UpdateAssignmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        if let Some(level) = &self.level
            && !LEVELS.contains(&level.as_str())
        {
            return Err("level must be one of 100..500");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub display_name: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

impl From<ResourceRow> for ResourceResponse {
    fn from(row: ResourceRow) -> Self {
        Self {
            display_name: row.display_name,
            file_url: row.file_url,
            file_name: row.file_name,
            file_size: row.file_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub course: Option<String>,
    pub lecturer_name: Option<String>,
    pub department: Option<String>,
    pub level: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub question: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub resources: Vec<ResourceResponse>,
}

impl From<AssignmentRow> for AssignmentResponse {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            course: row.course,
            lecturer_name: row.lecturer.and_then(|l| l.name),
            department: row.department.and_then(|d| d.name),
            level: row.level,
            due_date: row.due_date,
            question: row.question,
            created_at: row.created_at,
            resources: row
                .resources
                .unwrap_or_default()
                .into_iter()
                .map(ResourceResponse::from)
                .collect(),
        }
    }
}

/// Lowercase, alphanumerics kept, everything else collapsed to single
/// dashes, capped at the store's 96-char slug limit.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = true;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(96);
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("SEN401 - Software Engineering"), "sen401-software-engineering");
        assert_eq!(slugify("  Already--dashed  "), "already-dashed");
        assert_eq!(slugify("UPPER"), "upper");
    }

    #[test]
    fn slugify_caps_length() {
        let long = "a".repeat(200);
        assert_eq!(slugify(&long).len(), 96);
    }

    #[test]
    fn create_request_requires_known_level() {
        let req = CreateAssignmentRequest {
            title: "T".to_string(),
            slug: None,
            course: None,
            department_id: "department-1".to_string(),
            level: "600".to_string(),
            due_date: None,
            question: None,
            resources: vec![],
        };
        assert!(req.validate().is_err());
    }
}
