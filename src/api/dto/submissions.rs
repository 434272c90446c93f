/*
 * Responsibility
 * - Submission + grading DTOs (student submit, lecturer views, grade)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::submission_repo::SubmissionRow;

#[derive(Debug, Deserialize)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data_base64: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub assignment_id: String,
    pub comments: Option<String>,
    pub files: Vec<UploadFile>,
}

impl SubmitRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.assignment_id.trim().is_empty() {
            return Err("assignment_id is required");
        }
        if self.files.is_empty() {
            return Err("at least one file is required");
        }
        for file in &self.files {
            if file.file_name.trim().is_empty() {
                return Err("file_name is required");
            }
            if file.data_base64.is_empty() {
                return Err("file data is required");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub score: f64,
    pub max_score: f64,
    pub feedback: Option<String>,
}

impl GradeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.max_score.is_finite() || self.max_score <= 0.0 {
            return Err("max_score must be positive");
        }
        if !self.score.is_finite() || self.score < 0.0 || self.score > self.max_score {
            return Err("score must be between 0 and max_score");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SubmittedFileResponse {
    pub url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub assignment_id: Option<String>,
    pub assignment_title: Option<String>,
    pub student_name: Option<String>,
    pub student_reg_number: Option<String>,
    pub course: Option<String>,
    pub department: Option<String>,
    pub level: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
    pub files: Vec<SubmittedFileResponse>,
}

impl From<SubmissionRow> for SubmissionResponse {
    fn from(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            assignment_id: row.assignment_id,
            assignment_title: row.assignment_title,
            student_name: row.student_name,
            student_reg_number: row.student_reg_number,
            course: row.course,
            department: row.department,
            level: row.level,
            submitted_at: row.submitted_at,
            status: row.status,
            graded_at: row.graded_at,
            files: row
                .files
                .unwrap_or_default()
                .into_iter()
                .map(|f| SubmittedFileResponse {
                    url: f.url,
                    name: f.name,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_requires_files() {
        let req = SubmitRequest {
            assignment_id: "assignment-1".to_string(),
            comments: None,
            files: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn grade_bounds() {
        let ok = GradeRequest {
            score: 15.0,
            max_score: 20.0,
            feedback: None,
        };
        assert!(ok.validate().is_ok());

        let over = GradeRequest {
            score: 25.0,
            max_score: 20.0,
            feedback: None,
        };
        assert!(over.validate().is_err());

        let zero_max = GradeRequest {
            score: 0.0,
            max_score: 0.0,
            feedback: None,
        };
        assert!(zero_max.validate().is_err());
    }
}
