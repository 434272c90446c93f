/*
 * Responsibility
 * - studentSubmission documents and their grading records
 * - Grading writes the grading document and the submission status flip in
 *   one transactional mutation batch
 */
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::repos::{decode_opt, decode_rows, error::RepoError};
use crate::services::content::{ContentStore, Mutation};

const STUDENT_SUBMISSIONS_QUERY: &str = r#"
*[_type == "studentSubmission" && student._ref == $studentId] | order(submissionDate desc) {
  _id,
  "assignmentId": assignment->_id,
  "assignmentTitle": assignment->title,
  "course": assignment->course,
  "submittedAt": submissionDate,
  "status": coalesce(status, "pending"),
  gradedAt,
  "files": submittedFiles[]{ "url": asset->url, "name": asset->originalFilename }
}"#;

const LECTURER_SUBMISSIONS_QUERY: &str = r#"
*[_type == "studentSubmission" && assignment->lecturer._ref == $lecturerId] | order(submissionDate desc) {
  _id,
  "assignmentId": assignment->_id,
  "assignmentTitle": assignment->title,
  "studentName": student->fullName,
  "studentRegNumber": student->academic.regNumber,
  "course": assignment->course,
  "department": assignment->department->name,
  "level": assignment->level,
  "submittedAt": submissionDate,
  "status": coalesce(status, "pending"),
  gradedAt,
  "files": submittedFiles[]{ "url": asset->url, "name": asset->originalFilename }
}"#;

const OWNERSHIP_QUERY: &str = r#"
*[_type == "studentSubmission" && _id == $id][0]{
  _id,
  "lecturerId": assignment->lecturer->_id,
  "status": coalesce(status, "pending")
}"#;

const EXISTING_SUBMISSION_QUERY: &str = r#"
count(*[_type == "studentSubmission" && assignment._ref == $assignmentId && student._ref == $studentId])"#;

#[derive(Debug, Deserialize)]
pub struct SubmittedFile {
    pub url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionRow {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "assignmentId")]
    pub assignment_id: Option<String>,
    #[serde(rename = "assignmentTitle")]
    pub assignment_title: Option<String>,
    #[serde(rename = "studentName")]
    pub student_name: Option<String>,
    #[serde(rename = "studentRegNumber")]
    pub student_reg_number: Option<String>,
    pub course: Option<String>,
    pub department: Option<String>,
    pub level: Option<String>,
    #[serde(rename = "submittedAt")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    #[serde(rename = "gradedAt")]
    pub graded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub files: Option<Vec<SubmittedFile>>,
}

/// Just enough to decide whether a lecturer may grade a submission.
#[derive(Debug, Deserialize)]
pub struct OwnershipRow {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "lecturerId")]
    pub lecturer_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct NewSubmission {
    pub assignment_ref: String,
    pub student_ref: String,
    /// Uploaded file asset ids (at least one).
    pub file_asset_ids: Vec<String>,
    pub comments: Option<String>,
}

pub async fn list_for_student(
    store: &dyn ContentStore,
    student_id: &str,
) -> Result<Vec<SubmissionRow>, RepoError> {
    let result = store
        .fetch(STUDENT_SUBMISSIONS_QUERY, &[("studentId", json!(student_id))])
        .await?;
    decode_rows(result)
}

pub async fn list_for_lecturer(
    store: &dyn ContentStore,
    lecturer_id: &str,
) -> Result<Vec<SubmissionRow>, RepoError> {
    let result = store
        .fetch(
            LECTURER_SUBMISSIONS_QUERY,
            &[("lecturerId", json!(lecturer_id))],
        )
        .await?;
    decode_rows(result)
}

pub async fn get_for_grading(
    store: &dyn ContentStore,
    submission_id: &str,
) -> Result<Option<OwnershipRow>, RepoError> {
    let result = store
        .fetch(OWNERSHIP_QUERY, &[("id", json!(submission_id))])
        .await?;
    decode_opt(result)
}

/// Whether this student already submitted for this assignment.
pub async fn exists(
    store: &dyn ContentStore,
    assignment_id: &str,
    student_id: &str,
) -> Result<bool, RepoError> {
    let result = store
        .fetch(
            EXISTING_SUBMISSION_QUERY,
            &[
                ("assignmentId", json!(assignment_id)),
                ("studentId", json!(student_id)),
            ],
        )
        .await?;
    let count: u64 = serde_json::from_value(result).unwrap_or(0);
    Ok(count > 0)
}

pub async fn create(store: &dyn ContentStore, new: NewSubmission) -> Result<String, RepoError> {
    let id = format!("submission-{}", Uuid::new_v4());

    let files: Vec<_> = new
        .file_asset_ids
        .iter()
        .map(|asset_id| {
            json!({
                "_type": "file",
                "_key": Uuid::new_v4().to_string(),
                "asset": { "_type": "reference", "_ref": asset_id }
            })
        })
        .collect();

    let doc = json!({
        "_id": id,
        "_type": "studentSubmission",
        "assignment": { "_type": "reference", "_ref": new.assignment_ref },
        "student": { "_type": "reference", "_ref": new.student_ref },
        "submittedFiles": files,
        "submissionDate": Utc::now(),
        "studentComments": new.comments,
    });

    store.mutate(&[Mutation::Create(doc)]).await?;
    Ok(id)
}

/// Record a grade: create the grading document and mark the submission as
/// graded in the same batch, so the two can never drift apart.
pub async fn grade(
    store: &dyn ContentStore,
    submission_id: &str,
    lecturer_ref: &str,
    score: f64,
    max_score: f64,
    feedback: Option<&str>,
) -> Result<String, RepoError> {
    let grading_id = format!("grading-{}", Uuid::new_v4());
    let graded_at = Utc::now();

    let grading_doc = json!({
        "_id": grading_id,
        "_type": "grading",
        "submission": { "_type": "reference", "_ref": submission_id },
        "lecturer": { "_type": "reference", "_ref": lecturer_ref },
        "score": score,
        "maxscore": max_score,
        "feedback": feedback,
        "gradedAt": graded_at,
    });

    store
        .mutate(&[
            Mutation::Create(grading_doc),
            Mutation::Patch {
                id: submission_id.to_string(),
                set: json!({ "status": "graded", "gradedAt": graded_at }),
            },
        ])
        .await?;

    Ok(grading_id)
}
