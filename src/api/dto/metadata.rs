/*
 * Responsibility
 * - Faculty / department DTOs (admin area)
 */
use serde::{Deserialize, Serialize};

use crate::repos::department_repo::DepartmentRow;
use crate::repos::faculty_repo::FacultyRow;

#[derive(Debug, Deserialize)]
pub struct FacultyRequest {
    pub name: String,
}

impl FacultyRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct FacultyResponse {
    pub id: String,
    pub name: Option<String>,
}

impl From<FacultyRow> for FacultyResponse {
    fn from(row: FacultyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub faculty_id: String,
}

impl CreateDepartmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.faculty_id.trim().is_empty() {
            return Err("faculty_id is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub faculty_id: Option<String>,
}

impl UpdateDepartmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_none() && self.faculty_id.is_none() {
            return Err("nothing to update");
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DepartmentResponse {
    pub id: String,
    pub name: Option<String>,
    pub faculty_id: Option<String>,
    pub faculty_name: Option<String>,
}

impl From<DepartmentRow> for DepartmentResponse {
    fn from(row: DepartmentRow) -> Self {
        let (faculty_id, faculty_name) = match row.faculty {
            Some(f) => (Some(f.id), f.name),
            None => (None, None),
        };
        Self {
            id: row.id,
            name: row.name,
            faculty_id,
            faculty_name,
        }
    }
}
