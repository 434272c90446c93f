/*
 * Responsibility
 * - User profile / admin user-management DTOs
 */
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::{ProfileDoc, UserSummary};

pub const AUTH_STATUSES: [&str; 2] = ["pending", "verified"];

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub level: Option<String>,
    pub reg_number: Option<String>,
    pub staff_id: Option<String>,
    pub auth_status: Option<String>,
}

impl From<ProfileDoc> for ProfileResponse {
    fn from(doc: ProfileDoc) -> Self {
        Self {
            id: doc.id,
            user_id: doc.user_id,
            full_name: doc.full_name,
            role: doc.role,
            email: doc.email,
            phone_number: doc.phone_number,
            image_url: doc.image,
            faculty: doc.faculty.and_then(|f| f.name),
            department: doc.department.and_then(|d| d.name),
            level: doc.level,
            reg_number: doc.reg_number,
            staff_id: doc.staff_id,
            auth_status: doc.auth_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub user_id: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub auth_status: Option<String>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(row: UserSummary) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            full_name: row.full_name,
            role: row.role,
            email: row.email,
            auth_status: row.auth_status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// One of the four role values; case-insensitive legacy spellings are
    /// rejected here, the canonical segment form is required.
    pub role: Option<String>,
    pub auth_status: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.role.is_none() && self.auth_status.is_none() {
            return Err("nothing to update");
        }
        if let Some(status) = &self.auth_status
            && !AUTH_STATUSES.contains(&status.as_str())
        {
            return Err("auth_status must be pending or verified");
        }
        Ok(())
    }
}
