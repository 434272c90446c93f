/*
 * Responsibility
 * - Identity-provider webhook payload shapes (provisioning events)
 * - The provider's field names are snake_case with a free-form
 *   `unsafe_metadata` object collected at signup
 */
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: IdentityUser,
}

#[derive(Debug, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub unsafe_metadata: SignupMetadata,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// Free-form signup metadata; every field is optional by construction.
#[derive(Debug, Default, Deserialize)]
pub struct SignupMetadata {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub level: Option<String>,
    #[serde(rename = "registrationNumber")]
    pub registration_number: Option<String>,
    #[serde(rename = "idNumber")]
    pub id_number: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl IdentityUser {
    /// Display name: explicit metadata wins, then provider first/last name.
    pub fn full_name(&self) -> String {
        if let Some(name) = &self.unsafe_metadata.full_name
            && !name.trim().is_empty()
        {
            return name.trim().to_string();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => "Unknown User".to_string(),
        }
    }

    /// Best-known email: metadata first, then the provider's address list.
    pub fn email(&self) -> Option<String> {
        if let Some(email) = &self.unsafe_metadata.email
            && !email.trim().is_empty()
        {
            return Some(email.clone());
        }
        self.email_addresses
            .first()
            .map(|e| e.email_address.clone())
    }
}
