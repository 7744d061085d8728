use serde::{Deserialize, Serialize};

/// Citizen identification data remembered on the device for form prefill.
///
/// This is convenience data, not an authenticated identity — there is no
/// password and no session security by design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitizenProfile {
    pub name: String,
    /// National id — exactly 12 digits when present.
    pub national_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl CitizenProfile {
    /// True once the citizen has identified themselves on this device.
    pub fn is_identified(&self) -> bool {
        !self.name.is_empty() && self.national_id.len() == 12
    }
}

/// Exactly 12 ASCII digits — the national id format accepted everywhere
/// in the app (login and booking use the same rule).
pub fn is_valid_national_id(id: &str) -> bool {
    id.len() == 12 && id.chars().all(|c| c.is_ascii_digit())
}
