use serde::{Deserialize, Serialize};

/// Engineer's own mobile-app state. Independent of any job status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineerStatus {
    Accept,
    Onsite,
    Travel,
    Completed,
    RequireRevisit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Pending,
    Error,
}

/// A field engineer. `name` is the key jobs refer to.
///
/// The active-job count is never stored; see `JobStore::engineer_active_jobs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Engineer {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: EngineerStatus,
    pub sync_status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// An engineer together with the live count of their open jobs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineerWorkload {
    #[serde(flatten)]
    pub engineer: Engineer,
    pub current_jobs: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EngineerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<EngineerStatus>,
    pub sync_status: Option<SyncStatus>,
    pub avatar: Option<Option<String>>,
}

impl EngineerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn status(mut self, status: EngineerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sync_status(mut self, sync_status: SyncStatus) -> Self {
        self.sync_status = Some(sync_status);
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub(crate) fn apply(self, engineer: &mut Engineer) {
        if let Some(name) = self.name {
            engineer.name = name;
        }
        if let Some(email) = self.email {
            engineer.email = email;
        }
        if let Some(phone) = self.phone {
            engineer.phone = phone;
        }
        if let Some(status) = self.status {
            engineer.status = status;
        }
        if let Some(sync_status) = self.sync_status {
            engineer.sync_status = sync_status;
        }
        if let Some(avatar) = self.avatar {
            engineer.avatar = avatar;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_current_jobs_field_is_ignored() {
        let engineer: Engineer = serde_json::from_str(
            r#"{"name":"Mike Davis","email":"m@x.com","phone":"1","status":"require_revisit",
                "syncStatus":"pending","currentJobs":7}"#,
        )
        .unwrap();
        assert_eq!(engineer.status, EngineerStatus::RequireRevisit);
        assert_eq!(engineer.sync_status, SyncStatus::Pending);

        let value = serde_json::to_value(&engineer).unwrap();
        assert!(value.get("currentJobs").is_none());
    }

    #[test]
    fn test_patch_leaves_unset_fields() {
        let mut engineer = Engineer {
            name: "Tom Brown".to_string(),
            email: "tom@x.com".to_string(),
            phone: "2".to_string(),
            status: EngineerStatus::Travel,
            sync_status: SyncStatus::Synced,
            avatar: None,
        };
        EngineerPatch::new()
            .status(EngineerStatus::Onsite)
            .apply(&mut engineer);
        assert_eq!(engineer.status, EngineerStatus::Onsite);
        assert_eq!(engineer.email, "tom@x.com");
    }
}
