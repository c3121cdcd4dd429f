use serde::{Deserialize, Serialize};

/// The signed-in user record.
///
/// Set *provisionally* (empty fields) in the same commit that makes tokens
/// present, then replaced by the resolved profile once the fetch completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl CurrentUser {
    #[must_use]
    pub const fn provisional() -> Self {
        Self {
            user_id: String::new(),
            name: String::new(),
            email: String::new(),
        }
    }

    /// True until the profile fetch has replaced the placeholder fields.
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.user_id.is_empty()
    }
}
