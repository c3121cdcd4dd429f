pub mod profile_sync;
pub mod token_refresh;

pub use profile_sync::ProfileSyncWorker;
pub use token_refresh::{SAFETY_MARGIN, TokenRefreshWorker};
