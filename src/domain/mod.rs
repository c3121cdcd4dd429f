pub mod session;
pub mod tokens;
pub mod user;

pub use session::{AuthState, Credentials};
pub use tokens::TokenPair;
pub use user::CurrentUser;
