//! Authentication: Google login, cookie sessions and request extractors

pub mod extract;
pub mod google;
pub mod routes;
pub mod session;

pub use extract::{AdminUser, AuthUser};
pub use google::GoogleOAuth;
pub use routes::auth_routes;
pub use session::SessionStore;
