pub mod jwt;
pub mod models;
pub mod pkce;
pub mod session;

pub use jwt::*;
pub use models::*;
pub use pkce::*;
pub use session::*;
