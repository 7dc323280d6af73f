//! Sign-up, sign-in and password reset, plus the session they produce.

pub mod flows;
pub mod forms;
pub mod routes;
pub mod service;
pub mod session;
pub mod validation;

pub use routes::{Route, query_value};
pub use service::{AuthError, AuthService, SimulatedAuthService};
pub use session::{AuthProvider, AuthUser, Session, SessionError};
