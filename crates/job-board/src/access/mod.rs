//! Role and session handling.
//!
//! Sessions are resolved once per request into an explicit [`SessionContext`]; the pure
//! [`authorize`] decision maps that context onto the role-prefixed route namespaces.

pub mod directory;
pub mod domain;
pub mod gate;
pub mod session;

pub use directory::ProfileDirectory;
pub use domain::{Profile, Role, UserId};
pub use gate::{authorize, AccessDecision, RouteNamespace, SessionContext, LOGIN_ROUTE};
pub use session::{bearer_token, SessionClaims, SessionError, SessionResolver, SessionVerifier};
