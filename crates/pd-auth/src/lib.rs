//! # pd-auth
//!
//! Authentication and authorization for the project dashboard.
//!
//! ## Features
//!
//! - Open-redirect safe resolution of post-login destinations
//! - Cookie sessions with an explicit `Session` value
//! - Role-based permission predicates
//! - Magic-link identity provider seam

pub mod identity;
pub mod permissions;
pub mod redirect;
pub mod session;

pub use identity::{Identity, IdentityError, IdentityProvider, MemoryIdentityProvider};
pub use permissions::{can, require, Action, AuthError};
pub use redirect::{callback_url, login_url, resolve_next_path, DEFAULT_NEXT_PATH};
pub use session::{extract_session_id, CookieConfig, MemorySessionStore, SameSite, Session, SessionError, SessionStore};
