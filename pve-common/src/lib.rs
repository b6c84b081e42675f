//! Common types shared by the Proxmox VE access client

pub mod access;
pub mod de;

pub use access::{Group, IndexEntry, Realm, Role, User};

/// Realm appended to user names given without one
pub const DEFAULT_REALM: &str = "pam";

/// Port the PVE API listens on when none is given
pub const DEFAULT_PORT: u16 = 8006;

/// Path prefix of the JSON API
pub const API_PREFIX: &str = "/api2/json";

/// Cookie carrying the session ticket
pub const AUTH_COOKIE: &str = "PVEAuthCookie";

/// Header carrying the CSRF token on mutating requests
pub const CSRF_HEADER: &str = "CSRFPreventionToken";
