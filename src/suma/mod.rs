//! SUSE Manager module
//!
//! Client side of the SUSE Manager JSON API: session login, system lookups,
//! the permitted-network guard, group mutations and user management.

pub mod client;
pub mod error;
pub mod group;
pub mod guard;
pub mod network;
pub mod session;
pub mod system;
pub mod user;

pub use client::SumaClient;
pub use error::SumaError;
pub use guard::{AuthorizedSystem, MembershipGuard};
pub use network::{is_in_network, NetworkMembership};
pub use session::{Session, SumaSession};
pub use system::{MatchPolicy, SystemRecord, UNRESOLVED_SYSTEM_ID};
