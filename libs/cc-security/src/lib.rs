//! Security primitives shared by every Control Core module: the
//! authenticated subject ([`SecurityContext`]), the environment a
//! request targets ([`Environment`]), and the tenant-scoped query
//! filter every repository must apply ([`AccessScope`]).

mod context;
mod environment;
mod scope;

pub use context::{Principal, SecurityContext, SecurityContextBuilder};
pub use environment::Environment;
pub use scope::{AccessScope, ScopeError};
