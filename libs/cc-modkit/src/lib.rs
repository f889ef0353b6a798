//! The minimal composition-root contract every module implements. This
//! is a deliberately small rewrite of the teacher's `modkit`: the
//! `Module`/`ModuleCtx`/`DatabaseCapability`/`RestApiCapability`
//! vocabulary is kept so module code reads the same way, but the
//! teacher's inventory-based plugin discovery and GTS dynamic typing
//! are replaced with the composition root wiring modules together
//! explicitly in `main`. See `DESIGN.md` for why.

mod client_hub;
mod config_slice;
mod context;
mod module;

pub use client_hub::ClientHub;
pub use config_slice::ConfigSliceError;
pub use context::ModuleCtx;
pub use module::{DatabaseCapability, Module, RestApiCapability};

pub use axum;
pub use utoipa;
