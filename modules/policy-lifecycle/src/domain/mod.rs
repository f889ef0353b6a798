mod conflict;
mod error;
mod model;
mod service;
mod templates;
mod validate;

pub use conflict::conflict_check;
pub use error::DomainError;
pub use model::{Policy, PolicyConflict, PolicyEffect, PolicyFolder, PolicyPatch, PolicyTemplate, PromotionStatus};
pub use service::Service;
pub use templates::TEMPLATES;
pub use validate::validate_policy_source;
