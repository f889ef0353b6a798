mod error;
mod merge;
mod model;
mod service;

pub use error::DomainError;
pub use merge::merge_effective_config;
pub use model::{
    DeploymentMode, EffectiveConfig, FailPolicy, GlobalPepConfig, IndividualPepConfig, SecurityPosture, TrafficMode,
};
pub use service::Service;
