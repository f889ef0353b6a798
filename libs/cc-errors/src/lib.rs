//! The shared error surface every module maps its domain errors onto
//! before they cross the HTTP boundary: an [`ErrorKind`] taxonomy and
//! an RFC 9457 `application/problem+json` response type.

mod kind;
mod problem;

pub use kind::ErrorKind;
pub use problem::Problem;
