//! These models represent the objects passed through a single ask request
//!
//! Nothing here outlives the request that created it: an [`ask::AskRequest`] arrives over
//! HTTP, at most one [`annotation::ImageAnnotation`] is derived from its image, and exactly
//! one [`ask::AskResponse`] goes back to the caller.
pub mod annotation;
pub mod ask;
