//! Camera directory and the resolver contract the acquisition code depends on.

/// Directory of camera devices across registry address formats.
pub mod registry;
/// The resolver contract.
pub mod resolver;
