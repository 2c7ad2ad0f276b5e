//! Dynroute Resolution Engine
//!
//! This crate turns `dynamicPages` selectors in routing configuration into
//! concrete `limitToPages` restrictions:
//! - Configuration walker over sites and route enhancers
//! - Per-predicate resolution against a `PageStore`
//! - Memoization cache shared across enhancers and sites

pub mod cache;
pub mod flexform;
pub mod resolver;

pub use cache::{PredicateKind, ResolutionCache};
pub use resolver::PageResolver;
