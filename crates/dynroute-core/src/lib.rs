//! Dynroute Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout Dynroute:
//! - Typed `dynamicPages` selector model
//! - The `PageStore` storage-collaborator trait
//! - Core error types

pub mod error;
pub mod page_store;
pub mod selector;

pub use error::{Error, Result};
pub use page_store::{LIST_PLUGIN_CTYPE, PageStore, PageUid};
pub use selector::{
    Doktype, DynamicPagesSelector, FlexFormRestriction, OneOrMany, PluginSelection,
};
