//! SQLite-backed page store for Dynroute
//!
//! This crate implements the `PageStore` trait over a SQLite content
//! database using `sqlx`. It issues the four documented lookups against the
//! `content_elements` and `pages` tables and performs no writes.
//!
//! # Example
//! ```no_run
//! # use dynroute_store_sqlite::SqlitePageStore;
//! # use dynroute_core::PageStore;
//! # async fn example() -> dynroute_core::Result<()> {
//! let store = SqlitePageStore::open("/var/www/content.db").await?;
//! let pages = store.pages_with_doktypes(&[1]).await?;
//! # Ok(())
//! # }
//! ```

mod sqlite_page_store;

pub use sqlite_page_store::SqlitePageStore;
