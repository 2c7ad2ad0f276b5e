//! Storage collaborator trait for page lookups
//!
//! The `PageStore` trait abstracts the two content-storage tables the
//! resolver reads from, allowing different implementations for real
//! deployments (SQL-backed) and tests (in-memory fakes).

use async_trait::async_trait;

use crate::Result;

/// Page identifier, as stored in `pages.uid` and `content_elements.pid`.
pub type PageUid = i64;

/// `CType` marker of the generic plugin content element. `withPlugin`
/// selections match this content type combined with a `list_type` filter.
pub const LIST_PLUGIN_CTYPE: &str = "list";

/// Read-only query interface over the content-storage tables
///
/// Logical schema:
/// - `content_elements`: `pid` (page identifier), `CType`, `list_type`,
///   `pi_flexform` (raw flex-form blob)
/// - `pages`: `uid`, `doktype` (integer page type), `module`
///
/// Every method returns page identifiers deduplicated within its own result
/// (`SELECT DISTINCT` semantics). Ordering is not specified.
///
/// # Example
/// ```no_run
/// # use dynroute_core::PageStore;
/// # async fn example(store: &dyn PageStore) -> dynroute_core::Result<()> {
/// let news_pages = store
///     .pages_with_content_types(&["news_pi1".to_string()], &[])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Pages holding content elements whose `CType` is in `ctypes`.
    ///
    /// # Arguments
    /// * `ctypes` - Content-type identifiers to match
    /// * `flexform_patterns` - LIKE patterns against `pi_flexform`; when
    ///   non-empty, OR-combined among themselves and ANDed with the type
    ///   filter
    ///
    /// # Errors
    /// - `Error::Database` if the underlying query fails
    async fn pages_with_content_types(
        &self,
        ctypes: &[String],
        flexform_patterns: &[String],
    ) -> Result<Vec<PageUid>>;

    /// Pages holding `list` plugin elements whose `list_type` is in
    /// `list_types`. Flex-form patterns apply as in
    /// [`pages_with_content_types`](Self::pages_with_content_types).
    async fn pages_with_plugins(
        &self,
        list_types: &[String],
        flexform_patterns: &[String],
    ) -> Result<Vec<PageUid>>;

    /// Pages whose own `doktype` is in the given set.
    async fn pages_with_doktypes(&self, doktypes: &[i64]) -> Result<Vec<PageUid>>;

    /// Pages whose `module` field is in the given set.
    async fn pages_containing_modules(&self, modules: &[String]) -> Result<Vec<PageUid>>;
}
