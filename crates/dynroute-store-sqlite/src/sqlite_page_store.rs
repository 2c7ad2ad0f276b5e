//! SqlitePageStore - PageStore trait implementation for SQLite

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

use dynroute_core::{Error, LIST_PLUGIN_CTYPE, PageStore, PageUid, Result};

/// SQLite-backed page store
///
/// Issues read-only SELECTs against the `content_elements` and `pages`
/// tables of a CMS content database. IN-lists are bound as individual
/// placeholders; flex-form patterns become OR-combined LIKE constraints
/// ANDed into the WHERE clause.
pub struct SqlitePageStore {
    pool: SqlitePool,
}

impl SqlitePageStore {
    /// Wrap an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a page store over an existing database file.
    ///
    /// The file is not created: a content database that does not exist yet
    /// has no pages to resolve against, so a missing file is an error.
    ///
    /// # Errors
    /// - `Error::Database` if the database cannot be opened
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(SqliteConnectOptions::new().filename(db_path.as_ref()))
            .await
            .map_err(|e| Error::Database(format!("Failed to open content database: {}", e)))?;

        Ok(Self { pool })
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// ` AND (pi_flexform LIKE ? OR ...)` fragment for the given pattern count,
/// empty when there are no patterns.
fn flexform_clause(pattern_count: usize) -> String {
    if pattern_count == 0 {
        return String::new();
    }
    format!(
        " AND ({})",
        vec!["pi_flexform LIKE ?"; pattern_count].join(" OR ")
    )
}

#[async_trait]
impl PageStore for SqlitePageStore {
    async fn pages_with_content_types(
        &self,
        ctypes: &[String],
        flexform_patterns: &[String],
    ) -> Result<Vec<PageUid>> {
        if ctypes.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT pid FROM content_elements WHERE CType IN ({}){}",
            placeholders(ctypes.len()),
            flexform_clause(flexform_patterns.len()),
        );

        let mut query = sqlx::query_scalar::<_, PageUid>(&sql);
        for ctype in ctypes {
            query = query.bind(ctype);
        }
        for pattern in flexform_patterns {
            query = query.bind(pattern);
        }

        let pids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!(ctypes = ctypes.len(), pages = pids.len(), "content-type lookup");
        Ok(pids)
    }

    async fn pages_with_plugins(
        &self,
        list_types: &[String],
        flexform_patterns: &[String],
    ) -> Result<Vec<PageUid>> {
        if list_types.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT pid FROM content_elements WHERE CType = ? AND list_type IN ({}){}",
            placeholders(list_types.len()),
            flexform_clause(flexform_patterns.len()),
        );

        let mut query = sqlx::query_scalar::<_, PageUid>(&sql).bind(LIST_PLUGIN_CTYPE);
        for list_type in list_types {
            query = query.bind(list_type);
        }
        for pattern in flexform_patterns {
            query = query.bind(pattern);
        }

        let pids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!(list_types = list_types.len(), pages = pids.len(), "plugin lookup");
        Ok(pids)
    }

    async fn pages_with_doktypes(&self, doktypes: &[i64]) -> Result<Vec<PageUid>> {
        if doktypes.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT uid FROM pages WHERE doktype IN ({})",
            placeholders(doktypes.len()),
        );

        let mut query = sqlx::query_scalar::<_, PageUid>(&sql);
        for doktype in doktypes {
            query = query.bind(doktype);
        }

        let uids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!(doktypes = doktypes.len(), pages = uids.len(), "doktype lookup");
        Ok(uids)
    }

    async fn pages_containing_modules(&self, modules: &[String]) -> Result<Vec<PageUid>> {
        if modules.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT uid FROM pages WHERE module IN ({})",
            placeholders(modules.len()),
        );

        let mut query = sqlx::query_scalar::<_, PageUid>(&sql);
        for module in modules {
            query = query.bind(module);
        }

        let uids = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!(modules = modules.len(), pages = uids.len(), "module lookup");
        Ok(uids)
    }
}
