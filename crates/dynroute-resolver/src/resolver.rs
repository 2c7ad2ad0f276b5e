//! Routing-configuration walker and `dynamicPages` resolution
//!
//! `PageResolver` walks a routing configuration (mapping of site key to
//! site configuration), resolves every route enhancer's `dynamicPages`
//! selector into concrete page identifiers, and writes the result back as
//! the enhancer's `limitToPages` restriction. Everything else in the
//! configuration passes through untouched.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use dynroute_core::{DynamicPagesSelector, Error, PageStore, PageUid, Result};

use crate::cache::{PredicateKind, ResolutionCache};
use crate::flexform;

/// Resolves `dynamicPages` selectors against a [`PageStore`], memoizing
/// per-predicate results.
///
/// The cache lives as long as the resolver. For a fresh view of storage,
/// either construct a new resolver per configuration pass or call
/// [`ResolutionCache::invalidate`] via [`PageResolver::cache`].
pub struct PageResolver {
    store: Arc<dyn PageStore>,
    cache: ResolutionCache,
}

impl PageResolver {
    pub fn new(store: Arc<dyn PageStore>) -> Self {
        Self {
            store,
            cache: ResolutionCache::new(),
        }
    }

    /// Access the resolution cache, e.g. to invalidate it between passes.
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Apply [`modify_site_configuration`](Self::modify_site_configuration)
    /// to every site in the routing configuration.
    ///
    /// # Errors
    /// - `Error::Config` if the configuration is not a mapping
    /// - storage and decode errors from the per-site walk; the pass stops at
    ///   the first failure, there is no per-enhancer recovery
    pub async fn modify_configuration(&self, configuration: Value) -> Result<Value> {
        let Value::Object(sites) = configuration else {
            return Err(Error::Config(
                "routing configuration must be a mapping of site configurations".to_string(),
            ));
        };

        let mut modified = Map::with_capacity(sites.len());
        for (site_key, site_configuration) in sites {
            debug!(site = %site_key, "processing site configuration");
            modified.insert(
                site_key,
                self.modify_site_configuration(site_configuration).await?,
            );
        }
        Ok(Value::Object(modified))
    }

    /// Resolve `dynamicPages` selectors in one site configuration.
    ///
    /// A site without a `routeEnhancers` key is returned unchanged, as is
    /// every enhancer entry without a `dynamicPages` key. Enhancers with a
    /// selector get their `limitToPages` key replaced (or inserted) with the
    /// resolved page list. `routeEnhancers` may be a mapping (as site
    /// configuration files usually write it) or a sequence.
    pub async fn modify_site_configuration(&self, mut site_configuration: Value) -> Result<Value> {
        match site_configuration.get_mut("routeEnhancers") {
            Some(Value::Object(entries)) => {
                for entry in entries.values_mut() {
                    self.inject_limit_to_pages(entry).await?;
                }
            }
            Some(Value::Array(entries)) => {
                for entry in entries.iter_mut() {
                    self.inject_limit_to_pages(entry).await?;
                }
            }
            _ => {}
        }
        Ok(site_configuration)
    }

    /// Replace/insert `limitToPages` on one enhancer entry, if it carries a
    /// `dynamicPages` selector.
    async fn inject_limit_to_pages(&self, enhancer: &mut Value) -> Result<()> {
        let Some(dynamic_pages) = enhancer.get("dynamicPages") else {
            return Ok(());
        };

        let selector: DynamicPagesSelector = serde_json::from_value(dynamic_pages.clone())?;
        let pages = self.find_dynamic_pages(&selector).await?;
        debug!(pages = pages.len(), "resolved dynamicPages selector");

        if let Some(entry) = enhancer.as_object_mut() {
            entry.insert("limitToPages".to_string(), serde_json::json!(pages));
        }
        Ok(())
    }

    /// Resolve a selector into a deduplicated list of page identifiers.
    ///
    /// Each of the four predicates present on the selector resolves
    /// independently (through the cache) and the results are unioned. A
    /// selector with no predicate keys yields an empty list without issuing
    /// any storage query.
    pub async fn find_dynamic_pages(
        &self,
        selector: &DynamicPagesSelector,
    ) -> Result<Vec<PageUid>> {
        let mut page_uids: Vec<PageUid> = Vec::new();

        if let Some(selection) = &selector.with_ctype {
            let (types, restrictions) = selection.clone().into_parts();
            let key = ResolutionCache::key(PredicateKind::ContentType, &(&types, &restrictions))?;
            let patterns = flexform::like_patterns(&restrictions);
            let pages = self
                .resolve_with_cache(key, self.store.pages_with_content_types(&types, &patterns))
                .await?;
            page_uids.extend(pages);
        }

        if let Some(selection) = &selector.with_plugin {
            let (types, restrictions) = selection.clone().into_parts();
            let key = ResolutionCache::key(PredicateKind::Plugin, &(&types, &restrictions))?;
            let patterns = flexform::like_patterns(&restrictions);
            let pages = self
                .resolve_with_cache(key, self.store.pages_with_plugins(&types, &patterns))
                .await?;
            page_uids.extend(pages);
        }

        if let Some(doktypes) = &selector.with_doktypes {
            let doktypes: Vec<i64> = doktypes.as_slice().iter().copied().map(i64::from).collect();
            let key = ResolutionCache::key(PredicateKind::Doktype, &doktypes)?;
            let pages = self
                .resolve_with_cache(key, self.store.pages_with_doktypes(&doktypes))
                .await?;
            page_uids.extend(pages);
        }

        if let Some(modules) = &selector.contains_module {
            let modules = modules.clone().into_vec();
            let key = ResolutionCache::key(PredicateKind::Module, &modules)?;
            let pages = self
                .resolve_with_cache(key, self.store.pages_containing_modules(&modules))
                .await?;
            page_uids.extend(pages);
        }

        Ok(dedupe(page_uids))
    }

    /// Return the cached page list for `key`, or run `fetch` and cache its
    /// result. On a cache hit the fetch future is dropped unpolled, so the
    /// storage query never runs.
    async fn resolve_with_cache<F>(&self, key: String, fetch: F) -> Result<Vec<PageUid>>
    where
        F: Future<Output = Result<Vec<PageUid>>>,
    {
        if let Some(pages) = self.cache.get(&key) {
            debug!(%key, "predicate cache hit");
            return Ok(pages);
        }

        let pages = fetch.await?;
        self.cache.insert(key, pages.clone());
        Ok(pages)
    }
}

/// Deduplicate while keeping first-seen order.
fn dedupe(pages: Vec<PageUid>) -> Vec<PageUid> {
    let mut seen = HashSet::with_capacity(pages.len());
    pages.into_iter().filter(|uid| seen.insert(*uid)).collect()
}
