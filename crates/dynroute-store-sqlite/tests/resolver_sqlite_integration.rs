//! End-to-end test: YAML routing configuration resolved against a real
//! SQLite content database.

use std::sync::Arc;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use dynroute_resolver::PageResolver;
use dynroute_store_sqlite::SqlitePageStore;

async fn seeded_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE content_elements (
            uid INTEGER PRIMARY KEY,
            pid INTEGER NOT NULL,
            CType TEXT NOT NULL,
            list_type TEXT NOT NULL DEFAULT '',
            pi_flexform TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE pages (
            uid INTEGER PRIMARY KEY,
            doktype INTEGER NOT NULL,
            module TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    for (pid, ctype, list_type) in [
        (100, "news_pi1", ""),
        (101, "news_pi1", ""),
        (102, "list", "events_pi1"),
    ] {
        sqlx::query("INSERT INTO content_elements (pid, CType, list_type) VALUES (?, ?, ?)")
            .bind(pid)
            .bind(ctype)
            .bind(list_type)
            .execute(&pool)
            .await
            .unwrap();
    }

    for (uid, doktype, module) in [(100, 1, "news"), (101, 1, ""), (102, 1, ""), (200, 4, "")] {
        sqlx::query("INSERT INTO pages (uid, doktype, module) VALUES (?, ?, ?)")
            .bind(uid)
            .bind(doktype)
            .bind(module)
            .execute(&pool)
            .await
            .unwrap();
    }

    pool
}

#[tokio::test]
async fn test_configuration_pass_against_sqlite() {
    let store = Arc::new(SqlitePageStore::new(seeded_pool().await));
    let resolver = PageResolver::new(store);

    let configuration: serde_json::Value = serde_yaml::from_str(
        r#"
main:
  rootPageId: 1
  routeEnhancers:
    News:
      type: Extbase
      extension: News
      plugin: Pi1
      dynamicPages:
        withCType: news_pi1
        containsModule: news
    Events:
      type: Extbase
      dynamicPages:
        withPlugin: events_pi1
    Links:
      type: Simple
      routePath: '/{page}'
"#,
    )
    .unwrap();

    let modified = resolver.modify_configuration(configuration).await.unwrap();
    let enhancers = &modified["main"]["routeEnhancers"];

    let mut news_pages: Vec<i64> = enhancers["News"]["limitToPages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|uid| uid.as_i64().unwrap())
        .collect();
    news_pages.sort_unstable();
    // Union of the CType match (100, 101) and the module match (100), deduplicated.
    assert_eq!(news_pages, vec![100, 101]);

    assert_eq!(
        enhancers["Events"]["limitToPages"],
        serde_json::json!([102])
    );

    // Plain enhancers pass through untouched.
    assert!(enhancers["Links"].get("limitToPages").is_none());
    assert_eq!(enhancers["Links"]["routePath"], "/{page}");
}
