//! Live integration tests for kinews-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/kinews-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory. Run with `DATABASE_URL` set and `-- --ignored`.

use chrono::{DateTime, TimeZone, Utc};
use kinews_core::Article;
use kinews_db::{
    delete_article, get_article, get_newsletter, insert_article, list_articles_for_week,
    query_newsletters, save_newsletter, update_article_title, DbError, NewNewsletter,
    NewsletterQuery,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn published(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, day, 9, 0, 0).unwrap()
}

fn make_article(title: &str, link: &str, day: u32) -> Article {
    Article {
        title: title.to_string(),
        description: format!("Beschreibung zu {title}"),
        content: Some("Inhalt".to_string()),
        link: link.to_string(),
        guid: link.to_string(),
        pub_date: published(day),
        source_name: "heise online".to_string(),
        author: None,
        categories: vec!["KI".to_string()],
    }
}

fn make_newsletter<'a>(
    week: i32,
    title: &'a str,
    content: &'a str,
    links: &'a [String],
) -> NewNewsletter<'a> {
    NewNewsletter {
        year: 2025,
        week,
        date_range: "13.10.2025 - 19.10.2025",
        title,
        content,
        origin: "generated",
        article_links: links,
    }
}

// ---------------------------------------------------------------------------
// Section 1: Articles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn insert_article_is_idempotent_on_identity(pool: sqlx::PgPool) {
    let first = insert_article(&pool, &make_article("KI News", "https://x.test/1", 14))
        .await
        .expect("insert failed");
    assert!(first.is_some());

    let again = insert_article(&pool, &make_article("ki   news", "https://x.test/1", 15))
        .await
        .expect("second insert failed");
    assert!(again.is_none(), "same identity must not be stored twice");

    let row = get_article(&pool, first.unwrap())
        .await
        .expect("get failed")
        .expect("row missing");
    assert_eq!(row.title, "KI News");
    assert_eq!(row.categories, vec!["KI"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn list_articles_for_week_filters_by_pub_date(pool: sqlx::PgPool) {
    insert_article(&pool, &make_article("Vorwoche", "https://x.test/old", 12))
        .await
        .unwrap();
    insert_article(&pool, &make_article("Montag", "https://x.test/mon", 13))
        .await
        .unwrap();
    insert_article(&pool, &make_article("Sonntag", "https://x.test/sun", 19))
        .await
        .unwrap();
    insert_article(&pool, &make_article("Folgewoche", "https://x.test/next", 20))
        .await
        .unwrap();

    let rows = list_articles_for_week(&pool, 2025, 42).await.unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Montag", "Sonntag"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn list_articles_for_week_rejects_missing_week(pool: sqlx::PgPool) {
    let err = list_articles_for_week(&pool, 2025, 53).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidWeek { year: 2025, week: 53 }));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn rename_keeps_ingestion_identity(pool: sqlx::PgPool) {
    let id = insert_article(&pool, &make_article("Alter Titel", "https://x.test/r", 14))
        .await
        .unwrap()
        .unwrap();

    update_article_title(&pool, id, "Neuer Titel").await.unwrap();
    let row = get_article(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.title, "Neuer Titel");

    // Re-fetching the original feed item stays a no-op.
    let again = insert_article(&pool, &make_article("Alter Titel", "https://x.test/r", 14))
        .await
        .unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn delete_and_update_missing_article_is_not_found(pool: sqlx::PgPool) {
    let id = insert_article(&pool, &make_article("Weg", "https://x.test/d", 14))
        .await
        .unwrap()
        .unwrap();
    delete_article(&pool, id).await.unwrap();
    assert!(get_article(&pool, id).await.unwrap().is_none());

    assert!(matches!(delete_article(&pool, id).await, Err(DbError::NotFound)));
    assert!(matches!(
        update_article_title(&pool, id, "x").await,
        Err(DbError::NotFound)
    ));
}

// ---------------------------------------------------------------------------
// Section 2: Newsletter archive
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn save_and_get_newsletter_round_trip(pool: sqlx::PgPool) {
    let links = vec!["https://x.test/1".to_string(), "https://x.test/2".to_string()];
    let saved = save_newsletter(&pool, &make_newsletter(42, "KW 42", "Inhalt", &links))
        .await
        .expect("save failed");

    let fetched = get_newsletter(&pool, saved.public_id)
        .await
        .unwrap()
        .expect("newsletter missing");
    assert_eq!(fetched.id, saved.id);
    assert_eq!(fetched.week, 42);
    assert_eq!(fetched.origin, "generated");
    assert_eq!(fetched.links(), links);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn query_newsletters_orders_newest_first_and_filters(pool: sqlx::PgPool) {
    let links: Vec<String> = vec![];
    save_newsletter(&pool, &make_newsletter(40, "KW 40", "Tesla und Robotik", &links))
        .await
        .unwrap();
    save_newsletter(&pool, &make_newsletter(42, "KW 42", "Nvidia dominiert", &links))
        .await
        .unwrap();
    save_newsletter(&pool, &make_newsletter(41, "KW 41", "OpenAI 100% offen?", &links))
        .await
        .unwrap();

    let all = query_newsletters(&pool, &NewsletterQuery::default()).await.unwrap();
    let weeks: Vec<i32> = all.iter().map(|r| r.week).collect();
    assert_eq!(weeks, [42, 41, 40]);

    let by_week = query_newsletters(
        &pool,
        &NewsletterQuery {
            week: Some(41),
            ..NewsletterQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_week.len(), 1);

    let by_text = query_newsletters(
        &pool,
        &NewsletterQuery {
            text: Some("NVIDIA".to_string()),
            ..NewsletterQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].week, 42);

    let literal_percent = query_newsletters(
        &pool,
        &NewsletterQuery {
            text: Some("100%".to_string()),
            ..NewsletterQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(literal_percent.len(), 1);

    let limited = query_newsletters(
        &pool,
        &NewsletterQuery {
            limit: 2,
            ..NewsletterQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(limited.len(), 2);
}
