//! Integration tests for minisite CRUD and the optimistic-lock contract.
//!
//! Exercises the `MinisiteRepo` against a real database:
//! - Create applies defaults and starts at `site_version = 1`
//! - Lookups by id and by slug pair
//! - `save` increments the lock token; a stale token fails with
//!   `OptimisticLock` and leaves the row untouched
//! - Narrow field updates go through the same lock contract
//! - Duplicate slug pairs are rejected by the unique constraint

use assert_matches::assert_matches;
use sqlx::PgPool;

use minisite_core::geo::GeoPoint;
use minisite_core::ids::generate_minisite_id;
use minisite_core::slugs::SlugPair;
use minisite_db::error::DbError;
use minisite_db::models::minisite::{BusinessInfoPatch, MinisitePatch, NewMinisite};
use minisite_db::models::status::{MinisiteStatus, PublishStatus};
use minisite_db::repositories::MinisiteRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_minisite(name: &str) -> NewMinisite {
    NewMinisite {
        id: generate_minisite_id(),
        slugs: None,
        title: format!("{name} | Home"),
        name: name.to_string(),
        city: "Portland".to_string(),
        region: Some("OR".to_string()),
        country_code: "US".to_string(),
        postal_code: Some("97201".to_string()),
        geo: None,
        site_template: None,
        palette: None,
        industry: None,
        default_locale: None,
        site_json: serde_json::json!({"hero": {"heading": name}}),
        search_terms: None,
        created_by: Some(1),
    }
}

// ---------------------------------------------------------------------------
// Test: create applies defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_applies_defaults(pool: PgPool) {
    let minisite = MinisiteRepo::create(&pool, &new_minisite("Acme Plumbing"))
        .await
        .unwrap();

    assert_eq!(minisite.site_version, 1, "lock token should start at 1");
    assert_eq!(minisite.status, MinisiteStatus::Draft);
    assert_eq!(minisite.publish_status, PublishStatus::Draft);
    assert_eq!(minisite.site_template, "v2025");
    assert_eq!(minisite.palette, "blue");
    assert_eq!(minisite.industry, "services");
    assert_eq!(minisite.default_locale, "en-US");
    assert_eq!(minisite.schema_version, 1);
    assert!(minisite.current_version_id.is_none());
    assert!(minisite.published_at.is_none());
}

// ---------------------------------------------------------------------------
// Test: lookups by id and slug pair
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_id_and_slugs(pool: PgPool) {
    let mut input = new_minisite("Acme Plumbing");
    input.slugs = Some(SlugPair::new("acme-plumbing", "downtown").unwrap());
    let created = MinisiteRepo::create(&pool, &input).await.unwrap();

    let by_id = MinisiteRepo::find_by_id(&pool, &created.id)
        .await
        .unwrap()
        .expect("should find by id");
    assert_eq!(by_id.name, "Acme Plumbing");

    let by_slugs = MinisiteRepo::find_by_slugs(&pool, "acme-plumbing", "downtown")
        .await
        .unwrap()
        .expect("should find by slug pair");
    assert_eq!(by_slugs.id, created.id);

    let missing = MinisiteRepo::find_by_id(&pool, &generate_minisite_id())
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: duplicate slug pair is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_pair_rejected(pool: PgPool) {
    let mut first = new_minisite("Acme Plumbing");
    first.slugs = Some(SlugPair::new("acme-plumbing", "downtown").unwrap());
    MinisiteRepo::create(&pool, &first).await.unwrap();

    let mut second = new_minisite("Acme Imitators");
    second.slugs = Some(SlugPair::new("acme-plumbing", "downtown").unwrap());
    let err = MinisiteRepo::create(&pool, &second).await.unwrap_err();
    assert_matches!(err, DbError::Core(_));
}

// ---------------------------------------------------------------------------
// Test: save increments the lock token and persists fields (P3)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_increments_site_version(pool: PgPool) {
    let mut minisite = MinisiteRepo::create(&pool, &new_minisite("Acme Plumbing"))
        .await
        .unwrap();

    minisite.name = "Acme Plumbing & Heating".to_string();
    let saved = MinisiteRepo::save(&pool, &minisite, minisite.site_version)
        .await
        .unwrap();

    assert_eq!(saved.site_version, 2, "save should increment the token");
    assert_eq!(saved.name, "Acme Plumbing & Heating");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_save_fails_with_optimistic_lock(pool: PgPool) {
    let minisite = MinisiteRepo::create(&pool, &new_minisite("Acme Plumbing"))
        .await
        .unwrap();

    // First writer wins.
    let mut first = minisite.clone();
    first.city = "Salem".to_string();
    MinisiteRepo::save(&pool, &first, minisite.site_version)
        .await
        .unwrap();

    // Second writer read the same token and must lose.
    let mut second = minisite.clone();
    second.city = "Eugene".to_string();
    let err = MinisiteRepo::save(&pool, &second, minisite.site_version)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::OptimisticLock { expected: 1, .. });
    assert!(err.is_retryable());

    // The losing write must not have been applied.
    let fresh = MinisiteRepo::find_by_id(&pool, &minisite.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fresh.city, "Salem");
    assert_eq!(fresh.site_version, 2);
}

// ---------------------------------------------------------------------------
// Test: narrow updates follow the same lock contract
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_title_and_coordinates(pool: PgPool) {
    let minisite = MinisiteRepo::create(&pool, &new_minisite("Acme Plumbing"))
        .await
        .unwrap();

    let updated = MinisiteRepo::update_title(&pool, &minisite.id, "New Title", 2, 1)
        .await
        .unwrap();
    assert_eq!(updated.title, "New Title");
    assert_eq!(updated.site_version, 2);
    assert_eq!(updated.updated_by, Some(2));

    let geo = GeoPoint::new(45.5152, -122.6784).unwrap();
    let updated = MinisiteRepo::update_coordinates(&pool, &minisite.id, geo, 2, 2)
        .await
        .unwrap();
    assert_eq!(updated.geo(), Some(geo));
    assert_eq!(updated.site_version, 3);

    // A stale token on a narrow update fails the same way.
    let err = MinisiteRepo::update_title(&pool, &minisite.id, "Stale", 2, 1)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::OptimisticLock { .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_business_info_patches_subset(pool: PgPool) {
    let minisite = MinisiteRepo::create(&pool, &new_minisite("Acme Plumbing"))
        .await
        .unwrap();

    let patch = BusinessInfoPatch {
        city: Some("Beaverton".to_string()),
        postal_code: Some("97005".to_string()),
        ..Default::default()
    };
    let updated = MinisiteRepo::update_business_info(&pool, &minisite.id, &patch, 2, 1)
        .await
        .unwrap();

    assert_eq!(updated.city, "Beaverton");
    assert_eq!(updated.postal_code.as_deref(), Some("97005"));
    // Unpatched fields keep their values.
    assert_eq!(updated.name, "Acme Plumbing");
    assert_eq!(updated.region.as_deref(), Some("OR"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_fields_applies_content_patch(pool: PgPool) {
    let minisite = MinisiteRepo::create(&pool, &new_minisite("Acme Plumbing"))
        .await
        .unwrap();

    let patch = MinisitePatch {
        title: Some("Fresh Title".to_string()),
        palette: Some("green".to_string()),
        site_json: Some(serde_json::json!({"hero": {"heading": "Fresh"}})),
        geo: Some(GeoPoint::new(45.0, -122.0).unwrap()),
        ..Default::default()
    };
    let updated = MinisiteRepo::update_fields(&pool, &minisite.id, &patch, 3, 1)
        .await
        .unwrap();

    assert_eq!(updated.title, "Fresh Title");
    assert_eq!(updated.palette, "green");
    assert_eq!(updated.site_json["hero"]["heading"], "Fresh");
    assert_eq!(updated.lat, Some(45.0));
    assert_eq!(updated.site_version, 2);
    // Fields left out of the patch are untouched.
    assert_eq!(updated.name, "Acme Plumbing");
}

// ---------------------------------------------------------------------------
// Test: publish status flag transition
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_publish_status(pool: PgPool) {
    let minisite = MinisiteRepo::create(&pool, &new_minisite("Acme Plumbing"))
        .await
        .unwrap();

    let updated =
        MinisiteRepo::update_publish_status(&pool, &minisite.id, PublishStatus::Reserved, 1)
            .await
            .unwrap();
    assert_eq!(updated.publish_status, PublishStatus::Reserved);
    assert_eq!(updated.site_version, 2);
}

// ---------------------------------------------------------------------------
// Test: owner listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_and_count_by_owner(pool: PgPool) {
    let mut a = new_minisite("Owner A Site 1");
    a.created_by = Some(10);
    let mut b = new_minisite("Owner A Site 2");
    b.created_by = Some(10);
    let mut c = new_minisite("Owner B Site");
    c.created_by = Some(11);
    MinisiteRepo::create(&pool, &a).await.unwrap();
    MinisiteRepo::create(&pool, &b).await.unwrap();
    MinisiteRepo::create(&pool, &c).await.unwrap();

    let owned = MinisiteRepo::list_by_owner(&pool, 10, 50, 0).await.unwrap();
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|m| m.created_by == Some(10)));

    let count = MinisiteRepo::count_by_owner(&pool, 10).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(MinisiteRepo::count_by_owner(&pool, 99).await.unwrap(), 0);
}
