//! End-to-end demo of the draft/publish/rollback workflow against a real
//! database. Requires `DATABASE_URL` (e.g. in a `.env` file).
//!
//! Run with: `cargo run -p minisite-db --example publish_demo`

use minisite_core::ids::generate_minisite_id;
use minisite_db::models::minisite::{MinisitePatch, NewMinisite};
use minisite_db::repositories::MinisiteRepo;
use minisite_db::services::{CreateDraft, PublishVersion, RollbackVersion, VersionService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minisite_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = minisite_db::create_pool(&database_url).await?;
    minisite_db::health_check(&pool).await?;
    minisite_db::run_migrations(&pool).await?;
    tracing::info!("database ready");

    let minisite = MinisiteRepo::create(
        &pool,
        &NewMinisite {
            id: generate_minisite_id(),
            slugs: None,
            title: "Acme Plumbing | Home".into(),
            name: "Acme Plumbing".into(),
            city: "Portland".into(),
            region: Some("OR".into()),
            country_code: "US".into(),
            postal_code: None,
            geo: None,
            site_template: None,
            palette: None,
            industry: None,
            default_locale: None,
            site_json: serde_json::json!({"hero": {"heading": "Welcome"}}),
            search_terms: None,
            created_by: Some(1),
        },
    )
    .await?;
    tracing::info!(minisite_id = %minisite.id, "minisite created");

    let service = VersionService::new(pool.clone());

    let draft = service
        .create_draft(CreateDraft {
            minisite_id: minisite.id.clone(),
            user_id: 1,
            label: Some("Initial content".into()),
            comment: None,
            content: MinisitePatch {
                site_json: Some(serde_json::json!({"hero": {"heading": "Grand opening"}})),
                ..Default::default()
            },
        })
        .await?;
    tracing::info!(version = draft.version_number, "draft created");

    let live = service
        .publish_version(PublishVersion {
            minisite_id: minisite.id.clone(),
            version_id: draft.id,
            user_id: 1,
        })
        .await?;
    tracing::info!(current_version_id = ?live.current_version_id, "published");

    let rollback = service
        .rollback(RollbackVersion {
            minisite_id: minisite.id.clone(),
            source_version_id: draft.id,
            user_id: 1,
            label: None,
            comment: None,
        })
        .await?;
    tracing::info!(
        version = rollback.version_number,
        label = ?rollback.label,
        "rollback staged"
    );

    Ok(())
}
