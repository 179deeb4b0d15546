use axum_storefront::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    services::seed_service,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let report = seed_service::run(&orm).await?;
    if report.is_empty() {
        println!("Seed completed. Nothing to create.");
    } else {
        println!(
            "Seed completed. Roles: {}, products: {}, accounts: {}",
            report.roles_created, report.products_created, report.accounts_created
        );
    }
    Ok(())
}
