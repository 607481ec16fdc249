use catalog_infra::config::CatalogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = CatalogConfig::from_env()?;
    catalog_api::server::run(config).await
}
