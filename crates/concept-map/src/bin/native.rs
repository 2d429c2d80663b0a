use clap::Parser;
use concept_map::Config;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("concept_map=info,concept_graph=info")),
        )
        .init();

    let config = Config::parse();
    tracing::info!(key = %config.storage_key(), "starting concept map");
    concept_map::native::run(config)
}
