use clap::Parser;
use soil_terrain_preprocess::prelude::*;
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (dataset, context) = PreprocessContext::from_cli(args)?;
    preprocess(&dataset, &context)?;

    Ok(())
}
