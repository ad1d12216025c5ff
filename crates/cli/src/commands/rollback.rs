use std::path::PathBuf;

use super::context::{confirm_to_proceed, SeedContext};

pub async fn execute(
    paths: Vec<PathBuf>,
    steps: usize,
    env: Option<String>,
    database_name: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let ctx = SeedContext::build(env, database_name).await?;
    if !confirm_to_proceed(&ctx.environment, force)? {
        return Ok(());
    }

    let seed_paths = ctx.seed_paths(&paths);

    let result = ctx.migrator.rollback(&seed_paths, steps).await?;

    if result.rolled_back_count == 0 {
        println!("Nothing to roll back for {} environment.", ctx.environment);
    } else {
        for seed in &result.rolled_back_seeds {
            println!("  Rolled back: {}", seed);
        }
        println!(
            "Rolled back {} seed(s) across {} batch(es) for {} environment",
            result.rolled_back_count, result.batches, ctx.environment
        );
    }

    Ok(())
}
