use std::path::PathBuf;

use seedbed::RunOptions;

use super::context::{confirm_to_proceed, SeedContext};

/// Reset then re-run: a convenience aggregate of the two underlying
/// commands against one prepared context.
pub async fn execute(
    paths: Vec<PathBuf>,
    env: Option<String>,
    database_name: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let ctx = SeedContext::build(env, database_name).await?;
    if !confirm_to_proceed(&ctx.environment, force)? {
        return Ok(());
    }

    let seed_paths = ctx.seed_paths(&paths);

    let reset = ctx.migrator.reset(&seed_paths).await?;
    println!(
        "Reset {} seed(s) for {} environment",
        reset.rolled_back_count, ctx.environment
    );

    let run = ctx
        .migrator
        .run(&seed_paths, RunOptions::default())
        .await?;
    println!(
        "Seeded {} file(s) for {} environment",
        run.applied_count, ctx.environment
    );

    Ok(())
}
