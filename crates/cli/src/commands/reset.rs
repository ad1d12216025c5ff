use std::path::PathBuf;

use super::context::{confirm_to_proceed, SeedContext};

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

    let result = ctx.migrator.reset(&seed_paths).await?;

    if result.rolled_back_count == 0 {
        println!("Nothing to reset for {} environment.", ctx.environment);
    } else {
        println!(
            "Reset {} seed(s) for {} environment",
            result.rolled_back_count, ctx.environment
        );
    }

    Ok(())
}
