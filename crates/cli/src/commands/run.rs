use std::path::PathBuf;

use seedbed::RunOptions;

use super::context::{confirm_to_proceed, SeedContext};

pub async fn execute(
    paths: Vec<PathBuf>,
    env: Option<String>,
    database_name: Option<String>,
    pretend: bool,
    force: bool,
) -> anyhow::Result<()> {
    let ctx = SeedContext::build(env, database_name).await?;
    if !confirm_to_proceed(&ctx.environment, force)? {
        return Ok(());
    }

    let seed_paths = ctx.seed_paths(&paths);

    println!("Seeding data for {} environment...", ctx.environment);
    let result = ctx.migrator.run(&seed_paths, RunOptions { pretend }).await?;

    if pretend {
        for statement in &result.pretended_statements {
            println!("  {}", statement);
        }
        println!(
            "Would apply {} statement(s); nothing was written.",
            result.pretended_statements.len()
        );
    } else if result.applied_count == 0 {
        println!("Nothing to seed.");
    } else {
        for seed in &result.applied_seeds {
            println!("  Seeded: {}", seed);
        }
        println!(
            "Seeded {} file(s) for {} environment in {}ms",
            result.applied_count, ctx.environment, result.execution_time_ms
        );
    }

    Ok(())
}
