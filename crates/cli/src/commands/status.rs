use std::path::PathBuf;

use console::style;

use super::context::SeedContext;

pub async fn execute(
    paths: Vec<PathBuf>,
    env: Option<String>,
    database_name: Option<String>,
) -> anyhow::Result<()> {
    let ctx = SeedContext::build(env, database_name).await?;
    let seed_paths = ctx.seed_paths(&paths);

    let statuses = ctx.migrator.status(&seed_paths).await?;

    if statuses.is_empty() {
        println!("{}", style("No seeders found").red());
        return Ok(());
    }

    println!("{:<6} {}", "Ran?", "Seed");
    for entry in statuses {
        let flag = if entry.ran {
            style("Y").green()
        } else {
            style("N").red()
        };
        println!("{:<6} {}", flag, entry.seed);
    }

    Ok(())
}
