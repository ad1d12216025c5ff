use seedbed::SeedRepository;

use super::context::SeedContext;

pub async fn execute(database_name: Option<String>) -> anyhow::Result<()> {
    let ctx = SeedContext::build(None, database_name).await?;

    ctx.migrator.repository().create_repository().await?;

    println!("Seeder table created successfully.");
    Ok(())
}
