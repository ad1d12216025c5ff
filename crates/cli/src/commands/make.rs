use std::path::PathBuf;

use seedbed::{SeedCreator, SeederConfig};

pub fn execute(name: &str, dir: Option<PathBuf>, env: Option<String>) -> anyhow::Result<()> {
    let config = SeederConfig::from_env();

    // The first configured root is the scaffold target; seeds land in its
    // environment subdirectory so discovery picks them up.
    let target = match dir {
        Some(dir) => dir,
        None => {
            let root = config.dirs.first().cloned().unwrap_or_else(|| {
                PathBuf::from("database/seeders")
            });
            root.join(env.as_deref().unwrap_or("all"))
        }
    };

    let path = SeedCreator::create(name, &target)?;
    println!("Created seed: {}", path.display());
    Ok(())
}
