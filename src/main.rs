use anyhow::Result;

use skytower::AppConfig;

fn main() -> Result<()> {
    pretty_env_logger::init();

    skytower::run(AppConfig::new())?;

    Ok(())
}
