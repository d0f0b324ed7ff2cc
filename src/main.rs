use anyhow::Result;
use env_logger::Env;
use log::info;

mod config;
mod error;
mod escaping_chroot;

use config::JailConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = JailConfig::default();
    info!("jail: {:?}, ascent depth: {}", config.jail_dir, config.ascent_depth);

    let report = escaping_chroot::escape_chroot(&config)?;
    info!(
        "done: ascended {} levels, escaped: {:?}, held fd: {:?}",
        report.ascended, report.escaped, report.held_fd
    );
    Ok(())
}
