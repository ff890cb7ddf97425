mod cli;
mod info_cmd;
mod read_cmd;
mod string_utils;

use anyhow::{Context, Result};
use log::LevelFilter;

use cli::CommandOpts;

pub static PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub static PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_log(level: LevelFilter) -> Result<()> {
    let local_level = level;
    fern::Dispatch::new()
        .format(move |out, message, record| {
            if local_level > LevelFilter::Info {
                // Add some extra info to each message in debug
                out.finish(format_args!(
                    "[{}]({})({}) {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.target(),
                    record.level(),
                    message
                ))
            } else {
                out.finish(format_args!("{}", message))
            }
        })
        .level(level)
        .level_for("hyper", LevelFilter::Info)
        .level_for("reqwest", LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()
        .context("Failed to initialize logger")?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let (command, log_opts) = cli::parse_opts(std::env::args_os()).unwrap_or_else(|e| e.exit());
    if let Err(e) = init_log(log_opts.filter) {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }

    let result = match command {
        CommandOpts::Info(opts) => info_cmd::info(opts).await,
        CommandOpts::Read(opts) => read_cmd::read(opts).await,
    };
    if let Err(e) = result {
        log::error!("error: {:?}", e);
        std::process::exit(1);
    }
}
