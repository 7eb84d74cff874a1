#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use launch_config::{default_config_path, LaunchConfig};
use launcher::{library_search_variable, Launcher};

#[derive(Parser, Debug, Clone)]
#[clap(version, about = "starts snail inside an embedded JVM")]
pub struct LauncherArgs {
    #[clap(short, long, help = "the config file, defaults to snail.ini next to the executable")]
    config: Option<PathBuf>,
    #[clap(long, help = "print what would be loaded and exit without starting the JVM")]
    check: bool,
}

fn print_check(config_path: &Path, config: &LaunchConfig) {
    println!("config: {}", config_path.display());
    println!("{} += {}", library_search_variable(), config.library_search_path());
    println!("jvm library: {}", config.jvm_library_path().display());
    for option in config.jvm_options() {
        println!("option: {}", option);
    }
}

fn main() -> anyhow::Result<ExitCode> {
    SimpleLogger::new().with_level(LevelFilter::Info).env().init()?;
    let args: LauncherArgs = LauncherArgs::parse();
    let config_path = match args.config {
        Some(config_path) => config_path,
        None => default_config_path()?,
    };
    if args.check {
        print_check(&config_path, &LaunchConfig::read(&config_path));
        return Ok(ExitCode::SUCCESS);
    }
    let mut launcher = Launcher::system(&config_path);
    if launcher.launch() {
        info!("exiting");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
