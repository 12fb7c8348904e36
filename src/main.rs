mod cli;

use clap::Parser;

use camera_control::config::Config;
use cli::{Args, Command, CommandError};

fn run(args: Args) -> Result<String, CommandError> {
    let load = || Config::load(args.config.as_deref());

    match args.command {
        Command::ListCameras => Ok(cli::list_cameras(&load()?)),
        Command::Caps { device } => cli::caps(&load()?, &device),
        Command::Focus { device, x, y } => cli::focus(&load()?, &device, x, y),
        Command::Zoom { device, scales } => cli::zoom(&load()?, &device, &scales),
        Command::Exposure { device, scale } => cli::exposure(&load()?, &device, scale),
        Command::Flash { device, state } => cli::flash(&load()?, &device, state.into()),
        Command::Size { device, aspect } => cli::size(&load()?, &device, aspect.map(Into::into)),
        Command::Simulate { device, gestures } => cli::simulate(&load()?, &device, &gestures),
        Command::Config { action } => cli::handle_config_action(action, args.config.as_deref()),
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
