use clap::Parser;

use ournix::{log, shell, FileSystem};

// Allow the shell to return its version with a --version flag
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
struct Opts {
    #[clap(short, long)]
    version: bool,
    #[clap(short, long)]
    debug: bool,
}

fn main() {
    let opts: Opts = Opts::parse();
    if opts.version {
        println!("{}", VERSION);
        return;
    }
    let _guard = log::init_logging(opts.debug);
    let fs = FileSystem::new();
    if let Err(e) = shell::run(fs) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
