use clap::Parser;
use log::warn;
use snafu::ErrorCompat;

mod args;
mod mapmaker;

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let res = mapmaker::run_projection(&args);
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured:");
        for cause in ErrorCompat::iter_chain(&*e) {
            eprintln!("  {}", cause);
        }
        if let Some(bt) = ErrorCompat::backtrace(&*e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
