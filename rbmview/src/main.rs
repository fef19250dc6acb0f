use std::path::PathBuf;

use clap::Parser;

mod viewer;

#[derive(Parser)]
struct Opts {
    #[clap(help = "rbm image file to display")]
    rbm_path: PathBuf,
}

fn main() {
    simple_logger::init().unwrap();

    let opts: Opts = Opts::parse();

    if let Err(e) = viewer::show(&opts.rbm_path) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
