extern crate cgmath;
extern crate gl;
extern crate glutin;

#[macro_use]
mod gl_api;
mod app;
mod config;
mod logging;
mod scene;
mod window;

use app::App;
use config::{Args, USAGE};

fn main() {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return;
    }

    let config = match args.resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    logging::init_logging(&config.log);

    if let Err(err) = App::run(&config) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
