mod api;
mod cli;
mod config;
mod logging;
mod tui;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{:#}", e); // pretty anyhow chain
        std::process::exit(1);
    }
}
