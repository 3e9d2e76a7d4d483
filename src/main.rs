mod app;
mod audio;
mod cart;
mod catalog;
mod config;
mod error;
mod logging;
mod mpris;
mod playback;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
