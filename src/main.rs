mod app;
mod data;
mod util;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to a network dataset (JSON with `nodes` and `links`). Falls
    /// back to the bundled sample network when omitted.
    #[arg(long)]
    dataset: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "sociogram",
        options,
        Box::new(move |cc| Ok(Box::new(app::SociogramApp::new(cc, args.dataset.clone())))),
    )
}
