use anyhow::Context;
use vantage::{app::ViewerApp, config::ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ViewerConfig::default();
    match std::env::args_os().nth(1) {
        Some(path) => config = config.with_model_path(path),
        None => log::warn!("no model given; usage: vantage-viewer <model.obj>"),
    }

    ViewerApp::new(config)
        .context("failed to create the event loop")?
        .run()
        .context("viewer exited with an error")
}
