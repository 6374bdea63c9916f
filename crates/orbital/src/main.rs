use orbital::config;
use orbital::gui::app::AppModel;
use orbital::sys::runtime;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    match config::write_default_config() {
        Ok(path) => log::debug!("Using config at {}", path.display()),
        Err(e) => log::warn!("Could not write default config: {}", e),
    }
    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(64);

    // Start Background Services
    runtime::start_background_services(tx.clone(), config.server.socket.clone());

    let app = AppModel::new(&config, tx);
    runtime::run_event_loop(app, rx).await
}
