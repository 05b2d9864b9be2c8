use kvnotes_server::{load_settings, serve, settings_file_path};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = settings_file_path();
    let settings = match load_settings(&path) {
        Ok(settings) => settings.apply_env_overrides(),
        Err(e) => {
            log::error!("failed to load settings from {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    if let Err(e) = serve(settings).await {
        log::error!("server error: {e}");
        std::process::exit(1);
    }
}
