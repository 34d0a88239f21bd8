use std::path::Path;

use pixeltap::{config, ClickSimulator, PixeltapResult};

fn main() -> PixeltapResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "no config loaded; using defaults");
            config::SimulatorConfig::default()
        }
    };

    let mut simulator = ClickSimulator::with_system_backends(config)?;

    let template = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "submit_button.png".to_string());
    if simulator.click_target(Path::new(&template), None, None)? {
        simulator.repeat_last_click(None)?;
    }

    Ok(())
}
