//! Login server entry point.

// crates.io
use color_eyre::eyre::Result;
// self
use oauth2_login::{config::Settings, obs, server};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let settings = Settings::load();

	obs::init_logging();

	let config = settings.client_config()?;

	tracing::info!(
		client_id = %config.client_id,
		redirect_uri = %config.redirect_uri,
		scopes = %config.scopes,
		"Loaded client credentials."
	);

	server::serve(&settings, config).await?;

	Ok(())
}
