use clap::Parser;
use pagesmith::cli::Cli;
use pagesmith::config::Settings;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;
    info!(command = ?cli.command, "Running pagesmith");

    let output = pagesmith::run(&cli, &settings).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
