use forgejo_mcp::{cli, config::Config, remote, server};

#[tokio::main(flavor = "current_thread")] // stdio server; requests are handled one at a time
async fn main() -> anyhow::Result<()> {
    let cmd = cli::build_cli();
    let matches = cmd.get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    let version_flag = matches.get_flag("version");

    cli::init_logging(log_level.as_deref());

    if version_flag {
        println!("forgejo-mcp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cfg = Config::from_env().map_err(anyhow::Error::msg)?;
    // Detection and backend construction failures are fatal: the server must not
    // come up in a partially-functional state.
    let client = remote::factory::build_client(&cfg).await?;
    server::run_stdio_server(client).await?;
    Ok(())
}
