use anyhow::{Context, Result};
use clap::Parser;
use server::build_app;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Serve boolean, phrase and proximity queries over a built index", long_about = None)]
struct Args {
    /// Index directory holding snapshot.bin and meta.json
    #[arg(long, default_value = "./index")]
    index: String,
    /// Address to bind, host:port
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app = build_app(args.index)?;

    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    tracing::info!(addr = %args.bind, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
