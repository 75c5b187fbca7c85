#[derive(Debug, clap::Parser)]
#[command(name = "mcp")]
#[command(about = "Serve the Rebrickable tools over the Model Context Protocol")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Serve over stdio (for clients that spawn the server)
    #[clap(name = "stdio")]
    Stdio,

    /// Serve over HTTP with SSE (for hosted deployments)
    #[clap(name = "sse")]
    Sse(SseOptions),
}

#[derive(Debug, clap::Args)]
pub struct SseOptions {
    /// Port to listen on
    #[arg(short, long, env = "BRICKTOOLS_MCP_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}
