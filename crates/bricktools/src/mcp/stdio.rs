//! Line-delimited JSON-RPC over stdin/stdout, the transport MCP clients
//! spawn the server with. One request per line, one response per line.

use crate::prelude::{eprintln, *};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub async fn run_stdio(global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Starting bricktools MCP server on stdio...");
        eprintln!();
    }

    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            break; // EOF
        }

        let request = line.trim();
        if request.is_empty() {
            continue;
        }

        if global.verbose {
            eprintln!("<- {request}");
        }

        let response = super::handle_request(request, &global).await;
        let response_json = serde_json::to_string(&response)?;

        if global.verbose {
            eprintln!("-> {response_json}");
        }

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
