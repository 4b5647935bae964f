//! Line-delimited stream transport.
//!
//! For every input line: parse → handle → write exactly one output line,
//! flushed immediately. Lines are read as raw bytes, so blank or non-UTF-8
//! lines are answered with a parse error like any other malformed request.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use savant_core::error::Result;

use crate::app_state::HubState;
use crate::dispatch::Dispatcher;

use super::shutdown_signal;

/// Audit actor recorded for stdio callers.
pub const STDIO_ACTOR: &str = "stdio";

/// Serve until EOF or `shutdown` resolves. Returns the number of lines answered.
///
/// Only I/O errors on the stream itself end this transport; they are returned
/// to the caller.
pub async fn serve_lines<R, W, S>(
    mut reader: R,
    mut writer: W,
    dispatcher: &Dispatcher,
    shutdown: S,
) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut buf: Vec<u8> = Vec::new();
    let mut served: u64 = 0;

    loop {
        buf.clear();
        // Partially read bytes are dropped on shutdown; nothing is answered after it.
        let n = tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!(event = "stdio_shutdown", reason = "signal", served);
                break;
            }
            n = reader.read_until(b'\n', &mut buf) => n?,
        };

        if n == 0 {
            tracing::info!(event = "stdio_shutdown", reason = "eof", served);
            break;
        }

        let line = trim_line_end(&buf);
        let out = dispatcher.handle_bytes(line, Some(STDIO_ACTOR)).await;
        writer.write_all(out.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        served += 1;
    }

    Ok(served)
}

/// Serve JSON-RPC over the process's stdin/stdout.
pub async fn serve_stdio(state: HubState) -> Result<()> {
    tracing::info!(event = "stdio_start", tools = state.multiplexer().router().len());
    let dispatcher = state.dispatcher();
    serve_lines(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &dispatcher,
        shutdown_signal(),
    )
    .await?;
    Ok(())
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
