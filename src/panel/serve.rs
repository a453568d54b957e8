// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Newline-delimited JSON transport for the panel protocol.

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::git::GitExecutor;

use super::controller::PanelController;
use super::protocol::{InboundEvent, OutboundEvent};

/// Read one event per line and write the replies, one per line.
///
/// Malformed lines are answered with `showError` and do not stop the loop.
/// Returns when the reader reaches end of input.
pub async fn serve<E, R, W>(
    controller: &mut PanelController<E>,
    reader: R,
    mut writer: W,
) -> anyhow::Result<()>
where
    E: GitExecutor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("reading panel event")? {
        if line.trim().is_empty() {
            continue;
        }

        let replies = match serde_json::from_str::<InboundEvent>(&line) {
            Ok(event) => controller.handle(event).await,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed panel event");
                vec![OutboundEvent::ShowError {
                    message: format!("Unrecognized panel message: {}", e),
                }]
            }
        };

        for reply in replies {
            let mut frame = serde_json::to_string(&reply)?;
            frame.push('\n');
            writer
                .write_all(frame.as_bytes())
                .await
                .context("writing panel event")?;
        }
        writer.flush().await?;
    }

    tracing::debug!("Panel input closed");
    Ok(())
}

/// Serve the protocol over stdin and stdout.
pub async fn serve_stdio<E: GitExecutor>(controller: &mut PanelController<E>) -> anyhow::Result<()> {
    serve(
        controller,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayLimits;
    use crate::git::{GitCommands, MockGitExecutor};
    use crate::provider::{Gateway, ProviderConfig};

    #[tokio::test]
    async fn test_serve_round_trip() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run()
            .returning(|_| Ok("M  src/lib.rs\n".to_string()));

        let mut controller = PanelController::new(
            GitCommands::new(mock),
            Gateway::new(ProviderConfig::default(), GatewayLimits::default()),
            None,
        );

        let input = "{\"type\":\"refresh\"}\n\nnot json\n";
        let mut output = Vec::new();
        serve(&mut controller, input.as_bytes(), &mut output)
            .await
            .unwrap();

        let frames: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["type"], "updateFiles");
        assert_eq!(frames[0]["staged"][0]["path"], "src/lib.rs");
        assert_eq!(frames[1]["type"], "showError");
    }
}
