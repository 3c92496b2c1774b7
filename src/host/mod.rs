mod operations;

pub use operations::HostTransport;

#[cfg(any(test, feature = "test-mocks"))]
pub use operations::MockHostTransport;

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::config::HostConfig;
use crate::error::HubError;
use crate::protocol::{Envelope, OutboundMessage};

/// Host process speaking newline-delimited JSON envelopes on stdin/stdout
pub struct ProcessHost {
    outbound: mpsc::UnboundedSender<String>,
}

impl ProcessHost {
    /// Spawn the configured host. Returns the transport plus the receiver
    /// that yields every envelope the host prints.
    pub fn spawn(config: &HostConfig) -> Result<(Self, mpsc::UnboundedReceiver<Envelope>)> {
        let program = which::which(&config.command)
            .map_err(|_| HubError::HostUnavailable(config.command.clone()))?;

        let mut child = Command::new(&program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start host {:?}", program))?;

        let mut stdin = child.stdin.take().context("Host stdin not captured")?;
        let stdout = child.stdout.take().context("Host stdout not captured")?;
        let stderr = child.stderr.take().context("Host stderr not captured")?;

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<Envelope>();

        tokio::spawn(async move {
            while let Some(line) = out_rx.recv().await {
                if let Err(e) = write_line(&mut stdin, &line).await {
                    tracing::error!(error = %e, "failed to write to host");
                    break;
                }
            }
        });

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match Envelope::from_line(&line) {
                            Ok(envelope) => {
                                if in_tx.send(envelope).is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, line = %line, "unparseable host line"),
                        }
                    }
                    Ok(None) => {
                        tracing::info!("host closed stdout");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to read from host");
                        break;
                    }
                }
            }
        });

        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::info!(target: "host", "{}", line);
            }
        });

        let pid = child.id();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => tracing::info!(%status, "host exited"),
                Err(e) => tracing::error!(error = %e, "failed to wait for host"),
            }
        });

        tracing::info!(program = ?program, pid = ?pid, "host started");
        Ok((Self { outbound: out_tx }, in_rx))
    }
}

async fn write_line(stdin: &mut tokio::process::ChildStdin, line: &str) -> std::io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}

impl HostTransport for ProcessHost {
    fn post(&self, message: &OutboundMessage) -> Result<()> {
        let line = message.to_envelope()?.to_line()?;
        tracing::debug!(command = message.command(), "sending to host");
        self.outbound.send(line).map_err(|_| HubError::HostClosed)?;
        Ok(())
    }
}
