use anyhow::{bail, Result};
use crossterm::style::Stylize;
use sdd_hub::{config::GlobalConfig, host::ProcessHost, logging, tui, HubError};
use std::path::PathBuf;
use std::sync::Arc;

/// Command line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    host: Option<String>,
    host_args: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--config" => match iter.next() {
                Some(path) => options.config = Some(PathBuf::from(path)),
                None => bail!("{} needs a path", arg),
            },
            "--host" => match iter.next() {
                Some(cmd) => options.host = Some(cmd.clone()),
                None => bail!("--host needs a command"),
            },
            "--" => {
                options.host_args = iter.cloned().collect();
                break;
            }
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    // First run: write the defaults so there is a file to edit
    let config_path = match options.config {
        Some(path) => path,
        None => GlobalConfig::config_path()?,
    };
    if !config_path.exists() {
        GlobalConfig::default().save_to(&config_path)?;
    }
    let mut config = GlobalConfig::load_from(&config_path)?;
    if let Some(host) = options.host {
        config.host.command = host;
    }
    if !options.host_args.is_empty() {
        config.host.args = options.host_args;
    }

    let _guard = logging::init(&config)?;

    let (host, inbound) = match ProcessHost::spawn(&config.host) {
        Ok(spawned) => spawned,
        Err(e) => {
            if let Some(HubError::HostUnavailable(cmd)) = e.downcast_ref::<HubError>() {
                eprintln!(
                    "{} host command {} not found in PATH (set [host].command in {})",
                    "error:".red().bold(),
                    cmd.as_str().cyan(),
                    config_path.display()
                );
                std::process::exit(1);
            }
            return Err(e);
        }
    };

    let mut app = tui::App::new(&config, Arc::new(host), inbound)?;
    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("sdd-hub")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_no_args() {
        let options = parse_args(&args(&[])).unwrap();
        assert!(options.config.is_none());
        assert!(options.host.is_none());
    }

    #[test]
    fn test_parse_host_and_passthrough_args() {
        let options = parse_args(&args(&["--host", "node", "--", "host.js", "--verbose"])).unwrap();
        assert_eq!(options.host.as_deref(), Some("node"));
        assert_eq!(options.host_args, vec!["host.js", "--verbose"]);
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing_values() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }
}
