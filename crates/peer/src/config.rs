use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use invaders::{GameConfig, SessionConfig};

use crate::Args;

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {}:{}", host, port))?
        .next()
        .ok_or_else(|| anyhow!("{}:{} did not resolve to any address", host, port))
}

fn load_tuning(path: &Path) -> Result<GameConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    GameConfig::from_json(&json)
        .with_context(|| format!("invalid tuning file {}", path.display()))
}

pub fn session_config(args: &Args) -> Result<SessionConfig> {
    let remote_port = args.remote_port.unwrap_or_else(|| args.port.wrapping_add(1));
    let game = match &args.tuning {
        Some(path) => load_tuning(path)?,
        None => GameConfig::default(),
    };

    Ok(SessionConfig {
        role: args.role.into(),
        local_addr: resolve(&args.bind, args.port)?,
        remote_addr: resolve(&args.remote, remote_port)?,
        sim_period: Duration::from_millis(args.sim_ms.max(1)),
        comm_period: Duration::from_millis(args.comm_ms.max(1)),
        liveness_timeout: Duration::from_secs(args.timeout_secs),
        seed: args.seed,
        loss_percent: args.loss_percent,
        game,
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use invaders::Role;

    use super::*;

    #[test]
    fn defaults_pair_with_next_port() {
        let args = Args::parse_from(["invaders-peer", "--role", "replica", "--port", "4000"]);
        let config = session_config(&args).unwrap();

        assert_eq!(config.role, Role::Replica);
        assert_eq!(config.local_addr.port(), 4000);
        assert_eq!(config.remote_addr, "127.0.0.1:4001".parse::<std::net::SocketAddr>().unwrap());
        assert_eq!(config.comm_period, Duration::from_millis(50));
        assert_eq!(config.command_capacity(), 3);
    }

    #[test]
    fn missing_tuning_file_is_an_error() {
        let args = Args::parse_from([
            "invaders-peer",
            "--tuning",
            "/nonexistent/invaders-tuning.json",
        ]);
        let err = session_config(&args).unwrap_err();
        assert!(err.to_string().contains("tuning"));
    }
}
