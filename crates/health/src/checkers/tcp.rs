//! TCP connect probe for gateway upstreams.

use std::str::FromStr;

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::checker::{Checker, Probe};
use crate::error::{HealthError, Result};

/// An upstream the gateway depends on.
///
/// Textual form: `name=host:port`, optionally followed by `;optional` to mark
/// the upstream as non-critical (or `;critical`, the default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub name: String,
    pub addr: String,
    pub critical: bool,
}

impl FromStr for Upstream {
    type Err = HealthError;

    fn from_str(spec: &str) -> Result<Self> {
        let (target, flag) = match spec.split_once(';') {
            Some((target, flag)) => (target, Some(flag.trim())),
            None => (spec, None),
        };

        let critical = match flag {
            None | Some("critical") => true,
            Some("optional") => false,
            Some(other) => {
                return Err(HealthError::invalid_upstream(
                    spec,
                    format!("unknown flag '{other}'"),
                ));
            }
        };

        let (name, addr) = target
            .split_once('=')
            .ok_or_else(|| HealthError::invalid_upstream(spec, "expected name=host:port"))?;
        let (name, addr) = (name.trim(), addr.trim());

        if name.is_empty() {
            return Err(HealthError::invalid_upstream(spec, "empty name"));
        }

        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| HealthError::invalid_upstream(spec, "missing port"))?;
        if host.is_empty() {
            return Err(HealthError::invalid_upstream(spec, "empty host"));
        }
        if port.parse::<u16>().is_err() {
            return Err(HealthError::invalid_upstream(
                spec,
                format!("invalid port '{port}'"),
            ));
        }

        Ok(Upstream {
            name: name.to_string(),
            addr: addr.to_string(),
            critical,
        })
    }
}

/// Parses a comma-separated upstream list. Blank entries are skipped.
pub fn parse_upstreams(list: &str) -> Result<Vec<Upstream>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(Upstream::from_str)
        .collect()
}

/// Reports an upstream healthy when a TCP connection can be opened to it.
#[derive(Debug, Clone)]
pub struct TcpChecker {
    upstream: Upstream,
}

impl TcpChecker {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &Upstream {
        &self.upstream
    }
}

#[async_trait]
impl Checker for TcpChecker {
    fn name(&self) -> &str {
        &self.upstream.name
    }

    fn critical(&self) -> bool {
        self.upstream.critical
    }

    async fn probe(&self) -> Probe {
        match TcpStream::connect(&self.upstream.addr).await {
            Ok(_) => Probe::healthy(format!("connected to {}", self.upstream.addr)),
            Err(err) => Probe::unhealthy(format!("{}: {err}", self.upstream.addr)),
        }
    }
}
