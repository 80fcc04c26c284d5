use std::net::IpAddr;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use hickory_proto::rr::Name;

use crate::cli::Cli;
use crate::dns::fqdn;
use crate::ping::PROBE_INTERVAL;
use crate::transport::{QueryType, RunConfig};

/// Parse a DNS server address literal.
///
/// Supports formats:
///   "1.1.1.1"            -- IPv4
///   "2606:4700::1111"    -- bare IPv6
///   "[2606:4700::1111]"  -- bracketed IPv6
///
/// Host names are rejected; the server must be an IP address.
pub fn parse_server(input: &str) -> Result<IpAddr> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Err(anyhow!("empty DNS server address"));
	}

	let literal = trimmed
		.strip_prefix('[')
		.and_then(|rest| rest.strip_suffix(']'))
		.unwrap_or(trimmed);

	literal.parse()
		.map_err(|_| anyhow!("invalid DNS server IP address '{}'", trimmed))
}

/// Check that a domain is a valid DNS name before any probe is sent.
pub fn validate_domain(domain: &str) -> Result<()> {
	let trimmed = domain.trim();
	if trimmed.is_empty() {
		return Err(anyhow!("empty domain name"));
	}
	Name::from_ascii(fqdn(trimmed))
		.map_err(|e| anyhow!("invalid domain name '{}': {}", trimmed, e))?;
	Ok(())
}

impl RunConfig {
	/// Validate command line arguments into a run configuration.
	pub fn from_cli(cli: &Cli) -> Result<RunConfig> {
		let server = parse_server(&cli.server)?;
		validate_domain(&cli.domain)?;

		if cli.count == 0 {
			bail!("count must be at least 1");
		}
		if cli.timeout == 0 {
			bail!("timeout must be greater than 0 ms");
		}

		Ok(RunConfig {
			server,
			port: cli.port,
			domain: cli.domain.trim().to_string(),
			query_type: QueryType::from_selector(&cli.query_type),
			count: cli.count,
			timeout: Duration::from_millis(cli.timeout),
			interval: PROBE_INTERVAL,
			show_features: cli.features,
		})
	}
}
