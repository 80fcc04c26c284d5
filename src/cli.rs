use clap::Parser;

/// Ping a DNS server by sending queries and timing the replies
#[derive(Parser, Debug)]
#[command(name = "dnsping")]
#[command(version)]
#[command(about = "Measure DNS server reachability and latency over UDP")]
pub struct Cli {
	/// DNS server IP address (e.g. 1.1.1.1, 2606:4700::1111 or [::1])
	pub server: String,

	/// Number of DNS pings to send
	#[arg(short = 'c', long = "count", default_value = "5")]
	pub count: u32,

	/// Timeout per DNS query in milliseconds
	#[arg(short = 't', long = "timeout", default_value = "2000")]
	pub timeout: u64,

	/// DNS query type (A, AAAA, TXT, CNAME); anything else queries A
	#[arg(short = 'q', long = "type", default_value = "A")]
	pub query_type: String,

	/// Domain name to query
	#[arg(short = 'd', long = "domain", default_value = "example.com")]
	pub domain: String,

	/// DNS server port
	#[arg(short = 'p', long = "port", default_value = "53")]
	pub port: u16,

	/// Show EDNS/DNSSEC/recursion/authoritative feature support
	#[arg(long = "features")]
	pub features: bool,

	/// Disable colored output
	#[arg(long = "nocolor")]
	pub nocolor: bool,

	/// Write per-probe results to a CSV file
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,

	/// Log probe diagnostics to stderr
	#[arg(short = 'v', long = "verbose")]
	pub verbose: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let cli = Cli::try_parse_from(["dnsping", "1.1.1.1"]).unwrap();
		assert_eq!(cli.server, "1.1.1.1");
		assert_eq!(cli.count, 5);
		assert_eq!(cli.timeout, 2000);
		assert_eq!(cli.query_type, "A");
		assert_eq!(cli.domain, "example.com");
		assert_eq!(cli.port, 53);
		assert!(!cli.features);
		assert!(!cli.nocolor);
		assert!(cli.output.is_none());
	}

	#[test]
	fn test_all_flags() {
		let cli = Cli::try_parse_from([
			"dnsping", "--count", "3", "--timeout", "500", "--type", "TXT",
			"--domain", "example.org", "--port", "5353", "--features",
			"--nocolor", "-o", "out.csv", "::1",
		])
		.unwrap();
		assert_eq!(cli.server, "::1");
		assert_eq!(cli.count, 3);
		assert_eq!(cli.timeout, 500);
		assert_eq!(cli.query_type, "TXT");
		assert_eq!(cli.domain, "example.org");
		assert_eq!(cli.port, 5353);
		assert!(cli.features);
		assert!(cli.nocolor);
		assert_eq!(cli.output.as_deref(), Some("out.csv"));
	}

	#[test]
	fn test_server_required() {
		assert!(Cli::try_parse_from(["dnsping"]).is_err());
	}
}
