use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use hickory_proto::rr::RecordType;

/// DNS record type selector for a probe.
///
/// Only A, AAAA, TXT and CNAME are probed. Any other selector falls back
/// to A, see [`QueryType::from_selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
	#[default]
	A,
	AAAA,
	TXT,
	CNAME,
}

impl QueryType {
	/// Map a user-supplied selector to a query type.
	///
	/// Matching is case-insensitive. Unknown or unsupported selectors
	/// (e.g. "MX") resolve to the default, `QueryType::A`; this is never
	/// an error.
	pub fn from_selector(selector: &str) -> QueryType {
		match selector.trim().to_ascii_uppercase().as_str() {
			"A" => QueryType::A,
			"AAAA" => QueryType::AAAA,
			"TXT" => QueryType::TXT,
			"CNAME" => QueryType::CNAME,
			_ => QueryType::default(),
		}
	}

	/// Protocol record type sent in the question section.
	pub fn record_type(self) -> RecordType {
		match self {
			QueryType::A => RecordType::A,
			QueryType::AAAA => RecordType::AAAA,
			QueryType::TXT => RecordType::TXT,
			QueryType::CNAME => RecordType::CNAME,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			QueryType::A => "A",
			QueryType::AAAA => "AAAA",
			QueryType::TXT => "TXT",
			QueryType::CNAME => "CNAME",
		}
	}
}

/// Input for a single probe. Built fresh for every attempt.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
	pub server: IpAddr,
	pub domain: String,
	pub query_type: QueryType,
	pub port: u16,
	pub timeout: Duration,
	pub want_features: bool,
}

impl ProbeRequest {
	pub fn server_addr(&self) -> SocketAddr {
		SocketAddr::new(self.server, self.port)
	}
}

/// Result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
	/// True only when a response arrived with rcode NOERROR
	pub success: bool,
	pub elapsed: Duration,
	/// Byte length of the received message, zero when nothing arrived
	pub response_size: usize,
	/// Response code mnemonic, empty when nothing arrived
	pub rcode: String,
	pub features: Vec<String>,
}

impl ProbeOutcome {
	/// Outcome for an exchange that produced no usable response.
	pub fn no_response(elapsed: Duration) -> Self {
		ProbeOutcome {
			success: false,
			elapsed,
			response_size: 0,
			rcode: String::new(),
			features: Vec::new(),
		}
	}

	/// True when the server replied, whatever the response code.
	pub fn responded(&self) -> bool {
		!self.rcode.is_empty()
	}
}

/// Validated configuration for a full ping run
#[derive(Debug, Clone)]
pub struct RunConfig {
	pub server: IpAddr,
	pub port: u16,
	pub domain: String,
	pub query_type: QueryType,
	pub count: u32,
	pub timeout: Duration,
	pub interval: Duration,
	pub show_features: bool,
}

impl RunConfig {
	/// Build the request for the next probe in this run.
	pub fn request(&self) -> ProbeRequest {
		ProbeRequest {
			server: self.server,
			domain: self.domain.clone(),
			query_type: self.query_type,
			port: self.port,
			timeout: self.timeout,
			want_features: self.show_features,
		}
	}
}
