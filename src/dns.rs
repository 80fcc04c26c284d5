use hickory_proto::op::{Edns, Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::Name;
use hickory_proto::ProtoError;
use thiserror::Error;

use crate::transport::QueryType;

/// UDP payload size advertised in the EDNS0 OPT record of every probe
pub const EDNS_UDP_PAYLOAD: u16 = 4096;

/// Errors raised while building a query or reading its response.
///
/// These never escape a probe; they are folded into a failed outcome.
#[derive(Debug, Error)]
pub enum ProbeError {
	#[error("invalid domain name '{domain}': {source}")]
	InvalidName {
		domain: String,
		#[source]
		source: ProtoError,
	},
	#[error("failed to serialize DNS query: {0}")]
	Encode(#[source] ProtoError),
	#[error("failed to parse DNS response: {0}")]
	Decode(#[source] ProtoError),
	#[error("txid mismatch: expected {expected}, got {actual}")]
	TxidMismatch { expected: u16, actual: u16 },
	#[error("received a query instead of a response")]
	NotAResponse,
	#[error("network error: {0}")]
	Io(#[from] std::io::Error),
}

/// DNS response information extracted from a parsed message
#[derive(Debug)]
pub struct DnsResponse {
	pub rcode: ResponseCode,
	pub rcode_str: String,
	/// Length of the message as received on the wire
	pub size: usize,
	pub message: Message,
}

/// Normalize a domain to fully-qualified form by appending the root label.
pub fn fqdn(domain: &str) -> String {
	if domain.ends_with('.') {
		domain.to_string()
	} else {
		format!("{}.", domain)
	}
}

/// Build a DNS query message for the given domain and query type.
///
/// Every query carries an EDNS0 OPT record advertising a 4096-byte UDP
/// payload with the DO (DNSSEC OK) bit set, and asks for recursion.
/// Returns the serialized query bytes ready to send over UDP.
pub fn build_query(
	domain: &str,
	query_type: QueryType,
	txid: u16,
) -> Result<Vec<u8>, ProbeError> {
	let name = Name::from_ascii(fqdn(domain))
		.map_err(|source| ProbeError::InvalidName {
			domain: domain.to_string(),
			source,
		})?;

	let mut message = Message::new();
	message.set_id(txid);
	message.set_message_type(MessageType::Query);
	message.set_recursion_desired(true);
	message.add_query(Query::query(name, query_type.record_type()));

	let edns = message.extensions_mut().get_or_insert_with(Edns::new);
	edns.set_max_payload(EDNS_UDP_PAYLOAD);
	edns.set_dnssec_ok(true);

	message.to_vec().map_err(ProbeError::Encode)
}

/// Parse a DNS response, validating the transaction ID and extracting the rcode.
pub fn parse_response(bytes: &[u8], expected_txid: u16) -> Result<DnsResponse, ProbeError> {
	let message = Message::from_vec(bytes).map_err(ProbeError::Decode)?;

	if message.id() != expected_txid {
		return Err(ProbeError::TxidMismatch {
			expected: expected_txid,
			actual: message.id(),
		});
	}

	if message.message_type() != MessageType::Response {
		return Err(ProbeError::NotAResponse);
	}

	let rcode = message.response_code();
	Ok(DnsResponse {
		rcode,
		rcode_str: rcode_name(rcode),
		size: bytes.len(),
		message,
	})
}

/// Conventional mnemonic for a response code ("NOERROR", "NXDOMAIN", ...).
///
/// Codes without a common mnemonic render as "RCODE<n>".
pub fn rcode_name(rcode: ResponseCode) -> String {
	let name = match rcode {
		ResponseCode::NoError => "NOERROR",
		ResponseCode::FormErr => "FORMERR",
		ResponseCode::ServFail => "SERVFAIL",
		ResponseCode::NXDomain => "NXDOMAIN",
		ResponseCode::NotImp => "NOTIMP",
		ResponseCode::Refused => "REFUSED",
		ResponseCode::YXDomain => "YXDOMAIN",
		ResponseCode::YXRRSet => "YXRRSET",
		ResponseCode::NXRRSet => "NXRRSET",
		ResponseCode::NotAuth => "NOTAUTH",
		ResponseCode::NotZone => "NOTZONE",
		other => return format!("RCODE{}", u16::from(other)),
	};
	name.to_string()
}

/// List the server capabilities advertised in a response.
///
/// Order is fixed: EDNS0 (with its UDP buffer size), DNSSEC OK (AD flag),
/// recursion available, authoritative answer. Absent indicators add nothing.
pub fn detect_features(message: &Message) -> Vec<String> {
	let mut features = Vec::new();

	if let Some(edns) = message.extensions() {
		features.push("EDNS0".to_string());
		features.push(format!("EDNS0 UDP Buffer Size: {}", edns.max_payload()));
	}

	let header = message.header();
	if header.authentic_data() {
		features.push("DNSSEC OK".to_string());
	}
	if header.recursion_available() {
		features.push("Recursion Available".to_string());
	}
	if header.authoritative() {
		features.push("Authoritative Answer".to_string());
	}

	features
}
