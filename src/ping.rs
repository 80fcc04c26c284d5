use std::net::SocketAddr;
use std::time::{Duration, Instant};

use hickory_proto::op::ResponseCode;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::dns::{
	build_query, detect_features, parse_response, DnsResponse, ProbeError, EDNS_UDP_PAYLOAD,
};
use crate::transport::{ProbeOutcome, ProbeRequest, RunConfig};

/// Delay between consecutive probes of a run
pub const PROBE_INTERVAL: Duration = Duration::from_secs(1);

/// Send one query and wait for the matching response.
///
/// Uses a dedicated connected socket so stray datagrams from other hosts are
/// dropped by the kernel and ICMP port-unreachable surfaces as an error.
/// Datagrams carrying another transaction ID are skipped; the query is never
/// resent.
async fn exchange(
	server: SocketAddr,
	query_bytes: &[u8],
	txid: u16,
) -> Result<DnsResponse, ProbeError> {
	let bind_addr = if server.is_ipv4() {
		"0.0.0.0:0"
	} else {
		"[::]:0"
	};
	let socket = UdpSocket::bind(bind_addr).await?;
	socket.connect(server).await?;
	socket.send(query_bytes).await?;

	let mut buf = vec![0u8; EDNS_UDP_PAYLOAD as usize];
	loop {
		let len = socket.recv(&mut buf).await?;
		match parse_response(&buf[..len], txid) {
			Err(ProbeError::TxidMismatch { expected, actual }) => {
				debug!(%server, expected, actual, "ignoring response for another query");
			}
			result => return result,
		}
	}
}

/// Probe a DNS server once.
///
/// Never fails: timeouts, network errors and malformed replies all come back
/// as an outcome with `success == false` and no response code. A reply with
/// any rcode other than NOERROR is also a failure, but keeps its rcode.
pub async fn probe(request: &ProbeRequest) -> ProbeOutcome {
	let server = request.server_addr();
	let txid: u16 = rand::random();
	let start = Instant::now();

	let query_bytes = match build_query(&request.domain, request.query_type, txid) {
		Ok(bytes) => bytes,
		Err(e) => {
			debug!(%server, error = %e, "could not build query");
			return ProbeOutcome::no_response(start.elapsed());
		}
	};

	let result = tokio::time::timeout(request.timeout, exchange(server, &query_bytes, txid)).await;
	let elapsed = start.elapsed();

	let response = match result {
		Ok(Ok(response)) => response,
		Ok(Err(e)) => {
			debug!(%server, error = %e, ?elapsed, "probe failed");
			return ProbeOutcome::no_response(elapsed);
		}
		Err(_) => {
			debug!(%server, timeout = ?request.timeout, "probe timed out");
			return ProbeOutcome::no_response(elapsed);
		}
	};

	let features = if request.want_features {
		detect_features(&response.message)
	} else {
		Vec::new()
	};

	debug!(
		%server,
		rcode = %response.rcode_str,
		size = response.size,
		?elapsed,
		"received response"
	);

	ProbeOutcome {
		success: response.rcode == ResponseCode::NoError,
		elapsed,
		response_size: response.size,
		rcode: response.rcode_str,
		features,
	}
}

/// Run `config.count` probes one after another.
///
/// `on_outcome` sees each outcome (with its 1-based sequence number) as soon
/// as it is available. Returns every outcome in the order probes were sent.
pub async fn run_pings<F>(config: &RunConfig, mut on_outcome: F) -> Vec<ProbeOutcome>
where
	F: FnMut(u32, &ProbeOutcome),
{
	let mut outcomes = Vec::with_capacity(config.count as usize);

	for seq in 1..=config.count {
		let outcome = probe(&config.request()).await;
		on_outcome(seq, &outcome);
		outcomes.push(outcome);

		if seq < config.count {
			tokio::time::sleep(config.interval).await;
		}
	}

	outcomes
}
