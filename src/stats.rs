use std::time::Duration;

use crate::transport::ProbeOutcome;

/// Latency summary over successful probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyStats {
	pub min: Duration,
	pub avg: Duration,
	pub max: Duration,
}

/// Aggregate statistics for a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStatistics {
	pub sent: usize,
	pub received: usize,
	/// None when no probe succeeded
	pub latency: Option<LatencyStats>,
}

impl ProbeStatistics {
	/// Percentage of probes without a successful reply, truncated.
	///
	/// Returns None when nothing was sent.
	pub fn loss_percent(&self) -> Option<usize> {
		loss_percent(self.sent, self.received)
	}
}

/// Integer packet loss percentage: 100 * (sent - received) / sent.
pub fn loss_percent(sent: usize, received: usize) -> Option<usize> {
	if sent == 0 {
		return None;
	}
	Some(100 * sent.saturating_sub(received) / sent)
}

/// Compute min, avg and max over a set of latencies.
///
/// Returns None if the slice is empty.
pub fn latency_stats(latencies: &[Duration]) -> Option<LatencyStats> {
	let (&first, rest) = latencies.split_first()?;
	let mut min = first;
	let mut max = first;
	let mut total = first;

	for &latency in rest {
		min = min.min(latency);
		max = max.max(latency);
		total += latency;
	}

	let count = u32::try_from(latencies.len()).unwrap_or(u32::MAX);
	Some(LatencyStats {
		min,
		avg: total / count,
		max,
	})
}

/// Reduce the outcomes of a run to its statistics.
///
/// Every outcome counts as sent; only successful ones count as received
/// and contribute to latency.
pub fn summarize(outcomes: &[ProbeOutcome]) -> ProbeStatistics {
	let latencies: Vec<Duration> = outcomes.iter()
		.filter(|o| o.success)
		.map(|o| o.elapsed)
		.collect();

	ProbeStatistics {
		sent: outcomes.len(),
		received: latencies.len(),
		latency: latency_stats(&latencies),
	}
}
