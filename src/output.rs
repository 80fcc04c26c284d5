use std::net::IpAddr;

use anyhow::Result;
use colored::Colorize;

use crate::stats::ProbeStatistics;
use crate::transport::{ProbeOutcome, RunConfig};

/// Renders run progress and the final report to stdout.
///
/// Whether ANSI colors are emitted is decided once, at construction.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
	color: bool,
}

impl Printer {
	pub fn new(color: bool) -> Self {
		Printer { color }
	}

	fn green(&self, text: &str) -> String {
		if self.color {
			text.green().to_string()
		} else {
			text.to_string()
		}
	}

	fn red(&self, text: &str) -> String {
		if self.color {
			text.red().to_string()
		} else {
			text.to_string()
		}
	}

	/// Status line for one probe.
	pub fn format_outcome(&self, server: IpAddr, outcome: &ProbeOutcome) -> String {
		if outcome.success {
			format!(
				"{}: time={:?} size={} bytes",
				self.green(&format!("Reply from {}", server)),
				outcome.elapsed,
				outcome.response_size,
			)
		} else if outcome.responded() {
			format!(
				"{} (rcode: {})",
				self.red(&format!("Error reply from {}", server)),
				outcome.rcode,
			)
		} else {
			self.red(&format!("Timeout from {}", server))
		}
	}

	/// Lines of the end-of-run statistics block.
	pub fn format_statistics(&self, server: IpAddr, stats: &ProbeStatistics) -> Vec<String> {
		let mut lines = vec![format!("--- {} dnsping statistics ---", server)];

		if let Some(loss) = stats.loss_percent() {
			lines.push(format!(
				"{} packets transmitted, {} received, {}% packet loss",
				stats.sent, stats.received, loss,
			));
		}

		if let Some(latency) = stats.latency {
			lines.push(format!(
				"rtt min/avg/max = {:?}/{:?}/{:?}",
				latency.min, latency.avg, latency.max,
			));
		}
		lines
	}

	pub fn print_banner(&self, config: &RunConfig) {
		println!(
			"Pinging DNS server {} for domain {} with type {}:\n",
			config.server, config.domain, config.query_type.as_str(),
		);
	}

	pub fn print_outcome(&self, server: IpAddr, outcome: &ProbeOutcome) {
		println!("{}", self.format_outcome(server, outcome));
	}

	pub fn print_features(&self, features: &[String]) {
		println!("\nFeatures detected: [{}]", features.join(", "));
	}

	pub fn print_statistics(&self, server: IpAddr, stats: &ProbeStatistics) {
		println!();
		for line in self.format_statistics(server, stats) {
			println!("{}", line);
		}
	}
}

/// Features reported by the first probe that observed any.
pub fn first_features(outcomes: &[ProbeOutcome]) -> Option<&[String]> {
	outcomes.iter()
		.map(|o| o.features.as_slice())
		.find(|f| !f.is_empty())
}

/// Write per-probe results to a CSV file.
pub fn write_csv(path: &str, outcomes: &[ProbeOutcome]) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)?;
	write_records(&mut writer, outcomes)?;
	println!("\nResults written to: {}", path);
	Ok(())
}

fn write_records<W: std::io::Write>(
	writer: &mut csv::Writer<W>,
	outcomes: &[ProbeOutcome],
) -> Result<()> {
	writer.write_record(["seq", "success", "time_ms", "size_bytes", "rcode", "features"])?;

	for (i, o) in outcomes.iter().enumerate() {
		writer.write_record([
			(i + 1).to_string(),
			o.success.to_string(),
			format!("{:.3}", o.elapsed.as_secs_f64() * 1000.0),
			o.response_size.to_string(),
			o.rcode.clone(),
			o.features.join(";"),
		])?;
	}

	writer.flush()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	use crate::stats::summarize;

	fn server() -> IpAddr {
		"8.8.8.8".parse().unwrap()
	}

	fn reply(ms: u64, features: &[&str]) -> ProbeOutcome {
		ProbeOutcome {
			success: true,
			elapsed: Duration::from_millis(ms),
			response_size: 56,
			rcode: "NOERROR".to_string(),
			features: features.iter().map(|f| f.to_string()).collect(),
		}
	}

	#[test]
	fn test_reply_line() {
		let line = Printer::new(false).format_outcome(server(), &reply(12, &[]));
		assert_eq!(line, "Reply from 8.8.8.8: time=12ms size=56 bytes");
	}

	#[test]
	fn test_timeout_line() {
		let outcome = ProbeOutcome::no_response(Duration::from_secs(2));
		let line = Printer::new(false).format_outcome(server(), &outcome);
		assert_eq!(line, "Timeout from 8.8.8.8");
	}

	#[test]
	fn test_negative_answer_line() {
		let outcome = ProbeOutcome {
			success: false,
			elapsed: Duration::from_millis(4),
			response_size: 40,
			rcode: "NXDOMAIN".to_string(),
			features: Vec::new(),
		};
		let line = Printer::new(false).format_outcome(server(), &outcome);
		assert_eq!(line, "Error reply from 8.8.8.8 (rcode: NXDOMAIN)");
	}

	#[test]
	fn test_colored_line_keeps_text() {
		let line = Printer::new(true).format_outcome(server(), &reply(12, &[]));
		assert!(line.contains("Reply from 8.8.8.8"));
		assert!(line.ends_with("time=12ms size=56 bytes"));
	}

	#[test]
	fn test_statistics_block() {
		let outcomes = vec![
			reply(10, &[]),
			ProbeOutcome::no_response(Duration::from_secs(2)),
			reply(30, &[]),
		];
		let lines = Printer::new(false).format_statistics(server(), &summarize(&outcomes));
		assert_eq!(lines, vec![
			"--- 8.8.8.8 dnsping statistics ---".to_string(),
			"3 packets transmitted, 2 received, 33% packet loss".to_string(),
			"rtt min/avg/max = 10ms/20ms/30ms".to_string(),
		]);
	}

	#[test]
	fn test_statistics_without_replies_omit_rtt() {
		let outcomes = vec![ProbeOutcome::no_response(Duration::from_secs(2))];
		let lines = Printer::new(false).format_statistics(server(), &summarize(&outcomes));
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[1], "1 packets transmitted, 0 received, 100% packet loss");
	}

	#[test]
	fn test_first_features() {
		let outcomes = vec![
			ProbeOutcome::no_response(Duration::from_secs(2)),
			reply(10, &["EDNS0", "EDNS0 UDP Buffer Size: 1232"]),
			reply(11, &["Recursion Available"]),
		];
		let features = first_features(&outcomes).unwrap();
		assert_eq!(features, ["EDNS0", "EDNS0 UDP Buffer Size: 1232"]);

		assert!(first_features(&outcomes[..1]).is_none());
	}

	#[test]
	fn test_csv_records() {
		let outcomes = vec![
			reply(10, &["EDNS0", "Recursion Available"]),
			ProbeOutcome::no_response(Duration::from_millis(2000)),
		];
		let mut writer = csv::Writer::from_writer(Vec::new());
		write_records(&mut writer, &outcomes).unwrap();
		let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();

		let lines: Vec<&str> = data.lines().collect();
		assert_eq!(lines[0], "seq,success,time_ms,size_bytes,rcode,features");
		assert_eq!(lines[1], "1,true,10.000,56,NOERROR,EDNS0;Recursion Available");
		assert_eq!(lines[2], "2,false,2000.000,0,,");
	}
}
