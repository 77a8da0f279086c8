use clap::Parser;

/// Cadence - what your queue server is playing, with synced lyrics 🎵
#[derive(Parser, Debug, Default)]
#[command(name = "cadence", version, about)]
pub struct Args {
    /// Queue to follow (overrides `queue_id` in config.toml)
    pub queue_id: Option<String>,

    /// WebSocket endpoint of the queue server
    #[arg(long, short = 's')]
    pub server: Option<String>,

    /// Milliseconds subtracted from each server progress report
    #[arg(long)]
    pub latency_buffer: Option<u64>,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_positional_and_flags() {
        let args = Args::parse_from(["cadence", "q42", "--server", "ws://h:1/ws", "--latency-buffer", "100"]);
        assert_eq!(args.queue_id.as_deref(), Some("q42"));
        assert_eq!(args.server.as_deref(), Some("ws://h:1/ws"));
        assert_eq!(args.latency_buffer, Some(100));
        assert!(!args.generate_config);
    }
}
