use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Tether agent - persistent remote-control channel for this device")]
#[command(version)]
pub struct Cli {
    /// Controller WebSocket URL, e.g. ws://controller.local:9000/ws
    pub url: String,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Report this device identifier instead of the hostname
    #[arg(long, value_name = "NAME")]
    pub device_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_url_argument() {
        let cli = Cli::try_parse_from(["tether", "ws://10.0.0.1:9000/ws"]).unwrap();
        assert_eq!(cli.url, "ws://10.0.0.1:9000/ws");
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.device_id, None);
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::try_parse_from(["tether", "-vv", "ws://h/ws"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["tether", "--verbose", "ws://h/ws"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn parse_device_id_override() {
        let cli =
            Cli::try_parse_from(["tether", "ws://h/ws", "--device-id", "kiosk-7"]).unwrap();
        assert_eq!(cli.device_id.as_deref(), Some("kiosk-7"));
    }

    #[test]
    fn missing_url_fails() {
        assert!(Cli::try_parse_from(["tether"]).is_err());
    }
}
