use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "rsc", about = "Terminal Slack channel client")]
pub struct Cli {
    /// Workspace identity, used to key the input-history file.
    pub workspace: String,

    /// Channel identifier (e.g. C0123456789).
    pub channel_id: String,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn parses_both_positional_arguments() {
        let cli = Cli::parse_from(["rsc", "acme", "C123"]);

        assert_eq!(cli.workspace, "acme");
        assert_eq!(cli.channel_id, "C123");
    }

    #[test]
    fn rejects_missing_channel_argument() {
        let result = Cli::try_parse_from(["rsc", "acme"]);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_arguments() {
        let result = Cli::try_parse_from(["rsc"]);

        assert!(result.is_err());
    }
}
