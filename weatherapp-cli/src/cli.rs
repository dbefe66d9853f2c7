use anyhow::Context;
use clap::Parser;
use std::io;
use weatherapp_core::{App, AppContext, Flags, Invocation, Settings};

use crate::{output::Format, prompt::TerminalPrompt};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherapp", version, about = "Weather aggregator for AccuWeather, rp5.ua and sinoptik.ua")]
pub struct Cli {
    /// Provider ("accu", "rp5", "sinoptik") or command ("configurate",
    /// "providers", "clear_cache"). Omit to query every provider.
    pub command: Option<String>,

    /// Arguments for the command, e.g. the provider name for `configurate`.
    pub args: Vec<String>,

    /// Ignore cached pages and download everything again.
    #[arg(long)]
    pub refresh: bool,

    /// Show full error details.
    #[arg(long)]
    pub debug: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Plain)]
    pub formatter: Format,
}

impl Cli {
    pub fn flags(&self) -> Flags {
        Flags { refresh: self.refresh, debug: self.debug }
    }

    pub async fn run(self, settings: Settings) -> anyhow::Result<()> {
        let ctx = AppContext::with_http(settings, self.flags()).context("Failed to set up HTTP client")?;
        let app = App::new(ctx);

        let mut output = self.formatter.output(io::stdout());
        let mut prompt = TerminalPrompt;
        let invocation = Invocation::new(self.command, self.args);

        let summary = app
            .run(&invocation, output.as_mut(), &mut prompt)
            .await
            .with_context(|| match &invocation.name {
                Some(name) => format!("Error during command: {name}"),
                None => "Error while querying providers".to_string(),
            })?;

        if summary.succeeded == 0 && summary.failed > 0 {
            anyhow::bail!("All {} providers failed", summary.failed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_runs_everything() {
        let cli = Cli::try_parse_from(["weatherapp"]).unwrap();

        assert_eq!(cli.command, None);
        assert!(cli.args.is_empty());
        assert_eq!(cli.flags(), Flags::default());
        assert_eq!(cli.formatter, Format::Plain);
    }

    #[test]
    fn command_with_arguments_and_flags() {
        let cli =
            Cli::try_parse_from(["weatherapp", "configurate", "rp5", "--refresh", "--debug", "-vv"]).unwrap();

        assert_eq!(cli.command.as_deref(), Some("configurate"));
        assert_eq!(cli.args, ["rp5"]);
        assert_eq!(cli.flags(), Flags { refresh: true, debug: true });
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn formatter_choice() {
        let cli = Cli::try_parse_from(["weatherapp", "accu", "-f", "csv"]).unwrap();
        assert_eq!(cli.formatter, Format::Csv);

        assert!(Cli::try_parse_from(["weatherapp", "-f", "xml"]).is_err());
    }
}
