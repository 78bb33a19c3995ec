use clap::{Parser, ValueEnum};
use repro_harness::{CommitStrategy, HarnessConfig, MAX_BATCH_SIZE};

/// Commit generated items with one or more strategies and report what the live "all items" query saw.
#[derive(Debug, Parser)]
#[command(name = "repro", version, about)]
pub struct Cli {
    /// Items per batch (the page's slider)
    #[arg(short = 'n', long, default_value_t = MAX_BATCH_SIZE as u16, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub count: u16,

    /// Strategy to run; repeat to run several. Defaults to all of them
    #[arg(short, long = "strategy", value_enum)]
    pub strategies: Vec<StrategyArg>,

    /// How many batches to commit with each strategy
    #[arg(short, long, default_value_t = 1)]
    pub rounds: u32,

    /// Seed for labels, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Commit "all items deleted" once the batches are in
    #[arg(long)]
    pub clear: bool,

    /// Print the event log as JSON lines at the end
    #[arg(long)]
    pub dump: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    SingleCommit,
    CommitPerEvent,
    BulkEvent,
}

impl From<StrategyArg> for CommitStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::SingleCommit => CommitStrategy::SingleCommit,
            StrategyArg::CommitPerEvent => CommitStrategy::CommitPerEvent,
            StrategyArg::BulkEvent => CommitStrategy::BulkEvent,
        }
    }
}

impl Cli {
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig {
            batch_size: usize::from(self.count),
            seed: self.seed,
        }
    }

    pub fn strategies(&self) -> Vec<CommitStrategy> {
        if self.strategies.is_empty() {
            CommitStrategy::ALL.to_vec()
        } else {
            self.strategies.iter().copied().map(Into::into).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_run_every_strategy_at_full_batch() {
        let cli = Cli::try_parse_from(["repro"]).expect("cli should parse");
        assert_eq!(cli.config(), HarnessConfig::default());
        assert_eq!(cli.strategies(), CommitStrategy::ALL.to_vec());
        assert_eq!(cli.rounds, 1);
        assert!(!cli.clear && !cli.dump);
    }

    #[test]
    fn strategy_names_match_the_library() {
        let cli = Cli::try_parse_from([
            "repro",
            "--strategy",
            "commit-per-event",
            "-s",
            "bulk-event",
            "-n",
            "250",
            "--seed",
            "9",
        ])
        .expect("cli should parse");

        assert_eq!(
            cli.strategies(),
            vec![CommitStrategy::CommitPerEvent, CommitStrategy::BulkEvent]
        );
        assert_eq!(
            cli.config(),
            HarnessConfig {
                batch_size: 250,
                seed: Some(9)
            }
        );
        for strategy in CommitStrategy::ALL {
            assert!(StrategyArg::from_str(strategy.as_str(), false).is_ok());
        }
    }

    #[test]
    fn count_is_bounded_like_the_slider() {
        assert!(Cli::try_parse_from(["repro", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["repro", "-n", "1001"]).is_err());
        assert!(Cli::try_parse_from(["repro", "-n", "1000"]).is_ok());
    }
}
