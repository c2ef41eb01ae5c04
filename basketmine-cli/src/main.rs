// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Basketmine CLI
//!
//! Mines frequent itemsets and association rules from a JSON file of
//! transactions and answers rule lookups.

mod input;
mod output;

use anyhow::{Context, Result};
use basketmine_core::{BasketConfig, ContextFilter, RuleMetric, SamplingConfig};
use basketmine_mining::{BasketPipeline, MiningOutcome};
use basketmine_query::RuleQuery;
use clap::{Args, Parser, Subcommand};
use input::load_transactions;
use output::{ItemsetReport, RuleReport};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "basketmine")]
#[command(about = "Basketmine - market basket analysis", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Parameter overrides, applied on top of the configuration file and environment
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Minimum support, (0, 1]
    #[arg(long, global = true)]
    min_support: Option<f64>,

    /// Largest itemset size
    #[arg(long, global = true)]
    max_len: Option<usize>,

    /// Primary rule metric (support, confidence, lift, leverage, conviction)
    #[arg(long, global = true)]
    metric: Option<RuleMetric>,

    /// Threshold for the primary metric
    #[arg(long, global = true)]
    min_threshold: Option<f64>,

    /// Secondary confidence filter, [0, 1]
    #[arg(long, global = true)]
    min_confidence: Option<f64>,

    /// Mine a random fraction of the transactions, (0, 1]
    #[arg(long, global = true)]
    sample: Option<f64>,

    /// Seed for --sample
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine frequent itemsets
    Itemsets {
        /// Transactions file (JSON)
        input: PathBuf,

        /// Show at most this many itemsets
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Mine association rules
    Rules {
        /// Transactions file (JSON)
        input: PathBuf,

        /// Only mine transactions with this context attribute (key=value, repeatable)
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,

        /// Show at most this many rules
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rules mentioning any item whose name contains a keyword
    Search {
        /// Transactions file (JSON)
        input: PathBuf,

        /// Case-insensitive keyword; empty matches every rule
        keyword: String,
    },

    /// Rules containing an item
    Item {
        /// Transactions file (JSON)
        input: PathBuf,

        /// Exact item name
        label: String,
    },

    /// Items to suggest to a customer buying an item
    Recommend {
        /// Transactions file (JSON)
        input: PathBuf,

        /// Exact item name
        label: String,

        /// Number of suggestions
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = BasketConfig::load(cli.config.clone()).context("Failed to load configuration")?;
    let config = apply_overrides(config, &cli.overrides)?;
    info!(
        min_support = config.mining.min_support,
        max_len = ?config.mining.max_len,
        metric = %config.rules.metric,
        min_threshold = config.rules.min_threshold,
        min_confidence = ?config.rules.min_confidence,
        "Using parameters"
    );
    let pipeline = BasketPipeline::new(config);

    let rendered = match cli.command {
        Commands::Itemsets { input, limit } => {
            let transactions = load_transactions(&input)?;
            let itemsets = pipeline.mine(&transactions).context("Mining failed")?;
            let report = ItemsetReport::new(&itemsets, limit);
            if cli.json {
                output::to_json(&report)?
            } else {
                report.to_string()
            }
        }

        Commands::Rules {
            input,
            context,
            limit,
        } => {
            let transactions = load_transactions(&input)?;
            let filter = parse_context(&context)?;
            let outcome = if filter.is_empty() {
                pipeline.run(&transactions)
            } else {
                pipeline.run_with_context(&transactions, &filter)
            }
            .context("Mining failed")?;
            let report = RuleReport::new(&outcome.rules, &outcome.rules, limit);
            render(&report, cli.json)?
        }

        Commands::Search { input, keyword } => {
            let outcome = mine_rules(&pipeline, &input)?;
            let query = RuleQuery::new(&outcome.rules);
            let report = RuleReport::new(query.search(&keyword), &outcome.rules, None);
            render(&report, cli.json)?
        }

        Commands::Item { input, label } => {
            let outcome = mine_rules(&pipeline, &input)?;
            let query = RuleQuery::new(&outcome.rules);
            let report = RuleReport::new(query.rules_for_item(&label), &outcome.rules, None);
            render(&report, cli.json)?
        }

        Commands::Recommend {
            input,
            label,
            limit,
        } => {
            let outcome = mine_rules(&pipeline, &input)?;
            let query = RuleQuery::new(&outcome.rules);
            let report = RuleReport::new(query.recommend(&label, limit), &outcome.rules, None);
            render(&report, cli.json)?
        }
    };

    print!("{}", rendered);
    if cli.json {
        println!();
    }
    Ok(())
}

fn mine_rules(pipeline: &BasketPipeline, input: &Path) -> Result<MiningOutcome> {
    let transactions = load_transactions(input)?;
    pipeline.run(&transactions).context("Mining failed")
}

fn render(report: &RuleReport, json: bool) -> Result<String> {
    if json {
        output::to_json(report)
    } else {
        Ok(report.to_string())
    }
}

fn apply_overrides(mut config: BasketConfig, overrides: &Overrides) -> Result<BasketConfig> {
    if let Some(min_support) = overrides.min_support {
        config.mining.min_support = min_support;
    }
    if let Some(max_len) = overrides.max_len {
        config.mining.max_len = Some(max_len);
    }
    if let Some(metric) = overrides.metric {
        config.rules.metric = metric;
    }
    if let Some(min_threshold) = overrides.min_threshold {
        config.rules.min_threshold = min_threshold;
    }
    if let Some(min_confidence) = overrides.min_confidence {
        config.rules.min_confidence = Some(min_confidence);
    }
    if let Some(fraction) = overrides.sample {
        let seed = config.sampling.map(|s| s.seed);
        let mut sampling = SamplingConfig::new(fraction);
        if let Some(seed) = overrides.seed.or(seed) {
            sampling.seed = seed;
        }
        config.sampling = Some(sampling);
    } else if let (Some(seed), Some(sampling)) = (overrides.seed, config.sampling.as_mut()) {
        sampling.seed = seed;
    }

    config.validate().context("Invalid parameters")?;
    Ok(config)
}

fn parse_context(pairs: &[String]) -> Result<ContextFilter> {
    pairs.iter().try_fold(ContextFilter::new(), |filter, pair| {
        let (key, value) = ContextFilter::parse_pair(pair)?;
        Ok(filter.with(key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use basketmine_core::MiningParams;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "basketmine",
            "--json",
            "rules",
            "baskets.json",
            "--context",
            "season=winter",
            "--metric",
            "confidence",
            "--min-support",
            "0.1",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.overrides.metric, Some(RuleMetric::Confidence));
        assert_eq!(cli.overrides.min_support, Some(0.1));
        match cli.command {
            Commands::Rules { context, .. } => assert_eq!(context, vec!["season=winter"]),
            _ => panic!("expected rules command"),
        }

        let bad_metric = Cli::try_parse_from(["basketmine", "--metric", "magic", "rules", "x.json"]);
        assert!(bad_metric.is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let overrides = Overrides {
            min_support: Some(0.3),
            max_len: Some(3),
            min_confidence: Some(0.9),
            sample: Some(0.5),
            seed: Some(7),
            ..Default::default()
        };
        let config = apply_overrides(BasketConfig::default(), &overrides).unwrap();
        assert_eq!(config.mining, MiningParams::new(0.3).with_max_len(3));
        assert_eq!(config.rules.min_confidence, Some(0.9));
        assert_eq!(config.rules.metric, RuleMetric::Lift);
        let sampling = config.sampling.unwrap();
        assert_eq!((sampling.fraction, sampling.seed), (0.5, 7));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = Overrides {
            min_support: Some(0.0),
            ..Default::default()
        };
        assert!(apply_overrides(BasketConfig::default(), &overrides).is_err());
    }

    #[test]
    fn test_parse_context() {
        let pairs = ["store = club".to_string(), "season=winter".to_string()];
        let filter = parse_context(&pairs).unwrap();
        assert_eq!(filter, ContextFilter::new().with("store", "club").with("season", "winter"));
        assert!(parse_context(&["store".to_string()]).is_err());
    }
}
