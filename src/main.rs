mod dataset;
mod history;
mod pmf;
mod report;
mod util;

use crate::{
    dataset::{lengths, Dataset},
    history::Entry,
    pmf::Pmf,
    report::{ReportConfig, Summary, WeekDiff},
    util::{pmf_mean, pmf_var},
};
use clap::{ArgEnum, Parser, Subcommand};
use log::{info, LevelFilter};
use serde::Serialize;
use std::{error::Error, path::PathBuf};

/// empirical pmfs of pregnancy length, with self-checking moments
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Write log records to this file instead of stderr
    #[clap(long)]
    log_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Check the pmf's mean and variance against the direct formulas
    Check {
        /// Dataset file to read, the bundled sample is used otherwise
        #[clap(short = 'f', long)]
        file: Option<PathBuf>,

        /// Which live births to tabulate
        #[clap(short = 's', long, arg_enum, default_value_t = Selection::Live)]
        selection: Selection,

        /// Print the summary as json
        #[clap(long)]
        json: bool,

        /// Don't append this run to the history log
        #[clap(long)]
        no_history: bool,
    },
    /// Compare pregnancy lengths of first babies and others
    Compare {
        /// Dataset file to read, the bundled sample is used otherwise
        #[clap(short = 'f', long)]
        file: Option<PathBuf>,

        /// First week of the difference table
        #[clap(long, default_value_t = 35)]
        from: u32,

        /// Last week of the difference table
        #[clap(long, default_value_t = 45)]
        to: u32,

        /// Decimal places in the tables
        #[clap(short = 'p', long, default_value_t = 4)]
        precision: usize,

        /// Print the comparison as json
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ArgEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
enum Selection {
    Live,
    First,
    Other,
}

impl Selection {
    fn lengths(&self, dataset: &Dataset) -> Vec<u32> {
        match self {
            Selection::Live => lengths(dataset.live()),
            Selection::First => lengths(dataset.firsts()),
            Selection::Other => lengths(dataset.others()),
        }
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

#[derive(Serialize, Debug)]
struct Comparison {
    first: Summary,
    other: Summary,
    diffs: Vec<WeekDiff>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match &args.log_file {
        Some(path) => simple_logging::log_to_file(path, LevelFilter::Info)?,
        None => simple_logging::log_to_stderr(LevelFilter::Warn),
    }

    match args.command {
        Command::Check {
            file,
            selection,
            json,
            no_history,
        } => check(load(file)?, selection, json, no_history),
        Command::Compare {
            file,
            from,
            to,
            precision,
            json,
        } => {
            let config = report_config(from, to, precision)?;
            compare(load(file)?, &config, json)
        }
    }
}

fn report_config(from: u32, to: u32, precision: usize) -> Result<ReportConfig, Box<dyn Error>> {
    if from > to {
        return Err(format!("--from {} is after --to {}", from, to).into());
    }

    Ok(ReportConfig {
        precision,
        weeks: from..=to,
    })
}

fn load(file: Option<PathBuf>) -> Result<Dataset, Box<dyn Error>> {
    let dataset = match file {
        Some(path) => {
            info!("reading dataset from {}", path.display());
            Dataset::from_path(path)?
        }
        None => Dataset::embedded()?,
    };

    info!(
        "dataset {} has {} records",
        dataset.name,
        dataset.records().len()
    );

    Ok(dataset)
}

fn check(
    dataset: Dataset,
    selection: Selection,
    json: bool,
    no_history: bool,
) -> Result<(), Box<dyn Error>> {
    let samples = selection.lengths(&dataset);
    let pmf = Pmf::from_samples(samples.iter().copied()).with_label(selection.label());
    let summary = Summary::new(&pmf, &samples)?;

    let mean = pmf_mean(&pmf)?;
    let var = pmf_var(&pmf)?;
    let passed = summary.mean == mean && summary.variance == var;

    info!(
        "{}: total probability {}, mean {} / {}, variance {} / {}",
        summary.label,
        pmf.total(),
        summary.mean,
        mean,
        summary.variance,
        var
    );

    if !no_history {
        let _ = history::save_results(&Entry {
            dataset: dataset.name.clone(),
            label: summary.label.clone(),
            observations: summary.observations,
            mean: summary.mean,
            variance: summary.variance,
            passed,
        });
    }

    assert_eq!(summary.mean, mean, "pmf mean disagrees with direct formula");
    assert_eq!(
        summary.variance, var,
        "pmf variance disagrees with direct formula"
    );

    println!("All tests passed");

    match json {
        true => println!("{}", serde_json::to_string_pretty(&summary)?),
        false => println!("{}", summary.render(ReportConfig::default().precision)),
    }

    Ok(())
}

fn compare(dataset: Dataset, config: &ReportConfig, json: bool) -> Result<(), Box<dyn Error>> {
    let first_samples = lengths(dataset.firsts());
    let other_samples = lengths(dataset.others());

    let first = Pmf::from_samples(first_samples.iter().copied()).with_label("first");
    let other = Pmf::from_samples(other_samples.iter().copied()).with_label("other");

    let comparison = Comparison {
        first: Summary::new(&first, &first_samples)?,
        other: Summary::new(&other, &other_samples)?,
        diffs: report::week_diffs(&first, &other, config.weeks.clone()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!("{}", comparison.first.render(config.precision));
    println!("{}", comparison.other.render(config.precision));
    println!();
    println!("{}", report::render_pmf_table(&[&first, &other], config));
    println!();
    println!("{}", report::render_diffs(&comparison.diffs, config));

    Ok(())
}
