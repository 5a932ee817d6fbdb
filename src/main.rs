//! `card-charges` binary: generates datasets and times each aggregation strategy.

use std::{
    error::Error,
    path::PathBuf,
    time::{Duration, Instant},
};

use card_charges::{
    aggregate, aggregate_builtin, aggregate_partitioned, charge::pairs, charge_file,
    generator::{generate_card_numbers, generate_charges},
    logger::initialize_logger,
    Charge, HarnessConfig, SummaryRecord,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use mimalloc::MiMalloc;
use rand::{rngs::StdRng, SeedableRng};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(
    name = "card-charges",
    about = "Aggregate synthetic card charges with a built-in map and an open-addressing table"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate datasets and time every aggregation strategy.
    Run(RunArgs),
    /// Write a synthetic charge file.
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long, value_delimiter = ',', help = "Card numbers per dataset")]
    sizes: Vec<usize>,
    #[arg(long, help = "Charges drawn per dataset")]
    charges: Option<usize>,
    #[arg(long, help = "Deterministic generator seed")]
    seed: Option<u64>,
    #[arg(long, help = "Aggregate this charge file instead of generating data")]
    input: Option<PathBuf>,
    #[arg(long, help = "Also time the partitioned strategy (THREADS partitions)")]
    partitioned: bool,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(long, default_value_t = 10_000, help = "Distinct card numbers")]
    cards: usize,
    #[arg(long, default_value_t = 1_000_000, help = "Charges to write")]
    charges: usize,
    #[arg(long, help = "Deterministic generator seed")]
    seed: Option<u64>,
    #[arg(long, help = "Output path")]
    output: PathBuf,
}

struct Timing {
    label: String,
    builtin: Duration,
    table: Duration,
    partitioned: Option<Duration>,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

fn print_summary(heading: &str, summary: &SummaryRecord<&str>, elapsed: Duration) {
    println!("{heading}:");
    println!("{summary}");
    println!(
        "Execution time ({heading}): {:.2} seconds\n",
        elapsed.as_secs_f64()
    );
}

fn run_dataset(
    label: String,
    charges: &[Charge],
    config: &HarnessConfig,
    partitioned: bool,
) -> Result<Timing, Box<dyn Error>> {
    let (builtin, builtin_time) = timed(|| aggregate_builtin(pairs(charges)));
    let builtin = builtin?;
    let (table, table_time) = timed(|| aggregate(pairs(charges)));
    let table = table?;

    #[cfg(feature = "assert_result")]
    assert!(
        table.same_metrics(&builtin),
        "strategies disagree: {table:?} vs {builtin:?}"
    );

    println!("Statistics for {label}:");
    print_summary("Without Hash Table", &builtin, builtin_time);
    print_summary("With Hash Table", &table, table_time);

    let partitioned_time = if partitioned {
        let (summary, elapsed) = timed(|| aggregate_partitioned(charges, config.threads));
        print_summary(
            &format!("Partitioned Hash Table, {} partitions", config.threads),
            &summary?,
            elapsed,
        );
        Some(elapsed)
    } else {
        None
    };

    Ok(Timing {
        label,
        builtin: builtin_time,
        table: table_time,
        partitioned: partitioned_time,
    })
}

fn print_timings(timings: &[Timing]) {
    println!("{:>16} {:>12} {:>12} {:>12}", "dataset", "builtin (s)", "table (s)", "partitioned");
    for timing in timings {
        let partitioned = timing
            .partitioned
            .map_or_else(|| "-".to_string(), |elapsed| format!("{:.3}", elapsed.as_secs_f64()));
        println!(
            "{:>16} {:>12.3} {:>12.3} {:>12}",
            timing.label,
            timing.builtin.as_secs_f64(),
            timing.table.as_secs_f64(),
            partitioned
        );
    }
}

fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let mut config = HarnessConfig::default();
    if !args.sizes.is_empty() {
        config.sizes = args.sizes;
    }
    config.charges = args.charges.unwrap_or(config.charges);
    config.seed = args.seed.or(config.seed);

    let mut timings = Vec::new();
    if let Some(input) = args.input {
        info!("reading charges from {}", input.display());
        let charges = charge_file::read_charges(&input)?;
        let label = format!("{} charges", charges.len());
        timings.push(run_dataset(label, &charges, &config, args.partitioned)?);
    } else {
        let mut rng = rng_for(config.seed);
        for &size in &config.sizes {
            info!("generating {} card numbers and {} charges", size, config.charges);
            let cards = generate_card_numbers(&mut rng, size);
            let charges = generate_charges(&mut rng, config.charges, &cards);
            timings.push(run_dataset(size.to_string(), &charges, &config, args.partitioned)?);
        }
    }

    print_timings(&timings);
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = rng_for(args.seed);
    let cards = generate_card_numbers(&mut rng, args.cards);
    let charges = generate_charges(&mut rng, args.charges, &cards);
    charge_file::write_charges(&args.output, &charges)?;
    info!("wrote {} charges to {}", charges.len(), args.output.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();
    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::Generate(args) => generate(args),
    }
}
