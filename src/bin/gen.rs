use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use seed_gen::dates;
use seed_gen::error::SeedGenError;
use seed_gen::output;
use seed_gen::profiles;
use seed_gen::profiles::ProfileBatch;
use seed_gen::ratings;
use seed_gen::shard;
use tracing::debug;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
    /// Seed for the random source; omit for a fresh seed per run.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive one plausible "added" date per item, earlier than its earliest
    /// rating.
    AddedDates {
        #[arg(long)]
        ratings: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Generate one fake profile per unique user in the ratings table.
    Users {
        #[arg(long)]
        ratings: PathBuf,
        /// Supplementary JSON mapping whose values are extra user ids.
        #[arg(long)]
        missing_users: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Split a generated profile batch into shard files of at most 1000
    /// entries.
    Split {
        #[arg(long)]
        users: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        /// Shard file name stem; defaults to the input file's stem.
        #[arg(long)]
        stem: Option<String>,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::from(args.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut rng = match args.seed {
        Some(seed) => {
            debug!("seeded random source: {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    match args.command {
        Command::AddedDates { ratings, out } => {
            info!("loading ratings from {:?}", ratings);
            let earliest = ratings::earliest_by_item(output::open_input(&ratings)?)?;
            let dates = dates::generate_added_dates(&earliest, &mut rng)?;
            output::write_json_atomic(&out, &dates)?;
            info!("wrote {} added dates to {:?}", dates.len(), out);
        }
        Command::Users {
            ratings,
            missing_users,
            out,
        } => {
            info!("loading ratings from {:?}", ratings);
            let mut users = ratings::unique_users(output::open_input(&ratings)?)?;
            if let Some(path) = missing_users {
                info!("unioning missing users from {:?}", path);
                ratings::union_missing_users(&mut users, output::open_input(&path)?)?;
            }
            let batch = profiles::generate_batch(&users, &mut rng)?;
            output::write_json_atomic(&out, &batch)?;
            info!("wrote {} profiles to {:?}", batch.len(), out);
        }
        Command::Split {
            users,
            out_dir,
            stem,
        } => {
            info!("loading batch from {:?}", users);
            let batch = ProfileBatch::from_json_reader(output::open_input(&users)?)?;
            let stem = match stem {
                Some(s) => s,
                None => users
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
                    .ok_or_else(|| {
                        SeedGenError::General(format!("can't derive a shard stem from {users:?}"))
                    })?,
            };
            let count = shard::write_shards(&batch, &out_dir, &stem)?;
            info!("wrote {} shard file(s) to {:?}", count, out_dir);
        }
    }

    Ok(())
}
