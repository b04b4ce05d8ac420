//! SimCache console
//!
//! Command-line front end over a roster file. Each invocation builds the
//! cache, runs one command and prints the result.
//!
//! ```text
//! simcache --roster roster.yaml refresh --force
//! simcache --roster roster.yaml search bella#goth
//! simcache --roster roster.yaml search 0x1f
//! simcache --roster roster.yaml kinds VAMPIRE GHOST
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simcache::adapters::RosterFileSource;
use simcache::cache::{CacheConfig, EntityId, IdNameMap, MatchTier, MemoryMode, SimCache};
use simcache::error::{Error, Result};
use simcache::NameMatches;

// =============================================================================
// CLI Arguments
// =============================================================================

/// SimCache - multi-index entity cache console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Roster file (JSON or YAML) standing in for the host world
    #[arg(long, env = "SIMCACHE_ROSTER", default_value = "roster.yaml")]
    roster: PathBuf,

    /// Rebuild the cache for every query and free it afterwards
    #[arg(long, env = "SIMCACHE_EPHEMERAL")]
    ephemeral: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the cache
    Refresh {
        /// Clear everything before rebuilding
        #[arg(long)]
        force: bool,
    },
    /// Print every cached record and index
    Dump {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search by `first#last` name, or by decimal / 0x-hex id
    Search { query: String },
    /// Look up ids
    Ids {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Print a placeholder for ids that are not cached
        #[arg(long)]
        include_missing: bool,
    },
    /// Entities of any of the given kinds
    Kinds {
        #[arg(required = true)]
        kinds: Vec<String>,
    },
    /// Entities in any of the given age brackets
    Ages {
        #[arg(required = true)]
        ages: Vec<String>,
    },
    /// Entities of one gender
    Gender(GenderArgs),
    /// Cache statistics
    Stats,
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
struct GenderArgs {
    #[arg(long)]
    female: bool,
    #[arg(long)]
    male: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting SimCache {}", simcache::VERSION);
    info!("  Roster: {}", args.roster.display());

    let config = CacheConfig {
        memory_mode: if args.ephemeral {
            MemoryMode::Ephemeral
        } else {
            MemoryMode::Resident
        },
        ..Default::default()
    };
    info!("  Memory mode: {}", config.memory_mode);

    let cache = SimCache::with_config(config, RosterFileSource::new(&args.roster));
    if needs_warm_cache(&cache, &args.command) {
        cache.refresh(false)?;
    }

    run(&cache, args.command).map_err(|e| {
        error!("Command failed: {}", e);
        e
    })
}

fn run(cache: &SimCache<RosterFileSource>, command: Command) -> Result<()> {
    match command {
        Command::Refresh { force } => {
            if force {
                println!("Purging cache ...");
            }
            let report = cache.refresh(force)?;
            if report.skipped_ready {
                println!("Cache is already up to date");
            } else {
                println!("Cache has been rebuilt: {}", serde_json::to_string(&report)?);
            }
        }
        Command::Dump { json } => {
            println!("Dumping cache ...");
            let dump = cache.dump()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                for record in &dump.records {
                    println!("{:?}", record);
                }
                for (age, index) in &dump.ages {
                    print_map(&format!("age {}", age), index);
                }
            }
        }
        Command::Search { query } => search(cache, &query)?,
        Command::Ids {
            ids,
            include_missing,
        } => {
            let ids = ids
                .iter()
                .map(|s| parse_id(s))
                .collect::<Result<Vec<_>>>()?;
            print_map("Found", &cache.by_ids(&ids, include_missing)?);
        }
        Command::Kinds { kinds } => print_map("Found", &cache.by_kinds(&kinds)?),
        Command::Ages { ages } => print_map("Found", &cache.by_age_brackets(&ages)?),
        Command::Gender(GenderArgs { female, .. }) => {
            print_map("Found", &cache.by_gender(female)?)
        }
        Command::Stats => println!("{}", serde_json::to_string_pretty(&cache.stats())?),
    }
    Ok(())
}

/// Resident caches are filled up front, except when the command refreshes
/// them itself.
fn needs_warm_cache(cache: &SimCache<RosterFileSource>, command: &Command) -> bool {
    cache.memory_mode() == MemoryMode::Resident && !matches!(command, Command::Refresh { .. })
}

/// Names are searched tier by tier; anything without a separator must be an id.
fn search(cache: &SimCache<RosterFileSource>, query: &str) -> Result<()> {
    println!("Searching '{}'", query);
    if !query.contains(simcache::cache::NAME_SEPARATOR) {
        let id = parse_id(query)?;
        print_map("Found", &cache.by_ids(&[id], false)?);
        return Ok(());
    }

    let matches: NameMatches = cache.search_detailed(query)?;
    for tier in MatchTier::ALL.into_iter().rev() {
        print_map(&tier.to_string(), matches.tier(tier));
    }
    Ok(())
}

fn parse_id(s: &str) -> Result<EntityId> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => EntityId::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| Error::InvalidQuery {
        query: s.to_string(),
        reason: format!(
            "not an id ({}); use '{}' to separate first and last name",
            e,
            simcache::cache::NAME_SEPARATOR
        ),
    })
}

fn print_map(label: &str, map: &IdNameMap) {
    println!("Found {} {}: {:?}", map.len(), label, map);
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so command output stays pipeable
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("0x1f").unwrap(), 31);
        assert_eq!(parse_id("0X1F").unwrap(), 31);
        assert_matches!(parse_id("bella"), Err(Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_refresh_command_skips_warm_up() {
        let cache = SimCache::new(RosterFileSource::new("roster.yaml"));
        assert!(!needs_warm_cache(&cache, &Command::Refresh { force: false }));
        assert!(needs_warm_cache(&cache, &Command::Stats));

        cache.set_memory_mode(MemoryMode::Ephemeral).unwrap();
        assert!(!needs_warm_cache(&cache, &Command::Stats));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let args = Args::try_parse_from(["simcache", "--roster", "r.json", "search", "bella#goth"]).unwrap();
        assert_matches!(args.command, Command::Search { ref query } if query == "bella#goth");

        let args = Args::try_parse_from(["simcache", "gender", "--female"]).unwrap();
        assert_matches!(args.command, Command::Gender(GenderArgs { female: true, male: false }));

        assert!(Args::try_parse_from(["simcache", "gender"]).is_err());
        assert!(Args::try_parse_from(["simcache", "gender", "--female", "--male"]).is_err());
    }
}
