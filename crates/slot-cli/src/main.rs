//! `slots` CLI - find free time, list events and read mail from JSON dumps.
//!
//! ## Usage
//!
//! ```sh
//! # Free slots in today's 09:00-18:00 work window (events from stdin)
//! cat events.json | slots free
//!
//! # A specific day, local timezone, custom hours and minimum length
//! slots free -i events.json --date 2026-03-02 --tz Europe/Berlin \
//!     --work-start 08:30 --work-end 17:00 --min-duration 45
//!
//! # JSON payload instead of text
//! slots free -i events.json --date 2026-03-02 --json
//!
//! # Events for tomorrow as a JSON payload
//! slots events -i events.json --range tomorrow
//!
//! # Check that every timed event has resolvable timestamps
//! slots check -i events.json
//!
//! # Unread mail, or a search in provider query syntax
//! slots emails -i messages.json
//! slots emails -i messages.json --query "from:boss@company.com" --limit 5
//! ```
//!
//! Set `RUST_LOG=debug` to see what the engine is doing (logs go to stderr).

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use slot_engine::config::parse_clock_time;
use slot_engine::email::DEFAULT_MAX_RESULTS;
use slot_engine::render::{
    describe_free_slots, emails_payload, events_payload, free_slots_payload,
};
use slot_engine::{
    busy_intervals, parse_events_json, parse_instant, parse_messages_json, CalendarEvent,
    DayRange, InMemoryCalendar, InMemoryMailbox, MailQuery, MailSource, Scheduler,
    SchedulerConfig,
};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Find free calendar slots in JSON event dumps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List free slots within working hours on a day
    Free {
        #[command(flatten)]
        common: CommonArgs,
        /// Day to search (YYYY-MM-DD); defaults to today in the chosen timezone
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Start of working hours (HH:MM)
        #[arg(long, env = "SLOTS_WORK_START")]
        work_start: Option<String>,
        /// End of working hours (HH:MM)
        #[arg(long, env = "SLOTS_WORK_END")]
        work_end: Option<String>,
        /// Shortest gap worth reporting, in minutes
        #[arg(long, env = "SLOTS_MIN_DURATION")]
        min_duration: Option<u32>,
        /// Report zero-length gaps too (only with --min-duration 0)
        #[arg(long)]
        include_zero_length: bool,
        /// Print a JSON payload instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print events in a day range as a JSON payload
    Events {
        #[command(flatten)]
        common: CommonArgs,
        /// today, tomorrow, or week
        #[arg(long, default_value = "today")]
        range: DayRange,
        /// Reference time (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },
    /// Print unread or matching mail as a JSON payload
    Emails {
        /// Input file of messages (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Search query (from:, subject:, label:, is:unread, plain words)
        #[arg(short, long)]
        query: Option<String>,
        /// Only unread mail; the default when no query is given
        #[arg(long)]
        unread: bool,
        /// Maximum number of messages to print
        #[arg(long, env = "SLOTS_MAIL_LIMIT", default_value_t = DEFAULT_MAX_RESULTS)]
        limit: usize,
    },
    /// Validate event timestamps and summarize the input
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// IANA timezone for work hours and day boundaries
    #[arg(long, env = "SLOTS_TZ")]
    tz: Option<String>,
    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Free {
            common,
            date,
            work_start,
            work_end,
            min_duration,
            include_zero_length,
            json,
        } => {
            let mut config = load_config(&common)?;
            if let Some(raw) = work_start {
                config.work_start = clock_arg("--work-start", &raw)?;
            }
            if let Some(raw) = work_end {
                config.work_end = clock_arg("--work-end", &raw)?;
            }
            if let Some(min) = min_duration {
                config.min_duration_minutes = min;
            }
            config.include_zero_length |= include_zero_length;

            let scheduler = build_scheduler(common.input.as_deref(), &config)?;
            let tz = scheduler.timezone();
            let date = date.unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
            debug!(%date, timezone = %tz, "finding free slots");

            let result = scheduler.free_slots_on(date);
            if json {
                println!("{}", free_slots_payload(&result, &tz));
                if result.is_err() {
                    process::exit(1);
                }
            } else {
                let slots = result
                    .with_context(|| format!("Failed to find free slots on {}", date))?;
                println!("{}", describe_free_slots(&slots, &tz));
            }
        }
        Commands::Events { common, range, now } => {
            let config = load_config(&common)?;
            let scheduler = build_scheduler(common.input.as_deref(), &config)?;
            let now = match now {
                Some(raw) => parse_instant(&raw).context("Invalid --now timestamp")?,
                None => Utc::now(),
            };

            let result = scheduler.events_in(range, now);
            println!("{}", events_payload(range, &result, &scheduler.timezone()));
            if result.is_err() {
                process::exit(1);
            }
        }
        Commands::Emails {
            input,
            query,
            unread,
            limit,
        } => {
            let raw = read_input(input.as_deref())?;
            let mailbox = InMemoryMailbox::new(
                parse_messages_json(&raw).context("Failed to parse messages JSON")?,
            );
            let query = match query {
                Some(q) if unread => MailQuery::parse(&format!("{} is:unread", q)),
                Some(q) => MailQuery::parse(&q),
                None => MailQuery::unread(),
            }
            .with_max_results(limit);
            debug!(query = %query, messages = mailbox.messages().len(), "searching mail");

            let result = mailbox.search(&query);
            println!("{}", emails_payload(&query, &result));
            if result.is_err() {
                process::exit(1);
            }
        }
        Commands::Check { input } => {
            let events = read_events(input.as_deref())?;
            let intervals =
                busy_intervals(&events).context("Event timestamps failed validation")?;
            println!(
                "{} events: {} timed, {} all-day",
                events.len(),
                intervals.len(),
                events.len() - intervals.len()
            );
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays machine readable. `RUST_LOG` overrides the
/// default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Config file (if any), then `--tz` on top.
fn load_config(common: &CommonArgs) -> Result<SchedulerConfig> {
    let mut config = match common.config.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            SchedulerConfig::from_json(&raw)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => SchedulerConfig::default(),
    };
    if let Some(tz) = &common.tz {
        config.timezone = tz.clone();
    }
    Ok(config)
}

fn clock_arg(flag: &str, raw: &str) -> Result<chrono::NaiveTime> {
    parse_clock_time(raw)
        .with_context(|| format!("Invalid {} value '{}': expected HH:MM", flag, raw))
}

fn build_scheduler(
    input: Option<&str>,
    config: &SchedulerConfig,
) -> Result<Scheduler<InMemoryCalendar>> {
    let events = read_events(input)?;
    debug!(events = events.len(), "loaded events");
    Scheduler::new(InMemoryCalendar::new(events), config).context("Invalid scheduler settings")
}

fn read_events(input: Option<&str>) -> Result<Vec<CalendarEvent>> {
    let json = read_input(input)?;
    parse_events_json(&json).context("Failed to parse events JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
