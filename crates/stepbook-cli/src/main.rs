//! Stepbook CLI
//!
//! Command-line interface for logging practice sessions and viewing
//! journal statistics.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use colored::Colorize;
use stepbook_core::{
    aggregate,
    coach::Coach,
    export::{ExportFormat, Exporter},
    range::RangeSelector,
    store::JournalStore,
    Difficulty, MediaKind, Mood, PracticeRecord,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "stepbook")]
#[command(about = "Dance practice journal - log sessions and track your progress!")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a practice session
    Log {
        /// Dance style (e.g. "Hip Hop", "Ballet")
        style: String,

        /// Session length in minutes
        duration: u32,

        /// Session date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Session time (HH:MM, defaults to now)
        #[arg(short, long)]
        time: Option<String>,

        /// Studio name
        #[arg(long)]
        studio: Option<String>,

        /// Instructor name
        #[arg(long)]
        instructor: Option<String>,

        /// Difficulty (beginner, intermediate, advanced, open)
        #[arg(long)]
        difficulty: Option<String>,

        /// Mood (happy, energized, relaxed, tired, frustrated)
        #[arg(short, long)]
        mood: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Track you practiced to
        #[arg(long)]
        music: Option<String>,

        /// URL of an attached photo or video
        #[arg(long)]
        media_url: Option<String>,

        /// Kind of attached media (image or video)
        #[arg(long, default_value = "image")]
        media_kind: String,
    },

    /// Show summary statistics for a reporting range
    Stats {
        /// Time range (week, month, last-month, year)
        #[arg(short, long, default_value = "month")]
        range: String,
    },

    /// Show the practice trend series for a reporting range
    Trend {
        /// Time range (week, month, last-month, year)
        #[arg(short, long, default_value = "month")]
        range: String,
    },

    /// List sessions in a reporting range
    List {
        /// Time range (week, month, last-month, year)
        #[arg(short, long, default_value = "month")]
        range: String,
    },

    /// List sessions for one calendar day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Delete a session by id
    Delete {
        /// Record id
        id: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// Output format (csv or json)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Time range (week, month, last-month, year)
        #[arg(short, long, default_value = "year")]
        range: String,

        /// Export only summary (no raw records)
        #[arg(long)]
        summary: bool,
    },

    /// Get a coaching tip for a logged session
    Tip {
        /// Record id
        id: String,
    },

    /// Get a coach summary of a reporting range
    Summary {
        /// Time range (week, month, last-month, year)
        #[arg(short, long, default_value = "month")]
        range: String,
    },
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct StyleRow {
    #[tabled(rename = "Style")]
    style: String,
    #[tabled(rename = "Sessions")]
    sessions: u64,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Style")]
    style: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "Studio")]
    studio: String,
    #[tabled(rename = "Instructor")]
    instructor: String,
    #[tabled(rename = "Mood")]
    mood: String,
    #[tabled(rename = "Id")]
    id: String,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stepbook=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Open journal
    let store = JournalStore::open_default()?;
    debug!("Journal ready at {:?}", stepbook_core::journal_path());

    match cli.command {
        Commands::Log {
            style,
            duration,
            date,
            time,
            studio,
            instructor,
            difficulty,
            mood,
            notes,
            music,
            media_url,
            media_kind,
        } => log_session(
            &store, style, duration, date, time, studio, instructor, difficulty, mood, notes,
            music, media_url, media_kind,
        ),

        Commands::Stats { range } => show_stats(&store, parse_range(&range)),
        Commands::Trend { range } => show_trend(&store, parse_range(&range)),
        Commands::List { range } => list_sessions(&store, parse_range(&range)),

        Commands::Day { date } => {
            let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")?;
            show_day(&store, day)
        }

        Commands::Delete { id } => {
            let id = Uuid::parse_str(&id)?;
            store.delete_record(id)?;
            println!("{}", "✓ Session deleted".green());
            Ok(())
        }

        Commands::Export {
            format,
            output,
            range,
            summary,
        } => {
            let selector = parse_range(&range);
            let export_format = ExportFormat::from_str(&format).unwrap_or(ExportFormat::Json);
            let window = selector.resolve(Local::now().naive_local());
            let exporter = Exporter::new(&store);

            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(File::create(path)?),
                None => Box::new(io::stdout()),
            };

            if summary {
                exporter.export_summary(writer, &window, export_format)?;
            } else {
                exporter.export(writer, &window, export_format)?;
            }

            Ok(())
        }

        Commands::Tip { id } => {
            let id = Uuid::parse_str(&id)?;
            let record = store.get_record(id)?;
            println!("\n{}", "💬 Coach".bold().cyan());
            println!("{}", Coach::from_env().session_tip(&record));
            Ok(())
        }

        Commands::Summary { range } => {
            let selector = parse_range(&range);
            let window = selector.resolve(Local::now().naive_local());
            let report = aggregate(&store.all_records()?, &window);

            println!("\n{}", "💬 Coach".bold().cyan());
            println!(
                "{}",
                Coach::from_env().period_summary(&report.filtered, selector.label())
            );
            Ok(())
        }
    }
}

/// Unrecognized range strings fall back to the month view
fn parse_range(s: &str) -> RangeSelector {
    RangeSelector::parse(s).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn log_session(
    store: &JournalStore,
    style: String,
    duration: u32,
    date: Option<String>,
    time: Option<String>,
    studio: Option<String>,
    instructor: Option<String>,
    difficulty: Option<String>,
    mood: Option<String>,
    notes: Option<String>,
    music: Option<String>,
    media_url: Option<String>,
    media_kind: String,
) -> Result<()> {
    if style.trim().is_empty() {
        return Err(anyhow!("Style must not be empty"));
    }

    let now = Local::now().naive_local();
    let day = match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")?,
        None => now.date(),
    };
    let at = match time {
        Some(t) => NaiveTime::parse_from_str(&t, "%H:%M")?,
        None => now.time(),
    };
    let occurred_at = NaiveDateTime::new(day, at);

    let mut record = PracticeRecord::new(occurred_at, style.trim(), duration);
    if let Some(studio) = studio {
        record = record.with_studio(studio);
    }
    if let Some(instructor) = instructor {
        record = record.with_instructor(instructor);
    }
    if let Some(d) = difficulty {
        let difficulty = Difficulty::parse(&d)
            .ok_or_else(|| anyhow!("Unknown difficulty '{d}' (beginner, intermediate, advanced, open)"))?;
        record = record.with_difficulty(difficulty);
    }
    if let Some(m) = mood {
        let mood = Mood::parse(&m)
            .ok_or_else(|| anyhow!("Unknown mood '{m}' (happy, energized, relaxed, tired, frustrated)"))?;
        record = record.with_mood(mood);
    }
    if let Some(notes) = notes {
        record = record.with_notes(notes);
    }
    if let Some(music) = music {
        record = record.with_music(music);
    }
    if let Some(url) = media_url {
        let kind = MediaKind::parse(&media_kind)
            .ok_or_else(|| anyhow!("Unknown media kind '{media_kind}' (image or video)"))?;
        record = record.with_media(url, kind);
    }

    store.upsert_record(&record)?;
    println!(
        "{} {} ({}m) on {}",
        "✓ Logged".green(),
        record.style.bold(),
        record.duration_minutes,
        record.occurred_at.format("%Y-%m-%d %H:%M"),
    );
    println!("  id: {}", record.id);

    Ok(())
}

fn show_stats(store: &JournalStore, selector: RangeSelector) -> Result<()> {
    let window = selector.resolve(Local::now().naive_local());
    let report = aggregate(&store.all_records()?, &window);
    let stats = &report.stats;

    println!("\n{}", format!("📊 {} Statistics", selector.label()).bold().cyan());
    println!("{}", "─".repeat(40));

    let rows = vec![
        StatRow {
            metric: "Danced".to_string(),
            value: format!("{:.1}h ({}m)", stats.total_hours, stats.total_minutes),
        },
        StatRow {
            metric: "Classes".to_string(),
            value: stats.session_count.to_string(),
        },
        StatRow {
            metric: "Top Instructor".to_string(),
            value: format!("{} ({} sessions)", stats.top_instructor.name, stats.top_instructor.count),
        },
        StatRow {
            metric: "Top Studio".to_string(),
            value: format!("{} ({} sessions)", stats.top_studio.name, stats.top_studio.count),
        },
    ];

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    if !stats.style_breakdown.is_empty() {
        println!("\n{}", "💃 Style Breakdown".bold().cyan());
        let rows: Vec<StyleRow> = stats
            .style_breakdown
            .iter()
            .map(|entry| StyleRow {
                style: entry.name.clone(),
                sessions: entry.count,
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    Ok(())
}

fn show_trend(store: &JournalStore, selector: RangeSelector) -> Result<()> {
    let window = selector.resolve(Local::now().naive_local());
    let report = aggregate(&store.all_records()?, &window);

    println!("\n{}", format!("📈 {} Trend", selector.label()).bold().cyan());
    println!("{}", "─".repeat(40));

    let rows: Vec<TrendRow> = report
        .trend
        .iter()
        .map(|bucket| TrendRow {
            period: bucket.label.clone(),
            hours: format!("{:.1}", bucket.hours),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    Ok(())
}

fn list_sessions(store: &JournalStore, selector: RangeSelector) -> Result<()> {
    let window = selector.resolve(Local::now().naive_local());
    let report = aggregate(&store.all_records()?, &window);

    if report.filtered.is_empty() {
        println!("\n{}", "No records found for this period.".yellow());
        return Ok(());
    }

    println!("\n{}", format!("🗓  {} Sessions", selector.label()).bold().cyan());
    print_sessions(&report.filtered);

    Ok(())
}

fn show_day(store: &JournalStore, day: NaiveDate) -> Result<()> {
    let sessions = store.records_for_day(day)?;

    if sessions.is_empty() {
        println!("\n{}", "No records found for this day.".yellow());
        return Ok(());
    }

    println!("\n{}", format!("🗓  {}", day.format("%Y-%m-%d")).bold().cyan());
    print_sessions(&sessions);

    Ok(())
}

fn print_sessions(sessions: &[PracticeRecord]) {
    let rows: Vec<SessionRow> = sessions
        .iter()
        .map(|r| SessionRow {
            when: r.occurred_at.format("%Y-%m-%d %H:%M").to_string(),
            style: r.style.clone(),
            minutes: r.duration_minutes,
            studio: r.studio.clone(),
            instructor: r.instructor.clone(),
            mood: format!("{} {}", r.mood.emoji(), r.mood.as_str()),
            id: r.id.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}
