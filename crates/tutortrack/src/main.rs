mod args;
mod render;

use args::{parse_date, parse_day_capacity, parse_status, parse_weekday};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tutortrack_core::{
    from_yaml, to_json_pretty, to_yaml, CapacityMap, LessonStatus, Schedule, StudentRequirement,
    Weekday,
};
use tutortrack_roster::{NewStudent, Roster};
use tutortrack_scheduler::{AllocationReport, Scheduler};
use tutortrack_storage::RedbBackend;

#[derive(Parser)]
#[command(name = "tutortrack", about = "Weekly lesson planner for private tutors")]
struct Cli {
    /// Path to the redb database file
    #[arg(
        long,
        global = true,
        env = "TUTORTRACK_DATA_DIR",
        default_value = "./tutortrack.redb"
    )]
    data_dir: PathBuf,

    /// Tutor whose records are used
    #[arg(long, global = true, env = "TUTORTRACK_TUTOR", default_value = "default")]
    tutor: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCommand,
    },
    /// Manage the tutor's working days
    Availability {
        #[command(subcommand)]
        action: AvailabilityCommand,
    },
    /// Record the outcome of a lesson
    Log {
        student_id: String,
        #[arg(long, default_value = "completed", value_parser = parse_status)]
        status: LessonStatus,
        /// Lesson date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show this week's schedule
    Schedule {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Schedule a roster file (YAML or JSON) without touching the database
    Plan {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum StudentCommand {
    /// Add a student
    Add {
        #[arg(long)]
        name: String,
        /// Lessons per week (1-7)
        #[arg(long)]
        per_week: u32,
        /// Days the student cannot attend
        #[arg(long, value_delimiter = ',', value_parser = parse_weekday)]
        blocked: Vec<Weekday>,
    },
    /// List students with their progress
    List,
    /// Remove a student
    Remove { id: String },
}

#[derive(Subcommand)]
enum AvailabilityCommand {
    /// Replace working days, e.g. `Monday=2 Wednesday`
    Set {
        #[arg(required = true, value_parser = parse_day_capacity)]
        days: Vec<(Weekday, u32)>,
    },
    /// Show working days and their limits
    Show,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Roster file accepted by `plan`
#[derive(Deserialize)]
struct PlanFile {
    #[serde(default)]
    students: Vec<StudentRequirement>,
    #[serde(default)]
    capacity: CapacityMap,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    schedule: &'a Schedule,
    report: &'a AllocationReport,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { file, format } => run_plan(&file, format),
        command => {
            let roster = open_roster(&cli.data_dir, &cli.tutor)?;
            run_command(&roster, command)
        }
    }
}

/// Open the database and scope it to one tutor
fn open_roster(data_dir: &Path, tutor: &str) -> miette::Result<Roster> {
    let storage = Arc::new(RedbBackend::new(data_dir).map_err(|e| {
        miette::miette!("Failed to open storage at '{}': {}", data_dir.display(), e)
    })?);
    info!("Opened {} for tutor '{}'", data_dir.display(), tutor);
    Ok(Roster::new(storage, tutor)?)
}

fn run_command(roster: &Roster, command: Commands) -> miette::Result<()> {
    match command {
        Commands::Student { action } => run_student(roster, action),
        Commands::Availability { action } => run_availability(roster, action),
        Commands::Log {
            student_id,
            status,
            date,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let log = roster.record_lesson(&student_id, date, status)?;
            println!("{}", log.id);
            Ok(())
        }
        Commands::Schedule { format } => run_schedule(roster, format),
        Commands::Plan { file, format } => run_plan(&file, format),
    }
}

fn run_student(roster: &Roster, action: StudentCommand) -> miette::Result<()> {
    match action {
        StudentCommand::Add {
            name,
            per_week,
            blocked,
        } => {
            let student = roster.add_student(NewStudent {
                name,
                days_per_week: per_week,
                blocked_days: blocked,
            })?;
            println!("{}", student.id);
        }
        StudentCommand::List => {
            let students = roster.list_students()?;
            if students.is_empty() {
                println!("No students yet");
            }
            for student in students {
                let progress = roster.progress(&student)?;
                let blocked: Vec<&str> = student
                    .blocked_weekdays()
                    .into_iter()
                    .map(|day| day.short_name())
                    .collect();
                println!(
                    "{}  {}  {}/week  blocked: {}  progress: {}/{} ({}%)",
                    student.id,
                    student.name,
                    student.weekly_count(),
                    if blocked.is_empty() {
                        "-".to_string()
                    } else {
                        blocked.join(",")
                    },
                    progress.completed,
                    progress.total,
                    progress.percentage
                );
            }
        }
        StudentCommand::Remove { id } => {
            roster.remove_student(&id)?;
            println!("Removed {}", id);
        }
    }
    Ok(())
}

fn run_availability(roster: &Roster, action: AvailabilityCommand) -> miette::Result<()> {
    match action {
        AvailabilityCommand::Set { days } => {
            let record = roster.set_availability(&days)?;
            print_capacity(&record.to_capacity_map());
        }
        AvailabilityCommand::Show => match roster.availability()? {
            Some(record) => print_capacity(&record.to_capacity_map()),
            None => println!("No availability set"),
        },
    }
    Ok(())
}

fn print_capacity(capacity: &CapacityMap) {
    for (day, max) in capacity.iter() {
        println!("{}: up to {} students", day, max);
    }
}

fn run_schedule(roster: &Roster, format: OutputFormat) -> miette::Result<()> {
    let scheduler = Scheduler::new();
    let Some(plan) = roster.weekly_plan(&scheduler)? else {
        println!("No availability set. Run `tutortrack availability set` first.");
        return Ok(());
    };

    let output = match format {
        OutputFormat::Text => render::plan_text(&plan, Weekday::of(Local::now().date_naive())),
        OutputFormat::Json => to_json_pretty(&plan)?,
        OutputFormat::Yaml => to_yaml(&plan)?,
    };
    println!("{}", output);
    Ok(())
}

fn run_plan(file: &Path, format: OutputFormat) -> miette::Result<()> {
    let data = std::fs::read_to_string(file)
        .map_err(|e| miette::miette!("Failed to read '{}': {}", file.display(), e))?;
    let input: PlanFile = from_yaml(&data)?;

    let schedule = Scheduler::new().allocate(&input.students, &input.capacity);
    let report = AllocationReport::new(&input.students, &input.capacity, &schedule);

    let output = match format {
        OutputFormat::Text => render::schedule_text(&schedule, &input.capacity, &report),
        OutputFormat::Json => to_json_pretty(&PlanOutput {
            schedule: &schedule,
            report: &report,
        })?,
        OutputFormat::Yaml => to_yaml(&PlanOutput {
            schedule: &schedule,
            report: &report,
        })?,
    };
    println!("{}", output);
    Ok(())
}
