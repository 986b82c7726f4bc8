mod commands;
mod report;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use gradedesk_core::config::resolve_data_dir;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::Workspace;

const LOG_ENV: &str = "GRADEDESK_LOG";

#[derive(Parser)]
#[command(name = "gradedesk")]
#[command(about = "Track semester courses, weighted grades and degree progress", long_about = None)]
struct Cli {
    /// Directory holding courses.json and profile.json (defaults to $GRADEDESK_HOME or ~/.gradedesk)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage this semester's courses
    Course {
        #[command(subcommand)]
        command: CourseCommand,
    },
    /// Manage assignments within a course
    Assign {
        #[command(subcommand)]
        command: AssignCommand,
    },
    /// Show semester GPA across all current courses
    Semester,
    /// Show or edit completed courses
    Transcript {
        #[command(subcommand)]
        command: Option<TranscriptCommand>,
    },
    /// Show or edit the student profile
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommand>,
    },
    /// Show progress towards the degree
    Progress,
    /// Open the terminal dashboard
    Tui,
}

#[derive(Subcommand)]
enum CourseCommand {
    /// Add a course (usage: course add Data Structures credits:3 code:CS201 hw:30 quiz:10 midterm:30 final:30)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List courses with their current grade
    List,
    /// Show category grades and assignments of a course
    Show { course: String },
    /// Change name, code, credits or description (usage: course set <id> credits:4 code:CS330)
    Set {
        course: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Change category weights (usage: course weights <id> hw:40 final:20)
    Weights {
        course: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Remove a course
    Rm { course: String },
    /// Import a course exported by the web dashboard
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum AssignCommand {
    /// Add an assignment (usage: assign add <course> Problem Set 1 cat:HW grade:18 points:20 due:fri)
    Add {
        course: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Change assignment fields (usage: assign set <course> <assignment> grade:19 status:submitted)
    Set {
        course: String,
        assignment: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Set the status: nothing, started, submitted or late
    Status {
        course: String,
        assignment: String,
        status: String,
    },
    /// Remove an assignment
    Rm { course: String, assignment: String },
    /// List assignments, optionally filtered
    List {
        course: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum TranscriptCommand {
    /// Show the transcript with cumulative GPA
    Show,
    /// Add a completed course (usage: transcript add Calculus I grade:A credits:4)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Set the final grade of a course (`-` clears it)
    Grade { course: String, grade: String },
    /// Remove a course from the transcript
    Rm { course: String },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show the profile
    Show,
    /// Edit profile fields (usage: profile set first:Ada last:Lovelace major:Computer_Science semester:3)
    Set {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir)?;
    let workspace = Workspace::open(&data_dir)?;

    match cli.command {
        Some(Commands::Course { command }) => match command {
            CourseCommand::Add { args } => workspace.add_course(&args)?,
            CourseCommand::List => workspace.list_courses()?,
            CourseCommand::Show { course } => workspace.show_course(&course)?,
            CourseCommand::Set { course, args } => workspace.update_course(&course, &args)?,
            CourseCommand::Weights { course, args } => workspace.set_weights(&course, &args)?,
            CourseCommand::Rm { course } => workspace.remove_course(&course)?,
            CourseCommand::Import { file } => workspace.import_course(&file)?,
        },
        Some(Commands::Assign { command }) => match command {
            AssignCommand::Add { course, args } => workspace.add_assignment(&course, &args)?,
            AssignCommand::Set { course, assignment, args } => {
                workspace.update_assignment(&course, &assignment, &args)?
            }
            AssignCommand::Status { course, assignment, status } => {
                workspace.set_status(&course, &assignment, &status)?
            }
            AssignCommand::Rm { course, assignment } => workspace.remove_assignment(&course, &assignment)?,
            AssignCommand::List { course, category, search } => {
                workspace.list_assignments(&course, category.as_deref(), search.as_deref())?
            }
        },
        Some(Commands::Semester) => workspace.semester()?,
        Some(Commands::Transcript { command }) => match command.unwrap_or(TranscriptCommand::Show) {
            TranscriptCommand::Show => workspace.show_transcript()?,
            TranscriptCommand::Add { args } => workspace.add_transcript_course(&args)?,
            TranscriptCommand::Grade { course, grade } => workspace.grade_transcript_course(&course, &grade)?,
            TranscriptCommand::Rm { course } => workspace.remove_transcript_course(&course)?,
        },
        Some(Commands::Profile { command }) => match command.unwrap_or(ProfileCommand::Show) {
            ProfileCommand::Show => workspace.show_profile()?,
            ProfileCommand::Set { args } => workspace.update_profile(&args)?,
        },
        Some(Commands::Progress) => workspace.progress()?,
        Some(Commands::Tui) | None => tui::run(workspace.courses)?,
    }
    Ok(())
}
