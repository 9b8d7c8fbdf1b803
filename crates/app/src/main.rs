mod store;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lesson_core::model::{ExecutionOutcome, LessonId};
use services::config::{DEFAULT_BASE_URL, DEFAULT_COURSE_ID};
use services::{ApiConfig, ClientServices, Clock};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use ui::vm::map_lessons;
use ui::{LessonController, PageDocument};

const OUTPUT_REGION: &str = "output";

#[derive(Parser)]
#[command(name = "lesson-client", version, about = "Run lesson code and track progress")]
struct Cli {
    /// Base URL of the lesson server
    #[arg(long, global = true, env = "LESSON_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    api: String,

    /// Course that progress is filed under
    #[arg(long, global = true, env = "LESSON_COURSE_ID", default_value = DEFAULT_COURSE_ID)]
    course: String,

    /// Local store: a SQLite path or URL, `memory` or `disabled`
    #[arg(
        long,
        global = true,
        env = "LESSON_STORE_URL",
        default_value = "sqlite://lesson-client.sqlite3"
    )]
    store: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a source file on the server
    Run { file: PathBuf },
    /// Run a file as an attempt at a lesson and record the result
    Check {
        file: PathBuf,
        #[arg(long)]
        lesson: LessonId,
        /// Expected output; looked up in the catalog when omitted
        #[arg(long)]
        expected: Option<String>,
    },
    /// Record an attempt without running anything
    Track {
        lesson: LessonId,
        #[arg(long)]
        completed: bool,
    },
    /// Show progress from the server, or the local cache when offline
    Progress,
    /// List lessons with their completion state
    Lessons,
    /// List achievements
    Achievements,
    /// Render a lesson page with progress markers
    Page {
        #[arg(long = "lesson", required = true)]
        lessons: Vec<LessonId>,
    },
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = ApiConfig::new(&cli.api, &cli.course)?;
    let storage = store::open(&cli.store).await?;
    let services = ClientServices::http(config, Clock::default_clock(), &storage);

    match cli.command {
        Command::Run { file } => {
            let code = tokio::fs::read_to_string(&file).await?;
            let report = services.relay().run_timed(&code, &services.clock()).await;
            print_outcome(&report.outcome);
            eprintln!("{}", report.timing_label());
            Ok(exit_for(&report.outcome))
        }
        Command::Check {
            file,
            lesson,
            expected,
        } => {
            let code = tokio::fs::read_to_string(&file).await?;
            let expected = match expected {
                Some(text) => text,
                None => expected_output(&services, &lesson).await,
            };
            let page = PageDocument::new()
                .with_output_region(OUTPUT_REGION)
                .with_lesson_marker(lesson.clone());
            let controller = LessonController::new(page, services);

            let attempt = controller
                .submit_attempt(&lesson, &code, &expected, OUTPUT_REGION)
                .await;
            let push = attempt.progress.push.await?;

            print_outcome(&attempt.report.outcome);
            controller.with_page(|page| {
                for hint in page.hints() {
                    println!("[{}] {}", hint.level, hint.message);
                }
            });
            if let Err(err) = push {
                eprintln!("progress not saved: {err}");
            }
            Ok(if attempt.correct {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Track { lesson, completed } => {
            let tracked = services.tracker().track_progress(&lesson, completed).await;
            match &tracked.record {
                Some(record) => println!(
                    "{lesson}: attempts {}, completed {}",
                    record.attempts(),
                    record.is_completed()
                ),
                None => println!("{lesson}: local store unavailable"),
            }
            let response = tracked.push.await??;
            if let Some(message) = response.message {
                println!("{message}");
            }
            for achievement in &response.new_achievements {
                println!("Achievement unlocked: {}", achievement.announcement());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Progress => {
            let tracker = services.tracker();
            match tracker.fetch_server_progress().await {
                Ok(entries) => {
                    for entry in entries {
                        let state = if entry.is_completed() { "completed" } else { "started" };
                        match entry.completed_at_utc() {
                            Some(at) => println!("{} {state} {}", entry.lesson_id, at.to_rfc3339()),
                            None => println!("{} {state}", entry.lesson_id),
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "showing cached progress");
                    for (lesson, record) in tracker.local_progress().await.iter() {
                        println!(
                            "{lesson} attempts {} completed {}",
                            record.attempts(),
                            record.is_completed()
                        );
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Lessons => {
            let lessons = services.catalog().lessons().await?;
            let tracker = services.tracker();
            let server = tracker.load_progress_from_server().await;
            let local = tracker.local_progress().await;
            for vm in map_lessons(&lessons, &server, &local) {
                println!("{}", vm.summary_line());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Achievements => {
            let summary = services.catalog().achievements().await?;
            for achievement in &summary.achievements {
                let mark = if achievement.earned { "x" } else { " " };
                println!(
                    "[{mark}] {} {} ({} pts) {}",
                    achievement.icon, achievement.name, achievement.points, achievement.description
                );
            }
            println!(
                "{} earned, {} points",
                summary.earned_count, summary.total_points
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Page { lessons } => {
            let page = lessons.into_iter().fold(
                PageDocument::new()
                    .with_loading()
                    .with_output_region(OUTPUT_REGION)
                    .with_control("run-code")
                    .with_control("reset-code"),
                PageDocument::with_lesson_marker,
            );
            let controller = LessonController::new(page, services);
            if let Some(refresh) = controller.initialize().await {
                refresh.await?;
            }
            println!("{}", controller.with_page(|page| page.to_html()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn expected_output(services: &ClientServices, lesson: &LessonId) -> String {
    match services.catalog().lesson(lesson).await {
        Ok(Some(found)) => found.expected_output().to_string(),
        Ok(None) => {
            warn!(%lesson, "lesson not in catalog, output is not checked");
            String::new()
        }
        Err(err) => {
            warn!(%lesson, error = %err, "catalog unavailable, output is not checked");
            String::new()
        }
    }
}

fn print_outcome(outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Completed { output, warning } => {
            match output {
                Some(text) => println!("{text}"),
                None => println!("Code executed successfully (no output)"),
            }
            if let Some(text) = warning {
                eprintln!("Warnings:\n{text}");
            }
        }
        ExecutionOutcome::Failed { error } => eprintln!("Error:\n{error}"),
        ExecutionOutcome::ConnectionFailed { message } => {
            eprintln!("Connection error: {message}");
        }
    }
}

fn exit_for(outcome: &ExecutionOutcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}
