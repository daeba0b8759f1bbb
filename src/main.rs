use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_admin::client::HttpCourseApi;
use course_admin::config::ApiConfig;
use course_admin::models::Id;
use course_admin::notify::StderrNotifier;
use course_admin::services::CourseManagement;
use course_admin::{shell, view};

#[derive(Parser)]
#[command(name = "course_admin", about = "Manage courses and course instances")]
struct Cli {
    /// Overrides COURSE_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive form (default)
    Shell,
    /// List all courses
    Courses,
    AddCourse {
        #[arg(long)]
        title: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        description: String,
    },
    DeleteCourse {
        id: String,
    },
    /// List instances offered in a year and semester
    Instances {
        year: String,
        semester: String,
    },
    AddInstance {
        /// Id of an existing course
        #[arg(long)]
        course: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        semester: String,
    },
    DeleteInstance {
        year: String,
        semester: String,
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "course_admin=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ApiConfig::new_from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    info!("using course API at {}", config.base_url);

    let api = Arc::new(HttpCourseApi::new(&config)?);
    let app = CourseManagement::new(api, Arc::new(StderrNotifier));
    app.initialize().await;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            shell::run(&app, tokio::io::stdin(), tokio::io::stdout()).await?;
        }
        Command::Courses => {
            print!("{}", view::render_courses(app.state().read().await.courses()));
        }
        Command::AddCourse {
            title,
            code,
            description,
        } => {
            {
                let mut state = app.state().write().await;
                state.set_course_title(title);
                state.set_course_code(code);
                state.set_course_description(description);
            }
            app.courses().create_course().await?;
            print!("{}", view::render_courses(app.state().read().await.courses()));
        }
        Command::DeleteCourse { id } => {
            app.courses().delete_course(&Id::from(id.as_str())).await?;
            print!("{}", view::render_courses(app.state().read().await.courses()));
        }
        Command::Instances { year, semester } => {
            app.instances().list_instances(&year, &semester).await?;
            print!(
                "{}",
                view::render_instances(app.state().read().await.course_instances())
            );
        }
        Command::AddInstance {
            course,
            year,
            semester,
        } => {
            {
                let mut state = app.state().write().await;
                if !state.select_course_by_id(&course) {
                    eprintln!("! no course with id {}", course);
                }
                state.set_year(year);
                state.set_semester(semester);
            }
            app.instances().create_instance().await?;
            print!(
                "{}",
                view::render_instances(app.state().read().await.course_instances())
            );
        }
        Command::DeleteInstance { year, semester, id } => {
            app.instances()
                .delete_instance(&year, &semester, &Id::from(id.as_str()))
                .await?;
            print!(
                "{}",
                view::render_instances(app.state().read().await.course_instances())
            );
        }
    }

    Ok(())
}
