//! Line-oriented front-end for the admin form. One `FormState` lives for the
//! whole session, so fields typed earlier are still there for later actions.

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::error::AppError;
use crate::models::Id;
use crate::services::CourseManagement;
use crate::view;

pub const HELP: &str = "\
commands:
  title <text>            set course title
  code <text>             set course code
  description <text>      set course description
  add-course              submit the course fields
  courses                 list courses
  delete-course <id>      delete a course
  select <course id>      pick a course for a new instance
  year <text>             set year
  semester <text>         set semester
  add-instance            submit year, semester and selected course
  instances [year sem]    list instances for a term (defaults to the form)
  delete-instance <year> <sem> <id>
  show                    print the form fields
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Title(String),
    Code(String),
    Description(String),
    AddCourse,
    ListCourses,
    DeleteCourse(Id),
    Select(String),
    Year(String),
    Semester(String),
    AddInstance,
    ListInstances(Option<(String, String)>),
    DeleteInstance {
        year: String,
        semester: String,
        id: Id,
    },
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word {
            "title" => Command::Title(rest.to_string()),
            "code" => Command::Code(rest.to_string()),
            "description" => Command::Description(rest.to_string()),
            "year" => Command::Year(rest.to_string()),
            "semester" => Command::Semester(rest.to_string()),
            "add-course" => Command::AddCourse,
            "add-instance" => Command::AddInstance,
            "courses" => Command::ListCourses,
            "select" => match args.as_slice() {
                [id] => Command::Select(id.to_string()),
                _ => return Err("usage: select <course id>".to_string()),
            },
            "delete-course" => match args.as_slice() {
                [id] => Command::DeleteCourse(Id::from(*id)),
                _ => return Err("usage: delete-course <id>".to_string()),
            },
            "instances" => match args.as_slice() {
                [] => Command::ListInstances(None),
                [year, semester] => {
                    Command::ListInstances(Some((year.to_string(), semester.to_string())))
                }
                _ => return Err("usage: instances [year semester]".to_string()),
            },
            "delete-instance" => match args.as_slice() {
                [year, semester, id] => Command::DeleteInstance {
                    year: year.to_string(),
                    semester: semester.to_string(),
                    id: Id::from(*id),
                },
                _ => return Err("usage: delete-instance <year> <semester> <id>".to_string()),
            },
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {} (try `help`)", other)),
        };

        Ok(Some(command))
    }
}

/// Applies one command. Returns the text to print, or `None` on quit.
pub async fn execute(app: &CourseManagement, command: Command) -> Result<Option<String>, AppError> {
    let output = match command {
        Command::Title(v) => {
            app.state().write().await.set_course_title(v);
            String::new()
        }
        Command::Code(v) => {
            app.state().write().await.set_course_code(v);
            String::new()
        }
        Command::Description(v) => {
            app.state().write().await.set_course_description(v);
            String::new()
        }
        Command::Year(v) => {
            app.state().write().await.set_year(v);
            String::new()
        }
        Command::Semester(v) => {
            app.state().write().await.set_semester(v);
            String::new()
        }
        Command::Select(id) => {
            if app.state().write().await.select_course_by_id(&id) {
                String::new()
            } else {
                format!("no course with id {} in the current list\n", id)
            }
        }
        Command::AddCourse => {
            app.courses().create_course().await?;
            view::render_courses(app.state().read().await.courses())
        }
        Command::ListCourses => {
            app.courses().list_courses().await?;
            view::render_courses(app.state().read().await.courses())
        }
        Command::DeleteCourse(id) => {
            app.courses().delete_course(&id).await?;
            view::render_courses(app.state().read().await.courses())
        }
        Command::AddInstance => {
            app.instances().create_instance().await?;
            view::render_instances(app.state().read().await.course_instances())
        }
        Command::ListInstances(term) => {
            match term {
                Some((year, semester)) => app.instances().list_instances(&year, &semester).await?,
                None => app.instances().list_instances_for_form().await?,
            };
            view::render_instances(app.state().read().await.course_instances())
        }
        Command::DeleteInstance { year, semester, id } => {
            app.instances().delete_instance(&year, &semester, &id).await?;
            view::render_instances(app.state().read().await.course_instances())
        }
        Command::Show => view::render_form(&*app.state().read().await),
        Command::Help => format!("{}\n", HELP),
        Command::Quit => return Ok(None),
    };
    Ok(Some(output))
}

pub async fn run<R, W>(app: &CourseManagement, input: R, mut output: W) -> Result<(), AppError>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                output.write_all(format!("{}\n", message).as_bytes()).await?;
                continue;
            }
        };

        match execute(app, command).await {
            Ok(Some(text)) => output.write_all(text.as_bytes()).await?,
            Ok(None) => break,
            // already logged and, for local failures, shown as a notice
            Err(e) => debug!("command failed: {}", e),
        }
    }

    output.flush().await?;
    Ok(())
}
