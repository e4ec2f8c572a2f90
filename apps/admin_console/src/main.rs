mod config;
mod screens;

use std::sync::Arc;

use admin_core::{
    accounts, ApiClient, ClassroomDraft, DivisionDraft, HttpApiClient, Resource,
    ResourceController, SettingsApi, SettingsController, SubjectDraft, TeacherDraft,
};
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use shared::domain::{
    Classroom, ClassroomId, Division, DivisionId, RoomType, Subject, SubjectId, SubjectType,
    Teacher, TeacherId, Weekday,
};
use tracing_subscriber::EnvFilter;

use screens::{Operation, Row, StdinPrompt};

#[derive(Parser, Debug)]
#[command(name = "timetable-admin", about = "Manage timetable master data")]
struct Cli {
    /// Backend base url. Overrides console.toml and the environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Bearer token sent with every request.
    #[arg(long, global = true)]
    token: Option<String>,
    /// Answer yes to delete confirmations.
    #[arg(short = 'y', long, global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Divisions(DivisionCommand),
    #[command(subcommand)]
    Faculty(FacultyCommand),
    #[command(subcommand)]
    Subjects(SubjectCommand),
    #[command(subcommand)]
    Classrooms(ClassroomCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum DivisionCommand {
    List,
    Add {
        name: String,
    },
    Update {
        id: DivisionId,
        #[arg(long)]
        name: String,
    },
    Delete {
        id: DivisionId,
    },
}

#[derive(Subcommand, Debug)]
enum FacultyCommand {
    List,
    Add {
        name: String,
        /// Comma separated subject names.
        #[arg(long, default_value = "")]
        subjects: String,
    },
    Update {
        id: TeacherId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        subjects: Option<String>,
    },
    Delete {
        id: TeacherId,
    },
}

#[derive(Subcommand, Debug)]
enum SubjectCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "lecture")]
        kind: SubjectType,
    },
    Update {
        id: SubjectId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<SubjectType>,
    },
    Delete {
        id: SubjectId,
    },
}

#[derive(Subcommand, Debug)]
enum ClassroomCommand {
    List,
    Add {
        number: String,
        #[arg(long)]
        kind: Option<RoomType>,
    },
    Update {
        id: ClassroomId,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        kind: Option<RoomType>,
    },
    Delete {
        id: ClassroomId,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Set {
        /// Comma separated working days, e.g. Mon,Tue,Wed.
        #[arg(long, value_delimiter = ',', value_parser = selectable_day)]
        days: Option<Vec<Weekday>>,
        #[arg(long)]
        start: Option<u8>,
        #[arg(long)]
        end: Option<u8>,
        #[arg(long)]
        lunch: Option<u8>,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
    },
}

fn selectable_day(raw: &str) -> Result<Weekday, String> {
    let day: Weekday = raw.parse()?;
    if !day.is_selectable() {
        return Err(format!("{day} is not a schedulable day"));
    }
    Ok(day)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings();
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    if let Some(token) = cli.token.filter(|token| !token.trim().is_empty()) {
        settings.api_token = Some(token);
    }
    let base_url = config::normalize_base_url(&settings.api_base_url)?;

    let mut client = HttpApiClient::new(&base_url)?;
    if let Some(token) = settings.api_token {
        client = client.with_bearer_token(token);
    }
    let client = Arc::new(client);
    tracing::debug!(base_url = %client.base_url(), "console: using backend");

    let prompt = StdinPrompt {
        assume_yes: cli.yes,
    };

    match cli.command {
        Command::Divisions(command) => {
            let operation = match command {
                DivisionCommand::List => Operation::List,
                DivisionCommand::Add { name } => Operation::Add(DivisionDraft { name }),
                DivisionCommand::Update { id, name } => Operation::Update {
                    id,
                    change: Box::new(move |draft: &mut DivisionDraft| draft.name = name),
                },
                DivisionCommand::Delete { id } => Operation::Delete(id),
            };
            run_screen::<Division>(&client, operation, &prompt).await
        }
        Command::Faculty(command) => {
            let operation = match command {
                FacultyCommand::List => Operation::List,
                FacultyCommand::Add { name, subjects } => {
                    Operation::Add(TeacherDraft { name, subjects })
                }
                FacultyCommand::Update { id, name, subjects } => Operation::Update {
                    id,
                    change: Box::new(move |draft: &mut TeacherDraft| {
                        if let Some(name) = name {
                            draft.name = name;
                        }
                        if let Some(subjects) = subjects {
                            draft.subjects = subjects;
                        }
                    }),
                },
                FacultyCommand::Delete { id } => Operation::Delete(id),
            };
            run_screen::<Teacher>(&client, operation, &prompt).await
        }
        Command::Subjects(command) => {
            let operation = match command {
                SubjectCommand::List => Operation::List,
                SubjectCommand::Add { name, kind } => Operation::Add(SubjectDraft {
                    name,
                    subject_type: kind,
                }),
                SubjectCommand::Update { id, name, kind } => Operation::Update {
                    id,
                    change: Box::new(move |draft: &mut SubjectDraft| {
                        if let Some(name) = name {
                            draft.name = name;
                        }
                        if let Some(kind) = kind {
                            draft.subject_type = kind;
                        }
                    }),
                },
                SubjectCommand::Delete { id } => Operation::Delete(id),
            };
            run_screen::<Subject>(&client, operation, &prompt).await
        }
        Command::Classrooms(command) => {
            let operation = match command {
                ClassroomCommand::List => Operation::List,
                ClassroomCommand::Add { number, kind } => Operation::Add(ClassroomDraft {
                    number,
                    room_type: kind,
                }),
                ClassroomCommand::Update { id, number, kind } => Operation::Update {
                    id,
                    change: Box::new(move |draft: &mut ClassroomDraft| {
                        if let Some(number) = number {
                            draft.number = number;
                        }
                        if kind.is_some() {
                            draft.room_type = kind;
                        }
                    }),
                },
                ClassroomCommand::Delete { id } => Operation::Delete(id),
            };
            run_screen::<Classroom>(&client, operation, &prompt).await
        }
        Command::Settings(command) => {
            let controller = SettingsController::new(Arc::clone(&client) as Arc<dyn SettingsApi>);
            match command {
                SettingsCommand::Show => screens::show_settings(&controller).await,
                SettingsCommand::Set {
                    days,
                    start,
                    end,
                    lunch,
                } => {
                    let loaded = controller.load().await;
                    if !loaded.is_applied() {
                        return screens::report(loaded, controller.notification().await);
                    }
                    controller
                        .edit(|document| {
                            if let Some(days) = days {
                                document.days = days;
                            }
                            if let Some(start) = start {
                                document.start_hour = start;
                            }
                            if let Some(end) = end {
                                document.end_hour = end;
                            }
                            if let Some(lunch) = lunch {
                                document.lunch_start_hour = lunch;
                            }
                        })
                        .await;
                    let saved = controller.save().await;
                    screens::report(saved, controller.notification().await)
                }
            }
        }
        Command::Admin(AdminCommand::Login { username, password }) => {
            match accounts::login(client.as_ref(), &username, &password).await {
                Ok(response) => {
                    match response.token {
                        Some(token) => println!("{token}"),
                        None => println!("{}", response.message.unwrap_or_default()),
                    }
                    Ok(())
                }
                Err(err) => Err(anyhow!(err.user_message(accounts::LOGIN_FAILED))),
            }
        }
        Command::Admin(AdminCommand::Register {
            username,
            email,
            password,
        }) => match accounts::register(client.as_ref(), &username, &email, &password).await {
            Ok(()) => {
                println!("{}", accounts::REGISTERED);
                Ok(())
            }
            Err(err) => Err(anyhow!(err.user_message(accounts::REGISTER_FAILED))),
        },
    }
}

async fn run_screen<R>(
    client: &Arc<HttpApiClient>,
    operation: Operation<R>,
    prompt: &StdinPrompt,
) -> Result<()>
where
    R: Resource + Row,
    HttpApiClient: ApiClient<R>,
{
    let controller = ResourceController::<R>::new(Arc::clone(client) as Arc<dyn ApiClient<R>>);
    screens::run(&controller, operation, prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_shape_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_settings_days_list() {
        let cli = Cli::try_parse_from([
            "timetable-admin",
            "settings",
            "set",
            "--days",
            "Mon,wed,Sat",
            "--start",
            "8",
        ])
        .expect("parse");
        match cli.command {
            Command::Settings(SettingsCommand::Set { days, start, .. }) => {
                assert_eq!(days, Some(vec![Weekday::Mon, Weekday::Wed, Weekday::Sat]));
                assert_eq!(start, Some(8));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_text_and_numeric_ids() {
        let cli = Cli::try_parse_from(["timetable-admin", "-y", "classrooms", "delete", "r-7"])
            .expect("parse");
        assert!(cli.yes);
        match cli.command {
            Command::Classrooms(ClassroomCommand::Delete { id }) => {
                assert_eq!(id.to_string(), "r-7");
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "timetable-admin",
            "subjects",
            "add",
            "Physics",
            "--kind",
            "lab",
        ])
        .expect("parse");
        match cli.command {
            Command::Subjects(SubjectCommand::Add { name, kind }) => {
                assert_eq!(name, "Physics");
                assert_eq!(kind, SubjectType::Lab);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn sunday_is_rejected_as_a_working_day() {
        assert!(Cli::try_parse_from(["timetable-admin", "settings", "set", "--days", "Mon,Sun"])
            .is_err());
    }

    #[test]
    fn rejects_unknown_room_type() {
        assert!(Cli::try_parse_from([
            "timetable-admin",
            "classrooms",
            "add",
            "B-1",
            "--kind",
            "hall"
        ])
        .is_err());
    }
}
