//! Runs one console command against a controller and reports the outcome
//! through the controller's notification slot.

use std::io::{self, BufRead, Write};

use admin_core::{
    ConfirmPrompt, Notification, NotificationKind, Outcome, Resource, ResourceController,
    SettingsController,
};
use anyhow::{anyhow, Result};
use shared::domain::{Classroom, Division, SettingsDocument, Subject, SubjectType, Teacher};

/// Reads the answer to a yes/no prompt from stdin unless `assume_yes` is set.
pub struct StdinPrompt {
    pub assume_yes: bool,
}

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub type DraftChange<D> = Box<dyn FnOnce(&mut D) + Send>;

pub enum Operation<R: Resource> {
    List,
    Add(R::Draft),
    Update {
        id: R::Id,
        change: DraftChange<R::Draft>,
    },
    Delete(R::Id),
}

/// One-line rendering of a record for `list`.
pub trait Row {
    fn row(&self) -> String;
}

impl Row for Division {
    fn row(&self) -> String {
        format!("{}\t{}", self.id, self.name)
    }
}

impl Row for Teacher {
    fn row(&self) -> String {
        format!("{}\t{}\t{}", self.id, self.name, self.subjects.join(", "))
    }
}

impl Row for Subject {
    fn row(&self) -> String {
        let kind = match self.subject_type {
            SubjectType::Lecture => "Lecture",
            SubjectType::Lab => "Lab",
        };
        format!("{}\t{}\t{kind}", self.id, self.name)
    }
}

impl Row for Classroom {
    fn row(&self) -> String {
        let kind = match self.room_type {
            shared::domain::RoomType::Classroom => "classroom",
            shared::domain::RoomType::Lab => "lab",
        };
        format!("{}\t{}\t{kind}", self.id, self.number)
    }
}

pub async fn run<R>(
    controller: &ResourceController<R>,
    operation: Operation<R>,
    prompt: &dyn ConfirmPrompt,
) -> Result<()>
where
    R: Resource + Row,
{
    let outcome = match operation {
        Operation::List => {
            let outcome = controller.load().await;
            if outcome.is_applied() {
                let items = controller.items().await;
                if items.is_empty() {
                    println!("No {} yet", R::KIND.plural());
                }
                for item in items {
                    println!("{}", item.row());
                }
            }
            outcome
        }
        Operation::Add(draft) => controller.create(&draft).await,
        Operation::Update { id, change } => {
            let loaded = controller.load().await;
            if !loaded.is_applied() {
                return report(loaded, controller.notification().await);
            }
            let Some(item) = controller
                .items()
                .await
                .into_iter()
                .find(|item| item.id() == &id)
            else {
                return Err(anyhow!("no {} with id {id}", R::KIND.singular()));
            };
            controller.begin_edit(&item).await;
            controller.edit_draft(change).await;
            let outcome = controller.save_edit().await;
            if outcome.is_applied() {
                if let Some(saved) = controller
                    .items()
                    .await
                    .into_iter()
                    .find(|item| item.id() == &id)
                {
                    println!("{}", saved.row());
                }
            }
            outcome
        }
        Operation::Delete(id) => controller.remove(&id, prompt).await,
    };

    report(outcome, controller.notification().await)
}

pub fn render_settings(document: &SettingsDocument, has_existing: bool) -> String {
    let days = document
        .days
        .iter()
        .map(|day| day.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let source = if has_existing { "stored" } else { "defaults" };
    format!(
        "days: {days}\nstart_hour: {}\nend_hour: {}\nlunch_start_hour: {}\n({source})",
        document.start_hour, document.end_hour, document.lunch_start_hour
    )
}

pub async fn show_settings(controller: &SettingsController) -> Result<()> {
    let outcome = controller.load().await;
    if outcome.is_applied() {
        println!(
            "{}",
            render_settings(&controller.document().await, controller.has_existing().await)
        );
    }
    report(outcome, controller.notification().await)
}

pub fn report(outcome: Outcome, notification: Notification) -> Result<()> {
    match notification.kind {
        NotificationKind::Success => println!("{}", notification.text),
        NotificationKind::Error if outcome.is_applied() => eprintln!("{}", notification.text),
        NotificationKind::Error | NotificationKind::Idle => {}
    }

    match outcome {
        Outcome::Applied | Outcome::Declined => Ok(()),
        Outcome::Ignored => Err(anyhow!("nothing to save")),
        Outcome::Rejected | Outcome::Failed => Err(anyhow!(if notification.text.is_empty() {
            "operation failed".to_string()
        } else {
            notification.text
        })),
    }
}
