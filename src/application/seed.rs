//! Demo accounts and sample notes for local development.

use crate::application::auth_service::AuthService;
use crate::application::note_service::NoteService;
use crate::domain::note::CreateNote;
use crate::domain::repository::{NoteRepository, UserRepository};
use crate::domain::user::{AuthenticatedUser, CreateUser};
use anyhow::Result;
use tracing::{info, instrument};

pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_EMAILS: [&str; 2] = ["test@example.com", "demo@example.com"];

const SAMPLE_NOTES: [(&str, &str, &str); 15] = [
    (
        "Meeting notes",
        "Discussed the Q1 feature set. Prioritise authentication and API improvements.",
        "Work",
    ),
    (
        "Shopping list",
        "Milk, eggs, bread, coffee, fruit, vegetables, chicken",
        "Personal",
    ),
    (
        "App idea: task manager",
        "A simple task manager with drag-and-drop boards.",
        "Ideas",
    ),
    (
        "Learn MongoDB",
        "Read the docs, practise aggregations and indexes",
        "Tasks",
    ),
    (
        "Holiday planning",
        "Look for summer destinations. Consider Italy or Greece.",
        "Personal",
    ),
    (
        "Code review feedback",
        "Remember to check error handling and add unit tests for new features",
        "Work",
    ),
    (
        "Book recommendations",
        "Clean Code by Robert Martin, Design Patterns by the Gang of Four",
        "Personal",
    ),
    (
        "Feature: dark theme",
        "Add a dark theme toggle persisted in local storage",
        "Ideas",
    ),
    (
        "Fix the login bug",
        "Users report timeouts on sign in. Check the JWT settings.",
        "Tasks",
    ),
    (
        "Database optimisation",
        "Index frequently queried columns. Consider query caching.",
        "Work",
    ),
    (
        "Workout plan",
        "Mon: chest, Tue: back, Wed: legs, Thu: shoulders, Fri: arms",
        "Personal",
    ),
    (
        "API design patterns",
        "Study REST best practices, compare GraphQL and REST",
        "Ideas",
    ),
    (
        "Update dependencies",
        "Check for outdated packages and move to the latest stable versions",
        "Tasks",
    ),
    (
        "Notes from the old project",
        "Notes from the previous project, may be useful for reference",
        "Archive",
    ),
    (
        "Team retrospective",
        "Went well: communication. To improve: documentation.",
        "Work",
    ),
];

/// Creates the demo users and gives the first one the sample notes.
/// Returns `false` without touching anything if the demo data already exists.
#[instrument(skip_all)]
pub async fn seed_demo_data<U, N>(auth: &AuthService<U>, notes: &NoteService<N>) -> Result<bool>
where
    U: UserRepository,
    N: NoteRepository,
{
    if auth.has_user(DEMO_EMAILS[0]).await? {
        info!("Demo data already present, skipping seed");
        return Ok(false);
    }

    let mut registered = Vec::with_capacity(DEMO_EMAILS.len());
    for email in DEMO_EMAILS {
        let response = auth
            .register(CreateUser {
                email: email.to_string(),
                password: DEMO_PASSWORD.to_string(),
            })
            .await?;
        registered.push(response.user);
    }

    let first = registered.swap_remove(0);
    let owner = AuthenticatedUser {
        user_id: first.id,
        email: first.email,
    };
    for (title, content, category) in SAMPLE_NOTES {
        notes
            .create(
                Some(&owner),
                CreateNote {
                    title: title.to_string(),
                    content: Some(content.to_string()),
                    category: Some(category.to_string()),
                },
            )
            .await?;
    }

    info!(
        users = DEMO_EMAILS.len(),
        notes = SAMPLE_NOTES.len(),
        owner = %owner.email,
        "Demo data seeded"
    );
    Ok(true)
}
