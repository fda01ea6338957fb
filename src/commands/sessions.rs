//! Stored session management: `sessions list`, `show` and `delete`

use crate::cli::SessionsCommand;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::{NovaError, Result};
use crate::storage::SessionStore;
use crate::ui::role_label;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle session management commands
///
/// # Arguments
///
/// * `config` - Global configuration, used to locate the session database
/// * `command` - The subcommand to run
///
/// # Errors
///
/// Returns error if the database cannot be opened, or `NovaError::Storage`
/// if the requested session does not exist
pub fn handle_sessions(config: &Config, command: SessionsCommand) -> Result<()> {
    colored::control::set_override(config.ui.color);
    let mut store = open_store(config)?;
    run(&mut store, command)
}

fn run(store: &mut SessionStore, command: SessionsCommand) -> Result<()> {
    match command {
        SessionsCommand::List => {
            if store.is_empty() {
                println!("{}", "No chat sessions found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Date".bold(),
                "Messages".bold()
            ]);

            for session in store.sessions() {
                table.add_row(prettytable::row![
                    session.id.to_string().cyan(),
                    session.title,
                    session.date,
                    session.messages.len()
                ]);
            }

            println!("\nChat Sessions:");
            table.printstd();
            println!();
            println!(
                "Use {} to resume a session.",
                "nova-scribe chat --session <ID>".cyan()
            );
            println!();
        }
        SessionsCommand::Show { id } => {
            let session = store
                .get(id)
                .ok_or_else(|| NovaError::Storage(format!("No session with id {}", id)))?;

            println!("{} ({})", session.title.bold(), session.date);
            println!();
            for turn in &session.messages {
                println!("{}: {}", role_label(turn.role), turn.content);
            }
            println!();
        }
        SessionsCommand::Delete { id } => {
            if store.remove(id).is_none() {
                return Err(NovaError::Storage(format!("No session with id {}", id)).into());
            }
            println!("{}", format!("Deleted session {}", id).green());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_utils::session;

    fn store() -> (SessionStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        let mut store = SessionStore::load(Box::new(storage.clone()));
        store.append(session(1_000, "Invoices")).unwrap();
        store.append(session(2_000, "Payroll")).unwrap();
        (store, storage)
    }

    #[test]
    fn test_delete_removes_and_persists() {
        let (mut store, storage) = store();
        run(&mut store, SessionsCommand::Delete { id: 1_000 }).unwrap();

        let reloaded = SessionStore::load(Box::new(storage));
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains(2_000));
    }

    #[test]
    fn test_delete_unknown_session_errors() {
        let (mut store, _) = store();
        let err = run(&mut store, SessionsCommand::Delete { id: 3_000 }).unwrap_err();
        assert!(err.to_string().contains("3000"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_show_unknown_session_errors() {
        let (mut store, _) = store();
        assert!(run(&mut store, SessionsCommand::Show { id: 9 }).is_err());
    }

    #[test]
    fn test_list_and_show_succeed() {
        let (mut store, _) = store();
        run(&mut store, SessionsCommand::List).unwrap();
        run(&mut store, SessionsCommand::Show { id: 2_000 }).unwrap();
    }
}
