/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`: interactive chat
- `sessions`: listing, showing and deleting stored sessions
*/

use crate::config::Config;
use crate::error::{NovaError, Result};
use crate::storage::{SessionStore, SledStorage};

// Special commands parser for the chat prompt
pub mod special_commands;

// Stored session management
pub mod sessions;

/// Open the session database named by the configuration
///
/// # Errors
///
/// Returns error if the database cannot be opened or the default data
/// directory cannot be determined
pub fn open_store(config: &Config) -> Result<SessionStore> {
    let storage = match &config.storage.path {
        Some(path) => SledStorage::open(path)?,
        None => SledStorage::open_default()?,
    };
    tracing::debug!("Using session database at {}", storage.path().display());
    Ok(SessionStore::load(Box::new(storage)))
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Opens the session store, builds the controller and the HTTP backend,
    //! and runs a readline loop that feeds typed lines and slash commands
    //! into the [`ChatApp`].

    use super::*;
    use crate::app::ChatApp;
    use crate::backend::{ChatBackend, HttpChatBackend};
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::controller::{Clock, Controller, Event, PendingRequest, Route};
    use crate::session::{ChatRole, ChatTurn};
    use crate::ui::{
        role_label, status_line, ChatView, InputBox, MessageKey, SessionRef, Sidebar,
    };
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::io::{self, Write};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio_util::sync::CancellationToken;

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Optional session id to open instead of the first stored one
    ///
    /// # Errors
    ///
    /// Returns error if the store, the HTTP client or the line editor cannot
    /// be created
    ///
    /// # Examples
    ///
    /// ```
    /// use nova_scribe::commands::chat;
    /// use nova_scribe::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default(), None).await?;
    /// ```
    pub async fn run_chat(config: Config, session: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat");
        colored::control::set_override(config.ui.color);

        let store = open_store(&config)?;
        let backend = HttpChatBackend::new(&config.endpoint)?;
        tracing::info!("Sending prompts to {}", backend.url());

        let mut app = ChatApp::new(Controller::new(store), backend);
        let mut view = ChatView::new(
            Duration::from_millis(config.ui.reveal_interval_ms),
            config.ui.user_name.clone(),
        );
        let mut out = io::stdout();
        let interrupts = watch_interrupts();

        let route = session.map(Route::Chat).unwrap_or_default();
        let requests = app.open(route);
        send_all(&mut app, &mut view, requests, &interrupts, &mut out).await?;
        show_current(&app, &mut view, &mut out)?;

        let mut rl = DefaultEditor::new()?;
        let mut input = InputBox::new();

        loop {
            let prompt = format!("{}> ", role_label(ChatRole::User));
            match rl.readline(&prompt) {
                Ok(line) => {
                    let command = match parse_special_command(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::None => {
                            input.set_text(&line);
                            let Some(text) = input.submit() else {
                                continue;
                            };
                            rl.add_history_entry(text.as_str())
                                .map_err(NovaError::from)?;

                            input.set_disabled(true);
                            let requests = app.dispatch(Event::Submit(text));
                            send_all(&mut app, &mut view, requests, &interrupts, &mut out)
                                .await?;
                            input.set_disabled(false);
                        }
                        SpecialCommand::NewChat => {
                            app.dispatch(sidebar(&app).new_chat().into());
                            show_current(&app, &mut view, &mut out)?;
                        }
                        SpecialCommand::Start => {
                            app.dispatch(Event::Start);
                            show_current(&app, &mut view, &mut out)?;
                        }
                        SpecialCommand::ListSessions => {
                            print!("{}", sidebar(&app).render());
                            println!();
                        }
                        SpecialCommand::Open(reference) => match sidebar(&app).select(reference) {
                            Some(intent) => {
                                app.dispatch(intent.into());
                                show_current(&app, &mut view, &mut out)?;
                            }
                            None => report_unknown(reference),
                        },
                        SpecialCommand::Delete(reference) => {
                            match sidebar(&app).delete(reference) {
                                Some(intent) => {
                                    let was_active = app.controller().active_session();
                                    app.dispatch(intent.into());
                                    println!("{}", format!("Deleted session {}", reference).green());
                                    if app.controller().active_session() != was_active {
                                        show_current(&app, &mut view, &mut out)?;
                                    }
                                }
                                None => report_unknown(reference),
                            }
                        }
                        SpecialCommand::ShowStatus => {
                            let controller = app.controller();
                            println!(
                                "{}\n",
                                status_line(
                                    controller.phase(),
                                    app.route(),
                                    controller.store().len(),
                                    controller.transcript().len(),
                                )
                            );
                        }
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn sidebar<B: ChatBackend, C: Clock>(app: &ChatApp<B, C>) -> Sidebar {
        let controller = app.controller();
        Sidebar::new(controller.summaries(), controller.active_session())
    }

    fn report_unknown(reference: SessionRef) {
        eprintln!(
            "{}",
            format!("No session {}. Type '/sessions' to list them.", reference).red()
        );
    }

    /// Welcome screen for a fresh view, otherwise the transcript
    fn show_current<B: ChatBackend, C: Clock, W: Write>(
        app: &ChatApp<B, C>,
        view: &mut ChatView,
        out: &mut W,
    ) -> io::Result<()> {
        let controller = app.controller();
        if !controller.is_started() && controller.transcript().is_empty() {
            return view.welcome(out);
        }
        view.transcript(controller.active_session(), controller.transcript(), out)
    }

    /// Take over Ctrl-C for the whole session
    ///
    /// Every Ctrl-C outside the line editor wakes the current waiters; with
    /// none waiting (a request in flight) it is ignored. At the prompt the
    /// editor reads Ctrl-C itself and the chat exits.
    fn watch_interrupts() -> Arc<Notify> {
        let interrupts = Arc::new(Notify::new());
        let notify = interrupts.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Ctrl-C received");
                notify.notify_waiters();
            }
            tracing::warn!("Could not listen for Ctrl-C");
        });
        interrupts
    }

    /// Send requests one at a time, revealing each reply as it lands
    ///
    /// Ctrl-C during the reveal prints the rest of the reply at once.
    async fn send_all<B: ChatBackend, C: Clock, W: Write>(
        app: &mut ChatApp<B, C>,
        view: &mut ChatView,
        mut queue: Vec<PendingRequest>,
        interrupts: &Arc<Notify>,
        out: &mut W,
    ) -> Result<()> {
        while let Some(pending) = queue.pop() {
            view.thinking(out)?;
            queue.extend(app.fulfil(pending).await);

            let controller = app.controller();
            let Some(index) = controller.transcript().len().checked_sub(1) else {
                continue;
            };
            let turn = controller.transcript()[index].clone();
            let key = MessageKey {
                session: controller.active_session(),
                index,
            };

            reveal_turn(view, key, &turn, interrupts, out).await?;
        }
        Ok(())
    }

    /// Reveal one turn, finishing it at once on the next interrupt
    async fn reveal_turn<W: Write>(
        view: &mut ChatView,
        key: MessageKey,
        turn: &ChatTurn,
        interrupts: &Arc<Notify>,
        out: &mut W,
    ) -> io::Result<()> {
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            let interrupts = interrupts.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = interrupts.notified() => cancel.cancel(),
                    _ = cancel.cancelled() => {}
                }
            })
        };

        let played = view.turn(key, turn, out, &cancel).await;
        cancel.cancel();
        let _ = watcher.await;
        played
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn key() -> MessageKey {
            MessageKey {
                session: Some(1),
                index: 1,
            }
        }

        #[tokio::test]
        async fn test_interrupt_finishes_reveal_at_once() {
            colored::control::set_override(false);
            let mut view = ChatView::new(Duration::from_secs(60), None);
            let interrupts = Arc::new(Notify::new());
            let trigger = interrupts.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                trigger.notify_waiters();
            });

            let mut out = Vec::new();
            reveal_turn(
                &mut view,
                key(),
                &ChatTurn::assistant("a long reply"),
                &interrupts,
                &mut out,
            )
            .await
            .unwrap();

            assert_eq!(String::from_utf8(out).unwrap(), "Assistant: a long reply\n\n");
        }

        #[tokio::test]
        async fn test_interrupt_before_reveal_is_not_remembered() {
            colored::control::set_override(false);
            let mut view = ChatView::new(Duration::from_millis(1), None);
            let interrupts = Arc::new(Notify::new());
            interrupts.notify_waiters();

            let mut out = Vec::new();
            reveal_turn(
                &mut view,
                key(),
                &ChatTurn::assistant("short"),
                &interrupts,
                &mut out,
            )
            .await
            .unwrap();

            assert_eq!(String::from_utf8(out).unwrap(), "Assistant: short\n\n");
        }
    }
}
