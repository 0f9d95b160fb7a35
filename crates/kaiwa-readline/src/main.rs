use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use kaiwa_core::session::{SessionController, SubmitOutcome};
use kaiwa_core::transcript::Role;
use kaiwa_interaction::OpenAiChatClient;

/// Display language. Toggling affects display strings only, never the
/// session state or what is sent to the completion service.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Lang {
    Ja,
    En,
}

impl Lang {
    fn t<'a>(&self, ja: &'a str, en: &'a str) -> &'a str {
        match self {
            Lang::Ja => ja,
            Lang::En => en,
        }
    }

    fn toggle(&mut self) {
        *self = match self {
            Lang::Ja => Lang::En,
            Lang::En => Lang::Ja,
        };
    }
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/clear".to_string(),
                "/lang".to_string(),
                "/quit".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Prints the assistant's latest reply from the session snapshot.
async fn print_latest_reply(controller: &SessionController) {
    let state = controller.snapshot().await;
    if let Some(turn) = state
        .transcript
        .turns()
        .iter()
        .rev()
        .find(|turn| turn.role == Role::Assistant)
    {
        for line in turn.content.lines() {
            println!("{}", line.bright_blue());
        }
        println!();
    }
}

/// The main entry point for the Kaiwa REPL.
///
/// Sets up a rustyline-based chat loop that:
/// 1. Resolves the API credential once at startup and builds the client
/// 2. Forwards plain input to the session controller and awaits the reply
/// 3. Handles /clear, /lang, and /quit with command completion
/// 4. Displays colored output for user, AI, and status messages
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = OpenAiChatClient::try_from_env()?;
    let controller = Arc::new(SessionController::new(Arc::new(client)));

    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    let mut lang = Lang::Ja;

    println!("{}", "=== AIチャットくん 🤖 ===".bright_magenta().bold());
    println!(
        "{}",
        "/clear で履歴クリア, /lang で言語切替, /quit で終了".bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/quit" | "quit" | "exit" => {
                        println!("{}", lang.t("さようなら！", "Goodbye!").bright_green());
                        break;
                    }
                    "/lang" => {
                        lang.toggle();
                        println!(
                            "{}",
                            lang.t("日本語に切り替えました", "Switched to English")
                                .bright_black()
                        );
                        continue;
                    }
                    "/clear" => {
                        controller.clear().await;
                        println!(
                            "{}",
                            lang.t("履歴をクリアしました", "History cleared").bright_black()
                        );
                        continue;
                    }
                    _ => {}
                }

                println!(
                    "{}",
                    format!("{}：{}", lang.t("ユーザー", "User"), trimmed).green()
                );
                println!(
                    "{}",
                    lang.t("考え中...", "Thinking...").bright_black().italic()
                );

                match controller.submit(&line).await {
                    SubmitOutcome::Replied => {
                        println!("{}：", lang.t("AI", "AI").bold());
                        print_latest_reply(&controller).await;
                    }
                    SubmitOutcome::IgnoredEmpty | SubmitOutcome::IgnoredBusy => {}
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!(
                    "{}",
                    lang.t(
                        "CTRL-C を検出しました。/quit で終了します。",
                        "CTRL-C detected. Type '/quit' to exit."
                    )
                    .yellow()
                );
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", lang.t("さようなら！", "Goodbye!").bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
