// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyward shell` command implementation.
//!
//! Signs the user up on first run, otherwise asks for a login, then runs a
//! readline loop over the credential commands. Passwords are read without
//! echo and masked in listings.

use colored::Colorize;
use keyward_config::model::KeywardConfig;
use keyward_config::validation::MAX_GENERATOR_LENGTH;
use keyward_core::KeywardError;
use keyward_vault::{DecryptedCredential, Keyward};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Failed logins allowed before the shell exits.
const MAX_LOGIN_ATTEMPTS: usize = 3;

const HELP: &str = "\
commands:
  list              list all credentials
  search <term>     list credentials whose service contains <term>
  show <n>          reveal the password of credential <n>
  add               add a credential
  edit <n>          edit credential <n>
  delete <n>        delete credential <n>
  gen [length]      generate a password
  logout            log out and return to the login prompt
  help              show this help
  quit              exit";

/// A parsed shell line. Positions are zero-based store indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Search(String),
    Show(usize),
    Add,
    Edit(usize),
    Delete(usize),
    Generate(Option<usize>),
    Logout,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// Credential numbers are entered as shown by `list`, starting at 1.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "list" | "ls" => no_argument(Command::List, verb, rest)?,
        "search" | "find" => {
            if rest.is_empty() {
                return Err("usage: search <term>".to_string());
            }
            Command::Search(rest.to_string())
        }
        "show" => Command::Show(parse_position(rest, "show")?),
        "add" => no_argument(Command::Add, verb, rest)?,
        "edit" => Command::Edit(parse_position(rest, "edit")?),
        "delete" | "rm" => Command::Delete(parse_position(rest, "delete")?),
        "gen" | "generate" => {
            if rest.is_empty() {
                Command::Generate(None)
            } else {
                let length = rest
                    .parse::<usize>()
                    .map_err(|_| format!("invalid length `{rest}`"))?;
                if length > MAX_GENERATOR_LENGTH {
                    return Err(format!("length must be at most {MAX_GENERATOR_LENGTH}"));
                }
                Command::Generate(Some(length))
            }
        }
        "logout" => no_argument(Command::Logout, verb, rest)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "/quit" | "/exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(Some(command))
}

fn no_argument(command: Command, verb: &str, rest: &str) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("`{verb}` takes no arguments"))
    }
}

fn parse_position(arg: &str, verb: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("usage: {verb} <n>, where <n> is a number from `list`")),
    }
}

/// Mask a password for display.
///
/// Shows the first and last 4 characters with "..." in between.
/// Values shorter than 10 characters are fully masked as "****".
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

enum Outcome {
    Logout,
    Quit,
}

/// Runs the `keyward shell` interactive REPL.
pub fn run_shell(config: KeywardConfig) -> Result<(), KeywardError> {
    let mut app = Keyward::open(config);
    let mut rl = DefaultEditor::new()
        .map_err(|e| KeywardError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "keyward".bold().green());
    println!("Type {} for commands, {} to exit.\n", "help".yellow(), "quit".yellow());

    loop {
        if !authenticate(&mut app, &mut rl)? {
            break;
        }
        match command_loop(&mut app, &mut rl)? {
            Outcome::Logout => continue,
            Outcome::Quit => break,
        }
    }

    app.logout();
    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Sign up if needed, then log in. `false` means the user gave up.
fn authenticate(app: &mut Keyward, rl: &mut DefaultEditor) -> Result<bool, KeywardError> {
    if !app.has_account() {
        println!("No account yet. Create one to get started.");
        loop {
            let Some(username) = read_line(rl, "username: ")? else {
                return Ok(false);
            };
            let password = read_password("password: ")?;
            let confirm = read_password("confirm password: ")?;
            match app.signup(&username, password.expose_secret(), confirm.expose_secret()) {
                Ok(()) => {
                    println!("{}", "account created, please log in".green());
                    break;
                }
                Err(e) if e.is_recoverable() => print_error(&e),
                Err(e) => return Err(e),
            }
        }
    }

    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        let Some(username) = read_line(rl, "username: ")? else {
            return Ok(false);
        };
        let password = read_password("password: ")?;
        match app.login(&username, password.expose_secret()) {
            Ok(()) => {
                let count = app.credential_count()?;
                println!(
                    "{} ({count} credential{})",
                    format!("welcome, {}", username.trim()).green(),
                    if count == 1 { "" } else { "s" }
                );
                return Ok(true);
            }
            Err(e @ (KeywardError::Auth | KeywardError::Validation(_))) => {
                print_error(&e);
                debug!(attempt, "login attempt rejected");
            }
            Err(e) => return Err(e),
        }
    }
    eprintln!("{}", "too many failed attempts".red());
    Ok(false)
}

fn command_loop(app: &mut Keyward, rl: &mut DefaultEditor) -> Result<Outcome, KeywardError> {
    let prompt = format!("{}> ", "keyward".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Outcome::Quit),
            Err(e) => {
                return Err(KeywardError::Internal(format!("readline failed: {e}")));
            }
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message.yellow());
                continue;
            }
        };
        let _ = rl.add_history_entry(line.trim());

        match command {
            Command::Logout => {
                app.logout();
                println!("{}", "logged out".dimmed());
                return Ok(Outcome::Logout);
            }
            Command::Quit => return Ok(Outcome::Quit),
            command => {
                if let Err(e) = execute(app, rl, command) {
                    if !e.is_recoverable() {
                        return Err(e);
                    }
                    print_error(&e);
                }
            }
        }
    }
}

fn execute(
    app: &mut Keyward,
    rl: &mut DefaultEditor,
    command: Command,
) -> Result<(), KeywardError> {
    match command {
        Command::List => print_credentials(&app.list_credentials()?),
        Command::Search(term) => print_credentials(&app.search_credentials(&term)?),
        Command::Show(index) => {
            let credential = app.credential(index)?;
            println!(
                "{}  {}  {}",
                credential.service.bold(),
                credential.username,
                credential.password.expose_secret()
            );
        }
        Command::Add => {
            let Some(service) = read_line(rl, "service: ")? else {
                return Ok(());
            };
            let Some(username) = read_line(rl, "username: ")? else {
                return Ok(());
            };
            let password = read_password("password (empty to generate): ")?;
            let password = fill_or_generate(app, password);
            app.add_credential(&service, &username, password.expose_secret())?;
            println!("{}", format!("added {}", service.trim()).green());
        }
        Command::Edit(index) => {
            let current = app.credential(index)?;
            let Some(service) = read_initial(rl, "service: ", &current.service)? else {
                return Ok(());
            };
            let Some(username) = read_initial(rl, "username: ", &current.username)? else {
                return Ok(());
            };
            let entered = read_password("password (empty to keep): ")?;
            let password = if entered.expose_secret().trim().is_empty() {
                current.password
            } else {
                entered
            };
            app.update_credential(index, &service, &username, password.expose_secret())?;
            println!("{}", format!("updated {}", service.trim()).green());
        }
        Command::Delete(index) => {
            let current = app.credential(index)?;
            let question = format!("delete {} ({})? [y/N] ", current.service, current.username);
            let answer = read_line(rl, &question)?.unwrap_or_default();
            if answer.trim().eq_ignore_ascii_case("y") {
                app.delete_credential(index)?;
                println!("{}", format!("deleted {}", current.service).green());
            } else {
                println!("{}", "cancelled".dimmed());
            }
        }
        Command::Generate(length) => {
            let generator = &app.config().generator;
            let password = app.generate_password(
                length.unwrap_or(generator.length),
                generator.numbers,
                generator.symbols,
                generator.uppercase,
            );
            println!("{password}");
        }
        Command::Help => println!("{HELP}"),
        Command::Logout | Command::Quit => {}
    }
    Ok(())
}

fn fill_or_generate(app: &Keyward, entered: SecretString) -> SecretString {
    if !entered.expose_secret().trim().is_empty() {
        return entered;
    }
    let generated = app.generate_default_password();
    println!("generated password: {generated}");
    SecretString::from(generated)
}

fn print_credentials(credentials: &[DecryptedCredential]) {
    if credentials.is_empty() {
        println!("{}", "no credentials".dimmed());
        return;
    }
    for credential in credentials {
        println!(
            "{:>3}. {:<24} {:<24} {}",
            credential.index + 1,
            credential.service,
            credential.username,
            mask_secret(credential.password.expose_secret()).dimmed()
        );
    }
}

fn print_error(e: &KeywardError) {
    eprintln!("{}: {e}", "error".red());
}

/// Read a line; `None` on Ctrl+C or Ctrl+D.
fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>, KeywardError> {
    read_initial(rl, prompt, "")
}

fn read_initial(
    rl: &mut DefaultEditor,
    prompt: &str,
    initial: &str,
) -> Result<Option<String>, KeywardError> {
    match rl.readline_with_initial(prompt, (initial, "")) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(KeywardError::Internal(format!("readline failed: {e}"))),
    }
}

fn read_password(prompt: &str) -> Result<SecretString, KeywardError> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(|e| KeywardError::Internal(format!("failed to read password: {e}")))
}
