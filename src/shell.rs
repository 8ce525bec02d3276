//! Interactive shell over the directory tree engine.
//!
//! One line of input becomes exactly one engine call. The shell renders the
//! results and owns nothing else: no tree logic, no name validation. Every
//! engine failure is rendered identically, so a user cannot tell a malformed
//! name from a missing one.

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

use nu_ansi_term::Color;
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    Reedline, Signal,
};
use tracing::debug;

use crate::commands::{parse_command, ShellCommand};
use crate::fsystem::{FileSystem, Listing};

const BANNER: &str = "Ournix file system simulator.\n\
Type `help` for available commands, `exit` to quit.";

const HELP_TEXT: &str = "Available commands:
  touch NAME    create a file, or bump its timestamp if it exists
  mkdir NAME    create a subdirectory
  cd NAME       change directory (`.`, `..` and `/` work as usual)
  ls [NAME]     list a directory, or report a single file
  pwd           print the current directory's path
  rm NAME       remove a file, or a directory and everything in it
  help          show this text
  exit          leave the shell";

/// What executing one command produced.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// The engine call succeeded, possibly with text to display.
    Ok(Option<String>),
    /// The engine rejected the operation. Rendered uniformly on purpose.
    Failed,
    Help,
    Exit,
}

/// Runs the read-eval loop until the user exits, then tears the tree down.
pub fn run(mut fs: FileSystem) -> io::Result<()> {
    let mut line_editor = build_line_editor();
    println!("{}", Color::Cyan.paint(BANNER));

    loop {
        let prompt = ShellPrompt {
            path: fs.pwd().unwrap_or_else(|_| "?".to_string()),
        };
        match line_editor.read_line(&prompt)? {
            Signal::Success(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!("read command line: {line}");
                let command = match parse_command(line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", Color::Red.paint(e.to_string()));
                        continue;
                    }
                };
                match execute(&mut fs, command) {
                    CommandResult::Ok(None) => {}
                    CommandResult::Ok(Some(text)) => {
                        if !text.is_empty() {
                            println!("{text}");
                        }
                    }
                    CommandResult::Failed => {
                        println!("{}", Color::Red.paint("invalid operation"));
                    }
                    CommandResult::Help => println!("{HELP_TEXT}"),
                    CommandResult::Exit => break,
                }
            }
            Signal::CtrlC => {
                println!("^C (use `exit` to quit)");
            }
            Signal::CtrlD => break,
        }
    }

    fs.teardown();
    Ok(())
}

/// Dispatches one parsed command onto the engine.
pub fn execute(fs: &mut FileSystem, command: ShellCommand) -> CommandResult {
    let result = match command {
        ShellCommand::Touch(name) => fs.touch(&name).map(|_| None),
        ShellCommand::Mkdir(name) => fs.mkdir(&name).map(|_| None),
        ShellCommand::Cd(name) => fs.cd(&name).map(|_| None),
        ShellCommand::Ls(name) => fs.ls(&name).map(|listing| Some(format_listing(&listing))),
        ShellCommand::Pwd => fs.pwd().map(Some),
        ShellCommand::Rm(name) => fs.rm(&name).map(|_| None),
        ShellCommand::Help => return CommandResult::Help,
        ShellCommand::Exit => return CommandResult::Exit,
    };
    match result {
        Ok(output) => CommandResult::Ok(output),
        Err(e) => {
            debug!("operation failed: {e}");
            CommandResult::Failed
        }
    }
}

fn format_listing(listing: &Listing) -> String {
    match listing {
        Listing::Directory(entries) => entries
            .iter()
            .map(|entry| {
                if entry.is_dir {
                    Color::Blue
                        .bold()
                        .paint(format!("{}/", entry.name))
                        .to_string()
                } else {
                    entry.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Listing::File(file) => format!("{} {}", file.name, file.timestamp),
    }
}

fn build_line_editor() -> Reedline {
    let mut line_editor = Reedline::create();
    if let Some(history_path) = get_history_path() {
        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(history) = FileBackedHistory::with_file(500, history_path) {
            line_editor = line_editor.with_history(Box::new(history));
        }
    }
    line_editor
}

fn get_history_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.data_dir().join("ournix").join("history.txt"))
}

struct ShellPrompt {
    path: String,
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(Color::Yellow.paint(&self.path).to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Owned(format!("{} ", Color::Green.bold().paint(">")))
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_and_mkdir_produce_no_output() {
        let mut fs = FileSystem::new();
        assert_eq!(
            execute(&mut fs, ShellCommand::Touch("a".to_string())),
            CommandResult::Ok(None)
        );
        assert_eq!(
            execute(&mut fs, ShellCommand::Mkdir("d".to_string())),
            CommandResult::Ok(None)
        );
    }

    #[test]
    fn pwd_prints_the_current_path() {
        let mut fs = FileSystem::new();
        execute(&mut fs, ShellCommand::Mkdir("a".to_string()));
        execute(&mut fs, ShellCommand::Cd("a".to_string()));
        assert_eq!(
            execute(&mut fs, ShellCommand::Pwd),
            CommandResult::Ok(Some("/a".to_string()))
        );
    }

    #[test]
    fn every_engine_failure_renders_the_same_way() {
        let mut fs = FileSystem::new();
        // malformed name and missing target are indistinguishable to the user
        assert_eq!(
            execute(&mut fs, ShellCommand::Touch("a/b".to_string())),
            CommandResult::Failed
        );
        assert_eq!(
            execute(&mut fs, ShellCommand::Cd("missing".to_string())),
            CommandResult::Failed
        );
        assert_eq!(
            execute(&mut fs, ShellCommand::Rm("missing".to_string())),
            CommandResult::Failed
        );
    }

    #[test]
    fn listing_renders_directories_with_a_trailing_slash() {
        let mut fs = FileSystem::new();
        execute(&mut fs, ShellCommand::Touch("b".to_string()));
        execute(&mut fs, ShellCommand::Mkdir("a".to_string()));
        let expected = format!("{}\nb", Color::Blue.bold().paint("a/"));
        assert_eq!(
            execute(&mut fs, ShellCommand::Ls(String::new())),
            CommandResult::Ok(Some(expected))
        );
    }

    #[test]
    fn listing_a_file_reports_name_and_timestamp() {
        let mut fs = FileSystem::new();
        execute(&mut fs, ShellCommand::Touch("x".to_string()));
        execute(&mut fs, ShellCommand::Touch("x".to_string()));
        assert_eq!(
            execute(&mut fs, ShellCommand::Ls("x".to_string())),
            CommandResult::Ok(Some("x 2".to_string()))
        );
    }

    #[test]
    fn empty_directory_lists_as_empty_output() {
        let mut fs = FileSystem::new();
        assert_eq!(
            execute(&mut fs, ShellCommand::Ls(String::new())),
            CommandResult::Ok(Some(String::new()))
        );
    }

    #[test]
    fn help_and_exit_short_circuit() {
        let mut fs = FileSystem::new();
        assert_eq!(execute(&mut fs, ShellCommand::Help), CommandResult::Help);
        assert_eq!(execute(&mut fs, ShellCommand::Exit), CommandResult::Exit);
    }
}
