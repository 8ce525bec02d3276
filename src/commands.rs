use std::io::{Error, ErrorKind, Result};

// Shell commands are a single word followed by at most one argument:
// "COMMAND [NAME]". Whatever the argument contains is handed to the engine
// untouched; the engine owns all name validation.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Touch(String),
    Mkdir(String),
    Cd(String),
    Ls(String),
    Pwd,
    Rm(String),
    Help,
    Exit,
}

pub fn parse_command(line: &str) -> Result<ShellCommand> {
    let mut parts = line.split_whitespace();
    let cmd_name = match parts.next() {
        Some(name) => name,
        None => {
            return Err(Error::new(ErrorKind::InvalidInput, "empty command"));
        }
    };
    let arguments = parts.collect::<Vec<&str>>();

    match cmd_name {
        "touch" => {
            let name = single_argument("touch", &arguments)?;
            Ok(ShellCommand::Touch(name))
        }
        "mkdir" => {
            let name = single_argument("mkdir", &arguments)?;
            Ok(ShellCommand::Mkdir(name))
        }
        "cd" => {
            let name = single_argument("cd", &arguments)?;
            Ok(ShellCommand::Cd(name))
        }
        "ls" => {
            // ls takes an optional name; with none it lists the current
            // directory
            match arguments.len() {
                0 => Ok(ShellCommand::Ls(String::new())),
                1 => Ok(ShellCommand::Ls(arguments[0].to_string())),
                _ => Err(usage("ls", "ls [NAME]")),
            }
        }
        "pwd" => {
            no_arguments("pwd", &arguments)?;
            Ok(ShellCommand::Pwd)
        }
        "rm" => {
            let name = single_argument("rm", &arguments)?;
            Ok(ShellCommand::Rm(name))
        }
        "help" => {
            no_arguments("help", &arguments)?;
            Ok(ShellCommand::Help)
        }
        "exit" | "quit" => {
            no_arguments(cmd_name, &arguments)?;
            Ok(ShellCommand::Exit)
        }
        other => Err(Error::new(
            ErrorKind::InvalidInput,
            format!("unknown command `{other}` (try `help`)"),
        )),
    }
}

fn single_argument(cmd_name: &str, arguments: &[&str]) -> Result<String> {
    if arguments.len() != 1 {
        return Err(usage(cmd_name, &format!("{cmd_name} NAME")));
    }
    Ok(arguments[0].to_string())
}

fn no_arguments(cmd_name: &str, arguments: &[&str]) -> Result<()> {
    if !arguments.is_empty() {
        return Err(usage(cmd_name, cmd_name));
    }
    Ok(())
}

fn usage(cmd_name: &str, usage: &str) -> Error {
    Error::new(
        ErrorKind::InvalidInput,
        format!("invalid arguments for `{cmd_name}` (usage: {usage})"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse_command("touch a").unwrap(),
            ShellCommand::Touch("a".to_string())
        );
        assert_eq!(
            parse_command("mkdir dir").unwrap(),
            ShellCommand::Mkdir("dir".to_string())
        );
        assert_eq!(
            parse_command("cd ..").unwrap(),
            ShellCommand::Cd("..".to_string())
        );
        assert_eq!(parse_command("pwd").unwrap(), ShellCommand::Pwd);
        assert_eq!(
            parse_command("rm a").unwrap(),
            ShellCommand::Rm("a".to_string())
        );
        assert_eq!(parse_command("help").unwrap(), ShellCommand::Help);
        assert_eq!(parse_command("exit").unwrap(), ShellCommand::Exit);
        assert_eq!(parse_command("quit").unwrap(), ShellCommand::Exit);
    }

    #[test]
    fn ls_argument_is_optional() {
        assert_eq!(
            parse_command("ls").unwrap(),
            ShellCommand::Ls(String::new())
        );
        assert_eq!(
            parse_command("ls a").unwrap(),
            ShellCommand::Ls("a".to_string())
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            parse_command("  touch   a  ").unwrap(),
            ShellCommand::Touch("a".to_string())
        );
    }

    #[test]
    fn wrong_argument_counts_are_rejected() {
        assert!(parse_command("touch").is_err());
        assert!(parse_command("touch a b").is_err());
        assert!(parse_command("pwd extra").is_err());
        assert!(parse_command("ls a b").is_err());
        assert!(parse_command("cd").is_err());
    }

    #[test]
    fn unknown_and_empty_commands_are_rejected() {
        assert!(parse_command("frobnicate x").is_err());
        assert!(parse_command("").is_err());
        assert!(parse_command("   ").is_err());
    }

    #[test]
    fn slashed_names_pass_through_to_the_engine() {
        // the parser does not validate names, the engine does
        assert_eq!(
            parse_command("touch a/b").unwrap(),
            ShellCommand::Touch("a/b".to_string())
        );
        assert_eq!(
            parse_command("cd /").unwrap(),
            ShellCommand::Cd("/".to_string())
        );
    }
}
