use anyhow::{bail, Context, Result};

pub const USAGE: &str = "Usage: zoro [init | seed | serve [port] | help]";

#[derive(Debug, PartialEq)]
pub enum Command {
    Chat,
    Init,
    Seed,
    Serve { port: Option<u16> },
    Help,
}

/// Parses the arguments after the program name.
pub fn parse_command(args: &[String]) -> Result<Command> {
    match args.first().map(String::as_str) {
        None => Ok(Command::Chat),
        Some("init") => Ok(Command::Init),
        Some("seed") => Ok(Command::Seed),
        Some("serve") => {
            let port = match args.get(1) {
                Some(p) => Some(p.parse().with_context(|| format!("Invalid port: {}", p))?),
                None => None,
            };
            Ok(Command::Serve { port })
        }
        Some("help" | "-h" | "--help") => Ok(Command::Help),
        Some(other) => bail!("Unknown command: {}\n{}", other, USAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_commands() -> Result<()> {
        assert_eq!(parse_command(&[])?, Command::Chat);
        assert_eq!(parse_command(&args(&["seed"]))?, Command::Seed);
        assert_eq!(parse_command(&args(&["serve"]))?, Command::Serve { port: None });
        assert_eq!(parse_command(&args(&["serve", "9000"]))?, Command::Serve { port: Some(9000) });
        assert_eq!(parse_command(&args(&["--help"]))?, Command::Help);
        Ok(())
    }

    #[test]
    fn test_unknown_flag_is_rejected_not_chat() {
        let err = parse_command(&args(&["--verbose"])).unwrap_err();
        assert!(err.to_string().contains("Unknown command: --verbose"));
        assert!(parse_command(&args(&["chat"])).is_err());
    }

    #[test]
    fn test_bad_port_is_error() {
        assert!(parse_command(&args(&["serve", "eighty"])).is_err());
    }
}
