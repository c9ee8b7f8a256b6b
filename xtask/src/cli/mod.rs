//! Top-level CLI parsing and help output.

use crate::runtime::error::{XtaskError, XtaskResult};

/// Top-level `xtask` command families.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TopLevelCommand {
    Css(Vec<String>),
    Help,
}

/// Parse raw command-line arguments into a top-level command selection.
pub fn parse(args: Vec<String>) -> XtaskResult<TopLevelCommand> {
    let Some(cmd) = args.first().cloned() else {
        return Ok(TopLevelCommand::Help);
    };

    let rest = args[1..].to_vec();
    match cmd.as_str() {
        "css" => Ok(TopLevelCommand::Css(rest)),
        "help" | "--help" | "-h" => Ok(TopLevelCommand::Help),
        other => Err(XtaskError::validation(format!(
            "unknown xtask command: {other}"
        ))),
    }
}

/// Print the canonical top-level usage text.
pub fn print_usage() {
    eprintln!(
        "Usage: cargo xtask <command> [args]\n\
         \n\
         Commands:\n\
           css <subcommand>    Scan component sources and generate the utility stylesheet\n\
                              (build|scan|help; see `cargo xtask css help`)\n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_show_help() {
        assert_eq!(parse(Vec::new()).expect("parse"), TopLevelCommand::Help);
    }

    #[test]
    fn css_keeps_remaining_args() {
        assert_eq!(
            parse(vec!["css".into(), "build".into(), "--src".into(), "ui".into()]).expect("parse"),
            TopLevelCommand::Css(vec!["build".into(), "--src".into(), "ui".into()])
        );
    }

    #[test]
    fn unknown_commands_are_rejected() {
        let err = parse(vec!["deploy".into()]).expect_err("invalid");
        assert!(err.to_string().contains("unknown xtask command: deploy"));
    }
}
