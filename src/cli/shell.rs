use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::{hint as output_hint, info as output_info, section as output_section};

/// When set, commands are read line by line from stdin without prompts.
pub const SCRIPT_ENV: &str = "SITE_INVENTORY_CLI_SCRIPT";

/// Commands whose first argument is a category name.
const CATEGORY_COMMANDS: &[&str] = &[
    "inventory",
    "receive",
    "consume",
    "transfer",
    "report",
    "add-material",
];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output_section(format!("{} - Material Inventory", context.engine.site_name()));
    output_hint("Type `help` to list commands, `exit` to quit.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
                // add-category may have introduced a new completion target.
                if let Some(helper) = editor.helper_mut() {
                    helper.refresh_categories(context);
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names in the first position and category names in the second.
struct CommandHelper {
    commands: Vec<String>,
    categories: Vec<String>,
}

impl CommandHelper {
    fn new(context: &ShellContext) -> Self {
        let mut commands: Vec<String> = context
            .command_names()
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        let mut helper = Self {
            commands,
            categories: Vec::new(),
        };
        helper.refresh_categories(context);
        helper
    }

    fn refresh_categories(&mut self, context: &ShellContext) {
        self.categories = context
            .engine
            .categories()
            .iter()
            .map(|category| category.name.clone())
            .collect();
    }

    fn candidates(&self, position: usize, command: &str, needle: &str) -> Vec<Pair> {
        let pool: &[String] = match position {
            0 => &self.commands,
            1 if CATEGORY_COMMANDS.contains(&command) => &self.categories,
            _ => return Vec::new(),
        };
        pool.iter()
            .filter(|name| name.to_ascii_lowercase().starts_with(needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let command = words
            .first()
            .map(|word| word.to_ascii_lowercase())
            .unwrap_or_default();
        let needle = prefix[start..].to_ascii_lowercase();

        Ok((start, self.candidates(words.len(), &command, &needle)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper {
            commands: vec!["receive".into(), "report".into(), "transfer".into()],
            categories: vec!["general_materials".into(), "paint_materials".into()],
        }
    }

    #[test]
    fn quoted_names_stay_together() {
        let tokens = parse_command_line(r#"receive paint "Spider Kits" 2 --remarks 'for lobby'"#)
            .unwrap();
        assert_eq!(
            tokens,
            vec!["receive", "paint", "Spider Kits", "2", "--remarks", "for lobby"]
        );
        assert!(parse_command_line("receive \"unterminated").is_err());
    }

    #[test]
    fn completion_depends_on_word_position() {
        let helper = helper();
        let commands: Vec<_> = helper
            .candidates(0, "", "re")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(commands, vec!["receive", "report"]);

        let categories = helper.candidates(1, "receive", "pa");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].replacement, "paint_materials");

        assert!(helper.candidates(1, "help", "pa").is_empty());
        assert!(helper.candidates(2, "receive", "").is_empty());
    }
}
