//! Command text parsing.
//!
//! # Responsibility
//! - Define the parser contract consumed by `CommandPipeline`.
//! - Provide a small whitespace-tokenized reference grammar.
//!
//! # Grammar
//! - `add task TITLE.. [d/DEADLINE] [s/START,END] [t/TAG]..`
//! - `add event TITLE.. s/START,END [t/TAG]..`
//! - `delete VIEW INDEX`
//! - `tag VIEW INDEX [t/TAG]..`
//! - `list [schedule|deadline|floating] [KEYWORD].. [t/TAG]..`
//! - `undo`
//! - `history`
//!
//! Instants are epoch seconds. `VIEW` also accepts `s`, `d`, `f`.

use crate::command::operation::Operation;
use crate::command::ops::{
    AddActivity, DeleteActivity, ListActivities, RetagActivity, ShowHistory, UndoLast,
};
use crate::model::activity::{Activity, ActivityKind, EpochSecond, Schedule};
use crate::model::tag::Tag;
use crate::search::query::ActivityQuery;
use crate::view::descriptor::ViewKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static SCHEDULE_ARG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+),(-?\d+)$").expect("valid schedule argument regex")
});

const ADD_USAGE: &str =
    "add task|event TITLE [d/DEADLINE] [s/START,END] [t/TAG]...";
const DELETE_USAGE: &str = "delete schedule|deadline|floating INDEX";
const TAG_USAGE: &str = "tag schedule|deadline|floating INDEX [t/TAG]...";
const LIST_USAGE: &str = "list [schedule|deadline|floating] [KEYWORD]... [t/TAG]...";

/// Parse failure with a user-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyCommand,
    UnknownCommand(String),
    InvalidArguments {
        command: &'static str,
        message: String,
        usage: &'static str,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "empty command"),
            Self::UnknownCommand(word) => write!(f, "unknown command `{word}`"),
            Self::InvalidArguments {
                command,
                message,
                usage,
            } => write!(f, "invalid `{command}` command: {message}\nusage: {usage}"),
        }
    }
}

impl Error for ParseError {}

/// Turns raw command text into an executable operation.
pub trait CommandParser {
    fn parse(&self, command_text: &str) -> Result<Box<dyn Operation>, ParseError>;
}

/// Reference parser for the built-in grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCommandParser;

impl CommandParser for BasicCommandParser {
    fn parse(&self, command_text: &str) -> Result<Box<dyn Operation>, ParseError> {
        let mut tokens = command_text.split_whitespace();
        let Some(word) = tokens.next() else {
            return Err(ParseError::EmptyCommand);
        };
        let args = tokens.collect::<Vec<_>>();

        match word.to_ascii_lowercase().as_str() {
            "add" => parse_add(&args),
            "delete" => parse_delete(&args),
            "tag" => parse_tag(&args),
            "list" => parse_list(&args),
            "undo" => parse_no_args("undo", "undo", &args).map(|()| boxed(UndoLast)),
            "history" => parse_no_args("history", "history", &args).map(|()| boxed(ShowHistory)),
            _ => Err(ParseError::UnknownCommand(word.to_string())),
        }
    }
}

fn boxed(operation: impl Operation + 'static) -> Box<dyn Operation> {
    Box::new(operation)
}

fn invalid(command: &'static str, usage: &'static str, message: impl Into<String>) -> ParseError {
    ParseError::InvalidArguments {
        command,
        message: message.into(),
        usage,
    }
}

/// Prefixed arguments collected after the leading plain words.
#[derive(Debug, Default)]
struct PrefixedArgs<'a> {
    words: Vec<&'a str>,
    deadline: Option<&'a str>,
    schedule: Option<&'a str>,
    tags: Vec<&'a str>,
}

fn split_prefixed<'a>(
    command: &'static str,
    usage: &'static str,
    args: &[&'a str],
) -> Result<PrefixedArgs<'a>, ParseError> {
    let mut parsed = PrefixedArgs::default();
    let mut seen_prefixed = false;
    for &arg in args {
        if let Some(value) = arg.strip_prefix("t/") {
            parsed.tags.push(value);
        } else if let Some(value) = arg.strip_prefix("d/") {
            if parsed.deadline.replace(value).is_some() {
                return Err(invalid(command, usage, "d/ given more than once"));
            }
        } else if let Some(value) = arg.strip_prefix("s/") {
            if parsed.schedule.replace(value).is_some() {
                return Err(invalid(command, usage, "s/ given more than once"));
            }
        } else if seen_prefixed {
            return Err(invalid(
                command,
                usage,
                format!("unexpected `{arg}` after prefixed arguments"),
            ));
        } else {
            parsed.words.push(arg);
            continue;
        }
        seen_prefixed = true;
    }
    Ok(parsed)
}

fn parse_add(args: &[&str]) -> Result<Box<dyn Operation>, ParseError> {
    let invalid_add = |message: String| invalid("add", ADD_USAGE, message);

    let Some((kind_word, rest)) = args.split_first() else {
        return Err(invalid_add("missing activity kind".to_string()));
    };
    let kind = match kind_word.to_ascii_lowercase().as_str() {
        "task" => ActivityKind::Task,
        "event" => ActivityKind::Event,
        other => return Err(invalid_add(format!("unknown activity kind `{other}`"))),
    };

    let parsed = split_prefixed("add", ADD_USAGE, rest)?;
    let title = parsed.words.join(" ");
    let deadline = parsed
        .deadline
        .map(|value| parse_instant(value).map_err(&invalid_add))
        .transpose()?;
    let schedule = parsed
        .schedule
        .map(|value| parse_schedule(value).map_err(&invalid_add))
        .transpose()?;
    let tags = parse_tags(&parsed.tags).map_err(&invalid_add)?;

    let activity = match (kind, schedule) {
        (ActivityKind::Event, Some(schedule)) => Activity::event(title, schedule),
        (ActivityKind::Event, None) => {
            return Err(invalid_add("an event needs s/START,END".to_string()))
        }
        (ActivityKind::Task, schedule) => Activity::task(title).map(|task| match schedule {
            Some(schedule) => task.with_schedule(schedule),
            None => task,
        }),
    }
    .map_err(|err| invalid_add(err.to_string()))?;

    let activity = match deadline {
        Some(deadline) => activity.with_deadline(deadline),
        None => activity,
    }
    .with_tags(tags);

    Ok(boxed(AddActivity { activity }))
}

fn parse_delete(args: &[&str]) -> Result<Box<dyn Operation>, ParseError> {
    let [view, index] = args else {
        return Err(invalid(
            "delete",
            DELETE_USAGE,
            "expected a view and an index",
        ));
    };
    let view = parse_view(view).map_err(|message| invalid("delete", DELETE_USAGE, message))?;
    let index = parse_index(index).map_err(|message| invalid("delete", DELETE_USAGE, message))?;
    Ok(boxed(DeleteActivity { view, index }))
}

fn parse_tag(args: &[&str]) -> Result<Box<dyn Operation>, ParseError> {
    let invalid_tag = |message: String| invalid("tag", TAG_USAGE, message);

    let [view, index, rest @ ..] = args else {
        return Err(invalid_tag("expected a view and an index".to_string()));
    };
    let view = parse_view(view).map_err(&invalid_tag)?;
    let index = parse_index(index).map_err(&invalid_tag)?;

    let parsed = split_prefixed("tag", TAG_USAGE, rest)?;
    if !parsed.words.is_empty() || parsed.deadline.is_some() || parsed.schedule.is_some() {
        return Err(invalid_tag("only t/TAG arguments are accepted".to_string()));
    }
    let tags = parse_tags(&parsed.tags).map_err(&invalid_tag)?;
    Ok(boxed(RetagActivity { view, index, tags }))
}

fn parse_list(args: &[&str]) -> Result<Box<dyn Operation>, ParseError> {
    let (view, rest) = match args.split_first() {
        Some((first, rest)) => match ViewKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == first.to_ascii_lowercase())
        {
            Some(kind) => (Some(kind), rest),
            None => (None, args),
        },
        None => (None, args),
    };

    let parsed = split_prefixed("list", LIST_USAGE, rest)?;
    if parsed.deadline.is_some() || parsed.schedule.is_some() {
        return Err(invalid(
            "list",
            LIST_USAGE,
            "only keywords and t/TAG arguments are accepted",
        ));
    }
    // Malformed tag names are kept raw; the query drops them itself.
    let query = ActivityQuery::new(
        parsed.words.iter().map(|word| word.to_string()),
        parsed.tags.iter().copied(),
    );
    Ok(boxed(ListActivities { view, query }))
}

fn parse_no_args(command: &'static str, usage: &'static str, args: &[&str]) -> Result<(), ParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(invalid(command, usage, "takes no arguments"))
    }
}

fn parse_view(value: &str) -> Result<ViewKind, String> {
    ViewKind::parse(value).ok_or_else(|| format!("unknown view `{value}`"))
}

fn parse_index(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(format!("index must be a positive integer, got `{value}`")),
    }
}

fn parse_instant(value: &str) -> Result<EpochSecond, String> {
    value
        .parse::<EpochSecond>()
        .map_err(|_| format!("invalid instant `{value}`; expected epoch seconds"))
}

fn parse_schedule(value: &str) -> Result<Schedule, String> {
    let captures = SCHEDULE_ARG_RE
        .captures(value)
        .ok_or_else(|| format!("invalid schedule `{value}`; expected START,END"))?;
    let start = parse_instant(&captures[1])?;
    let end = parse_instant(&captures[2])?;
    Schedule::new(start, end).map_err(|err| err.to_string())
}

fn parse_tags(values: &[&str]) -> Result<BTreeSet<Tag>, String> {
    values
        .iter()
        .map(|value| Tag::parse(value).map_err(|err| err.to_string()))
        .collect()
}
