use crate::app::Message;
use issuequest_core::{CoreError, DateWindow, DifficultyFilter, LanguageFilter, Tab};
use search_controller::Event;

pub const HELP: &str = "\
Commands:
  search <text>                       filter titles (applied after a short pause)
  lang <name|all>                     restrict to one language
  window <all|today|week|month>       only issues created recently
  difficulty <all|easy|medium|hard>   filter by estimated difficulty
  more                                load the next page
  refresh                             search again with the current filters
  tab <discover|trending|saved>       switch tabs
  star <n>                            save or unsave issue n
  guide <n>                           show or hide the AI guide for issue n
  dismiss                             hide the error banner
  show                                render the current view
  help                                show this help
  quit                                exit";

/// One line of user input, parsed.
#[derive(Debug)]
pub enum Input {
    Message(Message),
    Show,
    Help,
    Quit,
    Empty,
}

pub fn parse(line: &str) -> Result<Input, CoreError> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let input = match command.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "search" | "s" => Input::Message(Message::Search(Event::SearchInputChanged(
            argument.to_string(),
        ))),
        "lang" | "language" => Input::Message(Message::Search(Event::LanguageChanged(
            argument.parse::<LanguageFilter>()?,
        ))),
        "window" | "date" => Input::Message(Message::Search(Event::DateWindowChanged(
            argument.parse::<DateWindow>()?,
        ))),
        "difficulty" | "diff" => Input::Message(Message::Search(Event::DifficultyChanged(
            argument.parse::<DifficultyFilter>()?,
        ))),
        "more" => Input::Message(Message::Search(Event::LoadMore)),
        "refresh" => Input::Message(Message::Search(Event::Refresh)),
        "dismiss" => Input::Message(Message::Search(Event::DismissError)),
        "tab" => Input::Message(Message::SwitchTab(argument.parse::<Tab>()?)),
        "star" => Input::Message(Message::ToggleBookmark(position(argument)?)),
        "guide" => Input::Message(Message::RequestGuide(position(argument)?)),
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => {
            return Err(CoreError::InvalidInput {
                message: format!("unknown command '{other}', type `help` for a list"),
            })
        }
    };
    Ok(input)
}

fn position(argument: &str) -> Result<usize, CoreError> {
    match argument.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CoreError::InvalidInput {
            message: format!("expected an issue number starting at 1, got '{argument}'"),
        }),
    }
}
