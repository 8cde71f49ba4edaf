//! REPL command parsing.

use paws_runtime::core::types::{PetDraft, PetId};

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Help,
    Quit,
    List,
    Search(String),
    Gender(Option<String>),
    Color(Option<String>),
    Reset,
    Show(PetId),
    Favorite(PetId),
    Favorites,
    Interest(PetId),
    Adopters(PetId),
    Labels(Vec<String>),
    Analyze(String),
    Draft,
    Set { field: String, value: String },
    Post(String),
    Mine,
    Available { pet: PetId, available: bool },
    Delete(PetId),
}

pub(crate) const HELP: &str = "\
commands:
  /list                      show the filtered catalog
  /search <text>             filter by breed or species
  /gender <value|any>        filter by gender
  /color <value|any>         filter by color
  /reset                     clear all filters and reload
  /show <id>                 pet details and owner
  /fav <id>                  toggle favorite
  /favs                      list favorites
  /interest <id>             tell the owner you are interested
  /labels <a, b, ..>         guess species/breed from labels
  /analyze <image>           upload an image and pre-fill the draft
  /draft                     show the new-pet draft
  /set <field> <value>       edit a draft field
  /post <image>              submit the draft with an image
  /mine                      pets you posted
  /available <id> <bool>     mark a pet available or adopted
  /adopters <id>             interested adopters for your pet
  /delete <id>               remove a listing
  /quit";

fn filter_value(arg: &str) -> Option<String> {
    if arg.is_empty() || arg.eq_ignore_ascii_case("any") { None } else { Some(arg.to_string()) }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() { Err(format!("usage: {usage}")) } else { Ok(arg) }
}

impl Command {
    /// Parse a trimmed, non-empty input line.
    pub(crate) fn parse(line: &str) -> Result<Self, String> {
        let (name, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = arg.trim();

        let cmd = match name.to_ascii_lowercase().as_str() {
            "/help" | "/?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            "/list" => Self::List,
            "/search" => Self::Search(arg.to_string()),
            "/gender" => Self::Gender(filter_value(arg)),
            "/color" => Self::Color(filter_value(arg)),
            "/reset" => Self::Reset,
            "/show" => Self::Show(required(arg, "/show <id>")?.into()),
            "/fav" => Self::Favorite(required(arg, "/fav <id>")?.into()),
            "/favs" => Self::Favorites,
            "/interest" => Self::Interest(required(arg, "/interest <id>")?.into()),
            "/adopters" => Self::Adopters(required(arg, "/adopters <id>")?.into()),
            "/labels" => Self::Labels(
                arg.split(',').map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect(),
            ),
            "/analyze" => Self::Analyze(required(arg, "/analyze <image path>")?.to_string()),
            "/draft" => Self::Draft,
            "/set" => {
                let usage = "/set <field> <value>";
                let (field, value) =
                    required(arg, usage)?.split_once(char::is_whitespace).unwrap_or((arg, ""));
                Self::Set { field: field.to_ascii_lowercase(), value: value.trim().to_string() }
            }
            "/post" => Self::Post(required(arg, "/post <image path>")?.to_string()),
            "/mine" => Self::Mine,
            "/available" => {
                let usage = "/available <id> <true|false>";
                let (pet, flag) = required(arg, usage)?
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("usage: {usage}"))?;
                let available = flag.trim().parse::<bool>().map_err(|_| format!("usage: {usage}"))?;
                Self::Available { pet: pet.into(), available }
            }
            "/delete" => Self::Delete(required(arg, "/delete <id>")?.into()),
            other => return Err(format!("unknown command '{other}', try /help")),
        };
        Ok(cmd)
    }
}

/// Apply a `/set` edit to the draft.
pub(crate) fn set_draft_field(draft: &mut PetDraft, field: &str, value: &str) -> Result<(), String> {
    let value = value.to_string();
    match field {
        "name" => draft.name = value,
        "species" => draft.species = value,
        "breed" => draft.breed = value,
        "age" => draft.age = value,
        "gender" => draft.gender = value,
        "size" => draft.size = value,
        "color" => draft.color = value,
        "description" => draft.description = value,
        "available" => {
            draft.available = value.parse().map_err(|_| "available must be true or false".to_string())?;
        }
        "latitude" | "longitude" => {
            let coord = if value.is_empty() {
                None
            } else {
                Some(value.parse::<f64>().map_err(|_| format!("{field} must be a number"))?)
            };
            if field == "latitude" {
                draft.latitude = coord;
            } else {
                draft.longitude = coord;
            }
        }
        other => return Err(format!("unknown draft field '{other}'")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_commands() {
        assert_eq!(Command::parse("/search  golden retriever"), Ok(Command::Search("golden retriever".into())));
        assert_eq!(Command::parse("/gender Male"), Ok(Command::Gender(Some("Male".into()))));
        assert_eq!(Command::parse("/gender any"), Ok(Command::Gender(None)));
        assert_eq!(Command::parse("/color"), Ok(Command::Color(None)));
        assert_eq!(Command::parse("/search"), Ok(Command::Search(String::new())));
    }

    #[test]
    fn parses_label_list() {
        assert_eq!(
            Command::parse("/labels Dog, labrador retriever mix ,,"),
            Ok(Command::Labels(vec!["Dog".into(), "labrador retriever mix".into()]))
        );
    }

    #[test]
    fn parses_availability() {
        assert_eq!(
            Command::parse("/available 64f1 false"),
            Ok(Command::Available { pet: PetId::from("64f1"), available: false })
        );
        assert!(Command::parse("/available 64f1").is_err());
        assert!(Command::parse("/available 64f1 maybe").is_err());
    }

    #[test]
    fn id_commands_require_argument() {
        assert!(Command::parse("/fav").is_err());
        assert_eq!(Command::parse("/FAV 7"), Ok(Command::Favorite(PetId::from("7"))));
        assert!(Command::parse("/frobnicate").is_err());
    }

    #[test]
    fn set_edits_draft_fields() {
        let mut draft = PetDraft::default();
        let Ok(Command::Set { field, value }) = Command::parse("/set Description Loves long walks")
        else {
            panic!("expected /set");
        };
        set_draft_field(&mut draft, &field, &value).unwrap();
        assert_eq!(draft.description, "Loves long walks");

        set_draft_field(&mut draft, "latitude", "40.7").unwrap();
        assert_eq!(draft.latitude, Some(40.7));
        assert!(set_draft_field(&mut draft, "available", "yes").is_err());
        assert!(set_draft_field(&mut draft, "owner", "x").is_err());
    }
}
