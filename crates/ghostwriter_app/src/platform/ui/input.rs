use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use ghost_logging::ghost_warn;
use ghostwriter_core::IncomingFile;

pub const HELP: &str = "\
Commands:
  add <path>...   queue image files
  rm <n>          remove queued file n
  view <n>        enlarge queued file n
  close           close the enlarged preview
  models          list available models
  model <id>      select a model
  generate        send the queue for generation
  show            print the current result
  copy            copy the current result to the clipboard
  history         open the history panel
  hide            close the history panel
  open <n>        load history entry n into the result view
  delete <n>      delete history entry n
  help            show this text
  quit            exit";

/// One line of user input. Positions are 1-based, as shown on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<PathBuf>),
    Remove(usize),
    View(usize),
    Close,
    Models,
    Model(String),
    Generate,
    Show,
    Copy,
    History,
    Hide,
    Open(usize),
    Delete(usize),
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Empty);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                return Err("add needs at least one path".to_string());
            }
            Command::Add(rest.iter().map(PathBuf::from).collect())
        }
        "rm" | "remove" => Command::Remove(position(verb, &rest)?),
        "view" => Command::View(position(verb, &rest)?),
        "close" => Command::Close,
        "models" => Command::Models,
        "model" => match rest.as_slice() {
            [id] => Command::Model((*id).to_string()),
            _ => return Err("model needs exactly one id".to_string()),
        },
        "generate" | "gen" => Command::Generate,
        "show" => Command::Show,
        "copy" => Command::Copy,
        "history" => Command::History,
        "hide" => Command::Hide,
        "open" => Command::Open(position(verb, &rest)?),
        "delete" | "del" => Command::Delete(position(verb, &rest)?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{}' (try help)", other)),
    };
    Ok(command)
}

fn position(verb: &str, rest: &[&str]) -> Result<usize, String> {
    match rest {
        [raw] => match raw.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("{} needs a position starting at 1", verb)),
        },
        _ => Err(format!("{} needs exactly one position", verb)),
    }
}

/// Media type for an accepted image file, keyed on its extension.
pub fn image_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Reads image files from disk. Returns the files that loaded and a note
/// for each path that was skipped.
pub fn load_files(paths: &[PathBuf]) -> (Vec<IncomingFile>, Vec<String>) {
    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        let Some(media_type) = image_media_type(path) else {
            skipped.push(format!("{}: not an image", path.display()));
            continue;
        };
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                ghost_warn!("Failed to read {:?}: {}", path, err);
                skipped.push(format!("{}: {}", path.display(), err));
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        files.push(IncomingFile::new(name, Bytes::from(data)).with_media_type(media_type));
    }
    (files, skipped)
}
