// Intent Classification
//
// Inbound grammar, in priority order:
//   cmd <rest>     -> Execute
//   addcmd <rest>  -> Register
//   listcmd        -> List
//   anything else  -> Echo

use super::command::CommandEntry;
use super::error::DomainError;

const EXECUTE_PREFIX: &str = "cmd ";
const REGISTER_PREFIX: &str = "addcmd ";
const LIST_KEYWORD: &str = "listcmd";
const REGISTRATION_SEPARATOR: char = '|';

/// What an inbound message asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Run a named or custom command; `target` is trimmed and may be empty
    Execute { target: String },
    /// Store a command; `payload` is the trimmed text after the prefix
    Register { payload: String },
    /// Enumerate stored commands
    List,
    /// Anything else; `text` is the trimmed message
    Echo { text: String },
}

impl Intent {
    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Execute { .. } => "execute",
            Intent::Register { .. } => "register",
            Intent::List => "list",
            Intent::Echo { .. } => "echo",
        }
    }
}

/// Classify raw message text. Prefixes match ASCII case-insensitively.
pub fn classify(raw_text: &str) -> Intent {
    let text = raw_text.trim();

    if let Some(rest) = strip_prefix_ignore_case(text, EXECUTE_PREFIX) {
        return Intent::Execute {
            target: rest.trim().to_string(),
        };
    }

    if let Some(rest) = strip_prefix_ignore_case(text, REGISTER_PREFIX) {
        return Intent::Register {
            payload: rest.trim().to_string(),
        };
    }

    if text.eq_ignore_ascii_case(LIST_KEYWORD) {
        return Intent::List;
    }

    Intent::Echo {
        text: text.to_string(),
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    // `get` returns None when the prefix length splits a multi-byte char
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Why a registration payload was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// No `|` separator in the payload
    MissingSeparator,
    /// Separator present but a side is blank
    Invalid(DomainError),
}

/// Split `name | command` on the first `|` and validate both sides
pub fn parse_registration(payload: &str) -> Result<CommandEntry, RegistrationError> {
    let (name, shell_command) = payload
        .split_once(REGISTRATION_SEPARATOR)
        .ok_or(RegistrationError::MissingSeparator)?;

    CommandEntry::new(name, shell_command).map_err(RegistrationError::Invalid)
}
