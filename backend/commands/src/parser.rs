/// Command parsing: turn operator text into a [`Command`].
///
/// Tokenization is POSIX-shell style: space, tab, CR and LF separate words;
/// single and double quotes group text into one word and are stripped; a
/// backslash escapes the next character. Every other character (including `#`, `/`,
/// `~`, `*`, `=`, `-` and `.`) is an ordinary word character; there are no
/// comments.
use cyborg_core::{Command, CyborgError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("no closing quotation")]
    UnclosedQuote,
    #[error("no escaped character")]
    TrailingEscape,
}

/// Split `input` into shell-style words.
pub fn split(input: &str) -> Result<Vec<String>, LexError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Tracks `''` so an empty quoted word still yields a token.
    let mut in_token = false;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ' ' | '\t' | '\r' | '\n' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(LexError::UnclosedQuote),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(LexError::UnclosedQuote),
                        },
                        Some(c) => current.push(c),
                        None => return Err(LexError::UnclosedQuote),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => return Err(LexError::TrailingEscape),
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse command text (prefix already stripped) into a [`Command`].
///
/// The first word is split on its first `.` into module and command name;
/// later dots belong to the command name. The remaining words are the args.
pub fn parse(text: &str) -> Result<Command, CyborgError> {
    let mut tokens = split(text).map_err(|e| CyborgError::parse(e.to_string()))?;
    if tokens.is_empty() {
        return Err(CyborgError::parse("cmd is empty"));
    }

    let args = tokens.split_off(1);
    let head = &tokens[0];
    let Some((module, command)) = head.split_once('.') else {
        return Err(CyborgError::parse("no module path in command"));
    };
    if module.is_empty() {
        return Err(CyborgError::parse("empty module name in command"));
    }
    if command.is_empty() {
        return Err(CyborgError::parse("empty command name in command"));
    }

    Ok(Command {
        module: module.to_string(),
        command: command.to_string(),
        args,
        raw: text.to_string(),
    })
}
