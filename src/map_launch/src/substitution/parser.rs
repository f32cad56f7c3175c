//! Substitution parser

use crate::{
    error::{ParseError, Result},
    substitution::types::Substitution,
};

/// Parse substitution string like "$(var x)" or "text $(env Y) more"
/// Supports nested substitutions like "$(var $(env NAME)_config)"
pub fn parse_substitutions(input: &str) -> Result<Vec<Substitution>> {
    let mut result = Vec::new();
    let mut chars = input.char_indices().peekable();
    let mut last_pos = 0;

    while let Some((i, ch)) = chars.next() {
        if ch != '$' || !matches!(chars.peek(), Some((_, '('))) {
            continue;
        }

        if i > last_pos {
            result.push(Substitution::Text(input[last_pos..i].to_string()));
        }

        // Skip the '('
        chars.next();

        // Find matching ')' by counting parentheses outside quoted arguments
        let sub_start = i + 2;
        let mut depth = 1;
        let mut quote: Option<char> = None;
        let mut sub_end = None;
        for (pos, c) in chars.by_ref() {
            if let Some(q) = quote {
                if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        sub_end = Some(pos);
                        break;
                    }
                }
                _ => {}
            }
        }

        let sub_end = sub_end.ok_or_else(|| {
            ParseError::InvalidSubstitution(format!(
                "Unmatched parentheses in substitution: {}",
                input
            ))
        })?;

        result.push(parse_substitution_content(&input[sub_start..sub_end])?);
        last_pos = sub_end + 1;
    }

    if last_pos < input.len() {
        result.push(Substitution::Text(input[last_pos..].to_string()));
    }

    // An empty string still resolves to an empty value
    if result.is_empty() {
        result.push(Substitution::Text(input.to_string()));
    }

    Ok(result)
}

/// Parse the content inside a substitution $(...)
fn parse_substitution_content(content: &str) -> Result<Substitution> {
    let trimmed = content.trim();
    let (kind, rest) = match trimmed.find(char::is_whitespace) {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    };

    if kind.is_empty() {
        return Err(ParseError::InvalidSubstitution(
            "Empty substitution".to_string(),
        ));
    }

    let args = split_arguments(rest)?
        .iter()
        .map(|arg| parse_substitutions(arg))
        .collect::<Result<Vec<_>>>()?;

    match (kind, args.len()) {
        ("var", 1) => Ok(Substitution::LaunchConfiguration(single(args))),
        ("env", 1 | 2) => {
            let mut args = args.into_iter();
            let name = args.next().unwrap_or_default();
            Ok(Substitution::EnvironmentVariable {
                name,
                default: args.next(),
            })
        }
        ("find-pkg-share", 1) => Ok(Substitution::FindPackageShare(single(args))),
        ("var" | "env" | "find-pkg-share", n) => Err(ParseError::InvalidSubstitution(format!(
            "$({}) got {} argument(s) in '$({})'",
            kind, n, content
        ))),
        (other, _) => Err(ParseError::InvalidSubstitution(format!(
            "Unsupported substitution type: {}",
            other
        ))),
    }
}

fn single(args: Vec<Vec<Substitution>>) -> Vec<Substitution> {
    args.into_iter().next().unwrap_or_default()
}

/// Split substitution arguments on whitespace, keeping nested `$( … )`
/// groups and quoted strings intact. Quotes are removed.
fn split_arguments(input: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut quoted = false;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' if depth == 0 => {
                    quote = Some(c);
                    quoted = true;
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                c if c.is_whitespace() && depth == 0 => {
                    if !current.is_empty() || quoted {
                        args.push(std::mem::take(&mut current));
                        quoted = false;
                    }
                }
                c => current.push(c),
            },
        }
    }

    if quote.is_some() {
        return Err(ParseError::InvalidSubstitution(format!(
            "Unterminated quote in substitution arguments: {}",
            input.trim()
        )));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
