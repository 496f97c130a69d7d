//! Nom-based usage template parser.
//!
//! Template format:
//!
//! ```text
//! <path> *( <required> / [optional] / flag [ {Type} ] )
//!
//! required = "<" key [ "{" Type [ ":" permission ] "}" ] ">"
//! optional = "[" key [ "{" Type [ ":" permission ] "}" ] "]"
//! flag     = "-" c / "-" name / "--" name / "-" c "|--" name
//! ```
//!
//! Tokens are separated by whitespace. A flag value type may be attached
//! (`--radius{Integer}`) or written as the next token (`--radius {Integer}`).

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, satisfy},
    combinator::{all_consuming, map, opt, recognize},
    sequence::{delimited, pair, preceded, separated_pair},
    IResult,
};
use smallvec::SmallVec;

use crate::error::{Result, UsageError};
use crate::spec::{ArgumentSpec, FlagSpec, Usage, PRESENCE_FLAG_TYPE};

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_type_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '$')
}

fn is_permission_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '<' | '>' | '[' | ']' | ':')
}

fn is_path_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '<' | '>' | '[' | ']' | '|')
}

/// Argument or flag key: starts with a letter, digit or `_`.
fn key(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphanumeric() || c == '_'),
        take_while(is_key_char),
    ))(input)
}

/// `{Type}` or `{Type:permission}`.
fn type_block(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    delimited(
        char('{'),
        pair(
            take_while1(is_type_char),
            opt(preceded(char(':'), take_while1(is_permission_char))),
        ),
        char('}'),
    )(input)
}

/// `{Type}` without a permission, as used by flags.
fn value_type(input: &str) -> IResult<&str, &str> {
    delimited(char('{'), take_while1(is_type_char), char('}'))(input)
}

type Inner<'a> = (&'a str, Option<(&'a str, Option<&'a str>)>);

fn bracket_inner(input: &str) -> IResult<&str, Inner<'_>> {
    pair(key, opt(type_block))(input)
}

fn build_argument((key, typed): Inner<'_>, required: bool) -> ArgumentSpec {
    let (type_name, permission) = match typed {
        Some((ty, perm)) => (ty, perm),
        None => (key, None),
    };
    ArgumentSpec {
        key: key.to_string(),
        type_name: type_name.to_string(),
        permission: permission.map(str::to_string),
        required,
    }
}

fn argument(input: &str) -> IResult<&str, ArgumentSpec> {
    alt((
        map(delimited(char('<'), bracket_inner, char('>')), |inner| {
            build_argument(inner, true)
        }),
        map(delimited(char('['), bracket_inner, char(']')), |inner| {
            build_argument(inner, false)
        }),
    ))(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagName<'a> {
    Short(char),
    Long(&'a str),
    Both(char, &'a str),
}

fn flag_name(input: &str) -> IResult<&str, FlagName<'_>> {
    alt((
        map(
            separated_pair(
                preceded(char('-'), satisfy(char::is_alphanumeric)),
                char('|'),
                preceded(tag("--"), key),
            ),
            |(c, name)| FlagName::Both(c, name),
        ),
        map(preceded(tag("--"), key), FlagName::Long),
        map(preceded(char('-'), key), |name| {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => FlagName::Short(c),
                _ => FlagName::Long(name),
            }
        }),
    ))(input)
}

fn flag(input: &str) -> IResult<&str, FlagSpec> {
    map(pair(flag_name, opt(value_type)), |(name, ty)| {
        let (key, short_form) = match name {
            FlagName::Short(c) => (c.to_string(), Some(c)),
            FlagName::Long(name) => (name.to_string(), None),
            FlagName::Both(c, name) => (name.to_string(), Some(c)),
        };
        FlagSpec {
            key,
            type_name: ty.unwrap_or(PRESENCE_FLAG_TYPE).to_string(),
            short_form,
        }
    })(input)
}

fn path(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| is_path_char(c) && !matches!(c, '-' | '*')),
        take_while(is_path_char),
    ))(input)
}

/// Run `parser` over a whole token, discarding nom's error detail.
fn whole<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    token: &'a str,
) -> Option<O> {
    all_consuming(parser)(token).ok().map(|(_, out)| out)
}

/// Parse a usage template into its path and ordered grammar.
pub(crate) fn parse_usage(template: &str) -> Result<Usage> {
    let tokens: SmallVec<[&str; 8]> = template.split_whitespace().collect();
    let (&head, rest) = tokens.split_first().ok_or(UsageError::Empty)?;

    let head = whole(path, head).ok_or_else(|| UsageError::InvalidPath(head.to_string()))?;

    let mut arguments: Vec<ArgumentSpec> = Vec::new();
    let mut flags: Vec<FlagSpec> = Vec::new();
    // Index into `flags` of the last flag, while it can still take a `{Type}` token.
    let mut open_flag: Option<usize> = None;

    for (offset, &token) in rest.iter().enumerate() {
        let position = offset + 1;
        let invalid = || UsageError::InvalidToken {
            token: token.to_string(),
            position,
        };

        match token.chars().next() {
            Some('<') | Some('[') => {
                let spec = whole(argument, token).ok_or_else(invalid)?;
                if arguments.iter().any(|a| a.key.eq_ignore_ascii_case(&spec.key)) {
                    return Err(UsageError::DuplicateArgument(spec.key));
                }
                if spec.required && arguments.iter().any(|a| !a.required) {
                    return Err(UsageError::RequiredAfterOptional(spec.key));
                }
                arguments.push(spec);
                open_flag = None;
            }
            Some('-') => {
                let spec = whole(flag, token).ok_or_else(invalid)?;
                let clash = flags.iter().any(|f| {
                    f.matches_long(&spec.key)
                        || spec.short_form.is_some_and(|c| f.matches_short(c))
                });
                if clash {
                    return Err(UsageError::DuplicateFlag(spec.to_string()));
                }
                open_flag = (!spec.takes_value()).then_some(flags.len());
                flags.push(spec);
            }
            Some('{') => {
                let ty = whole(value_type, token).ok_or_else(invalid)?;
                let index = open_flag.take().ok_or_else(|| UsageError::DanglingFlagType {
                    token: token.to_string(),
                    position,
                })?;
                flags[index].type_name = ty.to_string();
            }
            _ => return Err(invalid()),
        }
    }

    Ok(Usage {
        path: vec![head.to_string()],
        arguments,
        flags,
    })
}
