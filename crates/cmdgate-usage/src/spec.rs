//! Parsed argument and flag specifications.
//!
//! A [`Usage`] is the immutable result of parsing one usage template. It is
//! built once per registration and shared by every alias the registration is
//! reachable under; only the literal [`path`](Usage::path) differs between
//! aliases.

use std::fmt;

use crate::error::Result;
use crate::grammar;

/// Type key given to flags that carry no value.
pub const PRESENCE_FLAG_TYPE: &str = "boolean";

/// One positional argument, `<key{Type:permission}>` or `[key{Type}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArgumentSpec {
    /// Key the converted value is stored under.
    pub key: String,
    /// Conversion registry lookup key (the key itself when omitted).
    pub type_name: String,
    /// Permission node the source needs to supply this argument.
    pub permission: Option<String>,
    /// `true` for `<...>`, `false` for `[...]`.
    pub required: bool,
}

impl fmt::Display for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if self.required { ('<', '>') } else { ('[', ']') };
        write!(f, "{}{}", open, self.key)?;
        match (&self.permission, self.type_name == self.key) {
            (Some(perm), _) => write!(f, "{{{}:{}}}", self.type_name, perm)?,
            (None, false) => write!(f, "{{{}}}", self.type_name)?,
            (None, true) => {}
        }
        write!(f, "{}", close)
    }
}

/// One flag, `-s`, `--name`, or `-s|--name`, optionally typed with `{Type}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagSpec {
    /// Key the flag value is stored under.
    pub key: String,
    /// Conversion registry lookup key; [`PRESENCE_FLAG_TYPE`] for presence flags.
    pub type_name: String,
    /// Single-character form accepted as `-c`.
    pub short_form: Option<char>,
}

impl FlagSpec {
    /// Whether the flag consumes a value word.
    pub fn takes_value(&self) -> bool {
        !self.type_name.eq_ignore_ascii_case(PRESENCE_FLAG_TYPE)
    }

    /// Whether `name` (without leading dashes) names this flag.
    pub fn matches_long(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }

    /// Whether `c` is this flag's short form.
    pub fn matches_short(&self, c: char) -> bool {
        self.short_form == Some(c)
    }
}

impl fmt::Display for FlagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.short_form {
            Some(c) if self.key.len() == 1 && self.key.starts_with(c) => write!(f, "-{}", c)?,
            Some(c) => write!(f, "-{}|--{}", c, self.key)?,
            None => write!(f, "--{}", self.key)?,
        }
        if self.takes_value() {
            write!(f, "{{{}}}", self.type_name)?;
        }
        Ok(())
    }
}

/// A parsed usage template: literal command path plus ordered grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub(crate) path: Vec<String>,
    pub(crate) arguments: Vec<ArgumentSpec>,
    pub(crate) flags: Vec<FlagSpec>,
}

impl Usage {
    /// Parse a usage template.
    pub fn parse(template: &str) -> Result<Self> {
        grammar::parse_usage(template)
    }

    /// Literal words that select this command.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Positional arguments, in template order.
    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Flags, in template order.
    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Whether the template declares neither arguments nor flags.
    pub fn is_literal(&self) -> bool {
        self.arguments.is_empty() && self.flags.is_empty()
    }

    /// Number of `<...>` arguments.
    pub fn required_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.required).count()
    }

    /// Same grammar reachable under a different literal path.
    pub fn with_path<I, S>(&self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            arguments: self.arguments.clone(),
            flags: self.flags.clone(),
        }
    }

    /// Look up a flag by its long name (no dashes).
    pub fn flag_by_name(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.matches_long(name))
    }

    /// Look up a flag by its short form.
    pub fn flag_by_short(&self, c: char) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.matches_short(c))
    }

    /// The grammar part of the template, without the path.
    pub fn tail(&self) -> String {
        let mut parts: Vec<String> = self.arguments.iter().map(ToString::to_string).collect();
        parts.extend(self.flags.iter().map(ToString::to_string));
        parts.join(" ")
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join(" "))?;
        let tail = self.tail();
        if !tail.is_empty() {
            write!(f, " {}", tail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_display_omits_shorthand_type() {
        let arg = ArgumentSpec {
            key: "player".into(),
            type_name: "player".into(),
            permission: None,
            required: true,
        };
        assert_eq!(arg.to_string(), "<player>");

        let arg = ArgumentSpec {
            key: "loc".into(),
            type_name: "Location".into(),
            permission: Some("some.perm".into()),
            required: false,
        };
        assert_eq!(arg.to_string(), "[loc{Location:some.perm}]");
    }

    #[test]
    fn test_flag_display() {
        let flag = FlagSpec {
            key: "silent".into(),
            type_name: PRESENCE_FLAG_TYPE.into(),
            short_form: Some('s'),
        };
        assert_eq!(flag.to_string(), "-s|--silent");
        assert!(!flag.takes_value());

        let flag = FlagSpec {
            key: "radius".into(),
            type_name: "Integer".into(),
            short_form: None,
        };
        assert_eq!(flag.to_string(), "--radius{Integer}");
        assert!(flag.takes_value());
    }

    #[test]
    fn test_with_path_keeps_grammar() {
        let usage = Usage::parse("warp <name> [page{Integer}]").unwrap();
        let moved = usage.with_path(["w", "list"]);
        assert_eq!(moved.path(), &["w".to_string(), "list".to_string()]);
        assert_eq!(moved.arguments(), usage.arguments());
        assert_eq!(moved.to_string(), "w list <name> [page{Integer}]");
    }
}
