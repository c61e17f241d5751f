//! # Distinguished Names
//!
//! Parses certificate subject and issuer strings, as reported by the
//! provider, into a [`DistinguishedName`].
//!
//! A DN is a comma-separated sequence of `TAG=value` assignments. Values may
//! be quoted, in which case they can contain commas and doubled quotes (`""`)
//! stand for a literal quote. Splitting on commas breaks quoted values, so the
//! parser instead locates every `TAG=` boundary and assigns the spans between
//! boundaries in reverse, rightmost first.
//!
//! Parsing never fails. Unknown tags and text before the first tag are
//! dropped.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)=").expect("should compile"));

/// Semantic fields extracted from a DN. Fields absent from the DN are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistinguishedName {
    /// Common name (`CN`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Region or state (`S`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Street address (`STREET`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Organization (`O`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Organizational unit (`OU`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,

    /// Title (`T`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,

    /// Primary state registration number (`ОГРН`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ogrn: Option<String>,

    /// Individual insurance account number (`СНИЛС`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snils: Option<String>,

    /// Taxpayer identification number (`ИНН`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,

    /// Email address (`E`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Locality (`L`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// The DN fields recognised by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// `CN`
    Name,
    /// `S`
    Region,
    /// `STREET`
    Address,
    /// `O`
    Company,
    /// `OU`
    PostType,
    /// `T`
    Post,
    /// `ОГРН` or `OGRN`
    Ogrn,
    /// `СНИЛС` or `SNILS`
    Snils,
    /// `ИНН` or `INN`
    Inn,
    /// `E`
    Email,
    /// `L`
    City,
}

impl Field {
    /// Every field, in canonical rendering order.
    pub const ALL: [Self; 11] = [
        Self::Name,
        Self::Region,
        Self::Address,
        Self::Company,
        Self::PostType,
        Self::Post,
        Self::Ogrn,
        Self::Snils,
        Self::Inn,
        Self::Email,
        Self::City,
    ];

    /// Translate an RDN tag into a field. Tags are case-sensitive.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let field = match tag {
            "CN" => Self::Name,
            "S" => Self::Region,
            "STREET" => Self::Address,
            "O" => Self::Company,
            "OU" => Self::PostType,
            "T" => Self::Post,
            "ОГРН" | "OGRN" => Self::Ogrn,
            "СНИЛС" | "SNILS" => Self::Snils,
            "ИНН" | "INN" => Self::Inn,
            "E" => Self::Email,
            "L" => Self::City,
            _ => return None,
        };
        Some(field)
    }

    /// The tag used when rendering a DN.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Name => "CN",
            Self::Region => "S",
            Self::Address => "STREET",
            Self::Company => "O",
            Self::PostType => "OU",
            Self::Post => "T",
            Self::Ogrn => "ОГРН",
            Self::Snils => "СНИЛС",
            Self::Inn => "ИНН",
            Self::Email => "E",
            Self::City => "L",
        }
    }

    /// The semantic key, as used in serialized output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Region => "region",
            Self::Address => "address",
            Self::Company => "company",
            Self::PostType => "postType",
            Self::Post => "post",
            Self::Ogrn => "ogrn",
            Self::Snils => "snils",
            Self::Inn => "inn",
            Self::Email => "email",
            Self::City => "city",
        }
    }
}

impl DistinguishedName {
    /// Parse a DN string. See [`parse`].
    #[must_use]
    pub fn parse(dn: &str) -> Self {
        parse(dn)
    }

    /// Get the value of a field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Set the value of a field, replacing any previous value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Iterate over the fields that are present, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    /// Returns `true` when no recognised field was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    const fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Name => &self.name,
            Field::Region => &self.region,
            Field::Address => &self.address,
            Field::Company => &self.company,
            Field::PostType => &self.post_type,
            Field::Post => &self.post,
            Field::Ogrn => &self.ogrn,
            Field::Snils => &self.snils,
            Field::Inn => &self.inn,
            Field::Email => &self.email,
            Field::City => &self.city,
        }
    }

    const fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Region => &mut self.region,
            Field::Address => &mut self.address,
            Field::Company => &mut self.company,
            Field::PostType => &mut self.post_type,
            Field::Post => &mut self.post,
            Field::Ogrn => &mut self.ogrn,
            Field::Snils => &mut self.snils,
            Field::Inn => &mut self.inn,
            Field::Email => &mut self.email,
            Field::City => &mut self.city,
        }
    }
}

/// Renders the canonical form: every present field as a quoted assignment,
/// with embedded quotes doubled.
impl Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}=\"{}\"", field.tag(), value.replace('"', "\"\""))?;
        }
        Ok(())
    }
}

/// Parse a DN string into its semantic fields.
///
/// When a tag occurs more than once, the first occurrence in the string wins.
#[must_use]
pub fn parse(dn: &str) -> DistinguishedName {
    // each tag span runs from its `TAG=` boundary to the next boundary
    let boundaries: Vec<_> = TAG_REGEX.captures_iter(dn).collect();

    let mut fields = DistinguishedName::default();
    let mut end = dn.len();

    for caps in boundaries.iter().rev() {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let span = &dn[whole.end()..end];
        end = whole.start();

        if let Some(field) = Field::from_tag(tag.as_str()) {
            fields.set(field, clean(span));
        }
    }

    fields
}

// Strip surrounding whitespace, quotes, and the trailing separator from a
// raw span, then unescape doubled quotes.
fn clean(span: &str) -> String {
    let value = span.trim_start();
    let value = value.strip_prefix('"').unwrap_or(value);

    let value = match value.chars().next_back() {
        Some(c) if c.is_whitespace() => &value[..value.len() - c.len_utf8()],
        _ => value,
    };
    let value = value.strip_suffix(',').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);

    value.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_quoted() {
        assert_eq!(clean(r#""Smith, John","#), "Smith, John");
        assert_eq!(clean(r#"""Director"""#), r#""Director""#);
        assert_eq!(clean("Acme, "), "Acme");
        assert_eq!(clean("  Acme"), "Acme");
        assert_eq!(clean(","), "");
        assert_eq!(clean(""), "");
    }

    // whitespace ahead of the separator is part of the value
    #[test]
    fn clean_keeps_inner_whitespace() {
        assert_eq!(clean("Acme ,"), "Acme ");
    }

    #[test]
    fn tags_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_tag(field.tag()), Some(field));
        }
        assert_eq!(Field::from_tag("cn"), None);
    }

    #[test]
    fn set_and_get() {
        let mut dn = DistinguishedName::default();
        assert!(dn.is_empty());

        dn.set(Field::PostType, "Accounts");
        assert_eq!(dn.get(Field::PostType), Some("Accounts"));
        assert_eq!(dn.post_type.as_deref(), Some("Accounts"));
        assert_eq!(dn.iter().count(), 1);
    }
}
