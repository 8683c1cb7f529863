use yap::{IntoTokens, Tokens};

use crate::ParseError;

/// A field of a component record, e.g. `<bits>8</bits>` or `<line 12>7:4</line 12>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// The flat contents of one component element of a datapath drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tag: String,
    pub fields: Vec<Field>,
}

impl Record {
    /// Returns the value of the first field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|field| field.name == name).map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Open(String),
    Close(String),
    Text(String),
    /// Declarations and comments; they carry no components.
    Markup,
}

impl Part {
    fn is_open(&self, name: &str) -> bool {
        matches!(self, Part::Open(open) if open == name)
    }

    fn is_close(&self, name: &str) -> bool {
        matches!(self, Part::Close(close) if close == name)
    }
}

fn parse_tag(t: &mut impl Tokens<Item = char>) -> Result<Option<Part>, ParseError> {
    let offset = t.offset();
    if !t.token('<') {
        return Ok(None);
    }
    let body = t.take_while(|&c| c != '>' && c != '<').collect::<String>();
    if !t.token('>') {
        return Err(ParseError::new(offset, "unterminated tag"));
    }
    let body = body.trim();
    if body.starts_with('?') || body.starts_with('!') {
        return Ok(Some(Part::Markup));
    }
    Ok(Some(match body.strip_prefix('/') {
        Some(name) => Part::Close(name.trim().to_owned()),
        None => Part::Open(body.to_owned()),
    }))
}

fn tokenize(text: &str) -> Result<Vec<Part>, ParseError> {
    let mut t = text.into_tokens();
    let mut parts = Vec::new();
    while t.peek().is_some() {
        if let Some(part) = parse_tag(&mut t)? {
            if part != Part::Markup {
                parts.push(part);
            }
            continue;
        }
        let run = t.take_while(|&c| c != '<').collect::<String>();
        let run = run.trim();
        if !run.is_empty() {
            parts.push(Part::Text(run.to_owned()));
        }
    }
    Ok(parts)
}

fn collect_fields(parts: &[Part]) -> Vec<Field> {
    let mut fields = Vec::new();
    let mut index = 0;
    while index < parts.len() {
        let Part::Open(name) = &parts[index] else {
            index += 1;
            continue;
        };
        match parts.get(index + 1) {
            Some(Part::Text(value)) => {
                fields.push(Field { name: name.clone(), value: value.clone() });
                index += 2;
            }
            Some(close) if close.is_close(name) => {
                fields.push(Field { name: name.clone(), value: String::new() });
                index += 2;
            }
            _ => index += 1,
        }
    }
    fields
}

/// Splits a datapath drawing into component records.
///
/// A record is any element whose first child is `<number>`; the element's tag is the component type.
/// Elements that do not look like components (document wrappers, layout data) are skipped.
pub fn parse(text: &str) -> Result<Vec<Record>, ParseError> {
    let parts = tokenize(text)?;
    let mut records = Vec::new();
    let mut index = 0;
    while index < parts.len() {
        let Part::Open(tag) = &parts[index] else {
            index += 1;
            continue;
        };
        if !parts.get(index + 1).is_some_and(|part| part.is_open("number")) {
            index += 1;
            continue;
        }
        let Some(length) = parts[index + 1..].iter().position(|part| part.is_close(tag)) else {
            return Err(ParseError::new(text.len(), format!("component <{tag}> is never closed")));
        };
        let end = index + 1 + length;
        records.push(Record { tag: tag.clone(), fields: collect_fields(&parts[index + 1..end]) });
        index = end + 1;
    }
    Ok(records)
}
