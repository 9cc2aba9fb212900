use std::borrow::Cow;

use crate::error::Error;

/// Is this character allowed in an XML 1.0 document?
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn parse_reference(entity: &str) -> Result<char, Error> {
    let c = match entity {
        "amp" => '&',
        "apos" => '\'',
        "gt" => '>',
        "lt" => '<',
        "quot" => '"',
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(decimal) = entity.strip_prefix('#') {
                decimal.parse::<u32>().ok()
            } else {
                return Err(Error::MalformedInput(format!(
                    "unknown entity reference &{};",
                    entity
                )));
            };
            return code
                .and_then(char::from_u32)
                .filter(|c| is_xml_char(*c))
                .ok_or_else(|| {
                    Error::MalformedInput(format!("invalid character reference &{};", entity))
                });
        }
    };
    Ok(c)
}

/// Expand references and normalize line ends in parsed character data.
///
/// In attribute values the literal whitespace characters also become
/// spaces. Characters produced by references are never normalized.
pub(crate) fn parse_references(content: &str, is_attribute: bool) -> Result<Cow<str>, Error> {
    let needs_work = |c: char| match c {
        '&' | '\r' => true,
        '\n' | '\t' => is_attribute,
        _ => false,
    };
    if !content.chars().any(needs_work) {
        return Ok(content.into());
    }
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => {
                let mut entity = String::new();
                let mut is_complete = false;
                for c in chars.by_ref() {
                    if c == ';' {
                        is_complete = true;
                        break;
                    }
                    entity.push(c);
                }
                if !is_complete {
                    return Err(Error::MalformedInput(format!(
                        "unclosed entity reference &{}",
                        entity
                    )));
                }
                result.push(parse_reference(&entity)?);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push(if is_attribute { ' ' } else { '\n' });
            }
            '\n' | '\t' if is_attribute => result.push(' '),
            _ => result.push(c),
        }
    }
    Ok(result.into())
}

/// Normalize `\r\n` and lone `\r` to `\n`, for content without references
/// such as CDATA sections, comments and processing instructions.
pub(crate) fn normalize_line_ends(content: &str) -> Cow<str> {
    if !content.contains('\r') {
        return content.into();
    }
    content.replace("\r\n", "\n").replace('\r', "\n").into()
}

fn escape(content: &str, is_attribute: bool) -> Cow<str> {
    let needs_escape = |c: char| match c {
        '&' | '<' | '>' | '"' | '\'' | '\r' => true,
        '\n' | '\t' => is_attribute,
        '\u{7F}'..='\u{9F}' => true,
        c => !is_xml_char(c),
    };
    if !content.chars().any(needs_escape) {
        return content.into();
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            '\r' => result.push_str("&#xD;"),
            '\n' if is_attribute => result.push_str("&#xA;"),
            '\t' if is_attribute => result.push_str("&#x9;"),
            '\u{7F}'..='\u{9F}' => result.push_str(&format!("&#x{:X};", c as u32)),
            // can't be written in XML 1.0 at all
            c if !is_xml_char(c) => result.push('\u{FFFD}'),
            c => result.push(c),
        }
    }
    result.into()
}

/// Escape text content. Text that is only whitespace is written as is,
/// unless it holds a carriage return, which a parser would not keep.
pub(crate) fn serialize_text(content: &str) -> Cow<str> {
    if content.chars().all(|c| matches!(c, ' ' | '\t' | '\n')) {
        return content.into();
    }
    escape(content, false)
}

/// Escape an attribute value for use between double quotes.
pub(crate) fn serialize_attribute(content: &str) -> Cow<str> {
    escape(content, true)
}
