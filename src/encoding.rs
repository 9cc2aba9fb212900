use std::borrow::Cow;

use encoding_rs::Encoding;
use xhtmlchardet::detect;

use crate::error::Error;

pub(crate) fn encoding(data: &[u8], hint: Option<String>) -> Option<&'static Encoding> {
    let mut cursor = std::io::Cursor::new(data);
    let charsets = detect(&mut cursor, hint).ok()?;
    // no encoding detected
    let label = if charsets.is_empty() {
        "UTF-8"
    } else {
        &charsets[0]
    };
    Encoding::for_label(label.as_bytes())
}

/// Decode raw bytes into text.
///
/// A byte order mark wins; otherwise the encoding is detected from the XML
/// declaration, falling back to UTF-8. Bytes that are not valid in the
/// encoding are [`Error::MalformedInput`].
pub(crate) fn decode(data: &[u8]) -> Result<Cow<str>, Error> {
    let (encoding, data) = match Encoding::for_bom(data) {
        Some((encoding, bom_length)) => (encoding, &data[bom_length..]),
        None => (
            encoding(data, None).unwrap_or(encoding_rs::UTF_8),
            data,
        ),
    };
    log::trace!("decoding input as {}", encoding.name());
    encoding
        .decode_without_bom_handling_and_without_replacement(data)
        .ok_or_else(|| {
            Error::MalformedInput(format!("input is not valid {}", encoding.name()))
        })
}
