use std::borrow::Cow;

/// A text normalizer, applied to text and attribute values on output.
///
/// With the `icu` feature enabled, [`NfcNormalizer`] is used when the
/// `normalize-characters` option is set.
pub trait Normalizer {
    /// Given a piece of text, give back the normalized version.
    fn normalize(content: &str) -> Cow<str>;
}

/// A normalizer that does nothing at all.
pub struct NoopNormalizer;

impl Normalizer for NoopNormalizer {
    #[inline]
    fn normalize(content: &str) -> Cow<str> {
        content.into()
    }
}

/// Unicode Normalization Form C.
#[cfg(feature = "icu")]
pub struct NfcNormalizer;

#[cfg(feature = "icu")]
impl Normalizer for NfcNormalizer {
    fn normalize(content: &str) -> Cow<str> {
        // ascii is always in NFC
        if content.is_ascii() {
            return content.into();
        }
        icu::normalizer::ComposingNormalizer::new_nfc()
            .normalize(content)
            .into()
    }
}
