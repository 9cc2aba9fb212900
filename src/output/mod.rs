//! Serialization: turning a tree back into XML text.
//!
//! A generator walks the tree and produces output tokens, the
//! namespace normalizer decides which prefixes and declarations each
//! element needs, and the XML writer renders the tokens, optionally pretty
//! printed.
mod fullname;
mod normalizer;
mod pretty;
mod serializer;
mod xml_serializer;

pub(crate) use fullname::{declared_bindings, qualified, NamespaceNormalizer};
#[cfg(feature = "icu")]
pub use normalizer::NfcNormalizer;
pub use normalizer::{NoopNormalizer, Normalizer};
pub(crate) use pretty::Pretty;
pub(crate) use serializer::{gen_outputs, Output};
pub(crate) use xml_serializer::XmlSerializer;
