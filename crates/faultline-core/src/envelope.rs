use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{ErrorValue, HttpError};

/// Client-facing error body: `{ "error": { "message", "name" } }`
///
/// Only the message and name are ever written. Opaque errors (runtime
/// faults) serialize their inner object with no fields at all, giving
/// `{ "error": {} }`.
#[derive(Debug, serde::Serialize)]
pub struct ErrorEnvelope<'a> {
    error: ErrorFields<'a>,
}

impl<'a> ErrorEnvelope<'a> {
    pub const fn new(error: &'a ErrorValue) -> Self {
        Self {
            error: ErrorFields(error),
        }
    }
}

#[derive(Debug)]
struct ErrorFields<'a>(&'a ErrorValue);

impl Serialize for ErrorFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let error = self.0;

        if error.is_opaque() {
            return serializer.serialize_map(Some(0))?.end();
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("message", &error.client_message())?;
        map.serialize_entry("name", error.name())?;
        map.end()
    }
}
