use std::error::Error;

use serde::de::{self, DeserializeOwned};
use serde_json::{Map, Value};

pub fn error_chain_fmt(e: &impl Error, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

/// Decodes the first JSON value of the body, whatever `Content-Type` the
/// caller sent. Anything after that value is ignored, `null` reads as an
/// empty object and keys match their field case-insensitively.
pub fn decode_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    let value = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .unwrap_or_else(|| serde_json::from_slice(body))?;

    let fields = match value {
        Value::Null => Map::new(),
        Value::Object(fields) => fields,
        other => {
            return Err(de::Error::custom(format!(
                "expected a JSON object, found {other}"
            )));
        }
    };

    let fields = fields
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect();

    T::deserialize(Value::Object(fields))
}
