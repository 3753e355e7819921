//! Salt normalization

use serde_json::Value;

use crate::{model::Salt, ports::FingerprintError};

impl Salt {
    /// Accept a structured value as salt
    ///
    /// Objects and arrays become [`Salt::Structured`], strings become
    /// [`Salt::Text`]. Numbers, booleans and null are rejected.
    pub fn from_value(value: Value) -> Result<Self, FingerprintError> {
        match value {
            Value::String(text) => Ok(Salt::Text(text)),
            Value::Object(_) | Value::Array(_) => Ok(Salt::Structured(value)),
            Value::Null | Value::Bool(_) | Value::Number(_) => Err(FingerprintError::InvalidSalt),
        }
    }

    /// Check the salt's shape without doing any other work
    pub fn validate(&self) -> Result<(), FingerprintError> {
        match self {
            Salt::Structured(Value::Object(_) | Value::Array(_)) => Ok(()),
            Salt::Structured(_) => Err(FingerprintError::InvalidSalt),
            Salt::Absent | Salt::Bytes(_) | Salt::Text(_) => Ok(()),
        }
    }

    /// Bytes this salt contributes to the digest input
    ///
    /// Absent and empty salts both contribute nothing.
    pub fn to_fragment(&self) -> Result<Option<Vec<u8>>, FingerprintError> {
        self.validate()?;

        let bytes = match self {
            Salt::Absent => return Ok(None),
            Salt::Bytes(bytes) => bytes.clone(),
            Salt::Text(text) => text.as_bytes().to_vec(),
            Salt::Structured(value) => {
                serde_json::to_vec(value).map_err(|_| FingerprintError::InvalidSalt)?
            }
        };

        Ok((!bytes.is_empty()).then_some(bytes))
    }
}

impl TryFrom<Value> for Salt {
    type Error = FingerprintError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Salt::from_value(value)
    }
}
