//! Grammar caching formats.
//!
//! JSON for inspection, postcard for compact binary. Decoding checks that
//! every stored handle points into the decoded arena; plain serde decoding of
//! a [`Grammar`] runs the same check.

use crate::grammar::RawGrammar;
use crate::{Grammar, GraphError};

/// Error while decoding a cached grammar.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary decode error: {0}")]
    Binary(#[from] postcard::Error),

    #[error("decoded grammar is malformed: {0}")]
    Invalid(#[from] GraphError),
}

impl Grammar {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("serialization should not fail")
    }

    pub fn from_json(json: &str) -> Result<Self, SerialError> {
        let raw: RawGrammar = serde_json::from_str(json)?;
        Ok(Grammar::try_from(raw)?)
    }

    pub fn to_binary(&self) -> Vec<u8> {
        postcard::to_allocvec(self).expect("serialization should not fail")
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, SerialError> {
        let raw: RawGrammar = postcard::from_bytes(bytes)?;
        Ok(Grammar::try_from(raw)?)
    }
}
