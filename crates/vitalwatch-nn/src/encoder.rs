//! Class index <-> label mapping.

use serde::{Deserialize, Serialize};

use crate::error::{NnError, NnResult};

/// Ordered list of class labels, as produced by a fitted label encoder.
///
/// The position of a label in `classes` is the class index the network
/// emits for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Create an encoder from its class list.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::Config`] if the list is empty or holds duplicates.
    pub fn new<I, S>(classes: I) -> NnResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let encoder = Self {
            classes: classes.into_iter().map(Into::into).collect(),
        };
        encoder.validate()?;
        Ok(encoder)
    }

    /// Check the class list after deserialization
    pub fn validate(&self) -> NnResult<()> {
        if self.classes.is_empty() {
            return Err(NnError::config("label encoder has no classes"));
        }
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(class) {
                return Err(NnError::config(format!("duplicate class label '{class}'")));
            }
        }
        Ok(())
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false for a validated encoder
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All class labels in index order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Map a class index back to its label
    pub fn inverse_transform(&self, index: usize) -> NnResult<&str> {
        self.classes.get(index).map(String::as_str).ok_or_else(|| {
            NnError::invalid_input(format!(
                "class index {index} out of range for {} classes",
                self.classes.len()
            ))
        })
    }
}
