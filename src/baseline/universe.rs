use std::collections::HashMap;

use super::BaselineError;

/// Ordered set of qualifiers under evaluation.
///
/// Position in the caller's list is the label-vector index; the order is
/// never changed after construction.
#[derive(Debug, Clone)]
pub struct QualifierUniverse {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl QualifierUniverse {
    pub fn new(ids: Vec<String>) -> Result<Self, BaselineError> {
        if ids.is_empty() {
            return Err(BaselineError::Configuration(
                "at least one qualifier is required".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), position).is_some() {
                return Err(BaselineError::Configuration(format!(
                    "qualifier '{id}' is listed more than once"
                )));
            }
        }

        Ok(Self { ids, index })
    }

    pub fn index_of(&self, qualifier_id: &str) -> Result<usize, BaselineError> {
        self.index
            .get(qualifier_id)
            .copied()
            .ok_or_else(|| BaselineError::UnknownQualifier(qualifier_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}
