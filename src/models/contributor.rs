use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A finalized contributor as written to the output document.
///
/// Serialized as one flat object: `avatar`, `name` and one integer field per
/// repository, all keys in alphabetical order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContributorRecord {
    pub avatar: String,
    pub name: String,
    #[serde(flatten)]
    pub commits: BTreeMap<String, i64>,
}

enum FieldValue<'a> {
    Text(&'a str),
    Count(i64),
}

impl Serialize for FieldValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Count(n) => serializer.serialize_i64(*n),
        }
    }
}

impl Serialize for ContributorRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields: BTreeMap<&str, FieldValue<'_>> = self
            .commits
            .iter()
            .map(|(repo, count)| (repo.as_str(), FieldValue::Count(*count)))
            .collect();
        // A repository called "avatar" or "name" would be shadowed here;
        // configured repository names never collide with them.
        fields.insert("avatar", FieldValue::Text(&self.avatar));
        fields.insert("name", FieldValue::Text(&self.name));

        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The JSON artifact consumed by the contributors page.
///
/// Field order matches alphabetical key order so the pretty-printed output
/// is key-sorted at every level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub contrib: Vec<ContributorRecord>,
    pub date: String,
}
