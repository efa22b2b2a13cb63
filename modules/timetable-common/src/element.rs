use serde::Serialize;

use crate::raw::RawElement;

/// A resource attached to a period: a class, teacher, subject or room.
///
/// The `Substituted` arm stands in for another element (a substitute teacher,
/// a replacement room) and remembers which one it replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Plain {
        id: i64,
        name: String,
        long_name: String,
    },
    Substituted {
        id: i64,
        name: String,
        long_name: String,
        original_id: i64,
        original_name: String,
    },
}

impl Element {
    pub fn id(&self) -> i64 {
        match self {
            Element::Plain { id, .. } | Element::Substituted { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Element::Plain { name, .. } | Element::Substituted { name, .. } => name,
        }
    }

    pub fn long_name(&self) -> &str {
        match self {
            Element::Plain { long_name, .. } | Element::Substituted { long_name, .. } => long_name,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, Element::Substituted { .. })
    }

    /// Id and name of the replaced element, if this is a substitute.
    pub fn original(&self) -> Option<(i64, &str)> {
        match self {
            Element::Plain { .. } => None,
            Element::Substituted {
                original_id,
                original_name,
                ..
            } => Some((*original_id, original_name)),
        }
    }
}

impl From<&RawElement> for Element {
    fn from(raw: &RawElement) -> Self {
        match (raw.orgid, &raw.orgname) {
            (Some(original_id), Some(original_name)) => Element::Substituted {
                id: raw.id,
                name: raw.name.clone(),
                long_name: raw.longname.clone(),
                original_id,
                original_name: original_name.clone(),
            },
            _ => Element::Plain {
                id: raw.id,
                name: raw.name.clone(),
                long_name: raw.longname.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(orgid: Option<i64>, orgname: Option<&str>) -> RawElement {
        RawElement {
            id: 12,
            name: "MUE".to_string(),
            longname: "Mueller".to_string(),
            orgid,
            orgname: orgname.map(String::from),
        }
    }

    #[test]
    fn plain_without_original_fields() {
        let element = Element::from(&raw(None, None));
        assert!(!element.is_substituted());
        assert_eq!(element.id(), 12);
        assert_eq!(element.name(), "MUE");
        assert_eq!(element.long_name(), "Mueller");
        assert_eq!(element.original(), None);
    }

    #[test]
    fn substituted_requires_both_original_fields() {
        assert!(!Element::from(&raw(Some(4), None)).is_substituted());
        assert!(!Element::from(&raw(None, Some("SMI"))).is_substituted());

        let element = Element::from(&raw(Some(4), Some("SMI")));
        assert!(element.is_substituted());
        assert_eq!(element.original(), Some((4, "SMI")));
    }
}
