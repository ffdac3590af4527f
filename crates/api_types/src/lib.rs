use serde::{Deserialize, Serialize};

/// Body returned by every endpoint that only acknowledges success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub const OK: Ack = Ack { ok: true };
}

/// Body returned alongside any non-2xx status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Lenient field decoding for request bodies.
///
/// Write endpoints apply only string-typed, non-empty fields. Anything else
/// (numbers, booleans, `null`, empty strings) decodes to `None` instead of
/// failing the whole body.
pub mod sparse {
    use serde::{Deserialize, Deserializer, de::IgnoredAny};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Other(IgnoredAny),
    }

    pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Text(value) if !value.is_empty() => Some(value),
            Loose::Text(_) | Loose::Other(_) => None,
        })
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: String,
        pub name: String,
    }

    /// `POST /api/categories`. `name` is required, checked by the handler.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryCreate {
        #[serde(default, deserialize_with = "sparse::non_empty_string")]
        pub name: Option<String>,
    }

    /// `PUT /api/categories/:id`, sparse.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub name: Option<String>,
    }
}

pub mod link {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LinkView {
        pub id: String,
        pub name: String,
        pub url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub alias: Option<String>,
        pub category_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub favicon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub icon_type: Option<String>,
    }

    /// `POST /api/links`. `name`, `url` and `categoryId` are required.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LinkCreate {
        #[serde(default, deserialize_with = "sparse::non_empty_string")]
        pub name: Option<String>,
        #[serde(default, deserialize_with = "sparse::non_empty_string")]
        pub url: Option<String>,
        #[serde(default, deserialize_with = "sparse::non_empty_string")]
        pub category_id: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub alias: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub favicon: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub icon_type: Option<String>,
    }

    /// `PUT /api/links/:id`, sparse.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LinkUpdate {
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub name: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub url: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub category_id: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub alias: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub favicon: Option<String>,
        #[serde(
            default,
            deserialize_with = "sparse::non_empty_string",
            skip_serializing_if = "Option::is_none"
        )]
        pub icon_type: Option<String>,
    }

    /// Query string of `GET /api/links`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LinkFilter {
        pub category_id: Option<String>,
    }
}

pub mod state {
    use super::*;

    use crate::{category::CategoryView, link::LinkView};

    /// The whole persisted document, as served by `GET /api/state`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StateView {
        pub categories: Vec<CategoryView>,
        pub links: Vec<LinkView>,
    }
}

#[cfg(test)]
mod tests {
    use super::{category::CategoryUpdate, link::LinkCreate, link::LinkView};

    #[test]
    fn sparse_fields_ignore_non_strings_and_empty_values() {
        let update: CategoryUpdate = serde_json::from_str(r#"{"name": 5}"#).unwrap();
        assert_eq!(update.name, None);

        let update: CategoryUpdate = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(update.name, None);

        let update: CategoryUpdate = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(update.name, None);

        let update: CategoryUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update.name, None);

        let update: CategoryUpdate = serde_json::from_str(r#"{"name": "Docs"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("Docs"));
    }

    #[test]
    fn link_create_reads_camel_case_and_ignores_unknown_keys() {
        let create: LinkCreate = serde_json::from_str(
            r#"{"name":"Test","url":"https://example.com","categoryId":"2","extra":[1,2]}"#,
        )
        .unwrap();
        assert_eq!(create.category_id.as_deref(), Some("2"));
        assert_eq!(create.icon_type, None);
    }

    #[test]
    fn link_view_omits_absent_optionals() {
        let view = LinkView {
            id: "1".to_string(),
            name: "GitHub".to_string(),
            url: "https://github.com".to_string(),
            alias: None,
            category_id: "1".to_string(),
            favicon: None,
            icon_type: Some("Github".to_string()),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["categoryId"], "1");
        assert_eq!(json["iconType"], "Github");
        assert!(json.get("alias").is_none());
        assert!(json.get("favicon").is_none());
    }
}
