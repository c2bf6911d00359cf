//! # Element Properties
//!
//! Strongly-typed property records, one per [`ElementType`].
//!
//! Every record keeps unknown keys in a flattened `extra` map so that
//! properties written by newer clients survive a load/save cycle. All
//! type-dependent behaviour (decode, encode, per-type rules) goes through the
//! dispatch methods on [`ElementProps`].

use crate::error::SchemaViolation;
use crate::kinds::ElementType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type PropertyMap = Map<String, Value>;

/// Navigation / footer link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingProps {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphProps {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProps {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProps {
    pub items: Vec<Link>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<Link>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinksProps {
    pub items: Vec<SocialLink>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyrightProps {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub text: String,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceProps {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at: Option<f64>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingProps {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(flatten)]
    pub extra: PropertyMap,
}

/// Element properties, tagged by element type
#[derive(Debug, Clone, PartialEq)]
pub enum ElementProps {
    Heading(HeadingProps),
    Paragraph(ParagraphProps),
    Image(ImageProps),
    Button(ButtonProps),
    Logo(LogoProps),
    Badge(BadgeProps),
    Navigation(NavigationProps),
    Links(LinksProps),
    SocialLinks(SocialLinksProps),
    Copyright(CopyrightProps),
    Text(TextProps),
    Price(PriceProps),
    Rating(RatingProps),
}

impl ElementProps {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementProps::Heading(_) => ElementType::Heading,
            ElementProps::Paragraph(_) => ElementType::Paragraph,
            ElementProps::Image(_) => ElementType::Image,
            ElementProps::Button(_) => ElementType::Button,
            ElementProps::Logo(_) => ElementType::Logo,
            ElementProps::Badge(_) => ElementType::Badge,
            ElementProps::Navigation(_) => ElementType::Navigation,
            ElementProps::Links(_) => ElementType::Links,
            ElementProps::SocialLinks(_) => ElementType::SocialLinks,
            ElementProps::Copyright(_) => ElementType::Copyright,
            ElementProps::Text(_) => ElementType::Text,
            ElementProps::Price(_) => ElementType::Price,
            ElementProps::Rating(_) => ElementType::Rating,
        }
    }

    /// Decode an open property map into the record for `kind`, then apply
    /// the per-type rules
    pub fn from_map(kind: ElementType, map: PropertyMap) -> Result<Self, SchemaViolation> {
        let props = match kind {
            ElementType::Heading => ElementProps::Heading(decode(kind, map)?),
            ElementType::Paragraph => ElementProps::Paragraph(decode(kind, map)?),
            ElementType::Image => ElementProps::Image(decode(kind, map)?),
            ElementType::Button => ElementProps::Button(decode(kind, map)?),
            ElementType::Logo => ElementProps::Logo(decode(kind, map)?),
            ElementType::Badge => ElementProps::Badge(decode(kind, map)?),
            ElementType::Navigation => ElementProps::Navigation(decode(kind, map)?),
            ElementType::Links => ElementProps::Links(decode(kind, map)?),
            ElementType::SocialLinks => ElementProps::SocialLinks(decode(kind, map)?),
            ElementType::Copyright => ElementProps::Copyright(decode(kind, map)?),
            ElementType::Text => ElementProps::Text(decode(kind, map)?),
            ElementType::Price => ElementProps::Price(decode(kind, map)?),
            ElementType::Rating => ElementProps::Rating(decode(kind, map)?),
        };
        props.check()?;
        Ok(props)
    }

    /// Encode back into an open property map (known fields plus extras)
    pub fn to_map(&self) -> Result<PropertyMap, SchemaViolation> {
        let kind = self.element_type();
        match self {
            ElementProps::Heading(p) => encode(kind, p),
            ElementProps::Paragraph(p) => encode(kind, p),
            ElementProps::Image(p) => encode(kind, p),
            ElementProps::Button(p) => encode(kind, p),
            ElementProps::Logo(p) => encode(kind, p),
            ElementProps::Badge(p) => encode(kind, p),
            ElementProps::Navigation(p) => encode(kind, p),
            ElementProps::Links(p) => encode(kind, p),
            ElementProps::SocialLinks(p) => encode(kind, p),
            ElementProps::Copyright(p) => encode(kind, p),
            ElementProps::Text(p) => encode(kind, p),
            ElementProps::Price(p) => encode(kind, p),
            ElementProps::Rating(p) => encode(kind, p),
        }
    }

    /// Per-type rules that serde alone cannot express
    pub fn check(&self) -> Result<(), SchemaViolation> {
        let kind = self.element_type();
        let invalid = |key: &str, message: &str| SchemaViolation::InvalidProperty {
            node_type: kind.as_str(),
            key: key.to_string(),
            message: message.to_string(),
        };

        match self {
            ElementProps::Heading(p) => match p.level {
                Some(level) if !(1..=6).contains(&level) => {
                    Err(invalid("level", "must be between 1 and 6"))
                }
                _ => Ok(()),
            },
            ElementProps::Logo(p) if p.text.is_none() && p.src.is_none() => {
                Err(invalid("text", "a logo needs text or an image src"))
            }
            ElementProps::Price(p) => {
                if !p.amount.is_finite() || p.amount < 0.0 {
                    return Err(invalid("amount", "must be a non-negative number"));
                }
                match p.compare_at {
                    Some(compare_at) if !compare_at.is_finite() || compare_at < 0.0 => {
                        Err(invalid("compareAt", "must be a non-negative number"))
                    }
                    _ => Ok(()),
                }
            }
            ElementProps::Rating(p) if !(0.0..=5.0).contains(&p.value) => {
                Err(invalid("value", "must be between 0 and 5"))
            }
            _ => Ok(()),
        }
    }

    /// Current value of `key`, known field or extra
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().ok().and_then(|mut map| map.remove(key))
    }

    /// Copy of these properties with `key` set to `value`.
    ///
    /// `Value::Null` removes the key. Fails without touching `self` when the
    /// result no longer satisfies the record's type.
    pub fn with_property(&self, key: &str, value: Value) -> Result<Self, SchemaViolation> {
        let kind = self.element_type();
        let mut map = self.to_map()?;
        if value.is_null() {
            map.remove(key);
        } else {
            map.insert(key.to_string(), value);
        }

        Self::from_map(kind, map).map_err(|err| match err {
            SchemaViolation::InvalidProperties { message, .. } => SchemaViolation::InvalidProperty {
                node_type: kind.as_str(),
                key: key.to_string(),
                message,
            },
            other => other,
        })
    }

    /// Keys with a typed slot in this element's record
    pub fn known_keys(kind: ElementType) -> &'static [&'static str] {
        match kind {
            ElementType::Heading => &["text", "level", "align"],
            ElementType::Paragraph => &["text", "align"],
            ElementType::Image => &["src", "alt"],
            ElementType::Button => &["text", "href", "variant"],
            ElementType::Logo => &["text", "src", "href"],
            ElementType::Badge => &["text", "color"],
            ElementType::Navigation => &["items"],
            ElementType::Links => &["title", "items"],
            ElementType::SocialLinks => &["items"],
            ElementType::Copyright => &["text", "year"],
            ElementType::Text => &["text"],
            ElementType::Price => &["amount", "currency", "compareAt"],
            ElementType::Rating => &["value", "count"],
        }
    }
}

fn decode<T: DeserializeOwned>(kind: ElementType, map: PropertyMap) -> Result<T, SchemaViolation> {
    serde_json::from_value(Value::Object(map)).map_err(|e| SchemaViolation::InvalidProperties {
        element_type: kind,
        message: e.to_string(),
    })
}

fn encode<T: Serialize>(kind: ElementType, record: &T) -> Result<PropertyMap, SchemaViolation> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SchemaViolation::InvalidProperties {
            element_type: kind,
            message: "properties did not encode to an object".to_string(),
        }),
        Err(e) => Err(SchemaViolation::InvalidProperties {
            element_type: kind,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> PropertyMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_price_requires_numeric_amount() {
        let err = ElementProps::from_map(ElementType::Price, map(json!({ "amount": "12.00" })))
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaViolation::InvalidProperties {
                element_type: ElementType::Price,
                ..
            }
        ));

        let ok = ElementProps::from_map(ElementType::Price, map(json!({ "amount": 12 }))).unwrap();
        assert_eq!(ok.get("amount"), Some(json!(12.0)));
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let props = ElementProps::from_map(
            ElementType::Heading,
            map(json!({ "text": "Hello", "fontFamily": "Inter" })),
        )
        .unwrap();

        let encoded = props.to_map().unwrap();
        assert_eq!(encoded.get("fontFamily"), Some(&json!("Inter")));
        assert_eq!(encoded.get("text"), Some(&json!("Hello")));
    }

    #[test]
    fn test_heading_level_range() {
        let err = ElementProps::from_map(
            ElementType::Heading,
            map(json!({ "text": "Hi", "level": 9 })),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaViolation::InvalidProperty { ref key, .. } if key == "level"));
    }

    #[test]
    fn test_logo_needs_text_or_src() {
        assert!(ElementProps::from_map(ElementType::Logo, map(json!({}))).is_err());
        assert!(ElementProps::from_map(ElementType::Logo, map(json!({ "src": "/logo.svg" }))).is_ok());
    }

    #[test]
    fn test_with_property_leaves_original_untouched_on_error() {
        let props =
            ElementProps::from_map(ElementType::Rating, map(json!({ "value": 4.5 }))).unwrap();

        let err = props.with_property("value", json!(11)).unwrap_err();
        assert!(matches!(err, SchemaViolation::InvalidProperty { .. }));
        assert_eq!(props.get("value"), Some(json!(4.5)));

        let updated = props.with_property("count", json!(12)).unwrap();
        assert_eq!(updated.get("count"), Some(json!(12)));
    }

    #[test]
    fn test_null_clears_optional_but_not_required() {
        let props = ElementProps::from_map(
            ElementType::Button,
            map(json!({ "text": "Buy", "href": "/shop" })),
        )
        .unwrap();

        let cleared = props.with_property("href", Value::Null).unwrap();
        assert_eq!(cleared.get("href"), None);

        let err = props.with_property("text", Value::Null).unwrap_err();
        assert!(matches!(err, SchemaViolation::InvalidProperty { ref key, .. } if key == "text"));
    }
}
