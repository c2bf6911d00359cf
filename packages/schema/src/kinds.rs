//! Closed type vocabularies for each level of the document tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Leaf element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Heading,
    Paragraph,
    Image,
    Button,
    Logo,
    Badge,
    Navigation,
    Links,
    SocialLinks,
    Copyright,
    Text,
    Price,
    Rating,
}

impl ElementType {
    pub const ALL: [ElementType; 13] = [
        ElementType::Heading,
        ElementType::Paragraph,
        ElementType::Image,
        ElementType::Button,
        ElementType::Logo,
        ElementType::Badge,
        ElementType::Navigation,
        ElementType::Links,
        ElementType::SocialLinks,
        ElementType::Copyright,
        ElementType::Text,
        ElementType::Price,
        ElementType::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Heading => "Heading",
            ElementType::Paragraph => "Paragraph",
            ElementType::Image => "Image",
            ElementType::Button => "Button",
            ElementType::Logo => "Logo",
            ElementType::Badge => "Badge",
            ElementType::Navigation => "Navigation",
            ElementType::Links => "Links",
            ElementType::SocialLinks => "SocialLinks",
            ElementType::Copyright => "Copyright",
            ElementType::Text => "Text",
            ElementType::Price => "Price",
            ElementType::Rating => "Rating",
        }
    }
}

impl FromStr for ElementType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component (block) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Header,
    HeroImage,
    HeroSlider,
    VideoSlider,
    ProductCard,
    Testimonial,
    Footer,
}

impl ComponentType {
    pub const ALL: [ComponentType; 7] = [
        ComponentType::Header,
        ComponentType::HeroImage,
        ComponentType::HeroSlider,
        ComponentType::VideoSlider,
        ComponentType::ProductCard,
        ComponentType::Testimonial,
        ComponentType::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Header => "Header",
            ComponentType::HeroImage => "HeroImage",
            ComponentType::HeroSlider => "HeroSlider",
            ComponentType::VideoSlider => "VideoSlider",
            ComponentType::ProductCard => "ProductCard",
            ComponentType::Testimonial => "Testimonial",
            ComponentType::Footer => "Footer",
        }
    }
}

impl FromStr for ComponentType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section (page region) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    HeaderSection,
    HeroSection,
    FeaturedProductsSection,
    TestimonialsSection,
    FooterSection,
}

impl SectionType {
    pub const ALL: [SectionType; 5] = [
        SectionType::HeaderSection,
        SectionType::HeroSection,
        SectionType::FeaturedProductsSection,
        SectionType::TestimonialsSection,
        SectionType::FooterSection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::HeaderSection => "HeaderSection",
            SectionType::HeroSection => "HeroSection",
            SectionType::FeaturedProductsSection => "FeaturedProductsSection",
            SectionType::TestimonialsSection => "TestimonialsSection",
            SectionType::FooterSection => "FooterSection",
        }
    }
}

impl FromStr for SectionType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-node editability override.
///
/// `LockedEdit` freezes the node and its subtree entirely (content, position,
/// and children); `LockedReplacing` freezes the node's identity (no delete,
/// replace, or new children) while still allowing in-place property edits.
/// The override itself can always be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditableType {
    #[default]
    Editable,
    LockedReplacing,
    LockedEdit,
}

impl EditableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditableType::Editable => "editable",
            EditableType::LockedReplacing => "locked-replacing",
            EditableType::LockedEdit => "locked-edit",
        }
    }

    /// Whether a mutation of the given class may touch a node with this editability
    pub fn permits(&self, action: EditAction) -> bool {
        match (self, action) {
            (_, EditAction::SetEditable) => true,
            (EditableType::Editable, _) => true,
            (EditableType::LockedEdit, _) => false,
            (
                EditableType::LockedReplacing,
                EditAction::Delete | EditAction::Replace | EditAction::InsertChild,
            ) => false,
            (EditableType::LockedReplacing, _) => true,
        }
    }
}

impl FromStr for EditableType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editable" => Ok(EditableType::Editable),
            "locked-replacing" => Ok(EditableType::LockedReplacing),
            "locked-edit" => Ok(EditableType::LockedEdit),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for EditableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classes of mutation checked against editability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditAction {
    UpdateProperty,
    Move,
    Delete,
    Replace,
    InsertChild,
    SetEditable,
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditAction::UpdateProperty => "update property",
            EditAction::Move => "move",
            EditAction::Delete => "delete",
            EditAction::Replace => "replace",
            EditAction::InsertChild => "insert child",
            EditAction::SetEditable => "set editable",
        };
        f.write_str(name)
    }
}

/// Tree level a node lives at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeLevel {
    Template,
    Section,
    Component,
    Element,
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeLevel::Template => "template",
            NodeLevel::Section => "section",
            NodeLevel::Component => "component",
            NodeLevel::Element => "element",
        };
        f.write_str(name)
    }
}

/// A type name outside the closed vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type `{}`", self.0)
    }
}

impl std::error::Error for UnknownKind {}
