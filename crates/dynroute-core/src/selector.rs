//! Typed model for the `dynamicPages` selector
//!
//! Site configuration authors attach a `dynamicPages` block to a route
//! enhancer to describe which pages the enhancer should be limited to.
//! The block is decoded once, at the configuration boundary, into the
//! types below; the rest of the pipeline never branches on raw value
//! shapes.

use serde::{Deserialize, Serialize};

/// A selector field that may be written as a single scalar or a sequence.
///
/// `withCType: news_pi1` and `withCType: [news_pi1]` decode to the same
/// logical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Normalize to a sequence, wrapping a scalar in a one-element vec.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        value.into_vec()
    }
}

/// Integer page-type discriminator (the `doktype` column).
///
/// Accepts YAML integers and numeric strings; anything else fails
/// deserialization rather than silently querying for a bogus type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Doktype(pub i64);

impl<'de> Deserialize<'de> for Doktype {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Ok(Doktype(value)),
            Raw::Text(text) => text.trim().parse::<i64>().map(Doktype).map_err(|_| {
                serde::de::Error::custom(format!("doktype is not an integer: {text:?}"))
            }),
        }
    }
}

impl From<Doktype> for i64 {
    fn from(value: Doktype) -> Self {
        value.0
    }
}

/// One flex-form narrowing rule: "the stored flex-form blob assigns
/// `value` to the sheet field at `field`".
///
/// Entries missing `field` or `value` are tolerated at decode time and
/// skipped during pattern building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexFormRestriction {
    /// Dotted sheet-field path, e.g. `settings.eventRestriction`.
    #[serde(default)]
    pub field: Option<String>,
    /// Expected `vDEF` value for that field.
    #[serde(default)]
    pub value: Option<String>,
}

impl FlexFormRestriction {
    /// LIKE pattern matching the flex-form XML fragment for this restriction,
    /// or `None` when `field` or `value` is missing.
    ///
    /// `field` and `value` are spliced in verbatim: `%` and `_` inside them
    /// keep their wildcard meaning. Existing configurations depend on that,
    /// so it is not escaped here.
    pub fn as_like_pattern(&self) -> Option<String> {
        let field = self.field.as_deref()?;
        let value = self.value.as_deref()?;
        Some(format!(
            "%<field index=\"{field}\">%<value index=\"vDEF\">{value}</value>%"
        ))
    }
}

/// Value of `withCType` / `withPlugin`: either a bare identifier list or
/// an extended block that also narrows by flex-form content.
///
/// ```yaml
/// # simple form
/// withCType: news_pi1
///
/// # extended form
/// withCType:
///   types:
///     - news_pi1
///   flexFormRestrictions:
///     - field: settings.eventRestriction
///       value: '1'
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginSelection {
    Extended {
        types: OneOrMany<String>,
        #[serde(default, rename = "flexFormRestrictions")]
        flex_form_restrictions: Vec<FlexFormRestriction>,
    },
    Types(OneOrMany<String>),
}

impl PluginSelection {
    /// Split into the identifier list and any flex-form restrictions.
    pub fn into_parts(self) -> (Vec<String>, Vec<FlexFormRestriction>) {
        match self {
            PluginSelection::Extended {
                types,
                flex_form_restrictions,
            } => (types.into_vec(), flex_form_restrictions),
            PluginSelection::Types(types) => (types.into_vec(), Vec::new()),
        }
    }
}

/// The `dynamicPages` block of one route enhancer.
///
/// All four predicates are independent; any combination may be present and
/// their results are unioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicPagesSelector {
    /// Match pages holding content elements with these `CType`s.
    #[serde(default, rename = "withCType", skip_serializing_if = "Option::is_none")]
    pub with_ctype: Option<PluginSelection>,

    /// Match pages holding `list` plugins with these `list_type`s.
    #[serde(default, rename = "withPlugin", skip_serializing_if = "Option::is_none")]
    pub with_plugin: Option<PluginSelection>,

    /// Match pages by their own `doktype`.
    #[serde(default, rename = "withDoktypes", skip_serializing_if = "Option::is_none")]
    pub with_doktypes: Option<OneOrMany<Doktype>>,

    /// Match pages whose `module` field is one of these.
    #[serde(default, rename = "containsModule", skip_serializing_if = "Option::is_none")]
    pub contains_module: Option<OneOrMany<String>>,
}

impl DynamicPagesSelector {
    /// True when no recognized predicate key is present. Resolving an empty
    /// selector yields an empty page list without touching storage.
    pub fn is_empty(&self) -> bool {
        self.with_ctype.is_none()
            && self.with_plugin.is_none()
            && self.with_doktypes.is_none()
            && self.contains_module.is_none()
    }
}
