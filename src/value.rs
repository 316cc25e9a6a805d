use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

/// The ordered map at the root of every parse, and at every nested object
/// position. Keys preserve first-insertion order.
pub type QsObject<'qs> = IndexMap<Cow<'qs, str>, QsValue<'qs>>;

/// An ordered sequence of values.
pub type QsArray<'qs> = Vec<QsValue<'qs>>;

/// One node of the parsed tree.
///
/// Leaves are opaque text: the parser has no notion of numbers or booleans.
/// `Null` is the value of a pair with an empty value string (`key=`).
/// Borrowed where the input needed no decoding, owned otherwise.
#[derive(Clone, PartialEq, Eq)]
pub enum QsValue<'qs> {
    Null,
    String(Cow<'qs, str>),
    Array(QsArray<'qs>),
    Object(QsObject<'qs>),
}

impl<'qs> QsValue<'qs> {
    pub fn is_null(&self) -> bool {
        matches!(self, QsValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QsValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&QsArray<'qs>> {
        match self {
            QsValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&QsObject<'qs>> {
        match self {
            QsValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Copies any borrowed text so the tree can outlive the input it was
    /// parsed from.
    pub fn into_owned(self) -> QsValue<'static> {
        match self {
            QsValue::Null => QsValue::Null,
            QsValue::String(s) => QsValue::String(Cow::Owned(s.into_owned())),
            QsValue::Array(items) => {
                QsValue::Array(items.into_iter().map(QsValue::into_owned).collect())
            }
            QsValue::Object(map) => QsValue::Object(
                map.into_iter()
                    .map(|(k, v)| (Cow::Owned(k.into_owned()), v.into_owned()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for QsValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QsValue::Null => write!(f, "Null"),
            QsValue::String(s) => write!(f, "String({s:?})"),
            QsValue::Array(items) => f.debug_list().entries(items.iter()).finish(),
            QsValue::Object(map) => f.debug_map().entries(map.iter()).finish(),
        }
    }
}

impl<'qs> From<&'qs str> for QsValue<'qs> {
    fn from(s: &'qs str) -> Self {
        QsValue::String(Cow::Borrowed(s))
    }
}

impl From<String> for QsValue<'_> {
    fn from(s: String) -> Self {
        QsValue::String(Cow::Owned(s))
    }
}

impl<'qs> From<QsArray<'qs>> for QsValue<'qs> {
    fn from(items: QsArray<'qs>) -> Self {
        QsValue::Array(items)
    }
}

impl<'qs> From<QsObject<'qs>> for QsValue<'qs> {
    fn from(map: QsObject<'qs>) -> Self {
        QsValue::Object(map)
    }
}
