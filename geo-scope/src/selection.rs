//! Selection context ("geo").
//!
//! The caller owns the selection and passes it into every filter. At most one
//! level is expected to be populated at a time; when several are, each filter
//! honors only the most specific level it knows about.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::lenient::passthrough;
use crate::types::Extra;

/// A selected record. Only the id is read; the rest rides along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(remote = "Self")]
pub struct Selected {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "typescript", ts(skip))]
    pub extra: Extra,
}

passthrough!(Selected);

impl Selected {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            extra: Extra::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Most specific populated level of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    None = 0,
    Ward = 1,
    Erf = 2,
    Premise = 3,
    Meter = 4,
}

impl Focus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ward => "ward",
            Self::Erf => "erf",
            Self::Premise => "premise",
            Self::Meter => "meter",
        }
    }
}

impl Default for Focus {
    fn default() -> Self {
        Self::None
    }
}

/// The currently focused entity in the Ward → Erf → Premise → Meter hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct GeoSelection {
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub selected_ward: Option<Selected>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub selected_erf: Option<Selected>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub selected_premise: Option<Selected>,
    #[serde(default, deserialize_with = "crate::lenient::option", skip_serializing_if = "Option::is_none")]
    pub selected_meter: Option<Selected>,
}

impl GeoSelection {
    /// Builder: select a ward.
    pub fn with_ward(mut self, id: impl Into<String>) -> Self {
        self.selected_ward = Some(Selected::new(id));
        self
    }

    /// Builder: select an erf.
    pub fn with_erf(mut self, id: impl Into<String>) -> Self {
        self.selected_erf = Some(Selected::new(id));
        self
    }

    /// Builder: select a premise.
    pub fn with_premise(mut self, id: impl Into<String>) -> Self {
        self.selected_premise = Some(Selected::new(id));
        self
    }

    /// Builder: select a meter.
    pub fn with_meter(mut self, id: impl Into<String>) -> Self {
        self.selected_meter = Some(Selected::new(id));
        self
    }

    /// The most specific level that is set.
    pub fn focus(&self) -> Focus {
        if self.selected_meter.is_some() {
            Focus::Meter
        } else if self.selected_premise.is_some() {
            Focus::Premise
        } else if self.selected_erf.is_some() {
            Focus::Erf
        } else if self.selected_ward.is_some() {
            Focus::Ward
        } else {
            Focus::None
        }
    }
}
