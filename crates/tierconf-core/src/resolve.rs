//! Best-value resolution across tiers

use crate::inspect::Inspection;
use crate::scope::Tier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a value was found and what it is.
///
/// `(Default, None)` means no tier defines the setting. That is an ordinary
/// outcome; callers treat `None` as "unset".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub tier: Tier,
    pub value: Option<Value>,
}

impl Resolution {
    pub fn unset() -> Self {
        Self {
            tier: Tier::Default,
            value: None,
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Walk from `requested` down to `Default` and return the first tier that
/// defines a value.
///
/// Lookup starts at the requested tier, not the most specific one: asking at
/// Global ignores Workspace and Folder values.
pub fn find_best_value(inspection: &Inspection, requested: Tier) -> Resolution {
    requested
        .fallback_chain()
        .find_map(|tier| {
            inspection.value_at(tier).map(|value| Resolution {
                tier,
                value: Some(value.clone()),
            })
        })
        .unwrap_or_else(Resolution::unset)
}
