//! Account credit balance

use crate::binding::{FieldBinding, FromXml, ValueKind};
use crate::error::Result;
use crate::value::Field;

/// `<credits>` block; each figure is `None` when its element is missing
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Credits {
    pub used_this_month: Option<f64>,
    pub cached_this_month: Option<f64>,
    pub subscription: Option<i64>,
    pub reserve: Option<f64>,
}

impl FromXml for Credits {
    fn bindings() -> Vec<FieldBinding> {
        vec![
            FieldBinding::child_text("used_this_month", "used-this-month", ValueKind::Double),
            FieldBinding::child_text(
                "cached_this_month",
                "easythumb-cached-this-month",
                ValueKind::Double,
            ),
            FieldBinding::child_text("subscription", "subscription", ValueKind::Integer),
            FieldBinding::child_text("reserve", "reserve", ValueKind::Double),
        ]
    }

    fn assign(&mut self, field: Field) -> Result<()> {
        match field.name() {
            "used_this_month" => self.used_this_month = field.into_optional_f64()?,
            "cached_this_month" => self.cached_this_month = field.into_optional_f64()?,
            "subscription" => self.subscription = field.into_optional_int()?,
            "reserve" => self.reserve = field.into_optional_f64()?,
            _ => return Err(field.undeclared::<Self>()),
        }
        Ok(())
    }
}
