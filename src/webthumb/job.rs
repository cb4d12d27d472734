//! Thumbnail job record

use time::PrimitiveDateTime;

use crate::binding::{FieldBinding, FromXml, ValueKind};
use crate::error::Result;
use crate::value::Field;

/// A queued thumbnail request, `<job estimate=".." time=".." url=".." cost="..">id</job>`
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Job {
    pub id: String,
    /// Estimated seconds until the job completes
    pub estimate: i32,
    pub time: Option<PrimitiveDateTime>,
    pub url: Option<String>,
    /// Credits charged
    pub cost: i32,
}

impl FromXml for Job {
    fn bindings() -> Vec<FieldBinding> {
        vec![
            FieldBinding::attribute("estimate", "estimate", ValueKind::Integer),
            FieldBinding::attribute("time", "time", ValueKind::DateTime),
            FieldBinding::attribute("url", "url", ValueKind::String),
            FieldBinding::attribute("cost", "cost", ValueKind::Integer),
            FieldBinding::own_text("id", ValueKind::String).required(),
        ]
    }

    fn assign(&mut self, field: Field) -> Result<()> {
        match field.name() {
            "estimate" => self.estimate = field.into_int_or_default()?,
            "time" => self.time = field.into_optional_date_time()?,
            "url" => self.url = field.into_optional_string()?,
            "cost" => self.cost = field.into_int_or_default()?,
            "id" => self.id = field.into_string()?,
            _ => return Err(field.undeclared::<Self>()),
        }
        Ok(())
    }
}
