//! Job status records

use time::PrimitiveDateTime;

use crate::binding::{FieldBinding, FromXml, ValueKind};
use crate::error::Result;
use crate::value::Field;

/// Own text of a `<status>` element once the job is done
pub const COMPLETE: &str = "Complete";

/// State of one submitted job
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Status {
    pub id: Option<String>,
    pub submission_time: Option<PrimitiveDateTime>,
    pub browser_width: i32,
    pub browser_height: i32,
    /// `inProcess='1'`
    pub in_process: bool,
    pub pickup_url: Option<String>,
    pub completion_time: Option<PrimitiveDateTime>,
    pub state: Option<String>,
}

impl Status {
    pub fn is_in_process(&self) -> bool {
        self.in_process
    }

    pub fn is_completed(&self) -> bool {
        self.state.as_deref().map(str::trim) == Some(COMPLETE) || self.completion_time.is_some()
    }
}

impl FromXml for Status {
    fn bindings() -> Vec<FieldBinding> {
        vec![
            FieldBinding::attribute("id", "id", ValueKind::String),
            FieldBinding::attribute("submission_time", "submissionTime", ValueKind::DateTime),
            FieldBinding::attribute("browser_width", "browserWidth", ValueKind::Integer),
            FieldBinding::attribute("browser_height", "browserHeight", ValueKind::Integer),
            FieldBinding::attribute("in_process", "inProcess", ValueKind::Flag { sentinel: "1" }),
            FieldBinding::attribute("pickup_url", "pickup", ValueKind::String),
            FieldBinding::attribute("completion_time", "completionTime", ValueKind::DateTime),
            FieldBinding::own_text("state", ValueKind::String),
        ]
    }

    fn assign(&mut self, field: Field) -> Result<()> {
        match field.name() {
            "id" => self.id = field.into_optional_string()?,
            "submission_time" => self.submission_time = field.into_optional_date_time()?,
            "browser_width" => self.browser_width = field.into_int_or_default()?,
            "browser_height" => self.browser_height = field.into_int_or_default()?,
            "in_process" => self.in_process = field.into_bool()?,
            "pickup_url" => self.pickup_url = field.into_optional_string()?,
            "completion_time" => self.completion_time = field.into_optional_date_time()?,
            "state" => self.state = field.into_optional_string()?,
            _ => return Err(field.undeclared::<Self>()),
        }
        Ok(())
    }
}

/// `<jobStatus>` container of [`Status`] records in document order
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct JobStatus {
    pub statuses: Vec<Status>,
}

impl FromXml for JobStatus {
    fn bindings() -> Vec<FieldBinding> {
        vec![FieldBinding::child_list::<Status>("statuses", None, "status")]
    }

    fn assign(&mut self, field: Field) -> Result<()> {
        match field.name() {
            "statuses" => self.statuses = field.into_list()?,
            _ => return Err(field.undeclared::<Self>()),
        }
        Ok(())
    }
}
