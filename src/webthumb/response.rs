//! `<webthumb>` response root

use crate::binding::{FieldBinding, FromXml};
use crate::error::Result;
use crate::value::Field;
use crate::webthumb::{Credits, Job, JobStatus};

/// Root of every WebThumb API response
///
/// A single response normally carries only one of the three sections; the
/// others stay empty or `None`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Response {
    pub jobs: Vec<Job>,
    pub credits: Option<Credits>,
    pub job_status: Option<JobStatus>,
}

impl FromXml for Response {
    fn bindings() -> Vec<FieldBinding> {
        vec![
            FieldBinding::child_list::<Job>("jobs", Some("jobs"), "job"),
            FieldBinding::child_object::<Credits>("credits", "credits"),
            FieldBinding::child_object::<JobStatus>("job_status", "jobStatus"),
        ]
    }

    fn assign(&mut self, field: Field) -> Result<()> {
        match field.name() {
            "jobs" => self.jobs = field.into_list()?,
            "credits" => self.credits = field.into_optional_object()?,
            "job_status" => self.job_status = field.into_optional_object()?,
            _ => return Err(field.undeclared::<Self>()),
        }
        Ok(())
    }
}
