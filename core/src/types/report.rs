use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of a learner (enrollment) report.
///
/// Only the columns requested through the query's `columns` are populated
/// by the vendor, plus the identifying fields that are always present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerReport {
    pub id: String,
    pub course_name: Option<String>,
    pub surname: Option<String>,
    pub given_name: Option<String>,
    pub learning_module_id: Option<String>,
    pub user_id: Option<String>,
    pub employee_id: Option<String>,
    pub user_email: Option<String>,
    pub alternate_email: Option<String>,
    pub division: Option<String>,
    pub title: Option<String>,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub course_duration: Option<String>,
    pub progress: Option<String>,
    pub grade: Option<String>,
    pub grade_percentage: Option<f64>,
    pub points: Option<u32>,
    pub subscription_name: Option<String>,
    pub variant_name: Option<String>,
    pub enrolled_date: Option<NaiveDateTime>,
    pub started_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub completed_date: Option<NaiveDateTime>,
    pub last_accessed_date: Option<NaiveDateTime>,
    pub created_date: Option<NaiveDateTime>,
    pub modified_date: Option<NaiveDateTime>,
}

impl LearnerReport {
    pub fn is_completed(&self) -> bool {
        self.progress.as_deref() == Some("100")
    }
}
