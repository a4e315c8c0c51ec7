//! Gender model
//!
//! Small reference catalog used by client profiles. Managed out of band;
//! the API only reads it.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::{default_flag_on, serde_helpers};

pub const GENDER_COLLECTION: &str = "genders";

/// Gender catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gender {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default = "default_flag_on")]
    pub status: u8,
}

/// Public gender view: id and name only
#[derive(Debug, Clone, Serialize)]
pub struct GenderPublic {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
}

impl From<Gender> for GenderPublic {
    fn from(gender: Gender) -> Self {
        Self {
            id: gender.id,
            name: gender.name,
        }
    }
}
