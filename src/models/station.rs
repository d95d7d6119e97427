//! Personal weather station model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{self, ValidationError, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// A weather station registered by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Station {
    pub id: Uuid,

    /// Unique across all stations
    pub station_name: String,

    pub description: String,

    pub latitude: f64,

    pub longitude: f64,

    /// Id of the user who registered the station
    pub owner: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /stations`. The owner is taken from the access token.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewStation {
    pub station_name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewStation {
    pub fn validated(&self) -> Result<NewStation, ValidationError> {
        Ok(NewStation {
            station_name: validation::text("station_name", &self.station_name, MAX_NAME_LEN)?
                .to_string(),
            description: validation::text("description", &self.description, MAX_DESCRIPTION_LEN)?
                .to_string(),
            latitude: validation::latitude(self.latitude)?,
            longitude: validation::longitude(self.longitude)?,
        })
    }
}

/// Body of `PUT /stations/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStation {
    pub station_name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UpdateStation {
    pub fn validated(&self) -> Result<UpdateStation, ValidationError> {
        Ok(UpdateStation {
            station_name: self
                .station_name
                .as_deref()
                .map(|v| validation::text("station_name", v, MAX_NAME_LEN))
                .transpose()?
                .map(str::to_string),
            description: self
                .description
                .as_deref()
                .map(|v| validation::text("description", v, MAX_DESCRIPTION_LEN))
                .transpose()?
                .map(str::to_string),
            latitude: self.latitude.map(validation::latitude).transpose()?,
            longitude: self.longitude.map(validation::longitude).transpose()?,
        })
    }
}
