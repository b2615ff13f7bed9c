use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted state of a service. There is no third value: the gate's
/// `loading` state never reaches storage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    #[sea_orm(string_value = "activated")]
    Activated,
    #[sea_orm(string_value = "deactivated")]
    Deactivated,
}

impl ServiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceState::Activated => "activated",
            ServiceState::Deactivated => "deactivated",
        }
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow-list parse; anything but the two values is rejected.
impl FromStr for ServiceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activated" => Ok(ServiceState::Activated),
            "deactivated" => Ok(ServiceState::Deactivated),
            other => Err(format!(
                "Invalid status '{}': expected 'activated' or 'deactivated'",
                other
            )),
        }
    }
}

/// Services seeded into `service_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownService {
    AdminPanel,
    PublicWebsite,
}

impl KnownService {
    pub const ALL: [KnownService; 2] = [KnownService::AdminPanel, KnownService::PublicWebsite];

    /// Value of the `service_name` column
    pub fn name(&self) -> &'static str {
        match self {
            KnownService::AdminPanel => "Admin Panel",
            KnownService::PublicWebsite => "Public Website",
        }
    }

    /// Path segment used by the check endpoints
    pub fn slug(&self) -> &'static str {
        match self {
            KnownService::AdminPanel => "admin-panel",
            KnownService::PublicWebsite => "public-website",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "service_status")]
#[schema(as = ServiceStatus)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub service_name: String,
    pub status: ServiceState,
    #[sea_orm(column_type = "Text")]
    pub maintenance_message: String,
    pub updated_by: Option<String>,
    #[schema(value_type = String)]
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
