//! Aggregate statistics served by `/api/dashboard/*` and `/api/density-map`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenderCount {
    pub gender: Option<String>,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupCount {
    pub group: Option<String>,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationCount {
    pub rt: Option<String>,
    pub rw: Option<String>,
    pub count: u64,
}

/// Response of `GET /api/dashboard/demographics`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Demographics {
    pub total_lansia: u64,
    #[serde(default)]
    pub by_gender: Vec<GenderCount>,
    #[serde(default)]
    pub by_age_group: Vec<GroupCount>,
    #[serde(default)]
    pub by_location: Vec<LocationCount>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionCount {
    pub condition: String,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiseaseCount {
    pub disease: String,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Response of `GET /api/dashboard/health`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStats {
    #[serde(default)]
    pub health_conditions: Vec<ConditionCount>,
    #[serde(default)]
    pub chronic_diseases: Vec<DiseaseCount>,
    #[serde(default)]
    pub nutrition_status: Vec<StatusCount>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NeedCount {
    pub need: String,
    pub count: u64,
}

/// Response of `GET /api/dashboard/social-welfare`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialWelfareStats {
    #[serde(default)]
    pub housing_conditions: Vec<ConditionCount>,
    #[serde(default)]
    pub urgent_needs: Vec<NeedCount>,
}

/// Response of `GET /api/dashboard/needs-potential`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NeedsPotential {
    #[serde(default)]
    pub participation: Vec<GroupCount>,
}

/// Resident listed under one urgent need type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrgentNeedDetail {
    pub id: i32,
    pub nama_lengkap: String,
    pub nik: String,
    #[serde(default)]
    pub alamat_lengkap: Option<String>,
    #[serde(default)]
    pub rt: Option<String>,
    #[serde(default)]
    pub rw: Option<String>,
    #[serde(default)]
    pub kebutuhan: Vec<String>,
}

/// Resident count keyed by RW code, as served by `GET /api/density-map`.
pub type DensityMap = BTreeMap<String, u64>;

/// All dashboard panels loaded together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardOverview {
    pub demographics: Demographics,
    pub health: HealthStats,
    pub social_welfare: SocialWelfareStats,
    pub needs_potential: NeedsPotential,
}
