//! Dashboard panels and the RW density overlay.

use std::path::Path;

use serde_json::Value;

use crate::domain::dashboard::{DashboardOverview, DensityMap, UrgentNeedDetail};
use crate::repository::DashboardReader;
use crate::services::{ServiceError, ServiceResult};

/// Feature property that receives the resident count.
pub const DENSITY_PROPERTY: &str = "jumlah_penduduk";

/// Count at which the fill colour reaches its darkest shade.
pub const DENSITY_SCALE_MAX: u64 = 100;

const LIGHTEST: f64 = 100.0;
const DARKEST: f64 = 20.0;

/// Loads the four aggregate panels concurrently.
pub async fn load_overview<R>(repo: &R) -> ServiceResult<DashboardOverview>
where
    R: DashboardReader + ?Sized,
{
    let (demographics, health, social_welfare, needs_potential) = tokio::try_join!(
        repo.demographics(),
        repo.health(),
        repo.social_welfare(),
        repo.needs_potential(),
    )
    .map_err(|err| {
        log::error!("Failed to load dashboard: {err}");
        ServiceError::from(err)
    })?;

    Ok(DashboardOverview {
        demographics,
        health,
        social_welfare,
        needs_potential,
    })
}

/// Residents recorded with the given urgent need.
pub async fn urgent_need_details<R>(repo: &R, need: &str) -> ServiceResult<Vec<UrgentNeedDetail>>
where
    R: DashboardReader + ?Sized,
{
    let need = need.trim();
    if need.is_empty() {
        return Err(ServiceError::Form("Jenis kebutuhan wajib diisi".to_string()));
    }

    repo.urgent_need_details(need).await.map_err(|err| {
        log::error!("Failed to load urgent need details for {need}: {err}");
        ServiceError::from(err)
    })
}

fn feature_rw(properties: &serde_json::Map<String, Value>) -> Option<String> {
    match properties.get("rw")? {
        Value::String(rw) => Some(rw.clone()),
        Value::Number(rw) => Some(rw.to_string()),
        _ => None,
    }
}

/// Writes the resident count of every RW polygon into its
/// `properties.jumlah_penduduk`; polygons without data get 0. Returns the
/// number of features touched.
pub fn merge_density(geojson: &mut Value, density: &DensityMap) -> usize {
    let Some(features) = geojson.get_mut("features").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut touched = 0;
    for feature in features.iter_mut() {
        let Some(properties) = feature
            .get_mut("properties")
            .and_then(Value::as_object_mut)
        else {
            continue;
        };
        let count = feature_rw(properties)
            .and_then(|rw| density.get(&rw).copied())
            .unwrap_or(0);
        properties.insert(DENSITY_PROPERTY.to_string(), Value::from(count));
        touched += 1;
    }
    touched
}

/// Per-RW counts of an overlay produced by [`merge_density`], including the
/// polygons that have no residents.
pub fn overlay_counts(geojson: &Value) -> DensityMap {
    geojson
        .get("features")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|feature| {
            let properties = feature.get("properties")?.as_object()?;
            let count = properties.get(DENSITY_PROPERTY)?.as_u64()?;
            Some((feature_rw(properties)?, count))
        })
        .collect()
}

/// HSL lightness for a polygon: 100 % at zero residents down to 20 % at
/// [`DENSITY_SCALE_MAX`], clamped.
pub fn density_fill_lightness(count: u64) -> f64 {
    let ratio = count.min(DENSITY_SCALE_MAX) as f64 / DENSITY_SCALE_MAX as f64;
    LIGHTEST - (LIGHTEST - DARKEST) * ratio
}

pub fn density_fill_color(count: u64) -> String {
    format!("hsl(30, 100%, {:.0}%)", density_fill_lightness(count))
}

/// Reads the RW boundaries from `geojson_path` and merges the current
/// density map into them.
pub async fn load_density_overlay<R>(repo: &R, geojson_path: &Path) -> ServiceResult<Value>
where
    R: DashboardReader + ?Sized,
{
    let raw = tokio::fs::read_to_string(geojson_path).await.map_err(|err| {
        log::error!("Failed to read {}: {err}", geojson_path.display());
        ServiceError::from(err)
    })?;
    let mut geojson: Value = serde_json::from_str(&raw).map_err(|err| {
        log::error!("Failed to parse {}: {err}", geojson_path.display());
        ServiceError::Internal(err.to_string())
    })?;

    let density = repo.density_map().await.map_err(|err| {
        log::error!("Failed to load density map: {err}");
        ServiceError::from(err)
    })?;

    let touched = merge_density(&mut geojson, &density);
    log::debug!("Merged density into {touched} RW polygons");
    Ok(geojson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::{Demographics, HealthStats, NeedsPotential, SocialWelfareStats};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use serde_json::json;

    #[test]
    fn density_is_merged_by_rw_and_defaults_to_zero() {
        let mut geojson = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "rw": "01" } },
                { "type": "Feature", "properties": { "rw": "02" } },
                { "type": "Feature", "properties": { "rw": 3 } },
                { "type": "Feature" }
            ]
        });
        let density = DensityMap::from([("01".to_string(), 12), ("3".to_string(), 4)]);

        let touched = merge_density(&mut geojson, &density);

        assert_eq!(touched, 3);
        assert_eq!(geojson["features"][0]["properties"][DENSITY_PROPERTY], 12);
        assert_eq!(geojson["features"][1]["properties"][DENSITY_PROPERTY], 0);
        assert_eq!(geojson["features"][2]["properties"][DENSITY_PROPERTY], 4);
    }

    #[test]
    fn overlay_counts_read_back_merged_values() {
        let mut geojson = json!({
            "features": [
                { "properties": { "rw": "01" } },
                { "properties": { "rw": 2 } }
            ]
        });
        merge_density(&mut geojson, &DensityMap::from([("01".to_string(), 7)]));

        let counts = overlay_counts(&geojson);

        assert_eq!(
            counts,
            DensityMap::from([("01".to_string(), 7), ("2".to_string(), 0)])
        );
    }

    #[test]
    fn fill_lightness_is_interpolated_and_clamped() {
        assert_eq!(density_fill_lightness(0), 100.0);
        assert_eq!(density_fill_lightness(50), 60.0);
        assert_eq!(density_fill_lightness(100), 20.0);
        assert_eq!(density_fill_lightness(250), 20.0);
        assert_eq!(density_fill_color(0), "hsl(30, 100%, 100%)");
    }

    #[tokio::test]
    async fn overview_loads_every_panel() {
        let mut repo = MockRepository::new();
        repo.expect_demographics().times(1).returning(|| {
            Ok(Demographics {
                total_lansia: 120,
                ..Demographics::default()
            })
        });
        repo.expect_health()
            .times(1)
            .returning(|| Ok(HealthStats::default()));
        repo.expect_social_welfare()
            .times(1)
            .returning(|| Ok(SocialWelfareStats::default()));
        repo.expect_needs_potential()
            .times(1)
            .returning(|| Ok(NeedsPotential::default()));

        let overview = load_overview(&repo).await.unwrap();

        assert_eq!(overview.demographics.total_lansia, 120);
    }

    #[tokio::test]
    async fn overview_fails_when_any_panel_fails() {
        let mut repo = MockRepository::new();
        repo.expect_demographics()
            .returning(|| Ok(Demographics::default()));
        repo.expect_health()
            .returning(|| Err(RepositoryError::Network("reset".into())));
        repo.expect_social_welfare()
            .returning(|| Ok(SocialWelfareStats::default()));
        repo.expect_needs_potential()
            .returning(|| Ok(NeedsPotential::default()));

        assert!(matches!(
            load_overview(&repo).await,
            Err(ServiceError::Network(_))
        ));
    }

    #[tokio::test]
    async fn blank_need_type_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_urgent_need_details().times(0);

        assert!(matches!(
            urgent_need_details(&repo, "  ").await,
            Err(ServiceError::Form(_))
        ));
    }

    #[tokio::test]
    async fn overlay_reads_boundaries_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rw.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"rw":"05"}}]}"#,
        )
        .unwrap();

        let mut repo = MockRepository::new();
        repo.expect_density_map()
            .returning(|| Ok(DensityMap::from([("05".to_string(), 7)])));

        let overlay = load_density_overlay(&repo, &path).await.unwrap();

        assert_eq!(overlay["features"][0]["properties"][DENSITY_PROPERTY], 7);
    }
}
