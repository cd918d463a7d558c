use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::debug;

use super::data::{self, CatalogEntry};
use crate::configurator::REQUIRED_WATTAGE_PARAM;
use crate::part::first_integer;
use crate::stage::Stage;
use crate::wattage::WattageEstimate;

// ── Error type ────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/parts/{stage}", get(list_parts))
}

async fn health() -> &'static str {
    "ok"
}

async fn list_parts(
    Path(stage_key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    let stage = Stage::from_key(&stage_key)
        .ok_or_else(|| ApiError::BadRequest("Invalid part type".into()))?;
    let parts = compatible_parts(stage, &params)?;
    debug!(stage = %stage, count = parts.len(), "serving catalog query");
    Ok(Json(parts.into_iter().cloned().collect()))
}

// ── Compatibility rules ───────────────────────────────────────────────

/// Parts of `stage` compatible with the referenced selections.
///
/// Motherboards are matched to the CPU socket and PSUs to the wattage floor;
/// every other stage only checks that its references exist.
pub fn compatible_parts(
    stage: Stage,
    params: &HashMap<String, String>,
) -> Result<Vec<&'static CatalogEntry>, ApiError> {
    let all = data::entries(stage).iter();

    let parts = match stage {
        Stage::Cpu => all.collect(),
        Stage::Motherboard => {
            let cpu = lookup(params, Stage::Cpu, "CPU ID required")?;
            all.filter(|board| board.socket == cpu.socket).collect()
        }
        Stage::CpuCooler => {
            lookup(params, Stage::Cpu, "CPU ID required")?;
            all.collect()
        }
        Stage::Gpu => {
            lookup(params, Stage::Motherboard, "Motherboard ID required")?;
            all.collect()
        }
        Stage::Case => {
            let message = "GPU ID and Motherboard ID required";
            require(params, &[Stage::Gpu, Stage::Motherboard], message)?;
            lookup(params, Stage::Gpu, message)?;
            lookup(params, Stage::Motherboard, message)?;
            all.collect()
        }
        Stage::Psu => {
            let message = "Case ID, CPU ID, and GPU ID required for PSU compatibility";
            require(params, &[Stage::Case, Stage::Cpu, Stage::Gpu], message)?;
            lookup(params, Stage::Case, message)?;
            let cpu = lookup(params, Stage::Cpu, message)?;
            let gpu = lookup(params, Stage::Gpu, message)?;
            let floor = wattage_floor(params, cpu, gpu)?;
            all.filter(|p| p.wattage.is_some_and(|w| w >= floor)).collect()
        }
        Stage::Ram => {
            let message = "Motherboard and CPU IDs required";
            require(params, &[Stage::Motherboard, Stage::Cpu], message)?;
            lookup(params, Stage::Motherboard, message)?;
            lookup(params, Stage::Cpu, message)?;
            all.collect()
        }
        Stage::Storage => {
            lookup(params, Stage::Motherboard, "Motherboard ID required")?;
            all.collect()
        }
    };
    Ok(parts)
}

/// Fail with `message` unless every referenced stage's id is present.
fn require(params: &HashMap<String, String>, stages: &[Stage], message: &str) -> Result<(), ApiError> {
    let missing = stages
        .iter()
        .filter_map(|s| s.id_param())
        .any(|name| params.get(name).is_none_or(|v| v.trim().is_empty()));
    if missing {
        return Err(ApiError::BadRequest(message.to_string()));
    }
    Ok(())
}

/// Resolve the catalog entry referenced by `stage`'s id parameter.
fn lookup(
    params: &HashMap<String, String>,
    stage: Stage,
    missing_message: &str,
) -> Result<&'static CatalogEntry, ApiError> {
    let Some(name) = stage.id_param() else {
        return Err(ApiError::BadRequest(missing_message.to_string()));
    };
    let raw = params
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(missing_message.to_string()))?;
    let id: i64 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", name, raw)))?;
    data::find(stage, id).ok_or_else(|| ApiError::NotFound(format!("{} {} not found", stage, id)))
}

/// The client-supplied wattage floor, or the one derived from the CPU and
/// GPU draws when the client sent none.
fn wattage_floor(
    params: &HashMap<String, String>,
    cpu: &CatalogEntry,
    gpu: &CatalogEntry,
) -> Result<u32, ApiError> {
    match params.get(REQUIRED_WATTAGE_PARAM) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            ApiError::BadRequest(format!("{} must be an integer, got '{}'", REQUIRED_WATTAGE_PARAM, raw))
        }),
        None => {
            let estimate = WattageEstimate::from_draws(
                cpu.tdp.and_then(first_integer),
                gpu.tdp.and_then(first_integer),
            );
            Ok(estimate.required)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ids(parts: &[&CatalogEntry]) -> Vec<i64> {
        parts.iter().map(|p| p.id).collect()
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = api_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_motherboards_follow_cpu_socket() {
        let intel = compatible_parts(Stage::Motherboard, &params(&[("cpu_id", "1")])).unwrap();
        assert_eq!(ids(&intel), vec![1, 3]);
        let amd = compatible_parts(Stage::Motherboard, &params(&[("cpu_id", "2")])).unwrap();
        assert_eq!(ids(&amd), vec![2]);
    }

    #[test]
    fn test_missing_parameter_messages() {
        let err = compatible_parts(Stage::CpuCooler, &params(&[])).unwrap_err();
        assert_eq!(err, ApiError::BadRequest("CPU ID required".into()));

        let err = compatible_parts(Stage::Case, &params(&[("gpu_id", "1")])).unwrap_err();
        assert_eq!(
            err,
            ApiError::BadRequest("GPU ID and Motherboard ID required".into())
        );

        let err = compatible_parts(Stage::Storage, &params(&[("mobo_id", " ")])).unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Motherboard ID required".into()));
    }

    #[test]
    fn test_unknown_reference_is_not_found() {
        let err = compatible_parts(Stage::Gpu, &params(&[("mobo_id", "99")])).unwrap_err();
        assert_eq!(err, ApiError::NotFound("Motherboard 99 not found".into()));
    }

    #[test]
    fn test_non_numeric_id_is_bad_request() {
        let err = compatible_parts(Stage::Gpu, &params(&[("mobo_id", "abc")])).unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Invalid mobo_id: abc".into()));
    }

    #[test]
    fn test_psu_filters_by_required_wattage() {
        let base = [("case_id", "1"), ("cpu_id", "1"), ("gpu_id", "3")];

        let mut with_floor = base.to_vec();
        with_floor.push(("required_wattage", "700"));
        let parts = compatible_parts(Stage::Psu, &params(&with_floor)).unwrap();
        assert_eq!(ids(&parts), vec![2, 3]);

        let mut exact = base.to_vec();
        exact.push(("required_wattage", "850"));
        let parts = compatible_parts(Stage::Psu, &params(&exact)).unwrap();
        assert_eq!(ids(&parts), vec![3]);
    }

    #[test]
    fn test_psu_derives_floor_when_absent() {
        // 125 W + 220 W needs 484 W, which every PSU covers
        let parts = compatible_parts(
            Stage::Psu,
            &params(&[("case_id", "1"), ("cpu_id", "1"), ("gpu_id", "3")]),
        )
        .unwrap();
        assert_eq!(ids(&parts), vec![1, 2, 3]);
    }

    #[test]
    fn test_psu_rejects_non_integer_wattage() {
        let err = compatible_parts(
            Stage::Psu,
            &params(&[
                ("case_id", "1"),
                ("cpu_id", "1"),
                ("gpu_id", "3"),
                ("required_wattage", "lots"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("required_wattage")));
    }

    #[tokio::test]
    async fn test_cpu_route_lists_catalog() {
        let (status, body) = get_json("/api/parts/cpu").await;
        assert_eq!(status, StatusCode::OK);
        let parts = body.as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["name"], "Intel Core i5-12600K");
        assert_eq!(parts[0]["tdp"], "125 W");
    }

    #[tokio::test]
    async fn test_unknown_stage_route() {
        let (status, body) = get_json("/api/parts/keyboard").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid part type");
    }

    #[tokio::test]
    async fn test_missing_param_route() {
        let (status, body) = get_json("/api/parts/motherboard").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "CPU ID required");
    }

    #[tokio::test]
    async fn test_ram_route_with_params() {
        let (status, body) = get_json("/api/parts/ram?mobo_id=1&cpu_id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }
}
