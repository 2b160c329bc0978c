use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use super::types::{
    AllocationResponse, ClaimListQuery, ClaimResponse, ClaimSummary, DocumentResponse,
    PattaResponse, SchemeInfo, SocioEconomicResponse, StatusUpdateRequest,
};
use crate::domain::ClaimStatus;
use crate::eligibility::Scheme;
use crate::error::{Result, ServerError};
use crate::geo::{FeatureCollection, Position};
use crate::store::{ClaimStore, DocumentStore, NewClaim, NewDocument, NewSocioEconomic, PattaStore, SocioEconomicStore};
use crate::workflow::{allocate, lookup_eligible_features, patta_features, PattaProperties};

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => (status, [(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => ServerError::from(e).into_response(),
    }
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T>) -> Response {
    match result {
        Ok(body) => json_response(status, &body),
        Err(e) => e.into_response(),
    }
}

/// Unwrap a JSON body, reporting malformed input as a 400 with our error shape
fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::InvalidRequest(rejection.body_text()))
}

// ============================================================================
// Claims
// ============================================================================

/// POST /claims
pub async fn create_claim(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewClaim>, JsonRejection>,
) -> Response {
    let result = async {
        let new = body(payload)?;
        ClaimStore::new(&state.db).create(new).await.map(ClaimResponse::from)
    }
    .await;
    respond(StatusCode::CREATED, result)
}

/// GET /claims[?status=PENDING]
pub async fn list_claims(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClaimListQuery>,
) -> Response {
    let result = async {
        let store = ClaimStore::new(&state.db);
        let claims = match query.status.as_deref() {
            Some(raw) => {
                let status = ClaimStatus::parse(raw)
                    .ok_or_else(|| ServerError::InvalidRequest(format!("Unknown status '{}'", raw)))?;
                store.find_by_status(status).await?
            }
            None => store.find_all().await?,
        };
        Ok::<_, ServerError>(claims.into_iter().map(ClaimResponse::from).collect::<Vec<_>>())
    }
    .await;
    respond(StatusCode::OK, result)
}

/// GET /claims/summary
pub async fn claim_summary(State(state): State<Arc<AppState>>) -> Response {
    let result = async {
        let claims = ClaimStore::new(&state.db).find_all().await?;
        let mut summary = ClaimSummary {
            total: claims.len(),
            ..ClaimSummary::default()
        };
        for claim in &claims {
            match claim.status() {
                Some(ClaimStatus::Pending) => summary.pending += 1,
                Some(ClaimStatus::Verified) => summary.verified += 1,
                Some(ClaimStatus::Rejected) => summary.rejected += 1,
                None => tracing::warn!("Claim {} has unknown status '{}'", claim.id, claim.status),
            }
        }
        Ok::<_, ServerError>(summary)
    }
    .await;
    respond(StatusCode::OK, result)
}

/// GET /claims/:id
pub async fn get_claim(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = ClaimStore::new(&state.db).get(&id).await.map(ClaimResponse::from);
    respond(StatusCode::OK, result)
}

/// PUT /claims/:id/status
pub async fn update_claim_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Response {
    let result = async {
        let request = body(payload)?;
        let status = ClaimStatus::parse(&request.status)
            .ok_or_else(|| ServerError::InvalidRequest(format!("Unknown status '{}'", request.status)))?;
        ClaimStore::new(&state.db).set_status(&id, status).await.map(ClaimResponse::from)
    }
    .await;
    respond(StatusCode::OK, result)
}

/// PUT /claims/:id/polygon - body is the drawn ring as `[lon, lat]` pairs
pub async fn update_claim_polygon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<Vec<Position>>, JsonRejection>,
) -> Response {
    let result = async {
        let ring = body(payload)?;
        allocate(&state.db, &id, &ring).await.map(AllocationResponse::from)
    }
    .await;
    respond(StatusCode::OK, result)
}

/// POST /claims/:id/documents
pub async fn attach_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<NewDocument>, JsonRejection>,
) -> Response {
    let result = async {
        let document = body(payload)?;
        DocumentStore::new(&state.db)
            .attach(&id, document)
            .await
            .map(DocumentResponse::from)
    }
    .await;
    respond(StatusCode::CREATED, result)
}

/// GET /claims/:id/documents
pub async fn list_documents(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = async {
        ClaimStore::new(&state.db).get(&id).await?;
        let documents = DocumentStore::new(&state.db).find_by_claim_ref(&id).await?;
        Ok::<_, ServerError>(documents.into_iter().map(DocumentResponse::from).collect::<Vec<_>>())
    }
    .await;
    respond(StatusCode::OK, result)
}

// ============================================================================
// Pattas
// ============================================================================

/// GET /pattas
pub async fn list_pattas(State(state): State<Arc<AppState>>) -> Response {
    let result = PattaStore::new(&state.db)
        .find_all()
        .await
        .map(|pattas| pattas.into_iter().map(PattaResponse::from).collect::<Vec<_>>());
    respond(StatusCode::OK, result)
}

/// GET /pattas/:id
pub async fn get_patta(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = PattaStore::new(&state.db).get(&id).await.map(PattaResponse::from);
    respond(StatusCode::OK, result)
}

/// GET /pattas/geojson
pub async fn pattas_geojson(State(state): State<Arc<AppState>>) -> Response {
    let result = patta_features(&state.db)
        .await
        .map(FeatureCollection::<PattaProperties>::new);
    respond(StatusCode::OK, result)
}

// ============================================================================
// Socio-economic records and schemes
// ============================================================================

/// GET /socio
pub async fn list_socio(State(state): State<Arc<AppState>>) -> Response {
    let result = SocioEconomicStore::new(&state.db)
        .find_all()
        .await
        .map(|records| records.into_iter().map(SocioEconomicResponse::from).collect::<Vec<_>>());
    respond(StatusCode::OK, result)
}

/// POST /socio
pub async fn create_socio(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewSocioEconomic>, JsonRejection>,
) -> Response {
    let result = async {
        let new = body(payload)?;
        SocioEconomicStore::new(&state.db)
            .create(new)
            .await
            .map(SocioEconomicResponse::from)
    }
    .await;
    respond(StatusCode::CREATED, result)
}

/// GET /schemes
pub async fn list_schemes() -> Response {
    let schemes: Vec<SchemeInfo> = Scheme::ALL.into_iter().map(SchemeInfo::from).collect();
    json_response(StatusCode::OK, &schemes)
}

/// GET /schemes/:scheme/eligible - unknown schemes give an empty collection
pub async fn eligible_pattas(State(state): State<Arc<AppState>>, Path(scheme): Path<String>) -> Response {
    let result = lookup_eligible_features(&state.db, &scheme)
        .await
        .map(FeatureCollection::<PattaProperties>::new);
    respond(StatusCode::OK, result)
}

/// Health check endpoint
pub async fn health() -> Response {
    let json = serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    });
    json_response(StatusCode::OK, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_database;
    use crate::domain::ClaimType;
    use crate::store::fixtures::{pending_claim, survey};

    async fn state() -> Arc<AppState> {
        Arc::new(AppState::new(memory_database().await))
    }

    async fn read_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn ring() -> Vec<Position> {
        vec![[81.60, 21.20], [81.609, 21.20], [81.609, 21.209], [81.60, 21.209]]
    }

    #[tokio::test]
    async fn test_create_and_fetch_claim() {
        let state = state().await;
        let new = NewClaim {
            claimant_name: "Sita".to_string(),
            village_name: "Kanha".to_string(),
            district: "Raipur".to_string(),
            state: "Chhattisgarh".to_string(),
            claim_type: ClaimType::Individual,
            claimed_area: Some(2.0),
            created_by: Some("officer-7".to_string()),
        };

        let response = create_claim(State(state.clone()), Ok(Json(new))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json(response).await;
        assert_eq!(created["status"], "PENDING");
        assert_eq!(created["claimantName"], "Sita");
        assert!(created["location"].is_null());

        let id = created["id"].as_str().unwrap().to_string();
        let response = get_claim(State(state.clone()), Path(id.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_missing_claim_is_404() {
        let state = state().await;
        let response = get_claim(State(state.clone()), Path("nope".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "Claim not found: nope");

        let response = update_claim_polygon(State(state), Path("nope".to_string()), Ok(Json(ring()))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_allocate_polygon() {
        let state = state().await;
        pending_claim(&state.db, "abc123", "Raipur", "Kanha").await;

        let response = update_claim_polygon(State(state.clone()), Path("abc123".to_string()), Ok(Json(ring()))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["claim"]["status"], "VERIFIED");
        assert_eq!(json["claim"]["location"]["type"], "Polygon");
        assert_eq!(json["patta"]["pattaNumber"], "Raipur-Kanha-abc123");
        assert!(json["patta"]["grantedArea"].as_f64().unwrap() > 0.0);

        // Second allocation conflicts
        let response = update_claim_polygon(State(state.clone()), Path("abc123".to_string()), Ok(Json(ring()))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = pattas_geojson(State(state)).await;
        let json = read_json(response).await;
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_polygon_is_400() {
        let state = state().await;
        pending_claim(&state.db, "c1", "Raipur", "Kanha").await;

        let line = vec![[81.60, 21.20], [81.61, 21.21]];
        let response = update_claim_polygon(State(state.clone()), Path("c1".to_string()), Ok(Json(line))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = read_json(response).await["message"].as_str().unwrap().to_string();
        assert!(message.starts_with("Invalid polygon"), "{}", message);

        let response = get_claim(State(state), Path("c1".to_string())).await;
        assert_eq!(read_json(response).await["status"], "PENDING");
    }

    #[tokio::test]
    async fn test_reject_claim_and_summary() {
        let state = state().await;
        pending_claim(&state.db, "c1", "Raipur", "Kanha").await;
        pending_claim(&state.db, "c2", "Raipur", "Kanha").await;
        pending_claim(&state.db, "c3", "Raipur", "Kanha").await;

        let reject = StatusUpdateRequest {
            status: "rejected".to_string(),
        };
        let response = update_claim_status(State(state.clone()), Path("c2".to_string()), Ok(Json(reject))).await;
        assert_eq!(response.status(), StatusCode::OK);
        update_claim_polygon(State(state.clone()), Path("c3".to_string()), Ok(Json(ring()))).await;

        let verify = StatusUpdateRequest {
            status: "VERIFIED".to_string(),
        };
        let response = update_claim_status(State(state.clone()), Path("c1".to_string()), Ok(Json(verify))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = read_json(claim_summary(State(state.clone())).await).await;
        assert_eq!(json, serde_json::json!({"total": 3, "pending": 1, "verified": 1, "rejected": 1}));

        let query = ClaimListQuery {
            status: Some("REJECTED".to_string()),
        };
        let json = read_json(list_claims(State(state.clone()), Query(query)).await).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["id"], "c2");

        let query = ClaimListQuery {
            status: Some("approved".to_string()),
        };
        let response = list_claims(State(state), Query(query)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_socio_and_scheme_lookup() {
        let state = state().await;
        pending_claim(&state.db, "c1", "Raipur", "Kanha").await;

        let response = create_socio(State(state.clone()), Ok(Json(survey("c1")))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = read_json(response).await;
        assert_eq!(json["eligibleSchemes"], serde_json::json!(["pmay", "nrega"]));

        let response = create_socio(State(state.clone()), Ok(Json(survey("c1")))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        update_claim_polygon(State(state.clone()), Path("c1".to_string()), Ok(Json(ring()))).await;

        let json = read_json(eligible_pattas(State(state.clone()), Path("pmay".to_string())).await).await;
        let features = json["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["scheme"], "PMAY");

        let response = eligible_pattas(State(state.clone()), Path("lottery".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["features"], serde_json::json!([]));

        let json = read_json(list_socio(State(state)).await).await;
        assert!(json[0]["pattaId"].is_string());
    }

    #[tokio::test]
    async fn test_documents() {
        let state = state().await;
        pending_claim(&state.db, "c1", "Raipur", "Kanha").await;

        let document = NewDocument {
            kind: crate::domain::DocumentKind::IdProof,
            filename: "aadhaar.pdf".to_string(),
            path: "uploads/c1/aadhaar.pdf".to_string(),
            mimetype: "application/pdf".to_string(),
            size: 2048,
        };
        let response = attach_document(State(state.clone()), Path("c1".to_string()), Ok(Json(document))).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = read_json(list_documents(State(state.clone()), Path("c1".to_string())).await).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["kind"], "idProof");

        let response = list_documents(State(state), Path("nope".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_schemes_and_health() {
        let json = read_json(list_schemes().await).await;
        let ids: Vec<&str> = json.as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["pmay", "nrega", "pds", "scholarship"]);

        let json = read_json(health().await).await;
        assert_eq!(json["status"], "healthy");
    }
}
