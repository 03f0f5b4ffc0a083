use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::MemberResult;
use crate::models::{
    CreateMember, LoginRequest, LoginResponse, MemberFilter, MemberResponse, Source, UpdateMember,
};
use crate::repository::MemberRepository;
use crate::service::MemberService;

/// Create the members router with all HTTP endpoints
pub fn router<R: MemberRepository + 'static>(service: MemberService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/{id}", get(get_member).put(update_member))
        .route("/{id}/deactivate", post(deactivate_member))
        .route("/login", post(login))
        .with_state(shared_service)
}

/// List response with pagination metadata
#[derive(Debug, Serialize)]
struct ListMembersResponse {
    data: Vec<MemberResponse>,
    total_count: u64,
    page_number: u32,
    page_size: u32,
    total_pages: u32,
    has_previous_page: bool,
    has_next_page: bool,
}

/// List members with filters, sorting and pagination
///
/// GET /members?page_number=1&page_size=25&sort_by=user_name&sort_order=ASC&is_active=true
async fn list_members<R: MemberRepository>(
    State(service): State<Arc<MemberService<R>>>,
    Query(filter): Query<MemberFilter>,
) -> MemberResult<Json<ListMembersResponse>> {
    let page = service.list_members(filter).await?;

    Ok(Json(ListMembersResponse {
        total_pages: page.total_pages(),
        has_previous_page: page.has_previous_page(),
        has_next_page: page.has_next_page(),
        total_count: page.total_count,
        page_number: page.page_number,
        page_size: page.page_size,
        data: page.items,
    }))
}

/// Onboard a new member
///
/// POST /members
async fn create_member<R: MemberRepository>(
    State(service): State<Arc<MemberService<R>>>,
    Json(input): Json<CreateMember>,
) -> MemberResult<impl IntoResponse> {
    let member = service.create_member(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Get a member by ID
///
/// GET /members/:id
async fn get_member<R: MemberRepository>(
    State(service): State<Arc<MemberService<R>>>,
    Path(id): Path<Uuid>,
) -> MemberResult<Json<MemberResponse>> {
    let member = service.get_member(id).await?;
    Ok(Json(member))
}

/// Partially update a member
///
/// PUT /members/:id
async fn update_member<R: MemberRepository>(
    State(service): State<Arc<MemberService<R>>>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMember>,
) -> MemberResult<Json<MemberResponse>> {
    let member = service.update_member(id, input).await?;
    Ok(Json(member))
}

/// Deactivation request body
#[derive(Debug, Deserialize)]
struct DeactivateMemberRequest {
    modified_by: String,
    source: Source,
}

/// Deactivation confirmation
#[derive(Debug, Serialize)]
struct DeactivateMemberResponse {
    member_id: Uuid,
}

/// Deactivate a member (terminal; no reactivation exists)
///
/// POST /members/:id/deactivate
async fn deactivate_member<R: MemberRepository>(
    State(service): State<Arc<MemberService<R>>>,
    Path(id): Path<Uuid>,
    Json(input): Json<DeactivateMemberRequest>,
) -> MemberResult<Json<DeactivateMemberResponse>> {
    let member_id = service
        .deactivate_member(id, &input.modified_by, input.source)
        .await?;
    Ok(Json(DeactivateMemberResponse { member_id }))
}

/// Member login: verify credentials and issue a bearer token
///
/// POST /members/login
async fn login<R: MemberRepository>(
    State(service): State<Arc<MemberService<R>>>,
    Json(input): Json<LoginRequest>,
) -> MemberResult<Json<LoginResponse>> {
    let response = service.login(input).await?;
    Ok(Json(response))
}
