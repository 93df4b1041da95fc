use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, put},
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::menu::{
        CreateCategoryRequest, CreateMenuItemRequest, UpdateCategoryRequest, UpdateMenuItemRequest,
    },
    dto::orders::{OrderListQuery, UpdateOrderStatusRequest},
    dto::reservations::{ReservationListQuery, UpdateReservationStatusRequest},
    dto::settings::UpdateSettingsRequest,
    error::{AppJson, AppResult},
    middleware::auth::{AdminSession, ensure_admin},
    models::{
        DashboardStats, MenuCategory, MenuItem, MenuItemWithCategory, OrderWithItems, Reservation,
        Settings,
    },
    response::Paginated,
    routes::params::Pagination,
    sanitize::Sanitize,
    services::{admin_service, menu_service, order_service, reservation_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu", get(list_menu_items).post(create_menu_item))
        .route("/menu/{id}", put(update_menu_item).delete(delete_menu_item))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/orders", get(list_orders))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/reservations", get(list_reservations))
        .route("/reservations/{id}/status", patch(update_reservation_status))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/dashboard", get(dashboard))
}

#[derive(Serialize, ToSchema)]
pub struct Deleted {
    pub success: bool,
}

#[utoipa::path(
    get,
    path = "/api/admin/menu",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("perPage" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Every menu item with its category, newest edits first", body = Paginated<MenuItemWithCategory>),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    session: AdminSession,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paginated<MenuItemWithCategory>>> {
    ensure_admin(&session)?;
    let page = menu_service::list_items(&state, pagination).await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item created", body = MenuItem),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(mut payload): AppJson<CreateMenuItemRequest>,
) -> AppResult<Json<MenuItem>> {
    ensure_admin(&session)?;
    payload.validate()?;
    payload.sanitize();
    let item = menu_service::create_item(&state, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItem),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Not Found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    AppJson(mut payload): AppJson<UpdateMenuItemRequest>,
) -> AppResult<Json<MenuItem>> {
    ensure_admin(&session)?;
    payload.validate()?;
    payload.sanitize();
    let item = menu_service::update_item(&state, id, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item deleted", body = Deleted),
        (status = 404, description = "Not Found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Deleted>> {
    ensure_admin(&session)?;
    menu_service::delete_item(&state, id).await?;
    Ok(Json(Deleted { success: true }))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Categories in display order", body = Vec<MenuCategory>),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    session: AdminSession,
) -> AppResult<Json<Vec<MenuCategory>>> {
    ensure_admin(&session)?;
    let categories = menu_service::list_categories(&state).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = MenuCategory),
        (status = 400, description = "Invalid input or slug taken"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(mut payload): AppJson<CreateCategoryRequest>,
) -> AppResult<Json<MenuCategory>> {
    ensure_admin(&session)?;
    payload.validate()?;
    payload.sanitize();
    let category = menu_service::create_category(&state, payload).await?;
    Ok(Json(category))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = MenuCategory),
        (status = 400, description = "Invalid input or slug taken"),
        (status = 404, description = "Not Found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    AppJson(mut payload): AppJson<UpdateCategoryRequest>,
) -> AppResult<Json<MenuCategory>> {
    ensure_admin(&session)?;
    payload.validate()?;
    payload.sanitize();
    let category = menu_service::update_category(&state, id, payload).await?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = Deleted),
        (status = 400, description = "Category still has menu items"),
        (status = 404, description = "Not Found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Deleted>> {
    ensure_admin(&session)?;
    menu_service::delete_category(&state, id).await?;
    Ok(Json(Deleted { success: true }))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("perPage" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
    ),
    responses(
        (status = 200, description = "Orders with their items, newest first", body = Paginated<OrderWithItems>),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    session: AdminSession,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Paginated<OrderWithItems>>> {
    ensure_admin(&session)?;
    let page = order_service::list_orders(&state, query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed, customer notified", body = OrderWithItems),
        (status = 400, description = "Illegal status transition"),
        (status = 404, description = "Not Found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<OrderWithItems>> {
    ensure_admin(&session)?;
    let order = order_service::update_status(&state, id, payload).await?;
    Ok(Json(order))
}

#[utoipa::path(
    get,
    path = "/api/admin/reservations",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("perPage" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("date" = Option<String>, Query, description = "Filter by date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Reservations, soonest slot first", body = Paginated<Reservation>),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    session: AdminSession,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<Paginated<Reservation>>> {
    ensure_admin(&session)?;
    let page = reservation_service::list_reservations(&state, query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    patch,
    path = "/api/admin/reservations/{id}/status",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = UpdateReservationStatusRequest,
    responses(
        (status = 200, description = "Status changed, guest notified", body = Reservation),
        (status = 400, description = "Illegal status transition"),
        (status = 404, description = "Not Found"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn update_reservation_status(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateReservationStatusRequest>,
) -> AppResult<Json<Reservation>> {
    ensure_admin(&session)?;
    let reservation = reservation_service::update_status(&state, id, payload).await?;
    Ok(Json(reservation))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Reservation capacity settings", body = Settings),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    session: AdminSession,
) -> AppResult<Json<Settings>> {
    ensure_admin(&session)?;
    let settings = admin_service::get_settings(&state).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = Settings),
        (status = 400, description = "Invalid input data"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    session: AdminSession,
    AppJson(payload): AppJson<UpdateSettingsRequest>,
) -> AppResult<Json<Settings>> {
    ensure_admin(&session)?;
    payload.validate()?;
    let settings = admin_service::update_settings(&state, payload).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Order, revenue, reservation and menu counts", body = DashboardStats),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
    ),
    security(("cookie_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    session: AdminSession,
) -> AppResult<Json<DashboardStats>> {
    ensure_admin(&session)?;
    let stats = admin_service::dashboard(&state).await?;
    Ok(Json(stats))
}
