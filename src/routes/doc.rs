use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cookies::SESSION_COOKIE,
    dto::{
        auth::{LoginRequest, LoginResponse},
        checkout::{CheckoutSessionResponse, CompletePaymentRequest},
        menu::{
            CreateCategoryRequest, CreateMenuItemRequest, UpdateCategoryRequest,
            UpdateMenuItemRequest,
        },
        orders::{CreateOrderRequest, OrderCreated, OrderItemInput, UpdateOrderStatusRequest},
        reservations::{CreateReservationRequest, ReservationCreated, UpdateReservationStatusRequest},
        settings::UpdateSettingsRequest,
    },
    entity::{orders::OrderStatus, reservations::ReservationStatus},
    error::ErrorBody,
    models::{
        DashboardStats, MenuCategory, MenuItem, MenuItemWithCategory, MenuSection, Order,
        OrderItem, OrderWithItems, Reservation, Settings,
    },
    response::{Meta, Paginated},
    routes::{admin, auth, checkout, csrf, health, menu, orders, params, reservations},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        menu::public_menu,
        csrf::mint_token,
        orders::create_order,
        reservations::create_reservation,
        checkout::start_checkout,
        checkout::complete_payment,
        auth::login,
        auth::logout,
        admin::list_menu_items,
        admin::create_menu_item,
        admin::update_menu_item,
        admin::delete_menu_item,
        admin::list_categories,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::list_orders,
        admin::update_order_status,
        admin::list_reservations,
        admin::update_reservation_status,
        admin::get_settings,
        admin::update_settings,
        admin::dashboard
    ),
    components(
        schemas(
            MenuCategory,
            MenuItem,
            MenuSection,
            MenuItemWithCategory,
            Order,
            OrderItem,
            OrderWithItems,
            OrderStatus,
            Reservation,
            ReservationStatus,
            Settings,
            DashboardStats,
            LoginRequest,
            LoginResponse,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            OrderItemInput,
            CreateOrderRequest,
            OrderCreated,
            UpdateOrderStatusRequest,
            CreateReservationRequest,
            ReservationCreated,
            UpdateReservationStatusRequest,
            UpdateSettingsRequest,
            CompletePaymentRequest,
            CheckoutSessionResponse,
            health::HealthData,
            csrf::CsrfToken,
            admin::Deleted,
            params::Pagination,
            Meta,
            Paginated<MenuItemWithCategory>,
            Paginated<OrderWithItems>,
            Paginated<Reservation>,
            ErrorBody
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Public menu"),
        (name = "Orders", description = "Storefront order intake"),
        (name = "Reservations", description = "Table reservations"),
        (name = "Checkout", description = "Hosted payment checkout"),
        (name = "Csrf", description = "CSRF token issuance"),
        (name = "Auth", description = "Admin session endpoints"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
