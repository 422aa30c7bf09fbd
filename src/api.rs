//! JSON HTTP API over per-client storefront sessions.
//!
//! Clients carry their session in the `x-session-id` header issued by login
//! and register. Catalog reads never touch session state.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{AuthError, AuthUser, RegisterRequest};
use crate::catalog::{Catalog, FilterConfig, PriceRange, SortKey, CATEGORIES, COLORS, PRICE_BANDS};
use crate::checkout::{CheckoutError, CheckoutRequest};
use crate::domain::aggregates::{CartLine, OrderSummary, Product};
use crate::domain::value_objects::{Price, ProductId};
use crate::navigation::{self, LOGIN_PATH};
use crate::session::{SessionId, SessionManager, SESSION_HEADER};
use crate::storefront::Storefront;
use crate::StorefrontError;

const RELATED_LIMIT: usize = 4;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub catalog: Arc<Catalog>,
    pub page_size: usize,
}

impl AppState {
    pub fn new(sessions: SessionManager, page_size: usize) -> Self {
        let catalog = sessions.catalog().clone();
        Self { sessions: Arc::new(sessions), catalog, page_size }
    }
}

/// Session named by the request. A missing or malformed header means guest.
fn session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers.get(SESSION_HEADER)?.to_str().ok()?.parse().ok()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "silkcraft-storefront"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/categories", get(|| async { Json(CATEGORIES) }))
        .route("/api/v1/colors", get(|| async { Json(COLORS) }))
        .route("/api/v1/price-ranges", get(|| async { Json(PRICE_BANDS) }))
        .route("/api/v1/cart", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route("/api/v1/cart/:product_id", put(update_quantity).delete(remove_item))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/navigation", get(navigation))
        .route("/api/v1/checkout", post(checkout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    Storefront(StorefrontError),
    BadRequest(String),
    LoginRequired,
    OutOfStock(ProductId),
}

impl From<StorefrontError> for ApiError {
    fn from(e: StorefrontError) -> Self { Self::Storefront(e) }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self { Self::Storefront(e.into()) }
}

impl From<CheckoutError> for ApiError {
    fn from(e: CheckoutError) -> Self { Self::Storefront(e.into()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::LoginRequired => StatusCode::UNAUTHORIZED,
            Self::OutOfStock(_) => StatusCode::CONFLICT,
            Self::Storefront(e) => match e {
                StorefrontError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                StorefrontError::Auth(err) => match err {
                    AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                    AuthError::InvalidAdminCode | AuthError::RoleNotAllowed => StatusCode::FORBIDDEN,
                    AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    AuthError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                },
                StorefrontError::Checkout(err) => match err {
                    CheckoutError::Unauthenticated => StatusCode::UNAUTHORIZED,
                    CheckoutError::EmptyCart | CheckoutError::Order(_) => StatusCode::BAD_REQUEST,
                    CheckoutError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                },
            },
        };
        let body = match &self {
            Self::BadRequest(msg) => json!({ "error": msg }),
            Self::LoginRequired => json!({ "error": "Please sign in to add items to your cart", "redirect": LOGIN_PATH }),
            Self::OutOfStock(id) => json!({ "error": format!("Product {id} is out of stock") }),
            Self::Storefront(e) => json!({ "error": e.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    /// Comma-separated category ids.
    pub category: Option<String>,
    /// Comma-separated color ids.
    pub color: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

fn split_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split(',').map(str::trim).filter(|v| !v.is_empty()).map(String::from).collect()).unwrap_or_default()
}

impl ProductQuery {
    fn filter(&self) -> FilterConfig {
        let defaults = PriceRange::default();
        FilterConfig {
            search: self.search.clone().unwrap_or_default(),
            categories: split_ids(self.category.as_deref()),
            colors: split_ids(self.color.as_deref()),
            price: PriceRange::new(
                self.min_price.map_or(defaults.min, Price::new),
                self.max_price.map(Price::new).or(defaults.max),
            ),
        }
    }

    fn sort(&self) -> ApiResult<SortKey> {
        match self.sort.as_deref() {
            None | Some("") => Ok(SortKey::default()),
            Some(raw) => raw.parse().map_err(|e: crate::catalog::UnknownSortKey| ApiError::BadRequest(e.to_string())),
        }
    }
}

async fn list_products(State(s): State<AppState>, Query(q): Query<ProductQuery>) -> ApiResult<impl IntoResponse> {
    let sort = q.sort()?;
    let per_page = q.per_page.unwrap_or(s.page_size).clamp(1, 100);
    let page = s.catalog.query(&q.filter(), sort, q.page.unwrap_or(1), per_page).map(Product::clone);
    Ok(Json(page))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<u32>) -> ApiResult<impl IntoResponse> {
    let id = ProductId::new(id);
    let product = s.catalog.get(id).ok_or(StorefrontError::ProductNotFound(id))?;
    let related = s.catalog.related(id, RELATED_LIMIT);
    Ok(Json(json!({ "product": product, "related": related })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartLineView { product_id: ProductId, name: String, price: Price, quantity: u32, stock_quantity: u32, line_total: Price }

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id(),
            name: line.product.name.clone(),
            price: line.product.price,
            quantity: line.quantity,
            stock_quantity: line.product.stock_quantity,
            line_total: line.line_total(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartView { lines: Vec<CartLineView>, item_count: u32, summary: OrderSummary }

fn cart_view(shop: &Storefront) -> CartView {
    let store = shop.cart();
    CartView {
        lines: store.lines().iter().map(CartLineView::from).collect(),
        item_count: store.get_cart_item_count(),
        summary: OrderSummary::for_cart(store.cart()),
    }
}

async fn get_cart(State(s): State<AppState>, headers: HeaderMap) -> Json<CartView> {
    let session = s.sessions.resolve(session_id(&headers));
    let shop = session.lock().await;
    Json(cart_view(&shop))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest { pub product_id: ProductId, #[serde(default)] pub quantity: Option<u32> }

async fn add_to_cart(State(s): State<AppState>, headers: HeaderMap, Json(r): Json<AddToCartRequest>) -> ApiResult<Json<CartView>> {
    let session = s.sessions.resolve(session_id(&headers));
    let mut shop = session.lock().await;
    let mut login_required = false;
    let added = shop.add_to_cart(r.product_id, r.quantity.unwrap_or(1), || login_required = true)?;
    if login_required { return Err(ApiError::LoginRequired); }
    if !added { return Err(ApiError::OutOfStock(r.product_id)); }
    Ok(Json(cart_view(&shop)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest { pub quantity: i64 }

async fn update_quantity(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<u32>, Json(r): Json<UpdateQuantityRequest>) -> Json<CartView> {
    let session = s.sessions.resolve(session_id(&headers));
    let mut shop = session.lock().await;
    let quantity = u32::try_from(r.quantity.max(0)).unwrap_or(u32::MAX);
    shop.cart_mut().update_quantity(ProductId::new(id), quantity);
    Json(cart_view(&shop))
}

async fn remove_item(State(s): State<AppState>, headers: HeaderMap, Path(id): Path<u32>) -> Json<CartView> {
    let session = s.sessions.resolve(session_id(&headers));
    let mut shop = session.lock().await;
    shop.cart_mut().remove_item(ProductId::new(id));
    Json(cart_view(&shop))
}

async fn clear_cart(State(s): State<AppState>, headers: HeaderMap) -> Json<CartView> {
    let session = s.sessions.resolve(session_id(&headers));
    let mut shop = session.lock().await;
    shop.cart_mut().clear_cart();
    Json(cart_view(&shop))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest { pub email: String, pub password: String }

async fn login(State(s): State<AppState>, headers: HeaderMap, Json(r): Json<LoginRequest>) -> ApiResult<impl IntoResponse> {
    let (id, session, live) = s.sessions.begin(session_id(&headers));
    let user = session.lock().await.auth_mut().login(&r.email, &r.password).await?;
    if !live { s.sessions.attach(id, session); }
    Ok(signed_in(StatusCode::OK, id, user))
}

async fn register(State(s): State<AppState>, headers: HeaderMap, Json(r): Json<RegisterRequest>) -> ApiResult<impl IntoResponse> {
    let (id, session, live) = s.sessions.begin(session_id(&headers));
    let user = session.lock().await.auth_mut().register(&r).await?;
    if !live { s.sessions.attach(id, session); }
    Ok(signed_in(StatusCode::CREATED, id, user))
}

fn signed_in(status: StatusCode, id: SessionId, user: AuthUser) -> impl IntoResponse {
    let redirect = navigation::landing_path(user.role);
    let id = id.to_string();
    (status, [(SESSION_HEADER, id.clone())], Json(json!({ "user": user, "redirect": redirect, "sessionId": id })))
}

async fn logout(State(s): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(id) = session_id(&headers) {
        s.sessions.resolve(Some(id)).lock().await.auth_mut().logout();
        s.sessions.end(id);
    }
    StatusCode::NO_CONTENT
}

async fn me(State(s): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session = s.sessions.resolve(session_id(&headers));
    let shop = session.lock().await;
    Json(json!({ "user": shop.user(), "state": shop.auth().state(), "isAuthenticated": shop.auth().is_authenticated() }))
}

#[derive(Debug, Deserialize)]
pub struct NavigationQuery { pub path: Option<String> }

async fn navigation(State(s): State<AppState>, headers: HeaderMap, Query(q): Query<NavigationQuery>) -> impl IntoResponse {
    let session = s.sessions.resolve(session_id(&headers));
    let shop = session.lock().await;
    let decision = q.path.as_deref().map(|path| navigation::guard(path, shop.user()));
    Json(json!({ "items": shop.navigation(), "route": decision }))
}

async fn checkout(State(s): State<AppState>, headers: HeaderMap, Json(r): Json<CheckoutRequest>) -> ApiResult<impl IntoResponse> {
    let session = s.sessions.resolve(session_id(&headers));
    let mut shop = session.lock().await;
    let order = shop.place_order(r).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
