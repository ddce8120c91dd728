//! Application wiring over the in-memory adapters

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{test, web};
use bb_api::AppState;
use bb_core::domain::entities::{NewUser, UserRole};
use bb_core::repositories::{
    InMemoryBillStore, InMemoryRevocationStore, InMemoryUserRepository, UserRepository,
};
use bb_core::services::{
    AuthService, AuthServiceConfig, BillService, PlainTextHasher, TokenService, TokenServiceConfig,
};
use serde_json::{json, Value};

pub const SECRET: &str = "api-test-secret";

pub type TestState =
    AppState<InMemoryBillStore, InMemoryUserRepository, PlainTextHasher, InMemoryRevocationStore>;

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub store: InMemoryBillStore,
    pub users: Arc<InMemoryUserRepository>,
    pub revocations: Arc<InMemoryRevocationStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = InMemoryBillStore::new();
        let users = Arc::new(InMemoryUserRepository::new());
        let revocations = Arc::new(InMemoryRevocationStore::new());

        let token_config = TokenServiceConfig {
            jwt_secret: SECRET.to_string(),
            ..TokenServiceConfig::default()
        };
        let token_service = Arc::new(
            TokenService::new(token_config, Arc::clone(&revocations)).unwrap(),
        );
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::new(PlainTextHasher),
            Arc::clone(&token_service),
            AuthServiceConfig::default(),
        ));
        let bill_service = Arc::new(BillService::new(Arc::new(store.clone())));

        Self {
            state: web::Data::new(AppState {
                bill_service,
                auth_service,
                token_service,
            }),
            store,
            users,
            revocations,
        }
    }

    /// Stores an account directly, bypassing registration
    pub async fn seed_user(&self, username: &str, password: &str, role: UserRole) -> i64 {
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: format!("plain:{}", password),
                role,
            })
            .await
            .unwrap();
        user.id
    }
}

/// Builds the full application for `ctx`
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(bb_api::create_app(
            $ctx.state.clone(),
            &bb_shared::CorsConfig::development(),
            256 * 1024,
        ))
        .await
    };
}

/// Login request for `username`
pub fn login_request(username: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": username, "password": password }))
}

/// Authorization header carrying `token` as a bearer token
pub fn bearer(token: &Value) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token.as_str().unwrap_or_default()))
}

/// Body of a valid two-item bill: 100.5 + 2 x 25.125 = 150.75, discount 75.5
pub fn bill_body() -> Value {
    json!({
        "shop_id": 3,
        "currency_id": 1,
        "payment_method_id": 2,
        "subtotal": "150.75",
        "discount": "75.5",
        "total": "75.25",
        "purchase_date": "2024-03-14",
        "items": [
            { "product_id": 10, "quantity": 1, "net_price": "100.5", "net_unit": "unit" },
            { "product_id": 11, "quantity": 2, "net_price": "25.125", "net_unit": "unit" }
        ]
    })
}
