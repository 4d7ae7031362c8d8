#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use axum::body::Body;
use axum::http::header;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use patient_service::domain::access::service::AuthService;
use patient_service::domain::patient::errors::PatientError;
use patient_service::domain::patient::models::NewPatient;
use patient_service::domain::patient::models::Patient;
use patient_service::domain::patient::models::PatientId;
use patient_service::domain::patient::ports::PatientRepository;
use patient_service::domain::patient::service::PatientService;
use patient_service::domain::user::errors::UserError;
use patient_service::domain::user::models::NewUser;
use patient_service::domain::user::models::PublicUser;
use patient_service::domain::user::models::User;
use patient_service::domain::user::models::UserId;
use patient_service::domain::user::ports::UserRepository;
use patient_service::domain::user::service::UserService;
use patient_service::inbound::http::router::create_router;
use patient_service::outbound::repositories::PostgresPatientRepository;
use patient_service::outbound::repositories::PostgresUserRepository;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use tower::ServiceExt;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Users and patients kept in memory, with the same uniqueness rules and
/// creator join as the PostgreSQL adapters.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    users: BTreeMap<i64, User>,
    patients: BTreeMap<i64, Patient>,
    next_user_id: i64,
    next_patient_id: i64,
}

impl StoreState {
    fn with_creator(&self, mut patient: Patient) -> Patient {
        patient.created_by_user = self
            .users
            .get(&patient.created_by.0)
            .map(PublicUser::from);
        patient
    }

    fn patient_email_taken(&self, patient_id: Option<PatientId>, patient: &Patient) -> bool {
        let Some(email) = &patient.demographics.email else {
            return false;
        };
        self.patients.values().any(|other| {
            Some(other.id) != patient_id && other.demographics.email.as_ref() == Some(email)
        })
    }
}

impl InMemoryStore {
    pub fn deactivate(&self, username: &str) {
        let mut state = self.state.lock().unwrap();
        for user in state.users.values_mut() {
            if user.username.as_str() == username {
                user.is_active = false;
            }
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.lock().unwrap();

        if state.users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        state.next_user_id += 1;
        let created = User {
            id: UserId(state.next_user_id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        state.users.insert(created.id.0, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.lock().unwrap().users.get(&id.0).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .values()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.lock().unwrap();

        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        let stored = state
            .users
            .get_mut(&user.id.0)
            .ok_or(UserError::NotFound(user.id.to_string()))?;
        stored.email = user.email;
        stored.first_name = user.first_name;
        stored.last_name = user.last_name;
        stored.phone = user.phone;
        stored.updated_at = user.updated_at;

        Ok(stored.clone())
    }
}

#[async_trait]
impl PatientRepository for InMemoryStore {
    async fn create(&self, patient: NewPatient) -> Result<Patient, PatientError> {
        let mut state = self.state.lock().unwrap();

        state.next_patient_id += 1;
        let created = Patient {
            id: PatientId(state.next_patient_id),
            demographics: patient.demographics,
            clinical: patient.clinical,
            created_by: patient.created_by,
            created_by_user: None,
            registration_date: patient.registration_date,
            created_at: patient.registration_date,
            updated_at: patient.registration_date,
        };

        if state.patient_email_taken(None, &created) {
            let email = created.demographics.email.as_ref().map(|e| e.as_str());
            return Err(PatientError::EmailAlreadyExists(
                email.unwrap_or_default().to_string(),
            ));
        }

        state.patients.insert(created.id.0, created.clone());
        Ok(state.with_creator(created))
    }

    async fn list_all(&self) -> Result<Vec<Patient>, PatientError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .patients
            .values()
            .cloned()
            .map(|patient| state.with_creator(patient))
            .collect())
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .patients
            .get(&id.0)
            .cloned()
            .map(|patient| state.with_creator(patient)))
    }

    async fn update(&self, patient: Patient) -> Result<Patient, PatientError> {
        let mut state = self.state.lock().unwrap();

        let Some(stored) = state.patients.get(&patient.id.0) else {
            return Err(PatientError::NotFound(patient.id.to_string()));
        };
        let (created_by, registration_date, created_at) =
            (stored.created_by, stored.registration_date, stored.created_at);

        if state.patient_email_taken(Some(patient.id), &patient) {
            let email = patient.demographics.email.as_ref().map(|e| e.as_str());
            return Err(PatientError::EmailAlreadyExists(
                email.unwrap_or_default().to_string(),
            ));
        }

        let updated = Patient {
            created_by,
            created_by_user: None,
            registration_date,
            created_at,
            ..patient
        };
        state.patients.insert(updated.id.0, updated.clone());

        Ok(state.with_creator(updated))
    }

    async fn delete(&self, id: &PatientId) -> Result<(), PatientError> {
        let mut state = self.state.lock().unwrap();
        state
            .patients
            .remove(&id.0)
            .map(|_| ())
            .ok_or(PatientError::NotFound(id.to_string()))
    }
}

/// Decoded response: status plus JSON body (Null when the body is empty).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["data"]["message"].as_str().unwrap_or_default()
    }
}

/// Where a [`TestApp`] keeps its records.
pub enum Backend {
    InMemory(Arc<InMemoryStore>),
    Postgres(TestDb),
}

/// The real router over a chosen backend, driven without a socket.
pub struct TestApp {
    pub router: Router,
    pub backend: Backend,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let authenticator = test_authenticator();
        let router = build_router(Arc::clone(&store), Arc::clone(&store), &authenticator);

        Self {
            router,
            backend: Backend::InMemory(store),
            authenticator,
        }
    }

    /// Same application over the PostgreSQL adapters and a fresh database.
    ///
    /// `None` when `DATABASE__URL` is unset.
    pub async fn spawn_postgres() -> Option<Self> {
        let db = TestDb::new().await?;
        let authenticator = test_authenticator();
        let router = build_router(
            Arc::new(PostgresUserRepository::new(db.pool.clone())),
            Arc::new(PostgresPatientRepository::new(db.pool.clone())),
            &authenticator,
        );

        Some(Self {
            router,
            backend: Backend::Postgres(db),
            authenticator,
        })
    }

    pub async fn deactivate(&self, username: &str) {
        match &self.backend {
            Backend::InMemory(store) => store.deactivate(username),
            Backend::Postgres(db) => {
                sqlx::query("UPDATE users SET is_active = FALSE WHERE username = $1")
                    .bind(username)
                    .execute(&db.pool)
                    .await
                    .expect("Failed to deactivate user");
            }
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Register a staff account with password `secret1`.
    pub async fn register(&self, username: &str, role: &str) -> TestResponse {
        self.post(
            "/api/v1/register",
            None,
            json!({
                "username": username,
                "email": format!("{}@hospital.test", username),
                "password": "secret1",
                "role": role,
                "first_name": "Test",
                "last_name": "User",
            }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post(
            "/api/v1/login",
            None,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Register, log in and return the access token.
    pub async fn token_for(&self, username: &str, role: &str) -> String {
        let registered = self.register(username, role).await;
        assert_eq!(registered.status, StatusCode::CREATED);

        let response = self.login(username, "secret1").await;
        assert_eq!(response.status, StatusCode::OK);

        response.body["data"]["token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    /// Create a patient as receptionist and return its id.
    pub async fn create_patient(&self, token: &str, body: Value) -> i64 {
        let response = self.post("/api/v1/patients", Some(token), body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        response.body["data"]["id"].as_i64().expect("id missing")
    }
}

fn test_authenticator() -> Arc<Authenticator> {
    // Minimum Argon2 cost keeps the suite fast
    Arc::new(
        Authenticator::new(JWT_SECRET)
            .with_password_hasher(PasswordHasher::with_cost(1024, 1, 1).unwrap()),
    )
}

fn build_router<UR, PR>(
    user_repository: Arc<UR>,
    patient_repository: Arc<PR>,
    authenticator: &Arc<Authenticator>,
) -> Router
where
    UR: UserRepository,
    PR: PatientRepository,
{
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(authenticator),
    ));
    let user_service = Arc::new(UserService::new(user_repository));
    let patient_service = Arc::new(PatientService::new(patient_repository));

    create_router(
        auth_service,
        user_service,
        patient_service,
        Arc::clone(authenticator),
    )
}

/// Throwaway database with migrations applied, dropped with the value.
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    admin_url: String,
}

impl TestDb {
    /// Create a uniquely named database next to the one `DATABASE__URL`
    /// points at.
    pub async fn new() -> Option<Self> {
        let admin_url = std::env::var("DATABASE__URL").ok()?;
        let db_name = format!(
            "test_patient_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE__URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            admin_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let pool = self.pool.clone();
        let db_name = self.db_name.clone();
        let admin_url = self.admin_url.clone();
        handle.spawn(async move {
            pool.close().await;

            if let Ok(mut conn) = PgConnection::connect(&admin_url).await {
                let drop_database =
                    format!(r#"DROP DATABASE IF EXISTS "{}" WITH (FORCE);"#, db_name);
                let _ = conn.execute(drop_database.as_str()).await;
            }
        });
    }
}

pub fn patient_body() -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "phone": "555-0101",
        "date_of_birth": "1985-12-10",
        "gender": "female",
        "address": "12 St James's Square",
        "emergency_contact": "Mary Somerville",
        "blood_group": "A+",
        "insurance_number": "INS-0001"
    })
}
