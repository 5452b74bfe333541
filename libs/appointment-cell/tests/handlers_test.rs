use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::{appointment_routes, Appointment, AppointmentState};
use doctor_cell::{CreateDoctorRequest, Doctor};
use patient_cell::{CreatePatientRequest, Patient};
use shared_database::{InMemoryRepository, Repository};
use shared_utils::test_utils::{json_request, read_json, TestConfig};

struct TestApp {
    router: Router,
    appointments: Arc<InMemoryRepository<Appointment>>,
    doctors: Arc<InMemoryRepository<Doctor>>,
    patients: Arc<InMemoryRepository<Patient>>,
    token: String,
}

fn address() -> Value {
    json!({
        "logradouro": "Rua 1",
        "bairro": "Centro",
        "cep": "12345678",
        "cidade": "Recife",
        "uf": "PE"
    })
}

async fn setup() -> TestApp {
    let config = TestConfig::default();
    let appointments = Arc::new(InMemoryRepository::<Appointment>::new());
    let doctors = Arc::new(InMemoryRepository::<Doctor>::new());
    let patients = Arc::new(InMemoryRepository::<Patient>::new());

    let doctor: CreateDoctorRequest = serde_json::from_value(json!({
        "nome": "Ana",
        "email": "ana@voll.med",
        "telefone": "81999990000",
        "crm": "4321",
        "especialidade": "GINECOLOGIA",
        "endereco": address()
    }))
    .unwrap();
    doctors.save(Doctor::from(doctor)).await.unwrap();

    let patient: CreatePatientRequest = serde_json::from_value(json!({
        "nome": "Bia",
        "email": "bia@example.com",
        "telefone": "81988880000",
        "cpf": "123.456.789-09",
        "endereco": address()
    }))
    .unwrap();
    patients.save(Patient::from(patient)).await.unwrap();

    let router = appointment_routes(AppointmentState {
        config: config.to_arc(),
        appointments: appointments.clone(),
        doctors: doctors.clone(),
        patients: patients.clone(),
    });

    TestApp {
        router,
        appointments,
        doctors,
        patients,
        token: config.bearer_token("recepcao"),
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(json_request(method, uri, Some(&self.token), body))
            .await
            .unwrap();
        let status = response.status();
        (status, read_json(response).await)
    }
}

#[tokio::test]
async fn test_schedule_appointment() {
    let app = setup().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/consultas",
            Some(&app.token),
            Some(json!({"idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "http://localhost:3000/consultas/1");
    assert_eq!(
        read_json(response).await,
        json!({"idConsulta": 1, "idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})
    );
}

#[tokio::test]
async fn test_unknown_references_are_not_found() {
    let app = setup().await;

    let (status, body) = app
        .send(Method::POST, "/consultas", Some(json!({"idMedico": 7, "idPaciente": 1, "data": "2026-11-03"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Doctor 7 not found");

    let (status, _) = app
        .send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 7, "data": "2026-11-03"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.appointments.len().await, 0);
}

#[tokio::test]
async fn test_inactive_doctor_is_rejected() {
    let app = setup().await;
    let mut doctor = app.doctors.find_by_id(1).await.unwrap().unwrap();
    doctor.deactivate();
    app.doctors.save(doctor).await.unwrap();

    let (status, body) = app
        .send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Doctor 1 is inactive");
}

#[tokio::test]
async fn test_inactive_patient_is_rejected() {
    let app = setup().await;
    let mut patient = app.patients.find_by_id(1).await.unwrap().unwrap();
    patient.deactivate();
    app.patients.save(patient).await.unwrap();

    let (status, _) = app
        .send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.appointments.len().await, 0);
}

#[tokio::test]
async fn test_missing_date_is_bad_request() {
    let app = setup().await;

    let (status, _) = app
        .send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_sorted_by_date() {
    let app = setup().await;
    for date in ["2026-12-01", "2026-10-20", "2026-11-15"] {
        let (status, _) = app
            .send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1, "data": date})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.send(Method::GET, "/consultas", None).await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["data"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-10-20", "2026-11-15", "2026-12-01"]);
    assert_eq!(body["totalElements"], 3);
}

#[tokio::test]
async fn test_detail_and_missing_detail() {
    let app = setup().await;
    app.send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})))
        .await;

    let (status, body) = app.send(Method::GET, "/consultas/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["idMedico"], 1);

    let (status, _) = app.send(Method::GET, "/consultas/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requires_token() {
    let app = setup().await;

    let response = app
        .router
        .oneshot(json_request(Method::GET, "/consultas", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_path_and_query_have_json_error_body() {
    let app = setup().await;

    let (status, body) = app.send(Method::GET, "/consultas/amanha", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app.send(Method::GET, "/consultas?size=dez", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_reschedule_keeps_parties() {
    let app = setup().await;
    app.send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})))
        .await;

    let (status, body) = app
        .send(Method::PUT, "/consultas", Some(json!({"idConsulta": 1, "data": "2026-12-10"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"idConsulta": 1, "idMedico": 1, "idPaciente": 1, "data": "2026-12-10"})
    );
}

#[tokio::test]
async fn test_update_checks_new_references() {
    let app = setup().await;
    app.send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})))
        .await;

    let (status, _) = app
        .send(Method::PUT, "/consultas", Some(json!({"idConsulta": 1, "idMedico": 5})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let stored = app.appointments.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.doctor_id, 1);

    let (status, _) = app
        .send(Method::PUT, "/consultas", Some(json!({"idConsulta": 9, "data": "2026-12-10"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_removes_appointment() {
    let app = setup().await;
    app.send(Method::POST, "/consultas", Some(json!({"idMedico": 1, "idPaciente": 1, "data": "2026-11-03"})))
        .await;

    let (status, body) = app.send(Method::DELETE, "/consultas/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(app.appointments.len().await, 0);

    let (status, _) = app.send(Method::DELETE, "/consultas/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
