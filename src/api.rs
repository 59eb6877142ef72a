//! Typed wrappers over the remote endpoints, one thin method per service
//! operation. Payload shapes live in [`crate::models`]; responses the layer
//! itself does not interpret pass through as raw JSON.

use reqwest::Method;
use serde_json::{json, Value};

use crate::client::{ApiClient, Auth, Payload};
use crate::error::ApiResult;
use crate::models::{
    AppointmentData, AppointmentStatus, Credentials, DoctorData, DocumentFile, LoginResponse,
    PatientData, VerifyTokenResponse,
};

fn json_payload<T: serde::Serialize>(value: &T) -> Payload {
    // our own payload structs always serialize
    Payload::Json(serde_json::to_value(value).unwrap_or(Value::Null))
}

impl ApiClient {
    /// Self-service account creation.
    pub async fn sign_up(&self, details: &Value) -> ApiResult<Value> {
        self.request(Method::POST, "/api/signup", Payload::Json(details.clone()), Auth::Public)
            .await
    }

    /// Exchange credentials for a bearer token and the account profile.
    /// Persisting the token is the session manager's job, not this call's.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.request(Method::POST, "/api/login", json_payload(credentials), Auth::Public)
            .await
    }

    /// Ask the service whether the stored token is still good.
    pub async fn verify_token(&self) -> ApiResult<VerifyTokenResponse> {
        self.request(Method::GET, "/api/verify-token", Payload::Empty, Auth::Required)
            .await
    }

    /// Clinician registration; open like signup.
    pub async fn create_doctor(&self, data: &DoctorData) -> ApiResult<Value> {
        self.request(Method::POST, "/api/register", json_payload(data), Auth::Public)
            .await
    }

    /// Register a patient record. The response carries the new `patientId`.
    pub async fn create_patient(&self, data: &PatientData) -> ApiResult<Value> {
        self.request(Method::POST, "/api/patients", json_payload(data), Auth::Required)
            .await
    }

    /// Look a patient up by unique id; the service answers by dispatching an
    /// OTP to the patient, confirmed with [`ApiClient::verify_patient_otp`].
    pub async fn search_patient(&self, unique_id: &str) -> ApiResult<Value> {
        let path = format!("/api/patients/search/{}", unique_id);
        self.request(Method::GET, &path, Payload::Empty, Auth::Required).await
    }

    pub async fn verify_patient_otp(&self, patient_id: &str, otp: &str) -> ApiResult<Value> {
        let path = format!("/api/patients/verify-otp/{}", patient_id);
        self.request(Method::POST, &path, Payload::Json(json!({ "otp": otp })), Auth::Required)
            .await
    }

    /// Full record for one patient: vitals history and appointments.
    pub async fn get_patient_detail(&self, patient_id: &str) -> ApiResult<Value> {
        let path = format!("/api/patients/{}", patient_id);
        self.request(Method::GET, &path, Payload::Empty, Auth::Required).await
    }

    pub async fn create_appointment(&self, data: &AppointmentData) -> ApiResult<Value> {
        self.request(Method::POST, "/api/appointments", json_payload(data), Auth::Required)
            .await
    }

    /// Attach documents to a patient record.
    pub async fn upload_documents(&self, patient_id: &str, files: Vec<DocumentFile>) -> ApiResult<Value> {
        let path = format!("/api/patients/{}/documents", patient_id);
        self.request(Method::POST, &path, Payload::Multipart(files), Auth::Required)
            .await
    }

    /// Detach one document. The document is addressed by its storage URL,
    /// percent-encoded so it rides as a single path segment.
    pub async fn delete_document(&self, patient_id: &str, doc_url: &str) -> ApiResult<Value> {
        let path = format!(
            "/api/patients/{}/documents/{}",
            patient_id,
            urlencoding::encode(doc_url)
        );
        self.request(Method::DELETE, &path, Payload::Empty, Auth::Required).await
    }

    pub async fn get_admin_dashboard(&self) -> ApiResult<Value> {
        self.request(Method::GET, "/api/admin/dashboard", Payload::Empty, Auth::Required)
            .await
    }

    /// The signed-in patient's own record: personal info, medical history,
    /// vitals, doctor notes and appointments.
    pub async fn get_my_profile(&self) -> ApiResult<Value> {
        self.request(Method::GET, "/api/my-profile", Payload::Empty, Auth::Required)
            .await
    }

    pub async fn get_my_appointments(&self, status: Option<AppointmentStatus>) -> ApiResult<Value> {
        let payload = match status {
            Some(s) => Payload::Json(json!({ "status": s.as_str() })),
            None => Payload::Empty,
        };
        self.request(Method::GET, "/api/patient/appointments", payload, Auth::Required)
            .await
    }

    pub async fn cancel_appointment(&self, appointment_id: &str) -> ApiResult<Value> {
        let path = format!("/api/patient/appointments/{}/cancel", appointment_id);
        self.request(Method::PUT, &path, Payload::Empty, Auth::Required).await
    }
}
