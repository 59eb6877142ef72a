//! Wire types shared by the gateway, the session layer and the CLI.
//! Request payloads serialize with the service's key casing: camelCase for
//! field names, snake_case for the patient record's section names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque bearer credential issued by the service at login.
pub type SessionToken = String;

/// Account roles the client recognizes. Anything else the server may send
/// deserializes as `Unknown` instead of failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    #[serde(other)]
    Unknown,
}

/// The signed-in account as reported by the service. Held in memory only;
/// rebuilt from `/verify-token` on startup or handed over by the login flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Clinician registration payload for `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorData {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Patient registration payload for `POST /patients`. Only the personal
/// section is mandatory; the clinical sections are filled in when a doctor
/// registers the patient during a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientData {
    pub personal_details: PersonalDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms_vitals: Option<SymptomsVitals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_notes: Option<DoctorNotes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub email: String,
    pub name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adhar_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_existing_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_medications: Option<String>,
}

/// Presenting symptoms and vitals captured at a visit. Readings travel as
/// the free-text strings the intake form collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomsVitals {
    pub appointment_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse_rate: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_advice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_appointment_date: Option<DateTime<Utc>>,
}

/// Booking payload for `POST /appointments`. The service models the slot as
/// a calendar date plus a separate `HH:MM` wall-clock string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentData {
    pub patient_id: String,
    pub appointment_date: DateTime<Utc>,
    pub appointment_time: String,
    pub reason: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse the user-typed filter name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SCHEDULED" => Some(AppointmentStatus::Scheduled),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "CANCELLED" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// One file destined for the multipart document upload.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub file_name: String,
    /// MIME type when known; the gateway substitutes
    /// `application/octet-stream` otherwise.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn role_parses_known_and_unknown_values() {
        assert_eq!(serde_json::from_str::<Role>("\"ADMIN\"").unwrap(), Role::Admin);
        assert_eq!(serde_json::from_str::<Role>("\"DOCTOR\"").unwrap(), Role::Doctor);
        assert_eq!(serde_json::from_str::<Role>("\"PATIENT\"").unwrap(), Role::Patient);
        assert_eq!(serde_json::from_str::<Role>("\"SUPERUSER\"").unwrap(), Role::Unknown);
    }

    #[test]
    fn patient_payload_uses_service_key_casing() {
        let data = PatientData {
            personal_details: PersonalDetails {
                email: "rohan@example.com".into(),
                name: "Rohan".into(),
                phone_number: "9876543210".into(),
                password: Some("secret".into()),
                adhar_card: Some("1234-5678-9012".into()),
                gender: Some(Gender::Male),
                age: Some(42),
                address: None,
                pincode: None,
            },
            medical_history: Some(MedicalHistory {
                pre_existing_conditions: Some("asthma".into()),
                current_medications: None,
            }),
            symptoms_vitals: Some(SymptomsVitals {
                appointment_date: Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap(),
                symptoms: Some(vec!["cough".into()]),
                blood_pressure: Some("120/80".into()),
                temperature: None,
                sugar_level: None,
                pulse_rate: None,
            }),
            doctor_notes: None,
        };
        let v = serde_json::to_value(&data).unwrap();
        let personal = v.get("personal_details").expect("snake_case section key");
        assert_eq!(personal.get("phoneNumber").and_then(|x| x.as_str()), Some("9876543210"));
        assert_eq!(personal.get("adharCard").and_then(|x| x.as_str()), Some("1234-5678-9012"));
        assert_eq!(personal.get("gender").and_then(|x| x.as_str()), Some("MALE"));
        assert!(personal.get("address").is_none(), "absent optionals stay off the wire");
        let history = v.get("medical_history").expect("snake_case section key");
        assert_eq!(history.get("preExistingConditions").and_then(|x| x.as_str()), Some("asthma"));
        assert!(v.get("doctor_notes").is_none());
    }

    #[test]
    fn appointment_status_round_trip() {
        assert_eq!(AppointmentStatus::parse("scheduled"), Some(AppointmentStatus::Scheduled));
        assert_eq!(AppointmentStatus::parse("CANCELLED"), Some(AppointmentStatus::Cancelled));
        assert_eq!(AppointmentStatus::parse("pending"), None);
        assert_eq!(AppointmentStatus::Completed.as_str(), "COMPLETED");
        assert_eq!(
            serde_json::to_value(AppointmentStatus::Scheduled).unwrap(),
            serde_json::json!("SCHEDULED")
        );
    }

    #[test]
    fn verify_response_tolerates_missing_user() {
        let v: VerifyTokenResponse = serde_json::from_str(r#"{"valid":false}"#).unwrap();
        assert!(!v.valid);
        assert!(v.user.is_none());
    }
}
