//! Interactive command handling for the anvaya binary. Each command is a
//! thin call through a typed endpoint wrapper; protected commands consult
//! the role gate first and print the denial outcome instead of calling out.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    AppointmentData, AppointmentStatus, Credentials, DoctorData, DocumentFile, PatientData,
    PersonalDetails,
};
use crate::routes::{route_for, Portal, Route};
use crate::session::{SessionManager, SessionState};

pub struct Repl {
    client: ApiClient,
    session: SessionManager,
}

impl Repl {
    pub fn new(client: ApiClient, session: SessionManager) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Handle one input line. Returns false when the loop should exit.
    pub async fn handle(&self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();
        match cmd.as_str() {
            "quit" | "exit" => return false,
            "help" => print_help(),
            "status" => self.cmd_status(),
            "login" => {
                if args.len() != 2 {
                    println!("usage: login <email> <password>");
                } else {
                    self.login(args[0], args[1]).await;
                }
            }
            "logout" => {
                self.session.sign_out().await;
                println!("signed out");
            }
            "signup" => self.cmd_signup(&args).await,
            "register-doctor" => self.cmd_register_doctor(&args).await,
            "dashboard" => {
                if self.gate(Portal::Admin) {
                    print_outcome(self.client.get_admin_dashboard().await);
                }
            }
            "register-patient" => self.cmd_register_patient(&args).await,
            "search" => {
                if args.len() != 1 {
                    println!("usage: search <unique-id>");
                } else if self.gate(Portal::Doctor) {
                    print_outcome(self.client.search_patient(args[0]).await);
                }
            }
            "verify-otp" => {
                if args.len() != 2 {
                    println!("usage: verify-otp <patient-id> <otp>");
                } else if self.gate(Portal::Doctor) {
                    print_outcome(self.client.verify_patient_otp(args[0], args[1]).await);
                }
            }
            "patient" => {
                if args.len() != 1 {
                    println!("usage: patient <patient-id>");
                } else if self.gate(Portal::Doctor) {
                    print_outcome(self.client.get_patient_detail(args[0]).await);
                }
            }
            "book" => self.cmd_book(&args).await,
            "upload" => self.cmd_upload(&args).await,
            "delete-doc" => {
                if args.len() != 2 {
                    println!("usage: delete-doc <patient-id> <document-url>");
                } else if self.gate_any(&[Portal::Doctor, Portal::Patient]) {
                    print_outcome(self.client.delete_document(args[0], args[1]).await);
                }
            }
            "profile" => {
                if self.gate(Portal::Patient) {
                    print_outcome(self.client.get_my_profile().await);
                }
            }
            "appointments" => self.cmd_appointments(&args).await,
            "cancel" => {
                if args.len() != 1 {
                    println!("usage: cancel <appointment-id>");
                } else if self.gate(Portal::Patient) {
                    print_outcome(self.client.cancel_appointment(args[0]).await);
                }
            }
            other => println!("unknown command '{}'; try 'help'", other),
        }
        true
    }

    /// Exchange credentials and hand the result to the session manager,
    /// which persists the token.
    pub async fn login(&self, email: &str, password: &str) {
        let credentials = Credentials { email: email.to_string(), password: password.to_string() };
        match self.client.login(&credentials).await {
            Ok(resp) => {
                let name = resp.user.name.clone();
                self.session.sign_in(resp.user, resp.token).await;
                println!("signed in as {}", name);
            }
            Err(e) => eprintln!("error: {}", e.message()),
        }
    }

    fn cmd_status(&self) {
        match self.session.state() {
            SessionState::Restoring => println!("restoring session ({})", self.client.base_url()),
            SessionState::Anonymous => println!("not signed in ({})", self.client.base_url()),
            SessionState::Authenticated(user) => println!(
                "signed in as {} <{}> role={:?} ({})",
                user.name,
                user.email,
                user.role,
                self.client.base_url()
            ),
        }
    }

    async fn cmd_signup(&self, args: &[&str]) {
        if args.len() < 3 {
            println!("usage: signup <email> <password> <name...>");
            return;
        }
        let payload = json!({
            "email": args[0],
            "password": args[1],
            "name": args[2..].join(" "),
        });
        print_outcome(self.client.sign_up(&payload).await);
    }

    async fn cmd_register_doctor(&self, args: &[&str]) {
        if args.len() < 4 {
            println!("usage: register-doctor <email> <password> <phone> <name...>");
            return;
        }
        let data = DoctorData {
            email: args[0].to_string(),
            password: args[1].to_string(),
            phone_number: args[2].to_string(),
            name: args[3..].join(" "),
        };
        print_outcome(self.client.create_doctor(&data).await);
    }

    async fn cmd_register_patient(&self, args: &[&str]) {
        if args.len() < 3 {
            println!("usage: register-patient <email> <phone> <name...>");
            return;
        }
        if !self.gate(Portal::Doctor) {
            return;
        }
        let data = PatientData {
            personal_details: PersonalDetails {
                email: args[0].to_string(),
                phone_number: args[1].to_string(),
                name: args[2..].join(" "),
                ..Default::default()
            },
            medical_history: None,
            symptoms_vitals: None,
            doctor_notes: None,
        };
        print_outcome(self.client.create_patient(&data).await);
    }

    async fn cmd_book(&self, args: &[&str]) {
        if args.len() < 4 {
            println!("usage: book <patient-id> <YYYY-MM-DD> <HH:MM> <reason...>");
            return;
        }
        if !self.gate(Portal::Doctor) {
            return;
        }
        let date = match NaiveDate::parse_from_str(args[1], "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                println!("bad date '{}': {}", args[1], e);
                return;
            }
        };
        let data = AppointmentData {
            patient_id: args[0].to_string(),
            appointment_date: Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()),
            appointment_time: args[2].to_string(),
            reason: args[3..].join(" "),
            notes: String::new(),
        };
        print_outcome(self.client.create_appointment(&data).await);
    }

    async fn cmd_upload(&self, args: &[&str]) {
        if args.len() < 2 {
            println!("usage: upload <patient-id> <file>...");
            return;
        }
        if !self.gate_any(&[Portal::Doctor, Portal::Patient]) {
            return;
        }
        let mut files = Vec::new();
        for path in &args[1..] {
            match fs::read(path) {
                Ok(bytes) => {
                    let file_name = Path::new(path)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.to_string());
                    files.push(DocumentFile { file_name, mime_type: mime_for(path), bytes });
                }
                Err(e) => {
                    println!("cannot read '{}': {}", path, e);
                    return;
                }
            }
        }
        print_outcome(self.client.upload_documents(args[0], files).await);
    }

    async fn cmd_appointments(&self, args: &[&str]) {
        if !self.gate(Portal::Patient) {
            return;
        }
        let status = match args.first() {
            Some(s) => match AppointmentStatus::parse(s) {
                Some(status) => Some(status),
                None => {
                    println!("unknown status '{}'; use scheduled, completed or cancelled", s);
                    return;
                }
            },
            None => None,
        };
        print_outcome(self.client.get_my_appointments(status).await);
    }

    fn gate(&self, portal: Portal) -> bool {
        self.gate_any(&[portal])
    }

    // Consults the role gate and explains the denial when the command's
    // portal is not reachable from the current session state.
    fn gate_any(&self, portals: &[Portal]) -> bool {
        let route = route_for(&self.session.state());
        if portals.iter().any(|p| route.allows(*p)) {
            return true;
        }
        let wanted = portals.iter().map(|p| portal_name(*p)).collect::<Vec<_>>().join(" or ");
        match route {
            Route::AwaitSession => println!("session is still restoring; try again in a moment"),
            Route::Login => println!("sign in first (login <email> <password>)"),
            Route::AccessError => {
                println!("your account has no valid role assigned; contact the administrator")
            }
            Route::Portal(p) => println!(
                "this command needs the {} portal; you are signed in to the {} portal",
                wanted,
                portal_name(p)
            ),
        }
        false
    }
}

fn portal_name(p: Portal) -> &'static str {
    match p {
        Portal::Admin => "admin",
        Portal::Doctor => "doctor",
        Portal::Patient => "patient",
    }
}

/// Print a gateway outcome: pretty JSON on success, the normalized message
/// on failure.
pub fn print_outcome(result: ApiResult<Value>) {
    match result {
        Ok(val) => {
            let pretty = serde_json::to_string_pretty(&val).unwrap_or_else(|_| val.to_string());
            println!("{}", pretty);
        }
        Err(e) => eprintln!("error: {}", e.message()),
    }
}

/// MIME type from the file extension; `None` lets the gateway fall back to
/// application/octet-stream.
fn mime_for(path: &str) -> Option<String> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime.to_string())
}

pub fn print_help() {
    println!(
        "commands:\n  status                                   session + service info\n  login <email> <password>                 sign in\n  logout                                   sign out (local)\n  signup <email> <password> <name...>      create an account\n  register-doctor <email> <pw> <phone> <name...>\n\n  admin:\n  dashboard                                patient/appointment counts\n\n  doctor:\n  register-patient <email> <phone> <name...>\n  search <unique-id>                       dispatch an OTP to the patient\n  verify-otp <patient-id> <otp>            confirm the OTP\n  patient <patient-id>                     vitals history + appointments\n  book <patient-id> <YYYY-MM-DD> <HH:MM> <reason...>\n\n  patient:\n  profile                                  my record\n  appointments [scheduled|completed|cancelled]\n  cancel <appointment-id>\n\n  doctor or patient:\n  upload <patient-id> <file>...            attach documents\n  delete-doc <patient-id> <document-url>\n\n  help | quit | exit"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_guesses_common_extensions() {
        assert_eq!(mime_for("scan.pdf").as_deref(), Some("application/pdf"));
        assert_eq!(mime_for("photo.JPG").as_deref(), Some("image/jpeg"));
        assert_eq!(mime_for("notes.txt").as_deref(), Some("text/plain"));
        assert_eq!(mime_for("archive.zip"), None);
        assert_eq!(mime_for("no_extension"), None);
    }
}
