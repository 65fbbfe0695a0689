//! ADT^A01 (admit/visit notification) message types.
//!
//! A patient record deserializes from JSON keyed by segment group:
//!
//! ```json
//! {
//!   "MSH": {"SendingApplication": "HIS", "MessageControlID": "123", ...},
//!   "EVN": {"EventTypeCode": "A01", ...},
//!   "PID": {"PatientName": {"FamilyName": "Doe", ...}, ...},
//!   "NK1": {...}, "PV1": {...}, "AL1": {...}
//! }
//! ```
//!
//! All six segment groups are required; fields within them default to empty
//! and are trimmed from the tail of the rendered segment.

use crate::error::MessageError;
use crate::segments::{Address, PatientLocation, PersonName, Practitioner};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_field_separator() -> String {
    "|".to_string()
}

fn default_encoding_characters() -> String {
    r"^~\&".to_string()
}

fn default_message_type() -> String {
    "ADT^A01".to_string()
}

fn default_version_id() -> String {
    "2.5.1".to_string()
}

fn default_event_type_code() -> String {
    "A01".to_string()
}

/// Renders one segment: identifier, then `|`-joined fields with trailing
/// empties trimmed.
fn render_segment(id: &str, fields: &[String]) -> String {
    let mut fields: Vec<&str> = fields.iter().map(String::as_str).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.is_empty() {
        id.to_string()
    } else {
        format!("{}|{}", id, fields.join("|"))
    }
}

/// MSH — message header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Msh {
    #[serde(default = "default_field_separator")]
    pub field_separator: String,
    #[serde(default = "default_encoding_characters")]
    pub encoding_characters: String,
    #[serde(default)]
    pub sending_application: String,
    #[serde(default)]
    pub sending_facility: String,
    #[serde(default)]
    pub receiving_application: String,
    #[serde(default)]
    pub receiving_facility: String,
    #[serde(default)]
    pub date_time_of_message: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    #[serde(default, rename = "MessageControlID")]
    pub message_control_id: String,
    #[serde(default, rename = "ProcessingID")]
    pub processing_id: String,
    #[serde(default = "default_version_id", rename = "VersionID")]
    pub version_id: String,
}

impl Default for Msh {
    fn default() -> Self {
        Self {
            field_separator: default_field_separator(),
            encoding_characters: default_encoding_characters(),
            sending_application: String::new(),
            sending_facility: String::new(),
            receiving_application: String::new(),
            receiving_facility: String::new(),
            date_time_of_message: String::new(),
            message_type: default_message_type(),
            message_control_id: String::new(),
            processing_id: String::new(),
            version_id: default_version_id(),
        }
    }
}

impl Msh {
    /// Renders `MSH|^~\&|...`. MSH-1 is the field separator itself, so the
    /// encoding characters land in the first joined field and the remaining
    /// fields shift by one relative to their numbering.
    fn encode(&self) -> String {
        render_segment(
            "MSH",
            &[
                self.encoding_characters.clone(),
                self.sending_application.clone(),
                self.sending_facility.clone(),
                self.receiving_application.clone(),
                self.receiving_facility.clone(),
                self.date_time_of_message.clone(),
                String::new(), // MSH-8 security
                self.message_type.clone(),
                self.message_control_id.clone(),
                self.processing_id.clone(),
                self.version_id.clone(),
            ],
        )
    }

    /// Returns a copy with a blank control ID replaced by a generated UUID
    /// and a blank timestamp replaced by the current UTC time.
    fn with_generated_ids(&self) -> Msh {
        let mut msh = self.clone();
        if msh.message_control_id.is_empty() {
            msh.message_control_id = Uuid::new_v4().simple().to_string();
        }
        if msh.date_time_of_message.is_empty() {
            msh.date_time_of_message = Utc::now().format("%Y%m%d%H%M%S").to_string();
        }
        msh
    }
}

/// EVN — event type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Evn {
    #[serde(default = "default_event_type_code")]
    pub event_type_code: String,
    pub recorded_date_time: String,
    pub date_time_planned_event: String,
    pub event_reason_code: String,
}

impl Evn {
    fn encode(&self) -> String {
        render_segment(
            "EVN",
            &[
                self.event_type_code.clone(),
                self.recorded_date_time.clone(),
                self.date_time_planned_event.clone(),
                self.event_reason_code.clone(),
            ],
        )
    }
}

/// PID — patient identification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Pid {
    #[serde(rename = "SetID_PID")]
    pub set_id: String,
    pub patient_identifier_list: String,
    pub patient_name: PersonName,
    pub date_of_birth: String,
    pub administrative_sex: String,
    pub patient_address: Address,
    pub phone_number_home: String,
    pub phone_number_business: String,
    pub marital_status: String,
    #[serde(rename = "SSNNumberPatient")]
    pub ssn_number_patient: String,
}

impl Pid {
    fn encode(&self) -> String {
        let mut fields = vec![String::new(); 19];
        fields[0] = self.set_id.clone();
        fields[2] = self.patient_identifier_list.clone();
        fields[4] = self.patient_name.encode();
        fields[6] = self.date_of_birth.clone();
        fields[7] = self.administrative_sex.clone();
        fields[10] = self.patient_address.encode();
        fields[12] = self.phone_number_home.clone();
        fields[13] = self.phone_number_business.clone();
        fields[15] = self.marital_status.clone();
        fields[18] = self.ssn_number_patient.clone();
        render_segment("PID", &fields)
    }
}

/// NK1 — next of kin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Nk1 {
    #[serde(rename = "SetID_NK1")]
    pub set_id: String,
    pub name: PersonName,
    pub relationship: String,
    pub address: Address,
    pub phone_number: String,
}

impl Nk1 {
    fn encode(&self) -> String {
        render_segment(
            "NK1",
            &[
                self.set_id.clone(),
                self.name.encode(),
                self.relationship.clone(),
                self.address.encode(),
                self.phone_number.clone(),
            ],
        )
    }
}

/// PV1 — patient visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Pv1 {
    #[serde(rename = "SetID_PV1")]
    pub set_id: String,
    pub patient_class: String,
    pub assigned_patient_location: PatientLocation,
    pub attending_doctor: Practitioner,
    pub referring_doctor: Practitioner,
    pub admit_date_time: String,
}

impl Pv1 {
    fn encode(&self) -> String {
        // Admit date/time is PV1-44; everything between the doctors and it
        // stays empty.
        let mut fields = vec![String::new(); 44];
        fields[0] = self.set_id.clone();
        fields[1] = self.patient_class.clone();
        fields[2] = self.assigned_patient_location.encode();
        fields[6] = self.attending_doctor.encode();
        fields[7] = self.referring_doctor.encode();
        fields[43] = self.admit_date_time.clone();
        render_segment("PV1", &fields)
    }
}

/// AL1 — patient allergy information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Al1 {
    #[serde(rename = "SetID_AL1")]
    pub set_id: String,
    pub allergen_type_code: String,
    pub allergen: String,
    pub allergy_severity_code: String,
    pub identification_date: String,
}

impl Al1 {
    fn encode(&self) -> String {
        render_segment(
            "AL1",
            &[
                self.set_id.clone(),
                self.allergen_type_code.clone(),
                self.allergen.clone(),
                self.allergy_severity_code.clone(),
                self.identification_date.clone(),
            ],
        )
    }
}

/// A complete ADT^A01 patient record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdtA01 {
    #[serde(rename = "MSH")]
    pub msh: Msh,
    #[serde(rename = "EVN")]
    pub evn: Evn,
    #[serde(rename = "PID")]
    pub pid: Pid,
    #[serde(rename = "NK1")]
    pub nk1: Nk1,
    #[serde(rename = "PV1")]
    pub pv1: Pv1,
    #[serde(rename = "AL1")]
    pub al1: Al1,
}

impl AdtA01 {
    /// Deserializes a patient record from JSON.
    ///
    /// All six segment groups must be present; fields within them may be
    /// omitted.
    pub fn from_json(json: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates and renders the message as ER7 text, segments separated by
    /// carriage returns.
    ///
    /// A blank message control ID or message timestamp is filled in; all
    /// other values render exactly as provided.
    pub fn to_er7(&self) -> Result<String, MessageError> {
        self.validate()?;
        let msh = self.msh.with_generated_ids();
        Ok([
            msh.encode(),
            self.evn.encode(),
            self.pid.encode(),
            self.nk1.encode(),
            self.pv1.encode(),
            self.al1.encode(),
        ]
        .join("\r"))
    }

    fn validate(&self) -> Result<(), MessageError> {
        if self.msh.field_separator != "|" {
            return Err(MessageError::UnsupportedFieldSeparator(
                self.msh.field_separator.clone(),
            ));
        }
        if self.msh.message_type.is_empty() {
            return Err(MessageError::MissingField("MSH.9 message type"));
        }
        if self.msh.version_id.is_empty() {
            return Err(MessageError::MissingField("MSH.12 version ID"));
        }
        Ok(())
    }
}
