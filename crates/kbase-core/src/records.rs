//! Structured source records the knowledge base is built from.
//!
//! The JSON shape follows the company information file used by the chat
//! backend (camelCase keys). Missing or `null` fields become empty strings or
//! empty lists; scalars given as numbers or booleans are kept as their text
//! form. Anything structurally wrong (an object where a list is expected,
//! malformed JSON) is reported as [`Error::InvalidRecords`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub japanese_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub founded: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Representative {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(deserialize_with = "lenient_string")]
    pub background: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub target: String,
    #[serde(deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(deserialize_with = "lenient_string_list")]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyValue {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaqEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(deserialize_with = "lenient_string")]
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseStudy {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(deserialize_with = "lenient_string_list")]
    pub results: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient_string")]
    pub office: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business_hours: String,
    #[serde(deserialize_with = "lenient_string")]
    pub consultation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub response_time: String,
}

/// A single source record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Company(Company),
    Representative(Representative),
    Service(Service),
    CompanyValue(CompanyValue),
    Faq(FaqEntry),
    CaseStudy(CaseStudy),
    Contact(Contact),
}

/// The full set of records one knowledge base is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordSet {
    pub company: Option<Company>,
    pub representative: Option<Representative>,
    #[serde(deserialize_with = "nullable")]
    pub services: Vec<Service>,
    #[serde(deserialize_with = "nullable")]
    pub company_values: Vec<CompanyValue>,
    #[serde(deserialize_with = "nullable")]
    pub faq: Vec<FaqEntry>,
    #[serde(deserialize_with = "nullable")]
    pub case_studies: Vec<CaseStudy>,
    pub contact: Option<Contact>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::InvalidRecords(e.to_string()))
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidRecords(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw).map_err(|e| match e {
            Error::InvalidRecords(msg) => Error::InvalidRecords(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Adds one record. Singleton records (company, representative, contact)
    /// replace any previous value; list records are appended in order.
    pub fn push(&mut self, record: Record) {
        match record {
            Record::Company(c) => self.company = Some(c),
            Record::Representative(r) => self.representative = Some(r),
            Record::Service(s) => self.services.push(s),
            Record::CompanyValue(v) => self.company_values.push(v),
            Record::Faq(f) => self.faq.push(f),
            Record::CaseStudy(c) => self.case_studies.push(c),
            Record::Contact(c) => self.contact = Some(c),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.representative.is_none()
            && self.services.is_empty()
            && self.company_values.is_empty()
            && self.faq.is_empty()
            && self.case_studies.is_empty()
            && self.contact.is_none()
    }

    /// Stable serialized form, used to detect changes to the record set.
    pub fn canonical_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidRecords(e.to_string()))
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.push(record);
        }
        set
    }
}

fn scalar_to_string<E: serde::de::Error>(value: Value) -> std::result::Result<String, E> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(E::custom(format!("expected a string, found {}", kind_of(&other)))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_to_string(Value::deserialize(deserializer)?)
}

fn lenient_string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(scalar_to_string).collect(),
        other => Err(serde::de::Error::custom(format!("expected a list, found {}", kind_of(&other)))),
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
