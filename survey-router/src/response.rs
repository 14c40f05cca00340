//! Encoding completed surveys into response documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_router_types::ContractViolation;
use tracing::debug;

use crate::Survey;
use crate::fields::epoch_seconds;

/// The platform identifier written when none is configured.
pub const DEFAULT_OPERATING_SYSTEM: &str = "ios";

/// Who and what a response document is sent on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseOptions {
    /// Written as `operating_system`.
    pub operating_system: String,

    /// Written as `account_name` when present.
    pub account_name: Option<String>,

    /// Written as `uuid` when present.
    pub device_id: Option<String>,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            operating_system: DEFAULT_OPERATING_SYSTEM.to_string(),
            account_name: None,
            device_id: None,
        }
    }
}

impl ResponseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operating_system(mut self, operating_system: impl Into<String>) -> Self {
        self.operating_system = operating_system.into();
        self
    }

    pub fn with_account(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }
}

/// Build the response document for `survey`.
///
/// Every question is asked for its answer fragment in declaration order;
/// questions that produce none (instructions, unfinished questions) are left
/// out. Fails if any recorded answer does not fit its question.
pub fn encode_response(
    survey: &Survey,
    options: &ResponseOptions,
) -> Result<Value, ContractViolation> {
    let answers = survey
        .questions()
        .iter()
        .filter_map(|question| question.encode_answer().transpose())
        .collect::<Result<Vec<_>, _>>()?;

    debug!(survey_id = survey.id(), answers = answers.len(), "encoded response");

    let mut document = Map::new();
    document.insert(
        "operating_system".into(),
        Value::from(options.operating_system.as_str()),
    );
    document.insert("survey_id".into(), Value::from(survey.id()));
    if let Some(account) = &options.account_name {
        document.insert("account_name".into(), Value::from(account.as_str()));
    }
    if let Some(device) = &options.device_id {
        document.insert("uuid".into(), Value::from(device.as_str()));
    }
    if let Some(finished) = survey.end_time() {
        document.insert("finish_time".into(), epoch_seconds(finished));
    }
    document.insert("answers".into(), Value::Array(answers));
    Ok(Value::Object(document))
}

/// [`encode_response`] with the default platform identifier.
pub fn encode_response_for(
    survey: &Survey,
    account_name: Option<&str>,
    device_id: Option<&str>,
) -> Result<Value, ContractViolation> {
    let options = ResponseOptions {
        account_name: account_name.map(str::to_string),
        device_id: device_id.map(str::to_string),
        ..ResponseOptions::default()
    };
    encode_response(survey, &options)
}
