//! Dropdown option loading for the node's field selector.

use nodes::HttpHelper;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::request::RequestBuilder;
use crate::{AitableConfig, AitableError, NodeVersion};

/// One entry of the field dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub name: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct FieldsResponse {
    #[serde(default)]
    success: bool,
    data: Option<FieldsData>,
}

#[derive(Debug, Deserialize)]
struct FieldsData {
    fields: Option<Vec<Field>>,
}

#[derive(Debug, Deserialize)]
struct Field {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, rename = "isPrimary")]
    is_primary: bool,
}

/// List a datasheet's fields as dropdown options keyed by field name.
pub async fn load_field_options(
    http: &dyn HttpHelper,
    config: &AitableConfig,
    token: &str,
    datasheet_id: &str,
) -> Result<Vec<FieldOption>, AitableError> {
    let datasheet_id = datasheet_id.trim();
    if datasheet_id.is_empty() {
        return Err(AitableError::OptionLoad("Parameter \"datasheetId\" is required".into()));
    }

    let request = RequestBuilder::new(config, token, NodeVersion::V1).list_fields(datasheet_id);
    debug!(url = %request.url, "loading field options");

    let body = http
        .request(request)
        .await
        .map_err(|e| AitableError::OptionLoad(e.to_string()))?;

    let parsed: FieldsResponse = serde_json::from_value(body)
        .map_err(|e| AitableError::OptionLoad(e.to_string()))?;

    let fields = match parsed {
        FieldsResponse { success: true, data: Some(FieldsData { fields: Some(fields) }) } => fields,
        _ => return Err(AitableError::OptionLoad("Failed to load fields from Aitable API".into())),
    };

    Ok(fields
        .into_iter()
        .map(|field| FieldOption {
            description: format!(
                "Type: {}{}",
                field.kind,
                if field.is_primary { " (Primary)" } else { "" }
            ),
            value: field.name.clone(),
            name: field.name,
        })
        .collect())
}
