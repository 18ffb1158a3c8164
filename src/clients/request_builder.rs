//! Translation of logical operations into [`HttpRequest`] descriptors.
//!
//! Every function here is pure: it reads the immutable [`MonitorConfig`] and
//! the call parameters and returns a request value. None of them read the
//! session; the dispatcher attaches the session header right before sending.
//!
//! # URL layout
//!
//! ```text
//! login:   POST {base}/{language}/{company}/login
//! query:   GET  {base}/{language}/{company}/api/{version}/{module}/{entity}/{id?}
//! command: POST {base}/{language}/{company}/api/{version}/{module}/{namespace}/{command}[/Many][/Simulate|/Validate]
//! batch:   POST {base}/{language}/{company}/api/{version}/Batch[/Simulate|/Validate]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::config::{LanguageCode, MonitorConfig};

/// Optional parameters for a query.
///
/// Unset or empty values are omitted from the request entirely.
///
/// # Example
///
/// ```rust
/// use monitor_api::QueryParams;
///
/// let params = QueryParams::new()
///     .filter("PartNumber eq 'A-100'")
///     .select("Id,PartNumber")
///     .top(10);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Entity id appended as the last path segment.
    pub id: Option<i64>,
    /// Language override for this call.
    pub language: Option<LanguageCode>,
    /// `$filter` clause.
    pub filter: Option<String>,
    /// `$select` clause.
    pub select: Option<String>,
    /// `$expand` clause.
    pub expand: Option<String>,
    /// `$orderby` clause.
    pub orderby: Option<String>,
    /// `$top` row limit.
    pub top: Option<u32>,
    /// `$skip` row offset.
    pub skip: Option<u32>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets a single entity by id.
    #[must_use]
    pub const fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Overrides the client's default language.
    #[must_use]
    pub fn language(mut self, language: LanguageCode) -> Self {
        self.language = Some(language);
        self
    }

    /// Sets the `$filter` clause.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the `$select` clause.
    #[must_use]
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Sets the `$expand` clause.
    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Sets the `$orderby` clause.
    #[must_use]
    pub fn orderby(mut self, orderby: impl Into<String>) -> Self {
        self.orderby = Some(orderby.into());
        self
    }

    /// Sets the `$top` row limit.
    #[must_use]
    pub const fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Sets the `$skip` row offset.
    #[must_use]
    pub const fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }
}

/// Options for a command.
///
/// `simulate` executes the command without committing; `validate` only checks
/// the input. When both are set, `validate` wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Use the bulk (`/Many`) variant of the command.
    pub many: bool,
    /// Append `/Simulate`.
    pub simulate: bool,
    /// Append `/Validate`.
    pub validate: bool,
    /// Language override for this call.
    pub language: Option<LanguageCode>,
}

impl CommandOptions {
    /// Creates default options (single, committing, default language).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the bulk variant of the command.
    #[must_use]
    pub const fn many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    /// Runs the command without committing.
    #[must_use]
    pub const fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Only validates the command input.
    #[must_use]
    pub const fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Overrides the client's default language.
    #[must_use]
    pub fn language(mut self, language: LanguageCode) -> Self {
        self.language = Some(language);
        self
    }
}

/// Options for a batch submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Append `/Simulate`.
    pub simulate: bool,
    /// Append `/Validate`.
    pub validate: bool,
    /// Language override for this call.
    pub language: Option<LanguageCode>,
    /// Fail with `BatchCommandError` when any element reports `IsSuccessful: false`.
    pub raise_on_error: bool,
}

impl BatchOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the batch without committing.
    #[must_use]
    pub const fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Only validates the batch input.
    #[must_use]
    pub const fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Overrides the client's default language.
    #[must_use]
    pub fn language(mut self, language: LanguageCode) -> Self {
        self.language = Some(language);
        self
    }

    /// Turns unsuccessful batch elements into an error.
    #[must_use]
    pub const fn raise_on_error(mut self, raise: bool) -> Self {
        self.raise_on_error = raise;
        self
    }
}

/// One command of a batch submission.
///
/// `forward_property_name` names a field of this command's result whose value
/// the server injects into later commands; `receiving_property_name` names the
/// field of this command that receives a forwarded value. The client only
/// preserves order and echoes both names.
///
/// # Example
///
/// ```rust
/// use monitor_api::BatchCommandEntity;
/// use serde_json::json;
///
/// let create = BatchCommandEntity::new("Inventory/Parts/Create", json!({"PartNumber": "P-1"}))
///     .forward_property_name("EntityId");
/// let link = BatchCommandEntity::new("Inventory/Parts/CreateHyperLink", json!({"Link": "https://example.com"}))
///     .receiving_property_name("PartId");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchCommandEntity {
    /// Command path relative to the API root, e.g. `Inventory/Parts/Create`.
    pub path: String,
    /// Command body.
    pub body: Value,
    /// Result field forwarded to later commands.
    pub forward_property_name: Option<String>,
    /// Field receiving a value forwarded by an earlier command.
    pub receiving_property_name: Option<String>,
}

impl BatchCommandEntity {
    /// Creates a batch entry without forwarding metadata.
    #[must_use]
    pub fn new(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            body,
            forward_property_name: None,
            receiving_property_name: None,
        }
    }

    /// Sets the result field forwarded to later commands.
    #[must_use]
    pub fn forward_property_name(mut self, name: impl Into<String>) -> Self {
        self.forward_property_name = Some(name.into());
        self
    }

    /// Sets the field receiving a forwarded value.
    #[must_use]
    pub fn receiving_property_name(mut self, name: impl Into<String>) -> Self {
        self.receiving_property_name = Some(name.into());
        self
    }

    fn to_json(&self) -> Value {
        json!({
            "Path": self.path,
            "Body": self.body,
            "ForwardPropertyName": self.forward_property_name,
            "ReceivingPropertyName": self.receiving_property_name,
        })
    }
}

/// Builds the login request.
///
/// Login always uses the configured default language and asks the server to
/// take over any existing session for this user.
#[must_use]
pub fn login_request(config: &MonitorConfig) -> HttpRequest {
    let url = format!(
        "{}/{}/{}/login",
        config.base_url(),
        config.language_code(),
        config.company_number().as_ref()
    );

    HttpRequest::builder(HttpMethod::Post, url)
        .body(json!({
            "Username": config.username().as_ref(),
            "Password": config.password().as_ref(),
            "ForceRelogin": true,
        }))
        .build()
}

/// Builds a query request.
#[must_use]
pub fn query_request(
    config: &MonitorConfig,
    module: &str,
    entity: &str,
    params: &QueryParams,
) -> HttpRequest {
    let id = params.id.map(|id| id.to_string()).unwrap_or_default();
    let url = format!(
        "{}/{module}/{entity}/{id}",
        api_root(config, params.language.as_ref())
    );

    HttpRequest::builder(HttpMethod::Get, url)
        .optional_query_param("$filter", params.filter.as_deref())
        .optional_query_param("$select", params.select.as_deref())
        .optional_query_param("$expand", params.expand.as_deref())
        .optional_query_param("$orderby", params.orderby.as_deref())
        .optional_query_param("$top", params.top)
        .optional_query_param("$skip", params.skip)
        .build()
}

/// Builds a command request.
///
/// `body` is sent verbatim as JSON; `None` sends no body.
#[must_use]
pub fn command_request(
    config: &MonitorConfig,
    module: &str,
    namespace: &str,
    command: &str,
    body: Option<Value>,
    options: &CommandOptions,
) -> HttpRequest {
    let many = if options.many { "/Many" } else { "" };
    let url = format!(
        "{}/{module}/{namespace}/{command}{many}{}",
        api_root(config, options.language.as_ref()),
        mode_suffix(options.simulate, options.validate)
    );

    HttpRequest::builder(HttpMethod::Post, url)
        .optional_body(body)
        .build()
}

/// Builds a batch request whose body is the entries in the given order.
#[must_use]
pub fn batch_request(
    config: &MonitorConfig,
    commands: &[BatchCommandEntity],
    options: &BatchOptions,
) -> HttpRequest {
    let url = format!(
        "{}/Batch{}",
        api_root(config, options.language.as_ref()),
        mode_suffix(options.simulate, options.validate)
    );

    let body = Value::Array(commands.iter().map(BatchCommandEntity::to_json).collect());

    HttpRequest::builder(HttpMethod::Post, url).body(body).build()
}

fn api_root(config: &MonitorConfig, language: Option<&LanguageCode>) -> String {
    format!(
        "{}/{}/{}/api/{}",
        config.base_url(),
        language.unwrap_or_else(|| config.language_code()),
        config.company_number().as_ref(),
        config.api_version()
    )
}

const fn mode_suffix(simulate: bool, validate: bool) -> &'static str {
    if validate {
        "/Validate"
    } else if simulate {
        "/Simulate"
    } else {
        ""
    }
}
