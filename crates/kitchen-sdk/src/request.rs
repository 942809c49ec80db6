//! Outgoing request description.
//!
//! A [`RequestOptions`] carries the method, caller headers and an explicitly
//! tagged [`RequestBody`]. It is cheap to clone so the gateway can replay it
//! after a token refresh.

use kitchen_models::TenantContext;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::error::SdkError;

/// Header naming the active restaurant by id.
pub const X_RESTAURANT_ID: HeaderName = HeaderName::from_static("x-restaurant-id");
/// Header naming the active restaurant by slug.
pub const X_RESTAURANT_SLUG: HeaderName = HeaderName::from_static("x-restaurant-slug");

/// Request payload, tagged by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Serialized JSON document.
    Json(Vec<u8>),
    /// `multipart/form-data`; the transport sets the content type and
    /// boundary.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Whether this is a multipart body.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// A replayable multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl MultipartForm {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            bytes,
        });
        self
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn to_form(&self) -> reqwest::multipart::Form {
        self.parts
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, part| match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    bytes,
                } => form.part(
                    name.clone(),
                    reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone()),
                ),
            })
    }
}

/// Method, headers and body of a request to the backend.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    body: RequestBody,
}

impl RequestOptions {
    /// A request with the given method, no headers and no body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// `GET` request.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// `POST` request.
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// `PATCH` request.
    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    /// `DELETE` request.
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, SdkError> {
        self.body = RequestBody::Json(serde_json::to_vec(payload)?);
        Ok(self)
    }

    /// Attach a multipart body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Set a caller header. Caller headers take precedence over the
    /// defaults the gateway would add, except `Authorization`.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Caller headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Headers to send: the caller's, plus
    ///
    /// * `Content-Type: application/json` unless the body is multipart or a
    ///   content type is already set,
    /// * `Authorization: Bearer <access>` when a token is given,
    /// * tenant headers for whatever the caller did not set itself.
    pub fn prepare_headers(
        &self,
        access: Option<&str>,
        tenant: &TenantContext,
    ) -> Result<HeaderMap, SdkError> {
        let mut headers = self.headers.clone();

        if !self.body.is_multipart() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(access) = access {
            let mut value = HeaderValue::from_str(&format!("Bearer {access}"))
                .map_err(|e| SdkError::Header(format!("authorization: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(id) = tenant.restaurant_id {
            if !headers.contains_key(&X_RESTAURANT_ID) {
                headers.insert(X_RESTAURANT_ID, HeaderValue::from(id));
            }
        }
        if let Some(slug) = &tenant.restaurant_slug {
            if !headers.contains_key(&X_RESTAURANT_SLUG) {
                let value = HeaderValue::from_str(slug.as_str())
                    .map_err(|e| SdkError::Header(format!("restaurant slug: {e}")))?;
                headers.insert(X_RESTAURANT_SLUG, value);
            }
        }

        Ok(headers)
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}
