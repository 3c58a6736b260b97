//! Translation of server error responses into [`RavenError`] values.

use serde_json::Value;

use super::constants::*;
use super::exception_schema::ExceptionSchema;
use super::exception_types::resolve_type;
use super::http::HttpResponse;
use crate::error::{BoxError, DocumentConflict, IndexCompilation, RavenError, Result};

/// Classifies server error bodies into the driver's error family.
///
/// Both entry points always produce an error; neither logs nor swallows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionDispatcher;

impl ExceptionDispatcher {
    /// Classifies an already-parsed error schema.
    ///
    /// A 409 status is decided on the conflict marker alone, before any type lookup.
    /// Every other status gets a diagnostic of the form
    /// `"{error}\nThe server at {url} responded with status code: {status}"`.
    pub fn get(schema: &ExceptionSchema, status: u16, inner: Option<BoxError>) -> RavenError {
        if status == HTTP_CONFLICT {
            return if schema.type_name.contains(DOCUMENT_CONFLICT_TYPE_MARKER) {
                RavenError::DocumentConflict(DocumentConflict::from_message(&schema.message))
            } else {
                RavenError::Concurrency(schema.message.clone())
            };
        }

        let error = format!(
            "{}\nThe server at {} responded with status code: {}",
            schema.error, schema.url, status
        );

        match resolve_type(&schema.type_name) {
            Some(kind) => kind.into_error(error),
            None => RavenError::Generic {
                message: error,
                cause: inner,
            },
        }
    }

    /// Classifies a raw error response.
    ///
    /// Internal failures (a body that is not UTF-8 or not a JSON error schema) come
    /// back as [`RavenError::Generic`] with the parse error as cause.
    pub fn throw_exception(response: Option<&HttpResponse>) -> RavenError {
        let Some(response) = response else {
            return RavenError::IllegalArgument("Response cannot be null.".to_string());
        };

        Self::dispatch(response).unwrap_or_else(|internal| internal)
    }

    fn dispatch(response: &HttpResponse) -> Result<RavenError> {
        let json = std::str::from_utf8(response.body())
            .map_err(|e| RavenError::with_cause(e.to_string(), e))?;
        let schema: ExceptionSchema =
            serde_json::from_str(json).map_err(|e| RavenError::with_cause(e.to_string(), e))?;

        if response.status() == HTTP_CONFLICT {
            return Self::conflict(&schema, json);
        }

        let Some(kind) = resolve_type(&schema.type_name) else {
            return Ok(RavenError::generic(&schema.error, json));
        };

        match kind.into_error(schema.error.as_str()) {
            RavenError::IndexCompilation(compilation) => Ok(RavenError::IndexCompilation(
                Self::with_compilation_details(compilation, json)?,
            )),
            error => Ok(error),
        }
    }

    fn conflict(schema: &ExceptionSchema, json: &str) -> Result<RavenError> {
        if schema.type_name.contains(DOCUMENT_CONFLICT_TYPE_MARKER) {
            return Ok(RavenError::DocumentConflict(DocumentConflict::from_json(json)?));
        }

        Ok(RavenError::Concurrency(schema.error.clone()))
    }

    fn with_compilation_details(
        mut compilation: IndexCompilation,
        json: &str,
    ) -> Result<IndexCompilation> {
        let node: Value =
            serde_json::from_str(json).map_err(|e| RavenError::with_cause(e.to_string(), e))?;

        if let Some(property) = node.get(TRANSFORMER_DEFINITION_PROPERTY_FIELD).and_then(text) {
            compilation.set_index_definition_property(property);
        }
        if let Some(problematic) = node.get(PROBLEMATIC_TEXT_FIELD).and_then(text) {
            compilation.set_problematic_text(problematic);
        }

        Ok(compilation)
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ServerErrorKind;
    use std::error::Error as _;

    fn schema(type_name: &str) -> ExceptionSchema {
        ExceptionSchema::new(type_name, "m", "e", "u")
    }

    #[test]
    fn test_get_conflict_with_document_conflict_type() {
        let err = ExceptionDispatcher::get(
            &schema("Raven.Client.Exceptions.Documents.DocumentConflictException"),
            409,
            None,
        );
        match err {
            RavenError::DocumentConflict(conflict) => assert_eq!(conflict.message(), "m"),
            other => panic!("expected document conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_get_conflict_with_other_type_is_concurrency() {
        let err = ExceptionDispatcher::get(
            &schema("Raven.Client.Exceptions.ConcurrencyException"),
            409,
            None,
        );
        assert!(matches!(err, RavenError::Concurrency(m) if m == "m"));
    }

    #[test]
    fn test_get_conflict_branch_wins_over_type_lookup() {
        let err = ExceptionDispatcher::get(&schema("System.TimeoutException"), 409, None);
        assert!(matches!(err, RavenError::Concurrency(_)));
    }

    #[test]
    fn test_get_timeout_alias() {
        let err = ExceptionDispatcher::get(&schema("System.TimeoutException"), 500, None);
        match err {
            RavenError::Timeout(message) => assert_eq!(
                message,
                "e\nThe server at u responded with status code: 500"
            ),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_get_argument_null_alias() {
        let err = ExceptionDispatcher::get(&schema("System.ArgumentNullException"), 400, None);
        assert!(matches!(err, RavenError::IllegalArgument(_)));
    }

    #[test]
    fn test_get_mapped_server_kind() {
        let err = ExceptionDispatcher::get(
            &schema("Raven.Client.Exceptions.Database.DatabaseDoesNotExistException"),
            503,
            None,
        );
        assert_eq!(err.server_kind(), Some(ServerErrorKind::DatabaseDoesNotExist));
    }

    #[test]
    fn test_get_unknown_type_is_generic_with_diagnostic() {
        let cause: BoxError = "transport detail".into();
        let err = ExceptionDispatcher::get(&schema("Some.Unknown.Exception"), 500, Some(cause));
        assert_eq!(
            err.to_string(),
            "e\nThe server at u responded with status code: 500"
        );
        match &err {
            RavenError::Generic { message, cause } => {
                assert_eq!(message, "e\nThe server at u responded with status code: 500");
                assert_eq!(cause.as_ref().unwrap().to_string(), "transport detail");
            }
            other => panic!("expected generic, got {other:?}"),
        }
    }

    #[test]
    fn test_get_too_deep_name_falls_back_to_generic() {
        let err = ExceptionDispatcher::get(
            &schema("Raven.Client.Exceptions.Documents.Indexes.Deep.Nested.Exception"),
            500,
            None,
        );
        assert!(matches!(err, RavenError::Generic { .. }));
    }

    #[test]
    fn test_throw_exception_without_response() {
        let err = ExceptionDispatcher::throw_exception(None);
        assert!(matches!(err, RavenError::IllegalArgument(m) if m == "Response cannot be null."));
    }

    #[test]
    fn test_throw_exception_document_conflict_reads_body() {
        let body = serde_json::json!({
            "Type": "Raven.Client.Exceptions.Documents.DocumentConflictException",
            "Message": "Conflict on users/1",
            "Error": "e",
            "Url": "u",
            "DocId": "users/1",
            "LargestEtag": 7
        });
        let response = HttpResponse::new(409, body.to_string());
        match ExceptionDispatcher::throw_exception(Some(&response)) {
            RavenError::DocumentConflict(conflict) => {
                assert_eq!(conflict.doc_id(), Some("users/1"));
                assert_eq!(conflict.largest_etag(), 7);
                assert_eq!(conflict.message(), "Conflict on users/1");
            }
            other => panic!("expected document conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_throw_exception_concurrency_uses_error_text() {
        let body = serde_json::json!({
            "Type": "Raven.Client.Exceptions.ConcurrencyException",
            "Message": "m",
            "Error": "detailed",
            "Url": "u"
        });
        let response = HttpResponse::new(409, body.to_string());
        let err = ExceptionDispatcher::throw_exception(Some(&response));
        assert!(matches!(err, RavenError::Concurrency(m) if m == "detailed"));
    }

    #[test]
    fn test_throw_exception_unknown_type_keeps_raw_body() {
        let body = r#"{"Type":"Foo.BarException","Message":"m","Error":"boom","Url":"u"}"#;
        let response = HttpResponse::new(500, body);
        let err = ExceptionDispatcher::throw_exception(Some(&response));
        assert_eq!(err.to_string(), format!("boom. Response: {body}"));
    }

    #[test]
    fn test_throw_exception_mapped_type_uses_error_text() {
        let body = serde_json::json!({
            "Type": "Raven.Client.Exceptions.Documents.DocumentDoesNotExistException",
            "Message": "m",
            "Error": "no such doc",
            "Url": "u"
        });
        let response = HttpResponse::new(404, body.to_string());
        match ExceptionDispatcher::throw_exception(Some(&response)) {
            RavenError::Server { kind, message } => {
                assert_eq!(kind, ServerErrorKind::DocumentDoesNotExist);
                assert_eq!(message, "no such doc");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn test_throw_exception_index_compilation_details() {
        let body = serde_json::json!({
            "Type": "Raven.Client.Exceptions.Documents.Compilation.IndexCompilationException",
            "Message": "m",
            "Error": "bad index",
            "Url": "u",
            "TransformerDefinitionProperty": "Maps",
            "ProblematicText": "docs.Users.Select(x => x.)"
        });
        let response = HttpResponse::new(500, body.to_string());
        match ExceptionDispatcher::throw_exception(Some(&response)) {
            RavenError::IndexCompilation(compilation) => {
                assert_eq!(compilation.message(), "bad index");
                assert_eq!(compilation.index_definition_property(), Some("Maps"));
                assert_eq!(
                    compilation.problematic_text(),
                    Some("docs.Users.Select(x => x.)")
                );
            }
            other => panic!("expected index compilation, got {other:?}"),
        }
    }

    #[test]
    fn test_throw_exception_index_compilation_without_details() {
        let body = serde_json::json!({
            "Type": "Raven.Client.Exceptions.Documents.Compilation.IndexCompilationException",
            "Message": "m",
            "Error": "bad index",
            "Url": "u",
            "ProblematicText": null
        });
        let response = HttpResponse::new(500, body.to_string());
        match ExceptionDispatcher::throw_exception(Some(&response)) {
            RavenError::IndexCompilation(compilation) => {
                assert_eq!(compilation.index_definition_property(), None);
                assert_eq!(compilation.problematic_text(), None);
            }
            other => panic!("expected index compilation, got {other:?}"),
        }
    }

    #[test]
    fn test_throw_exception_wraps_parse_failure() {
        let response = HttpResponse::new(500, "<html>Bad Gateway</html>");
        let err = ExceptionDispatcher::throw_exception(Some(&response));
        assert!(matches!(err, RavenError::Generic { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_throw_exception_wraps_invalid_utf8() {
        let response = HttpResponse::new(500, vec![0xff, 0xfe, 0x00]);
        let err = ExceptionDispatcher::throw_exception(Some(&response));
        assert!(matches!(err, RavenError::Generic { cause: Some(_), .. }));
    }
}
