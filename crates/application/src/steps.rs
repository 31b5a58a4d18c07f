//! Scenario step operations.
//!
//! Step definitions (in any locale) bind their phrases to these methods;
//! each method is one step of a scenario.

use apicheck_domain::{
    DomainError, ElapsedTime, HttpMethod, ResponseSpec, ScenarioRequestState, error::json_kind,
    transform,
};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApplicationError, ApplicationResult};
use crate::execute_request::RequestExecutor;
use crate::ports::{ContractValidator, HttpEngine, Reporter};
use crate::session::ApiSession;

/// The state and collaborators one scenario's steps share.
pub struct ScenarioSteps<E: HttpEngine, V: ContractValidator, R: Reporter> {
    state: ScenarioRequestState,
    session: ApiSession<E>,
    executor: RequestExecutor<R>,
    validator: V,
}

impl<E: HttpEngine, V: ContractValidator, R: Reporter> ScenarioSteps<E, V, R> {
    /// Starts a scenario with empty request state.
    #[must_use]
    pub fn new(session: ApiSession<E>, executor: RequestExecutor<R>, validator: V) -> Self {
        Self::with_state(ScenarioRequestState::new(), session, executor, validator)
    }

    /// Starts a scenario from prepared request state.
    #[must_use]
    pub fn with_state(
        state: ScenarioRequestState,
        session: ApiSession<E>,
        executor: RequestExecutor<R>,
        validator: V,
    ) -> Self {
        Self {
            state,
            session,
            executor,
            validator,
        }
    }

    /// The scenario's request state.
    #[must_use]
    pub const fn state(&self) -> &ScenarioRequestState {
        &self.state
    }

    /// Mutable access for steps that set params, headers or body directly.
    pub fn state_mut(&mut self) -> &mut ScenarioRequestState {
        &mut self.state
    }

    /// The response of the last request, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&ResponseSpec> {
        self.state.response()
    }

    /// "send a {method} request to the path {path}"
    ///
    /// # Errors
    ///
    /// Returns the execution error; the previous response is kept.
    pub fn send_request(&mut self, method: HttpMethod, path: &str) -> ApplicationResult<ElapsedTime> {
        let request = self.state.assemble();
        let executed = self
            .executor
            .execute(&mut self.session, &request, method, path)?;
        self.state.set_response(executed.response);
        Ok(executed.elapsed)
    }

    /// "I define the path param {param} with the value of the field
    /// {field} from the previous response"
    ///
    /// Strings are stored as-is; numbers and booleans are stored in their
    /// text form so they can be substituted into an endpoint.
    ///
    /// # Errors
    ///
    /// Fails if no response was recorded, its body is not JSON, the field is
    /// missing, or the field holds null, an array or an object.
    pub fn set_path_param_from_previous_response(
        &mut self,
        param: &str,
        field: &str,
    ) -> ApplicationResult<()> {
        let response = self.state.response().ok_or(ApplicationError::NoResponse)?;
        let body = response.json().map_err(ApplicationError::InvalidResponseBody)?;
        let value = body
            .get(field)
            .ok_or_else(|| ApplicationError::FieldNotFound(field.to_string()))?;

        let text = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            other => {
                return Err(DomainError::NonStringPathParam {
                    name: param.to_string(),
                    found: json_kind(other),
                }
                .into());
            }
        };

        debug!(param, value = %text, "path param captured from previous response");
        self.state.add_path_param(param, text);
        Ok(())
    }

    /// "the contract should match {file}"
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Contract`] with every violation, or the
    /// configuration error that prevented the check.
    pub fn validate_response_schema(&mut self, file: &str) -> ApplicationResult<()> {
        self.state.set_json_schema_file(file);
        let schema_path = self.state.json_schema_file();
        self.validator
            .validate(self.state.response(), Some(schema_path))?;
        Ok(())
    }

    /// "I fill in the payload the field {field} with the value {token}"
    pub fn fill_payload_field(&mut self, field: &str, token: &str) {
        self.state.add_body_param(field, transform(token));
    }

    /// "should return the status code {code}"
    ///
    /// # Errors
    ///
    /// Fails if no response was recorded or its status differs.
    pub fn assert_status_code(&self, expected: u16) -> ApplicationResult<()> {
        let response = self.state.response().ok_or(ApplicationError::NoResponse)?;
        if response.status == expected {
            Ok(())
        } else {
            Err(ApplicationError::StatusMismatch {
                expected,
                actual: response.status,
            })
        }
    }

    /// Ends the scenario: clears the state and closes the session.
    pub fn finish(mut self) {
        self.state.reset();
        self.session.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::contract::{SchemaValidationError, SchemaViolations, Violation};
    use crate::ports::NoopReporter;
    use crate::session::testing::FakeEngine;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Validator that records its inputs and fails when told to.
    #[derive(Default)]
    struct StubValidator {
        seen: RefCell<Vec<(Option<String>, Option<String>)>>,
        reject: bool,
    }

    impl ContractValidator for StubValidator {
        fn validate(
            &self,
            response: Option<&ResponseSpec>,
            schema_path: Option<&str>,
        ) -> Result<(), SchemaValidationError> {
            self.seen.borrow_mut().push((
                response.map(|r| r.body.clone()),
                schema_path.map(str::to_string),
            ));
            if self.reject {
                Err(SchemaValidationError::Mismatch(SchemaViolations::new(
                    schema_path.unwrap_or_default(),
                    vec![Violation::new("/age", "wrong type")],
                )))
            } else {
                Ok(())
            }
        }
    }

    fn steps(
        status: u16,
        body: &str,
        validator: StubValidator,
    ) -> (
        ScenarioSteps<FakeEngine, StubValidator, NoopReporter>,
        std::rc::Rc<RefCell<crate::session::testing::Journal>>,
    ) {
        let (engine, journal) = FakeEngine::new(status, body);
        let steps = ScenarioSteps::new(
            ApiSession::open(engine),
            RequestExecutor::new("http://api.test", NoopReporter),
            validator,
        );
        (steps, journal)
    }

    #[test]
    fn test_send_request_stores_response() {
        let (mut steps, _journal) = steps(201, r#"{"id": 7}"#, StubValidator::default());

        steps.send_request(HttpMethod::Post, "/users").unwrap();

        assert_eq!(steps.response().map(|r| r.status), Some(201));
        assert!(steps.assert_status_code(201).is_ok());
        assert!(matches!(
            steps.assert_status_code(200),
            Err(ApplicationError::StatusMismatch {
                expected: 200,
                actual: 201
            })
        ));
    }

    #[test]
    fn test_chained_path_param_is_substituted_for_delete() {
        let (mut steps, journal) = steps(200, r#"{"id": 7, "name": "Ana"}"#, StubValidator::default());

        steps.send_request(HttpMethod::Post, "/users").unwrap();
        steps.set_path_param_from_previous_response("userId", "id").unwrap();
        steps.send_request(HttpMethod::Delete, "/users/{userId}").unwrap();

        assert_eq!(journal.borrow().dispatched[1].endpoint, "/users/7");
    }

    #[test]
    fn test_path_param_errors() {
        let (mut steps, _journal) = steps(200, r#"{"tags": []}"#, StubValidator::default());

        assert!(matches!(
            steps.set_path_param_from_previous_response("id", "id"),
            Err(ApplicationError::NoResponse)
        ));

        steps.send_request(HttpMethod::Get, "/users").unwrap();
        assert!(matches!(
            steps.set_path_param_from_previous_response("id", "id"),
            Err(ApplicationError::FieldNotFound(field)) if field == "id"
        ));
        assert!(matches!(
            steps.set_path_param_from_previous_response("id", "tags"),
            Err(ApplicationError::Domain(DomainError::NonStringPathParam { .. }))
        ));
    }

    #[test]
    fn test_fill_payload_field_transforms_token() {
        let (mut steps, _journal) = steps(200, "{}", StubValidator::default());

        steps.fill_payload_field("name", "");
        steps.fill_payload_field("age", "0");
        steps.fill_payload_field("nickname", "null");
        steps.fill_payload_field("city", "Recife");

        assert_eq!(
            Value::Object(steps.state().body().clone()),
            serde_json::json!({"name": " ", "age": 0, "nickname": null, "city": "Recife"})
        );
    }

    #[test]
    fn test_validate_response_schema_prefixes_folder() {
        let (mut steps, _journal) = steps(200, r#"{"age": 7}"#, StubValidator::default());
        steps.send_request(HttpMethod::Get, "/users/1").unwrap();

        steps.validate_response_schema("user.json").unwrap();

        assert_eq!(
            steps.validator.seen.borrow()[0],
            (
                Some(r#"{"age": 7}"#.to_string()),
                Some("schemas/user.json".to_string())
            )
        );
    }

    #[test]
    fn test_validate_response_schema_surfaces_mismatch() {
        let validator = StubValidator {
            reject: true,
            ..StubValidator::default()
        };
        let (mut steps, _journal) = steps(200, r#"{"age": "seven"}"#, validator);
        steps.send_request(HttpMethod::Get, "/users/1").unwrap();

        let error = steps.validate_response_schema("user.json").unwrap_err();

        assert!(error.to_string().contains("/age"));
    }

    #[test]
    fn test_finish_closes_session() {
        let (mut steps, journal) = steps(200, "{}", StubValidator::default());
        steps.send_request(HttpMethod::Get, "/users").unwrap();

        steps.finish();

        let journal = journal.borrow();
        assert_eq!(journal.disposed.len(), 1);
        assert_eq!(journal.engine_closed, 1);
    }
}
