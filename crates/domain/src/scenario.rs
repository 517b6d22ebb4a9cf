//! Scenarios and their literal fixtures.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::ResourceId;
use crate::payload::Payload;
use crate::request::{HttpMethod, JSON_CONTENT_TYPE};
use crate::testing::{Assertion, FailureKind};

/// Target of a fixture, relative to the base URL.
///
/// Identifiers are raw integers here and are validated before any request
/// is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum Endpoint {
    /// `posts`
    Posts,
    /// `posts/{id}`
    Post {
        /// Post identifier.
        id: i64,
    },
    /// `posts/{id}/comments`
    PostComments {
        /// Parent post identifier.
        post_id: i64,
    },
    /// `comments?postId={id}`
    CommentsForPost {
        /// Post identifier used as the filter.
        post_id: i64,
    },
    /// A literal path, sent as-is.
    Raw {
        /// Relative path.
        path: String,
    },
}

impl Endpoint {
    /// Returns the raw resource identifier this endpoint addresses, if any.
    #[must_use]
    pub const fn raw_id(&self) -> Option<i64> {
        match self {
            Self::Post { id } => Some(*id),
            Self::PostComments { post_id } | Self::CommentsForPost { post_id } => Some(*post_id),
            Self::Posts | Self::Raw { .. } => None,
        }
    }

    /// Validates the identifier, if the endpoint has one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` for identifiers `<= 0`.
    pub fn validate(&self) -> DomainResult<Option<ResourceId>> {
        self.raw_id().map(ResourceId::new).transpose()
    }

    /// Builds the relative path.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is invalid or the query string
    /// cannot be encoded.
    pub fn path(&self) -> DomainResult<String> {
        let id = self.validate()?;
        match (self, id) {
            (Self::Posts, _) => Ok("posts".to_string()),
            (Self::Post { .. }, Some(id)) => Ok(format!("posts/{id}")),
            (Self::PostComments { .. }, Some(id)) => Ok(format!("posts/{id}/comments")),
            (Self::CommentsForPost { .. }, Some(id)) => {
                let query = serde_urlencoded::to_string([("postId", id.get())])
                    .map_err(|e| DomainError::InvalidPath(e.to_string()))?;
                Ok(format!("comments?{query}"))
            }
            (Self::Raw { path }, _) => Ok(path.clone()),
            (_, None) => Err(DomainError::InvalidPath(format!("{self:?}"))),
        }
    }
}

fn default_content_type() -> String {
    JSON_CONTENT_TYPE.to_string()
}

/// Literal input for one parameterized case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Case label shown in reports.
    pub label: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Target endpoint.
    pub endpoint: Endpoint,
    /// Payload to serialize, for POST/PUT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    /// Content type sent with the payload, verbatim.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Expectations evaluated against the outcome.
    #[serde(default)]
    pub expect: Vec<Assertion>,
    /// Failure kind this case is meant to provoke. When set, the case passes
    /// only if its first failed check has this kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_failure: Option<FailureKind>,
}

impl Fixture {
    /// Creates a fixture with a JSON content type and no expectations.
    #[must_use]
    pub fn new(label: impl Into<String>, method: HttpMethod, endpoint: Endpoint) -> Self {
        Self {
            label: label.into(),
            method,
            endpoint,
            payload: None,
            content_type: default_content_type(),
            expect: Vec::new(),
            expect_failure: None,
        }
    }

    /// Sets the payload (builder pattern).
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Overrides the content type (builder pattern). The value is not normalized.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Adds an expectation (builder pattern).
    #[must_use]
    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.expect.push(assertion);
        self
    }

    /// Marks the case as a negative case (builder pattern).
    #[must_use]
    pub fn expect_failure(mut self, kind: FailureKind) -> Self {
        self.expect_failure = Some(kind);
        self
    }

    /// Returns true if the fixture only reads remote state.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.method.is_read_only()
    }
}

/// A named category of cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, e.g. "PUT update post".
    pub name: String,
    /// Fixtures, run in order.
    pub fixtures: Vec<Fixture>,
}

impl Scenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixtures: Vec::new(),
        }
    }

    /// Adds a fixture (builder pattern).
    #[must_use]
    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixtures.push(fixture);
        self
    }
}

/// Ordered, immutable set of scenarios for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    /// Scenarios in declaration order.
    pub scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Builds a catalog, rejecting empty or duplicate scenarios.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScenario` if validation fails.
    pub fn new(scenarios: Vec<Scenario>) -> DomainResult<Self> {
        let catalog = Self { scenarios };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks that names are unique and non-empty and every scenario has fixtures.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScenario` naming the first problem found.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if scenario.name.trim().is_empty() {
                return Err(DomainError::InvalidScenario(
                    "scenario name must not be empty".to_string(),
                ));
            }
            if !seen.insert(scenario.name.as_str()) {
                return Err(DomainError::InvalidScenario(format!(
                    "duplicate scenario '{}'",
                    scenario.name
                )));
            }
            if scenario.fixtures.is_empty() {
                return Err(DomainError::InvalidScenario(format!(
                    "scenario '{}' has no fixtures",
                    scenario.name
                )));
            }
        }
        Ok(())
    }

    /// Looks up a scenario by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Scenario names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.name.as_str())
    }

    /// Total number of fixtures.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.fixtures.len()).sum()
    }

    /// Returns a catalog restricted to the given scenario names.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScenario` for an unknown name.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> DomainResult<Self> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        let mut scenarios = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let scenario = self
                .get(name)
                .ok_or_else(|| DomainError::InvalidScenario(format!("unknown scenario '{name}'")))?;
            scenarios.push(scenario.clone());
        }
        Self::new(scenarios)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::payload::Post;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Posts.path().unwrap(), "posts");
        assert_eq!(Endpoint::Post { id: 1 }.path().unwrap(), "posts/1");
        assert_eq!(
            Endpoint::PostComments { post_id: 1 }.path().unwrap(),
            "posts/1/comments"
        );
        assert_eq!(
            Endpoint::CommentsForPost { post_id: 2 }.path().unwrap(),
            "comments?postId=2"
        );
    }

    #[test]
    fn test_invalid_identifier_blocks_path() {
        assert_eq!(
            Endpoint::Post { id: 0 }.path(),
            Err(DomainError::InvalidIdentifier(0))
        );
        assert_eq!(
            Endpoint::CommentsForPost { post_id: -3 }.validate(),
            Err(DomainError::InvalidIdentifier(-3))
        );
        assert_eq!(Endpoint::Posts.validate(), Ok(None));
    }

    #[test]
    fn test_fixture_builder_defaults() {
        let fixture = Fixture::new("create", HttpMethod::Post, Endpoint::Posts)
            .with_payload(Post::new(1, "foo", "bar"))
            .expect(Assertion::status(201));
        assert_eq!(fixture.content_type, "application/json");
        assert_eq!(fixture.expect.len(), 1);
        assert!(!fixture.is_read_only());
    }

    #[test]
    fn test_fixture_deserialize_defaults_content_type() {
        let fixture: Fixture = serde_json::from_str(
            r#"{"label": "list", "method": "GET", "endpoint": {"resource": "posts"}}"#,
        )
        .unwrap();
        assert_eq!(fixture.content_type, "application/json");
        assert!(fixture.payload.is_none());
        assert!(fixture.is_read_only());
    }

    fn scenario(name: &str) -> Scenario {
        Scenario::new(name).with_fixture(Fixture::new("f", HttpMethod::Get, Endpoint::Posts))
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = ScenarioCatalog::new(vec![scenario("a"), scenario("a")]);
        assert!(matches!(result, Err(DomainError::InvalidScenario(_))));
    }

    #[test]
    fn test_catalog_rejects_empty_scenario() {
        let result = ScenarioCatalog::new(vec![Scenario::new("empty")]);
        assert!(matches!(result, Err(DomainError::InvalidScenario(_))));
    }

    #[test]
    fn test_catalog_select_keeps_requested_order() {
        let catalog = ScenarioCatalog::new(vec![scenario("a"), scenario("b")]).unwrap();
        let selected = catalog.select(&["b", "a"]).unwrap();
        assert_eq!(selected.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(catalog.select(&["missing"]).is_err());
        assert_eq!(catalog.case_count(), 2);
    }
}
