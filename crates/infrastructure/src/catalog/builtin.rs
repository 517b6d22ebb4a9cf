//! Scenarios shipped with the harness.
//!
//! Every value here is a literal; nothing is generated at run time.

use restcheck_domain::{
    Assertion, Comment, Endpoint, FailureKind, Fixture, HttpMethod, Payload, Post, Scenario,
    ScenarioCatalog,
};

/// Content type with a deliberate typo, sent verbatim.
pub const MALFORMED_CONTENT_TYPE: &str = "application/jsn";

/// Builds the default catalog.
#[must_use]
pub fn builtin_catalog() -> ScenarioCatalog {
    // Names are literal and unique, so validation cannot fail
    ScenarioCatalog {
        scenarios: builtin_scenarios(),
    }
}

/// Default scenarios in run order.
#[must_use]
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        list_posts(),
        create_post(),
        update_post(),
        delete_post(),
        comment_on_post(),
        comments_by_post(),
        list_posts_idempotent(),
        invalid_identifiers(),
        input_fidelity(),
    ]
}

fn list_fixture(label: &str) -> Fixture {
    Fixture::new(label, HttpMethod::Get, Endpoint::Posts)
        .expect(Assertion::status(200))
        .expect(Assertion::BodyNotEmpty)
        .expect(Assertion::IsJson)
}

fn list_posts() -> Scenario {
    Scenario::new("GET posts").with_fixture(list_fixture("all posts"))
}

fn create_post() -> Scenario {
    Scenario::new("POST create post").with_fixture(
        Fixture::new("foo/bar by user 1", HttpMethod::Post, Endpoint::Posts)
            .with_payload(Post::new(1, "foo", "bar"))
            .expect(Assertion::status(201))
            .expect(Assertion::body_contains(&["foo", "bar"]))
            .expect(Assertion::body_contains_keys(&["id"])),
    )
}

fn update_post() -> Scenario {
    let payload = Payload::from(Post::new(1, "Updated title", "Updated body"));
    Scenario::new("PUT update post").with_fixture(
        Fixture::new("post 1", HttpMethod::Put, Endpoint::Post { id: 1 })
            .expect(Assertion::status(200))
            .expect(Assertion::body_contains(&["Updated title", "Updated body"]))
            .expect(Assertion::EchoesFields {
                fields: payload.echo_fields(),
            })
            .with_payload(payload),
    )
}

fn delete_post() -> Scenario {
    Scenario::new("DELETE post").with_fixture(
        Fixture::new("post 9", HttpMethod::Delete, Endpoint::Post { id: 9 })
            .expect(Assertion::status_one_of(&[200, 204])),
    )
}

fn comment_on_post() -> Scenario {
    Scenario::new("POST comment on post").with_fixture(
        Fixture::new(
            "comment on post 1",
            HttpMethod::Post,
            Endpoint::PostComments { post_id: 1 },
        )
        .with_payload(Comment::new(
            1,
            "Test Comment",
            "test@example.com",
            "This is a test comment.",
        ))
        .expect(Assertion::status(201))
        .expect(Assertion::body_contains_keys(&["postId", "id"])),
    )
}

fn comments_by_post() -> Scenario {
    Scenario::new("GET comments by post").with_fixture(
        Fixture::new(
            "post 2",
            HttpMethod::Get,
            Endpoint::CommentsForPost { post_id: 2 },
        )
        .expect(Assertion::status(200))
        .expect(Assertion::IsJson)
        .expect(Assertion::body_contains_keys(&["postId"])),
    )
}

fn list_posts_idempotent() -> Scenario {
    Scenario::new("GET posts idempotent")
        .with_fixture(list_fixture("first read"))
        .with_fixture(list_fixture("second read"))
}

fn invalid_identifiers() -> Scenario {
    let update = |id: i64| {
        Fixture::new(format!("update post {id}"), HttpMethod::Put, Endpoint::Post { id })
            .with_payload(Post::new(1, "Updated title", "Updated body"))
            .expect(Assertion::status(200))
            .expect_failure(FailureKind::PreconditionViolation)
    };
    Scenario::new("precondition invalid id")
        .with_fixture(update(0))
        .with_fixture(update(-1))
        .with_fixture(
            Fixture::new(
                "comments for post 0",
                HttpMethod::Get,
                Endpoint::CommentsForPost { post_id: 0 },
            )
            .expect(Assertion::status(200))
            .expect_failure(FailureKind::PreconditionViolation),
        )
}

fn input_fidelity() -> Scenario {
    Scenario::new("input fidelity").with_fixture(
        Fixture::new("typo'd content type", HttpMethod::Post, Endpoint::Posts)
            .with_payload(Post::new(1, "foo", "bar"))
            .with_content_type(MALFORMED_CONTENT_TYPE)
            .expect(Assertion::status(201)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin_catalog();
        assert!(catalog.validate().is_ok());
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec![
                "GET posts",
                "POST create post",
                "PUT update post",
                "DELETE post",
                "POST comment on post",
                "GET comments by post",
                "GET posts idempotent",
                "precondition invalid id",
                "input fidelity",
            ]
        );
        assert_eq!(catalog.case_count(), 12);
    }

    #[test]
    fn test_invalid_id_fixtures_fail_validation() {
        let catalog = builtin_catalog();
        let scenario = catalog.get("precondition invalid id");
        assert!(scenario.is_some_and(|s| s
            .fixtures
            .iter()
            .all(|f| f.endpoint.validate().is_err()
                && f.expect_failure == Some(FailureKind::PreconditionViolation))));
    }

    #[test]
    fn test_fidelity_keeps_typo() {
        let catalog = builtin_catalog();
        let fixture = catalog
            .get("input fidelity")
            .and_then(|s| s.fixtures.first())
            .map(|f| f.content_type.as_str());
        assert_eq!(fixture, Some(MALFORMED_CONTENT_TYPE));
    }

    #[test]
    fn test_update_echoes_payload_fields() {
        let catalog = builtin_catalog();
        let fixture = &catalog.scenarios[2].fixtures[0];
        let echoed = fixture.expect.iter().find_map(|a| match a {
            Assertion::EchoesFields { fields } => Some(fields.len()),
            _ => None,
        });
        assert_eq!(echoed, Some(3));
    }
}
