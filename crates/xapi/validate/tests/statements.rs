//! End-to-end checks over full statement graphs: build, validate, encode,
//! decode, compare.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;
use xapi_model::{Activity, Agent, Statement, StatementObject, Verb};
use xapi_validate::{validate_statement, validate_substatement};

fn fixed_time(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
}

fn kitchen_sink() -> Statement {
    Statement::builder()
        .id(Uuid::parse_str("fd41c918-b88b-4b20-a0a5-a4c32391aaa0").unwrap())
        .group_actor(|g| {
            g.name("Team PB")
                .mbox("mailto:teampb@example.com")
                .member_with(|a| a.name("Andrew Downes").mbox("mailto:andrew@example.com"))
                .member_with(|a| a.name("Toby Nichols").openid("http://toby.openid.example.org/"))
        })
        .verb_with("http://adlnet.gov/expapi/verbs/attended", |v| {
            v.display("en-GB", "attended").display("en-US", "attended")
        })
        .activity_with("http://www.example.com/meetings/occurances/34534", |a| {
            a.definition_with(|d| {
                d.name("en-GB", "example meeting")
                    .description("en-GB", "An example meeting")
                    .activity_type("http://adlnet.gov/expapi/activities/meeting")
                    .more_info("http://virtualmeeting.example.com/345256")
                    .extension("http://example.com/profiles/meetings/extension/location", json!("X:\\meetings\\minutes"))
            })
        })
        .result_with(|r| {
            r.score_with(|s| s.scaled(0.95).raw(95.0).min(0.0).max(100.0))
                .success(true)
                .completion(true)
                .response("We agreed on some example actions.")
                .duration("PT1H0M0S")
        })
        .context_with(|c| {
            c.registration(Uuid::parse_str("ec531277-b57b-4c15-8d91-d292c5b2b8f7").unwrap())
                .agent_instructor(|a| {
                    a.name("Andrew Downes").account(xapi_model::Account::new(
                        "http://www.example.com",
                        "13936749",
                    ))
                })
                .team_with(|g| g.name("Team PB").mbox("mailto:teampb@example.com"))
                .context_activities_with(|ca| {
                    ca.parent(Activity::new("http://www.example.com/meetings/series/267"))
                        .category(Activity::new("http://www.example.com/meetings/categories/teammeeting"))
                })
                .revision("1.5.21a")
                .platform("Example virtual meeting software")
                .language("tlh")
        })
        .timestamp(fixed_time("2013-05-18T05:32:34.804Z"))
        .build()
}

#[test]
fn kitchen_sink_statement_is_valid() {
    let violations = validate_statement(&kitchen_sink());
    assert!(violations.is_empty(), "unexpected violations: {violations:?}");
}

#[test]
fn kitchen_sink_round_trip_is_byte_stable() {
    let statement = kitchen_sink();

    let first = statement.to_json().unwrap();
    let decoded = Statement::from_json(&first).unwrap();
    let second = decoded.to_json().unwrap();

    assert_eq!(first, second);
    assert_eq!(decoded, statement);
}

#[test]
fn decoded_statement_missing_actor_is_constructed_then_flagged() {
    let statement = Statement::from_json(
        r#"{
            "verb": {"id": "http://adlnet.gov/expapi/verbs/answered"},
            "object": {"id": "http://www.example.co.uk/exampleactivity"}
        }"#,
    )
    .unwrap();

    let violations = validate_statement(&statement);
    assert!(violations.iter().any(|v| v.path == "actor"));
}

#[test]
fn voiding_statement_validates_and_reports_voiding() {
    let voiding = Statement::builder()
        .agent_actor(|a| a.mbox("mailto:admin@example.com"))
        .verb(Verb::voided())
        .statement_ref(Uuid::parse_str("e05aa883-acaf-40ad-bf54-02c8ce485fb0").unwrap())
        .build();

    assert!(voiding.is_voiding());
    assert!(validate_statement(&voiding).is_empty());
}

#[test]
fn deeply_nested_sub_statement_is_flagged_where_it_nests() {
    let json = json!({
        "actor": {"mbox": "mailto:outer@example.com"},
        "verb": {"id": "http://example.com/planned"},
        "object": {
            "objectType": "SubStatement",
            "actor": {"mbox": "mailto:middle@example.com"},
            "verb": {"id": "http://example.com/planned"},
            "object": {
                "objectType": "SubStatement",
                "actor": {"mbox": "mailto:inner@example.com"},
                "verb": {"id": "http://example.com/visited"},
                "object": {"id": "http://example.com/website"}
            }
        }
    });

    let statement: Statement = serde_json::from_value(json).unwrap();
    let violations = validate_statement(&statement);
    assert!(violations
        .iter()
        .any(|v| v.path == "object.object"
            && v.constraint.contains("must not contain another SubStatement")));
}

#[test]
fn sub_statement_validation_mirrors_statement_rules() {
    let sub = match kitchen_sink_sub() {
        StatementObject::SubStatement(sub) => *sub,
        other => panic!("expected a SubStatement, got {other:?}"),
    };
    assert!(validate_substatement(&sub).is_empty());
}

fn kitchen_sink_sub() -> StatementObject {
    StatementObject::from(
        xapi_model::SubStatement::builder()
            .agent_actor(|a| a.mbox("mailto:test@example.com"))
            .verb_with("http://example.com/visited", |v| v.display("en-US", "will visit"))
            .activity_with("http://example.com/website", |a| {
                a.definition_with(|d| d.name("en-US", "Some Awesome Website"))
            })
            .build(),
    )
}

#[test]
fn group_member_wire_flexibility_survives_validation() {
    let statement = Statement::from_json(
        r#"{
            "actor": {
                "objectType": "Group",
                "name": "Example Group",
                "account": {"homePage": "http://example.com/homePage", "name": "GroupAccount"},
                "member": {"name": "Andrew Downes", "mbox": "mailto:andrew@example.com"}
            },
            "verb": {"id": "http://adlnet.gov/expapi/verbs/attended"},
            "object": {"id": "http://www.example.com/meetings/occurances/34534"}
        }"#,
    )
    .unwrap();

    assert!(validate_statement(&statement).is_empty());

    let encoded: serde_json::Value = serde_json::to_value(&statement).unwrap();
    assert!(encoded["actor"]["member"].is_array());
}

#[test]
fn agent_statement_object_keeps_its_tag_through_round_trip() {
    let statement = Statement::builder()
        .agent_actor(|a| a.mbox("mailto:test@example.com"))
        .verb(Verb::new("http://example.com/mentioned"))
        .object(Agent::builder().name("Other").mbox("mailto:other@example.com").build())
        .build();

    let json = serde_json::to_value(&statement).unwrap();
    assert_eq!(json["object"]["objectType"], "Agent");

    let decoded: Statement = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, statement);
    assert!(validate_statement(&decoded).is_empty());
}
