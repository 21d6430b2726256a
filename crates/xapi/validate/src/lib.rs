//! Cascading structural validation for the xAPI statement model.
//!
//! Decoding only rejects wire data the model cannot represent; everything
//! else becomes a constructed value, and the constraints the xAPI
//! specification layers on top are checked here. Each entry point walks its
//! value and returns a set of [`Violation`]s — an empty set means the value
//! satisfies every structural constraint. Validation never gates
//! construction and never panics; violations are plain data for the caller.

#![deny(unsafe_code)]

use tracing::debug;
use xapi_model::{
    Account, Activity, ActivityDefinition, Actor, Agent, Attachment, Context,
    ContextActivities, Extensions, Group, LanguageMap, Statement, StatementObject,
    StatementReference, StatementResult, SubStatement, Verb,
};

/// A single constraint failure, naming the offending field and what was
/// expected of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path from the validated root to the offending field, e.g.
    /// `context.team.member[0].mbox`. Empty when the root itself offends.
    pub path: String,
    /// Human-readable description of the violated constraint.
    pub constraint: String,
}

impl Violation {
    fn new(path: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constraint: constraint.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.constraint)
        } else {
            write!(f, "{}: {}", self.path, self.constraint)
        }
    }
}

fn child(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Validates a Statement and everything it contains.
pub fn validate_statement(statement: &Statement) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_statement_core(
        &statement.actor,
        &statement.verb,
        &statement.object,
        &statement.result,
        &statement.context,
        &statement.attachments,
        "",
        &mut violations,
    );
    if let Some(StatementObject::SubStatement(sub)) = &statement.object {
        check_nested_sub_statement(sub, "object", &mut violations);
    }
    if let Some(authority) = &statement.authority {
        check_actor(authority, &child("", "authority"), &mut violations);
    }
    debug!(violations = violations.len(), "validated statement");
    violations
}

/// Validates a SubStatement and everything it contains, including the
/// one-level nesting cap.
pub fn validate_substatement(sub: &SubStatement) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_sub_statement(sub, "", &mut violations);
    debug!(violations = violations.len(), "validated substatement");
    violations
}

/// Validates an Actor (Agent or Group).
pub fn validate_actor(actor: &Actor) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_actor(actor, "", &mut violations);
    violations
}

/// Validates an Agent.
pub fn validate_agent(agent: &Agent) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_agent(agent, "", &mut violations);
    violations
}

/// Validates a Group.
pub fn validate_group(group: &Group) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_group(group, "", &mut violations);
    violations
}

/// Validates a Verb.
pub fn validate_verb(verb: &Verb) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_verb(verb, "", &mut violations);
    violations
}

/// Validates an Activity.
pub fn validate_activity(activity: &Activity) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_activity(activity, "", &mut violations);
    violations
}

/// Validates a Context.
pub fn validate_context(context: &Context) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_context(context, "", &mut violations);
    violations
}

/// Validates a Result.
pub fn validate_result(result: &StatementResult) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_result(result, "", &mut violations);
    violations
}

/// Validates an Attachment.
pub fn validate_attachment(attachment: &Attachment) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_attachment(attachment, "", &mut violations);
    violations
}

// Shared core of Statement and SubStatement: required actor/verb/object plus
// the optional substructures.
#[allow(clippy::too_many_arguments)]
fn check_statement_core(
    actor: &Option<Actor>,
    verb: &Option<Verb>,
    object: &Option<StatementObject>,
    result: &Option<StatementResult>,
    context: &Option<Context>,
    attachments: &Option<Vec<Attachment>>,
    path: &str,
    violations: &mut Vec<Violation>,
) {
    match actor {
        None => violations.push(Violation::new(
            child(path, "actor"),
            "an actor is required",
        )),
        Some(actor) => check_actor(actor, &child(path, "actor"), violations),
    }
    match verb {
        None => violations.push(Violation::new(child(path, "verb"), "a verb is required")),
        Some(verb) => check_verb(verb, &child(path, "verb"), violations),
    }
    match object {
        None => violations.push(Violation::new(
            child(path, "object"),
            "an object is required",
        )),
        Some(object) => check_object(object, &child(path, "object"), violations),
    }
    if let Some(result) = result {
        check_result(result, &child(path, "result"), violations);
    }
    if let Some(context) = context {
        check_context(context, &child(path, "context"), violations);
    }
    if let Some(attachments) = attachments {
        for (i, attachment) in attachments.iter().enumerate() {
            check_attachment(attachment, &format!("{}[{i}]", child(path, "attachments")), violations);
        }
    }
}

fn check_sub_statement(sub: &SubStatement, path: &str, violations: &mut Vec<Violation>) {
    check_statement_core(
        &sub.actor,
        &sub.verb,
        &sub.object,
        &sub.result,
        &sub.context,
        &sub.attachments,
        path,
        violations,
    );
    if let Some(StatementObject::SubStatement(_)) = &sub.object {
        violations.push(Violation::new(
            child(path, "object"),
            "a SubStatement must not contain another SubStatement",
        ));
    }
}

// A SubStatement sitting directly under a Statement is legal; its contents
// are checked with the nesting cap applied one level down.
fn check_nested_sub_statement(sub: &SubStatement, path: &str, violations: &mut Vec<Violation>) {
    check_sub_statement(sub, path, violations);
}

fn check_object(object: &StatementObject, path: &str, violations: &mut Vec<Violation>) {
    match object {
        StatementObject::Activity(activity) => check_activity(activity, path, violations),
        StatementObject::Agent(agent) => check_agent(agent, path, violations),
        StatementObject::Group(group) => check_group(group, path, violations),
        StatementObject::StatementRef(reference) => {
            check_statement_reference(reference, path, violations)
        }
        // The nesting rule is the containing aggregate's to enforce; the
        // nested statement's own fields are still checked from there.
        StatementObject::SubStatement(_) => {}
    }
}

fn check_actor(actor: &Actor, path: &str, violations: &mut Vec<Violation>) {
    match actor {
        Actor::Agent(agent) => check_agent(agent, path, violations),
        Actor::Group(group) => check_group(group, path, violations),
    }
}

fn identifier_count(
    mbox: &Option<String>,
    mbox_sha1sum: &Option<String>,
    openid: &Option<String>,
    account: &Option<Account>,
) -> usize {
    [mbox.is_some(), mbox_sha1sum.is_some(), openid.is_some(), account.is_some()]
        .into_iter()
        .filter(|set| *set)
        .count()
}

fn check_agent(agent: &Agent, path: &str, violations: &mut Vec<Violation>) {
    if identifier_count(&agent.mbox, &agent.mbox_sha1sum, &agent.openid, &agent.account) != 1 {
        violations.push(Violation::new(
            path,
            "an Agent must have exactly one of mbox, mbox_sha1sum, openid or account",
        ));
    }
    check_identifiers(
        &agent.mbox,
        &agent.mbox_sha1sum,
        &agent.openid,
        &agent.account,
        path,
        violations,
    );
}

fn check_group(group: &Group, path: &str, violations: &mut Vec<Violation>) {
    let identifiers =
        identifier_count(&group.mbox, &group.mbox_sha1sum, &group.openid, &group.account);
    match identifiers {
        0 => {
            // Anonymous group: the member list is its only identity.
            if group.member.as_ref().map_or(true, Vec::is_empty) {
                violations.push(Violation::new(
                    child(path, "member"),
                    "an anonymous Group must have at least one member",
                ));
            }
        }
        1 => {}
        _ => violations.push(Violation::new(
            path,
            "a Group must have at most one of mbox, mbox_sha1sum, openid or account",
        )),
    }
    check_identifiers(
        &group.mbox,
        &group.mbox_sha1sum,
        &group.openid,
        &group.account,
        path,
        violations,
    );
    if let Some(member) = &group.member {
        for (i, agent) in member.iter().enumerate() {
            check_agent(agent, &format!("{}[{i}]", child(path, "member")), violations);
        }
    }
}

fn check_identifiers(
    mbox: &Option<String>,
    mbox_sha1sum: &Option<String>,
    openid: &Option<String>,
    account: &Option<Account>,
    path: &str,
    violations: &mut Vec<Violation>,
) {
    if let Some(mbox) = mbox {
        if !mbox.starts_with("mailto:") || mbox.len() == "mailto:".len() {
            violations.push(Violation::new(
                child(path, "mbox"),
                "an mbox must be a mailto IRI",
            ));
        }
    }
    if let Some(sha1sum) = mbox_sha1sum {
        if sha1sum.len() != 40 || !sha1sum.chars().all(|c| c.is_ascii_hexdigit()) {
            violations.push(Violation::new(
                child(path, "mbox_sha1sum"),
                "an mbox_sha1sum must be 40 hexadecimal characters",
            ));
        }
    }
    if let Some(openid) = openid {
        if !is_absolute_iri(openid) {
            violations.push(Violation::new(
                child(path, "openid"),
                "an openid must be an absolute IRI",
            ));
        }
    }
    if let Some(account) = account {
        let account_path = child(path, "account");
        match &account.home_page {
            None => violations.push(Violation::new(
                child(&account_path, "homePage"),
                "an account homePage is required",
            )),
            Some(home_page) if !is_absolute_iri(home_page) => {
                violations.push(Violation::new(
                    child(&account_path, "homePage"),
                    "an account homePage must be an absolute IRI",
                ));
            }
            Some(_) => {}
        }
        if account.name.is_none() {
            violations.push(Violation::new(
                child(&account_path, "name"),
                "an account name is required",
            ));
        }
    }
}

fn check_verb(verb: &Verb, path: &str, violations: &mut Vec<Violation>) {
    if !is_absolute_iri(&verb.id) {
        violations.push(Violation::new(
            child(path, "id"),
            "a verb id must be an absolute IRI",
        ));
    }
    if let Some(display) = &verb.display {
        check_language_map(display, &child(path, "display"), violations);
    }
}

fn check_activity(activity: &Activity, path: &str, violations: &mut Vec<Violation>) {
    if !is_absolute_iri(&activity.id) {
        violations.push(Violation::new(
            child(path, "id"),
            "an activity id must be an absolute IRI",
        ));
    }
    if let Some(definition) = &activity.definition {
        check_activity_definition(definition, &child(path, "definition"), violations);
    }
}

fn check_activity_definition(
    definition: &ActivityDefinition,
    path: &str,
    violations: &mut Vec<Violation>,
) {
    if let Some(name) = &definition.name {
        check_language_map(name, &child(path, "name"), violations);
    }
    if let Some(description) = &definition.description {
        check_language_map(description, &child(path, "description"), violations);
    }
    if let Some(activity_type) = &definition.activity_type {
        if !is_absolute_iri(activity_type) {
            violations.push(Violation::new(
                child(path, "type"),
                "an activity type must be an absolute IRI",
            ));
        }
    }
    check_extensions(&definition.extensions, path, violations);
}

fn check_statement_reference(
    reference: &StatementReference,
    path: &str,
    violations: &mut Vec<Violation>,
) {
    if reference.id.is_none() {
        violations.push(Violation::new(
            child(path, "id"),
            "a statement reference id is required",
        ));
    }
}

fn check_context(context: &Context, path: &str, violations: &mut Vec<Violation>) {
    if let Some(instructor) = &context.instructor {
        check_actor(instructor, &child(path, "instructor"), violations);
    }
    if let Some(team) = &context.team {
        check_group(team, &child(path, "team"), violations);
    }
    if let Some(activities) = &context.context_activities {
        check_context_activities(activities, &child(path, "contextActivities"), violations);
    }
    if let Some(language) = &context.language {
        if !is_language_tag(language) {
            violations.push(Violation::new(
                child(path, "language"),
                "a context language must be a well-formed language tag",
            ));
        }
    }
    if let Some(statement) = &context.statement {
        check_statement_reference(statement, &child(path, "statement"), violations);
    }
    check_extensions(&context.extensions, path, violations);
}

fn check_context_activities(
    activities: &ContextActivities,
    path: &str,
    violations: &mut Vec<Violation>,
) {
    let kinds = [
        ("parent", &activities.parent),
        ("grouping", &activities.grouping),
        ("category", &activities.category),
        ("other", &activities.other),
    ];
    for (kind, list) in kinds {
        if let Some(list) = list {
            for (i, activity) in list.iter().enumerate() {
                check_activity(activity, &format!("{}[{i}]", child(path, kind)), violations);
            }
        }
    }
}

fn check_result(result: &StatementResult, path: &str, violations: &mut Vec<Violation>) {
    if let Some(score) = &result.score {
        let score_path = child(path, "score");
        if let Some(scaled) = score.scaled {
            if !(-1.0..=1.0).contains(&scaled) {
                violations.push(Violation::new(
                    child(&score_path, "scaled"),
                    "a scaled score must be between -1 and 1",
                ));
            }
        }
        if let (Some(min), Some(max)) = (score.min, score.max) {
            if min > max {
                violations.push(Violation::new(
                    score_path.clone(),
                    "a minimum score must not exceed the maximum",
                ));
            }
        }
        if let Some(raw) = score.raw {
            if score.min.map_or(false, |min| raw < min)
                || score.max.map_or(false, |max| raw > max)
            {
                violations.push(Violation::new(
                    child(&score_path, "raw"),
                    "a raw score must lie between min and max",
                ));
            }
        }
    }
    check_extensions(&result.extensions, path, violations);
}

fn check_attachment(attachment: &Attachment, path: &str, violations: &mut Vec<Violation>) {
    match &attachment.usage_type {
        None => violations.push(Violation::new(
            child(path, "usageType"),
            "an attachment usageType is required",
        )),
        Some(usage_type) if !is_absolute_iri(usage_type) => {
            violations.push(Violation::new(
                child(path, "usageType"),
                "an attachment usageType must be an absolute IRI",
            ));
        }
        Some(_) => {}
    }
    match &attachment.display {
        None => violations.push(Violation::new(
            child(path, "display"),
            "an attachment display is required",
        )),
        Some(display) => check_language_map(display, &child(path, "display"), violations),
    }
    if let Some(description) = &attachment.description {
        check_language_map(description, &child(path, "description"), violations);
    }
    if attachment.content_type.is_none() {
        violations.push(Violation::new(
            child(path, "contentType"),
            "an attachment contentType is required",
        ));
    }
    if attachment.length.is_none() {
        violations.push(Violation::new(
            child(path, "length"),
            "an attachment length is required",
        ));
    }
    match &attachment.sha2 {
        None => violations.push(Violation::new(
            child(path, "sha2"),
            "an attachment sha2 is required",
        )),
        Some(sha2) if sha2.is_empty() || !sha2.chars().all(|c| c.is_ascii_hexdigit()) => {
            violations.push(Violation::new(
                child(path, "sha2"),
                "an attachment sha2 must be a hexadecimal digest",
            ));
        }
        Some(_) => {}
    }
}

fn check_language_map(map: &LanguageMap, path: &str, violations: &mut Vec<Violation>) {
    if map.is_empty() {
        violations.push(Violation::new(
            path,
            "a language map must not be empty when present",
        ));
    }
    for (tag, _) in map.iter() {
        if !is_language_tag(tag) {
            violations.push(Violation::new(
                path,
                format!("'{tag}' is not a well-formed language tag"),
            ));
        }
    }
}

fn check_extensions(extensions: &Option<Extensions>, path: &str, violations: &mut Vec<Violation>) {
    if let Some(extensions) = extensions {
        for key in extensions.keys() {
            if !is_absolute_iri(key) {
                violations.push(Violation::new(
                    child(path, "extensions"),
                    format!("extension key '{key}' must be an absolute IRI"),
                ));
            }
        }
    }
}

/// Minimal absolute-IRI shape check: an alphabetic scheme followed by a
/// colon and a non-empty remainder.
fn is_absolute_iri(candidate: &str) -> bool {
    match candidate.split_once(':') {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !rest.is_empty()
        }
        None => false,
    }
}

/// BCP 47 shape check: 1-8 character alphanumeric subtags joined by single
/// hyphens, leading subtag alphabetic.
fn is_language_tag(candidate: &str) -> bool {
    let mut subtags = candidate.split('-');
    let primary = match subtags.next() {
        Some(primary) => primary,
        None => return false,
    };
    if primary.is_empty()
        || primary.len() > 8
        || !primary.chars().all(|c| c.is_ascii_alphabetic())
    {
        return false;
    }
    subtags.all(|subtag| {
        !subtag.is_empty() && subtag.len() <= 8 && subtag.chars().all(|c| c.is_ascii_alphanumeric())
    })
}
