use pretty_assertions::assert_eq;

use crate::{
    host::{HostClass, HostType, MethodDescriptor},
    mapping::{Candidate, CandidateKind, MappingError},
    resolvers::{Handler, InstanceUnavailable},
    value::{Arguments, Resolved, Value},
};

use super::{Fixture, field_ctx, member_ctx, resolve};

struct QueryResolver;

struct OtherQueryResolver;

struct MutationResolver {
    prefix: &'static str,
}

fn hello() -> MethodDescriptor {
    MethodDescriptor::on::<QueryResolver, _>("hello", HostType::of::<String>(), |_, args| {
        let name = args[0].as_str().unwrap_or("stranger");
        Ok(Value::from(format!("Hello, {name}!")).into())
    })
    .param("name", HostType::of::<String>())
}

fn hello_fixture() -> Fixture {
    let mut fixture = Fixture::new(
        "schema { query: Query }
         type Query { hello(name: String!): String! }",
    );
    fixture
        .resolvers
        .register_root(Handler::of::<QueryResolver>().method(hello()));
    fixture.instances.insert(QueryResolver);
    fixture
}

#[test]
fn binds_root_method() {
    let wiring = hello_fixture().generate().unwrap();

    let greeting = resolve(
        &wiring,
        "Query",
        "hello",
        &Arguments::new().with("name", "world"),
        &Value::null(),
    );

    assert_eq!(greeting.as_str(), Some("Hello, world!"));
    assert!(wiring.bindings().is_empty());
}

#[test]
fn requires_schema_definition() {
    let fixture = Fixture::new("type Query { hello(name: String!): String! }");

    let err = fixture.generate().unwrap_err();

    assert_eq!(err, MappingError::SchemaDefinitionNotProvided);
    assert!(err.to_string().contains("query: Query"));
}

#[test]
fn requires_root_resolvers() {
    let fixture = Fixture::new(
        "schema { query: Query }
         type Query { hello(name: String!): String! }",
    );

    assert_eq!(
        fixture.generate().unwrap_err(),
        MappingError::RootResolversNotRegistered,
    );
}

#[test]
fn requires_root_type_definition() {
    let mut fixture = hello_fixture();
    fixture.schema = crate::schema::model::SchemaDocument::from_sdl(
        "schema { query: Query }
         type Other { hello: String }",
    )
    .unwrap();

    assert_eq!(
        fixture.generate().unwrap_err(),
        MappingError::TypeDefinitionNotFound {
            type_name: "Query".into(),
            context: None,
        },
    );
}

#[test]
fn fails_on_missing_root_handler() {
    let mut fixture = hello_fixture();
    fixture.schema = crate::schema::model::SchemaDocument::from_sdl(
        "schema { query: Query }
         type Query { bye: String }",
    )
    .unwrap();

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::HandlerNotFound {
            context: field_ctx("Query", "bye"),
            resolvers: vec![HostClass::of::<QueryResolver>()],
        },
    );
    assert!(
        err.to_string()
            .starts_with("The method `bye` not found in any root resolvers: ["),
    );
}

#[test]
fn fails_on_ambiguous_root_handlers() {
    let mut fixture = hello_fixture();
    fixture.resolvers.register_root(
        Handler::of::<OtherQueryResolver>().method(
            MethodDescriptor::on::<OtherQueryResolver, _>(
                "hello",
                HostType::of::<String>(),
                |_, _| Ok(Value::from("hi").into()),
            )
            .param("name", HostType::of::<String>()),
        ),
    );
    fixture.instances.insert(OtherQueryResolver);

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::AmbiguousField {
            context: field_ctx("Query", "hello"),
            candidates: vec![
                Candidate {
                    class: HostClass::of::<QueryResolver>(),
                    kind: CandidateKind::Resolver,
                    member: "hello(name: String)".into(),
                },
                Candidate {
                    class: HostClass::of::<OtherQueryResolver>(),
                    kind: CandidateKind::Resolver,
                    member: "hello(name: String)".into(),
                },
            ],
        },
    );
    let message = err.to_string();
    assert!(message.contains("\n  Candidates:\n  1) "), "{message}");
    assert!(message.contains("\n  2) "), "{message}");
}

#[test]
fn fails_without_handler_instance() {
    let mut fixture = hello_fixture();
    fixture.instances = crate::resolvers::Instances::new();

    assert_eq!(
        fixture.generate().unwrap_err(),
        MappingError::InstanceUnavailable {
            context: field_ctx("Query", "hello"),
            source: InstanceUnavailable {
                class: HostClass::of::<QueryResolver>(),
            },
        },
    );
}

#[test]
fn matches_snake_case_methods() {
    let mut fixture = Fixture::new(
        "schema { query: Query }
         type Query { sayHello: String! }",
    );
    fixture.resolvers.register_root(Handler::of::<QueryResolver>().method(
        MethodDescriptor::on::<QueryResolver, _>("say_hello", HostType::of::<String>(), |_, _| {
            Ok(Value::from("hello").into())
        }),
    ));
    fixture.instances.insert(QueryResolver);

    let wiring = fixture.generate().unwrap();

    assert_eq!(
        resolve(&wiring, "Query", "sayHello", &Arguments::new(), &Value::null()).as_str(),
        Some("hello"),
    );
}

#[test]
fn binds_every_root_operation() {
    let mut fixture = hello_fixture();
    fixture.schema = crate::schema::model::SchemaDocument::from_sdl(
        "schema { query: Query mutation: Mutation }
         type Query { hello(name: String!): String! }
         type Mutation { rename(name: String!): String! }",
    )
    .unwrap();
    fixture.resolvers.register_root(
        Handler::of::<MutationResolver>().method(
            MethodDescriptor::on::<MutationResolver, _>(
                "rename",
                HostType::of::<String>(),
                |this, args| {
                    let name = args[0].as_str().unwrap_or_default();
                    Ok(Value::from(format!("{}{name}", this.prefix)).into())
                },
            )
            .param("name", HostType::of::<String>()),
        ),
    );
    fixture.instances.insert(MutationResolver { prefix: "new " });

    let wiring = fixture.generate().unwrap();

    assert_eq!(
        resolve(
            &wiring,
            "Mutation",
            "rename",
            &Arguments::new().with("name", "name"),
            &Value::null(),
        )
        .as_str(),
        Some("new name"),
    );
    assert!(wiring.dispatcher("Query", "hello").is_some());
}

#[test]
fn rejects_non_object_root_type() {
    let mut fixture = hello_fixture();
    fixture.schema = crate::schema::model::SchemaDocument::from_sdl(
        "schema { query: Query }
         input Query { hello: String }",
    )
    .unwrap();

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err.to_string(),
        "The GraphQL input type `Query` can not be used as a root operation type.",
    );
}

#[tokio::test]
async fn binds_async_root_method() {
    let mut fixture = Fixture::new(
        "schema { query: Query }
         type Query { later: String! }",
    );
    fixture.resolvers.register_root(Handler::of::<QueryResolver>().method(
        MethodDescriptor::on::<QueryResolver, _>(
            "later",
            HostType::of::<String>().deferred(),
            |_, _| Ok(Resolved::deferred(async { Ok(Value::from("done")) })),
        ),
    ));
    fixture.instances.insert(QueryResolver);

    let wiring = fixture.generate().unwrap();
    let dispatcher = wiring.dispatcher("Query", "later").unwrap();

    assert!(dispatcher.is_async());
    let value = dispatcher
        .resolve(&Arguments::new(), &Value::null(), &Default::default())
        .unwrap()
        .into_value()
        .await
        .unwrap();
    assert_eq!(value.as_str(), Some("done"));
}

#[test]
fn reports_member_of_failed_root_field() {
    let mut fixture = hello_fixture();
    fixture.schema = crate::schema::model::SchemaDocument::from_sdl(
        "schema { query: Query }
         type Query { hello(name: String!): Int }",
    )
    .unwrap();

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err.context(),
        Some(&member_ctx(
            "Query",
            "hello",
            HostClass::of::<QueryResolver>(),
            "hello(name: String)",
        )),
    );
}
