use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

use crate::{
    ast::Type,
    coercion::JsonCoercer,
    host::{EnumDescriptor, HostClass, HostType, MethodDescriptor, TypeDescriptor},
    mapping::{MappingError, MappingType},
    resolvers::Handler,
    value::{Arguments, Value},
    wiring::MappingItem,
};

use super::{Fixture, member_ctx, resolve};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Status {
    Active,
    Inactive,
}

#[derive(Clone)]
struct User {
    status: Status,
}

struct QueryResolver;

const SDL: &str = "schema { query: Query }
                   type Query { user: User }
                   type User { status: Status! }
                   enum Status { ACTIVE INACTIVE }";

fn fixture(sdl: &str) -> Fixture {
    let mut fixture = Fixture::new(sdl);
    fixture.resolvers.register_root(Handler::of::<QueryResolver>().method(
        MethodDescriptor::on::<QueryResolver, _>("user", HostType::of::<User>(), |_, _| {
            Ok(Value::new(User {
                status: Status::Inactive,
            })
            .into())
        }),
    ));
    fixture.instances.insert(QueryResolver);
    fixture
        .descriptors
        .register(TypeDescriptor::object::<User>().property(
            "status",
            HostType::of::<Status>(),
            |u: &User| Value::new(u.status),
        ))
        .unwrap();
    fixture
}

#[test]
fn binds_enum() {
    let mut fixture = fixture(SDL);
    fixture
        .descriptors
        .register_enum(EnumDescriptor::of::<Status, _>(["ACTIVE", "INACTIVE"]))
        .unwrap();

    let wiring = fixture.generate().unwrap();
    let user = resolve(&wiring, "Query", "user", &Arguments::new(), &Value::null());

    assert_eq!(
        resolve(&wiring, "User", "status", &Arguments::new(), &user).downcast_ref::<Status>(),
        Some(&Status::Inactive),
    );
    assert_eq!(
        wiring.binding("Status"),
        Some(MappingItem::Enum(HostClass::of::<Status>())),
    );
}

#[test]
fn reports_missing_enum_values() {
    let mut fixture = fixture(SDL);
    fixture
        .descriptors
        .register_enum(EnumDescriptor::of::<Status, _>(["ACTIVE"]))
        .unwrap();

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::MissingEnumValues {
            context: member_ctx("User", "status", HostClass::of::<User>(), "status"),
            enum_name: "Status".into(),
            class: HostClass::of::<Status>(),
            missing: vec!["INACTIVE".into()],
        },
    );
    let message = err.to_string();
    assert!(message.starts_with("Some enum values are missing."), "{message}");
    assert!(message.ends_with("\n  Missing values: INACTIVE"), "{message}");
}

#[test]
fn allows_extra_rust_values() {
    let mut fixture = fixture(SDL);
    fixture
        .descriptors
        .register_enum(EnumDescriptor::of::<Status, _>(["ACTIVE", "INACTIVE", "BANNED"]))
        .unwrap();

    assert!(fixture.generate().is_ok());
}

#[test]
fn rejects_undescribed_enum_class() {
    let fixture = fixture(SDL);

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::IncorrectClassMapping {
            context: member_ctx("User", "status", HostClass::of::<User>(), "status"),
            graphql_type: Type::named("Status").non_null(),
            provided_kind: Some(MappingType::CustomClass),
            required_kind: Some(MappingType::Enum),
            provided: HostClass::of::<Status>(),
            supported: vec![],
        },
    );
    assert!(
        err.to_string()
            .starts_with("The field is mapped to a custom class, when required an enum."),
        "{err}",
    );
}

#[test]
fn converts_enum_arguments() {
    let mut fixture = fixture(
        "schema { query: Query }
         type Query { user: User isActive(status: Status!): Boolean! }
         type User { status: Status! }
         enum Status { ACTIVE INACTIVE }",
    );
    fixture.resolvers.register_root(
        Handler::of::<QueryResolver>().method(
            MethodDescriptor::on::<QueryResolver, _>(
                "is_active",
                HostType::of::<bool>(),
                |_, args| {
                    Ok(Value::from(args[0].downcast_ref::<Status>() == Some(&Status::Active)).into())
                },
            )
            .param("status", HostType::of::<Status>()),
        ),
    );
    fixture
        .descriptors
        .register_enum(EnumDescriptor::of::<Status, _>(["ACTIVE", "INACTIVE"]))
        .unwrap();

    let wiring = fixture
        .generator()
        .with_coercer(JsonCoercer::new().register::<Status>())
        .generate()
        .unwrap();
    let json = |v: serde_json::Value| match v {
        serde_json::Value::Object(o) => Arguments::from_json(o),
        _ => unreachable!(),
    };

    let active = resolve(
        &wiring,
        "Query",
        "isActive",
        &json(json!({"status": "ACTIVE"})),
        &Value::null(),
    );
    let inactive = resolve(
        &wiring,
        "Query",
        "isActive",
        &json(json!({"status": "INACTIVE"})),
        &Value::null(),
    );

    assert_eq!(active.downcast_ref::<bool>(), Some(&true));
    assert_eq!(inactive.downcast_ref::<bool>(), Some(&false));
}

#[test]
fn requires_coercer_support_for_enum_arguments() {
    let mut fixture = fixture(
        "schema { query: Query }
         type Query { user: User isActive(status: Status!): Boolean! }
         type User { status: Status! }
         enum Status { ACTIVE INACTIVE }",
    );
    fixture.resolvers.register_root(
        Handler::of::<QueryResolver>().method(
            MethodDescriptor::on::<QueryResolver, _>(
                "is_active",
                HostType::of::<bool>(),
                |_, _| Ok(Value::from(true).into()),
            )
            .param("status", HostType::of::<Status>()),
        ),
    );
    fixture
        .descriptors
        .register_enum(EnumDescriptor::of::<Status, _>(["ACTIVE", "INACTIVE"]))
        .unwrap();

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::UnsupportedInputClass {
            context: member_ctx(
                "Query",
                "isActive",
                HostClass::of::<QueryResolver>(),
                "is_active(status: Status)",
            )
            .for_argument(&"status".into()),
            ty: HostType::of::<Status>(),
        },
    );
}
