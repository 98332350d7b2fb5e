use pretty_assertions::assert_eq;

use crate::{
    ast::Type,
    dispatch::ArgumentDefinition,
    host::{HostClass, HostType, Marker, MethodDescriptor, TypeDescriptor},
    mapping::{Candidate, CandidateKind, MappingError, MappingType},
    resolvers::Handler,
    value::{Arguments, Value},
    wiring::MappingItem,
};

use super::{Fixture, field_ctx, member_ctx, resolve};

trait Account {}

#[derive(Clone)]
struct User {
    id: String,
    name: String,
}

impl Account for User {}

struct Admin;

impl Account for Admin {}

#[derive(Clone)]
struct Node {
    id: String,
    parent: Option<Box<Node>>,
}

struct QueryResolver;

struct UserResolver;

fn alice() -> User {
    User {
        id: "1".into(),
        name: "Alice".into(),
    }
}

fn user_descriptor() -> TypeDescriptor {
    TypeDescriptor::object::<User>()
        .property("id", HostType::of::<String>(), |u: &User| u.id.clone())
        .property("name", HostType::of::<String>(), |u: &User| u.name.clone())
}

fn root(name: &str, ty: HostType) -> MethodDescriptor {
    MethodDescriptor::on::<QueryResolver, _>(name, ty, |_, _| Ok(Value::new(alice()).into()))
}

fn fixture(sdl: &str, root_type: HostType) -> Fixture {
    let mut fixture = Fixture::new(sdl);
    fixture
        .resolvers
        .register_root(Handler::of::<QueryResolver>().method(root("user", root_type)));
    fixture.instances.insert(QueryResolver);
    fixture
}

fn user_fixture(sdl: &str) -> Fixture {
    let mut fixture = fixture(sdl, HostType::of::<User>());
    fixture.descriptors.register(user_descriptor()).unwrap();
    fixture
}

fn user_resolver(method: MethodDescriptor) -> Handler {
    Handler::of::<UserResolver>().method(method)
}

#[test]
fn binds_object_properties() {
    let fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! name: String! }",
    );

    let wiring = fixture.generate().unwrap();
    let user = resolve(&wiring, "Query", "user", &Arguments::new(), &Value::null());

    assert_eq!(
        resolve(&wiring, "User", "name", &Arguments::new(), &user).as_str(),
        Some("Alice"),
    );
    assert_eq!(
        resolve(&wiring, "User", "id", &Arguments::new(), &user).as_str(),
        Some("1"),
    );
    assert_eq!(
        wiring.binding("User"),
        Some(MappingItem::Object(HostClass::of::<User>())),
    );
    assert_eq!(wiring.bindings().len(), 1);
}

#[test]
fn fails_on_unknown_field() {
    let fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! email: String }",
    );

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::FieldNotFound {
            context: field_ctx("User", "email"),
            class: HostClass::of::<User>(),
            resolvers: vec![],
        },
    );
    assert!(
        err.to_string().starts_with("The property or method `email` not found in "),
        "{err}",
    );
}

#[test]
fn binds_type_resolver_method() {
    let mut fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! displayName: String! }",
    );
    fixture.resolvers.register_type_resolver::<User>(user_resolver(
        MethodDescriptor::on::<UserResolver, _>(
            "display_name",
            HostType::of::<String>(),
            |_, args| {
                let user = args[0].downcast_ref::<User>().ok_or("no user")?;
                Ok(Value::from(format!("{} ({})", user.name, user.id)).into())
            },
        )
        .param("user", HostType::of::<User>()),
    ));
    fixture.instances.insert(UserResolver);

    let wiring = fixture.generate().unwrap();

    assert_eq!(
        wiring.dispatcher("User", "displayName").unwrap().arguments(),
        [ArgumentDefinition::Source],
    );
    assert_eq!(
        resolve(
            &wiring,
            "User",
            "displayName",
            &Arguments::new(),
            &Value::new(alice()),
        )
        .as_str(),
        Some("Alice (1)"),
    );
}

#[test]
fn binds_type_resolver_method_without_source() {
    let mut fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! reputation: Int! }",
    );
    fixture.resolvers.register_type_resolver::<User>(user_resolver(
        MethodDescriptor::on::<UserResolver, _>("reputation", HostType::of::<i32>(), |_, _| {
            Ok(Value::from(42).into())
        }),
    ));
    fixture.instances.insert(UserResolver);

    let wiring = fixture.generate().unwrap();

    let reputation = resolve(
        &wiring,
        "User",
        "reputation",
        &Arguments::new(),
        &Value::new(alice()),
    );
    assert_eq!(reputation.downcast_ref::<i32>(), Some(&42));
}

#[test]
fn fails_on_ambiguous_field() {
    let mut fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! name: String! }",
    );
    fixture.resolvers.register_type_resolver::<User>(user_resolver(
        MethodDescriptor::on::<UserResolver, _>("name", HostType::of::<String>(), |_, _| {
            Ok(Value::from("Bob").into())
        })
        .param("user", HostType::of::<User>()),
    ));
    fixture.instances.insert(UserResolver);

    assert_eq!(
        fixture.generate().unwrap_err(),
        MappingError::AmbiguousField {
            context: field_ctx("User", "name"),
            candidates: vec![
                Candidate {
                    class: HostClass::of::<User>(),
                    kind: CandidateKind::Property,
                    member: "name: String".into(),
                },
                Candidate {
                    class: HostClass::of::<UserResolver>(),
                    kind: CandidateKind::Resolver,
                    member: "name(user: User)".into(),
                },
            ],
        },
    );
}

#[test]
fn rebinds_same_class_silently() {
    let mut fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User friend: User }
         type User { id: ID! }",
    );
    fixture.resolvers.register_root(
        Handler::of::<QueryResolver>().method(root("friend", HostType::of::<User>())),
    );

    let wiring = fixture.generate().unwrap();

    assert_eq!(wiring.bindings().len(), 1);
    assert!(wiring.dispatcher("Query", "friend").is_some());
}

#[test]
fn fails_on_conflicting_classes() {
    let mut fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User admin: User }
         type User { id: ID! }",
    );
    fixture
        .descriptors
        .register(TypeDescriptor::object::<Admin>().property(
            "id",
            HostType::of::<String>(),
            |_: &Admin| "0",
        ))
        .unwrap();
    fixture.resolvers.register_root(
        Handler::of::<QueryResolver>().method(root("admin", HostType::of::<Admin>())),
    );

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::MappingConflict {
            context: Some(member_ctx(
                "Query",
                "admin",
                HostClass::of::<QueryResolver>(),
                "admin()",
            )),
            kind: crate::schema::meta::DefinitionKind::Object,
            type_name: "User".into(),
            provided: HostClass::of::<Admin>(),
            registered: HostClass::of::<User>(),
            registered_at: Some(member_ctx(
                "Query",
                "user",
                HostClass::of::<QueryResolver>(),
                "user()",
            )),
        },
    );
    let message = err.to_string();
    assert!(
        message.starts_with("Unable to map GraphQL type `User` to "),
        "{message}",
    );
    assert!(
        message.contains("Previously mapped at:\n    GraphQL type: Query\n    GraphQL field: user"),
        "{message}",
    );
}

#[test]
fn binds_self_referential_type() {
    let mut fixture = Fixture::new(
        "schema { query: Query }
         type Query { node: Node }
         type Node { id: ID! parent: Node }",
    );
    fixture.resolvers.register_root(Handler::of::<QueryResolver>().method(
        MethodDescriptor::on::<QueryResolver, _>("node", HostType::of::<Node>(), |_, _| {
            Ok(Value::new(Node {
                id: "2".into(),
                parent: Some(Box::new(Node {
                    id: "1".into(),
                    parent: None,
                })),
            })
            .into())
        }),
    ));
    fixture.instances.insert(QueryResolver);
    fixture
        .descriptors
        .register(
            TypeDescriptor::object::<Node>()
                .property("id", HostType::of::<String>(), |n: &Node| n.id.clone())
                .property("parent", HostType::of::<Node>().optional(), |n: &Node| {
                    n.parent
                        .as_deref()
                        .cloned()
                        .map_or_else(Value::null, Value::new)
                }),
        )
        .unwrap();

    let wiring = fixture.generate().unwrap();
    let node = resolve(&wiring, "Query", "node", &Arguments::new(), &Value::null());
    let parent = resolve(&wiring, "Node", "parent", &Arguments::new(), &node);
    let grandparent = resolve(&wiring, "Node", "parent", &Arguments::new(), &parent);

    assert_eq!(
        resolve(&wiring, "Node", "id", &Arguments::new(), &parent).as_str(),
        Some("1"),
    );
    assert!(grandparent.is_null());
    assert_eq!(wiring.bindings().len(), 1);
}

#[test]
fn rejects_property_with_arguments() {
    let fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! name(upper: Boolean): String! }",
    );

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::IncorrectArgumentCount {
            context: member_ctx("User", "name", HostClass::of::<User>(), "name"),
            kind: CandidateKind::Property,
            provided: 0,
            required: 1,
            suggested: "Boolean upper".into(),
        },
    );
    assert!(
        err.to_string().starts_with(
            "The property has too few arguments, provided: 0, required 1 arg(s): (Boolean upper)",
        ),
        "{err}",
    );
}

#[test]
fn binds_object_method() {
    let mut fixture = fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { greeting(prefix: String!): String! }",
        HostType::of::<User>(),
    );
    fixture
        .descriptors
        .register(
            TypeDescriptor::object::<User>().method(
                MethodDescriptor::on::<User, _>("greeting", HostType::of::<String>(), |u, args| {
                    let prefix = args[0].as_str().unwrap_or_default();
                    Ok(Value::from(format!("{prefix}{}", u.name)).into())
                })
                .param("prefix", HostType::of::<String>()),
            ),
        )
        .unwrap();

    let wiring = fixture.generate().unwrap();

    assert_eq!(
        resolve(
            &wiring,
            "User",
            "greeting",
            &Arguments::new().with("prefix", "Hi, "),
            &Value::new(alice()),
        )
        .as_str(),
        Some("Hi, Alice"),
    );
}

#[test]
fn rejects_incorrect_scalar_class() {
    let fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! name: Int }",
    );

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::IncorrectClassMapping {
            context: member_ctx("User", "name", HostClass::of::<User>(), "name"),
            graphql_type: Type::named("Int"),
            provided_kind: None,
            required_kind: None,
            provided: HostClass::of::<String>(),
            supported: vec![HostClass::of::<i32>()],
        },
    );
    let message = err.to_string();
    assert!(
        message.starts_with("The field is mapped to the incorrect class."),
        "{message}",
    );
    assert!(message.contains("\n  Required GraphQL type: Int"), "{message}");
    assert!(message.contains("\n  Supported classes: i32"), "{message}");
}

#[test]
fn binds_lists_in_lockstep() {
    let mut fixture = Fixture::new(
        "schema { query: Query }
         type Query { users: [User!]! }
         type User { id: ID! }",
    );
    fixture.resolvers.register_root(Handler::of::<QueryResolver>().method(
        MethodDescriptor::on::<QueryResolver, _>("users", HostType::list_of::<User>(), |_, _| {
            Ok(Value::list([Value::new(alice())]).into())
        }),
    ));
    fixture.instances.insert(QueryResolver);
    fixture.descriptors.register(user_descriptor()).unwrap();

    let wiring = fixture.generate().unwrap();
    let users = resolve(&wiring, "Query", "users", &Arguments::new(), &Value::null());

    assert_eq!(users.as_list().map(<[_]>::len), Some(1));
    assert_eq!(
        wiring.binding("User"),
        Some(MappingItem::Object(HostClass::of::<User>())),
    );
}

#[test]
fn rejects_list_mapped_to_single_value() {
    let mut fixture = Fixture::new(
        "schema { query: Query }
         type Query { users: [User] }
         type User { id: ID! }",
    );
    fixture.resolvers.register_root(
        Handler::of::<QueryResolver>().method(root("users", HostType::of::<User>())),
    );
    fixture.instances.insert(QueryResolver);
    fixture.descriptors.register(user_descriptor()).unwrap();

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::IncorrectClassMapping {
            context: member_ctx("Query", "users", HostClass::of::<QueryResolver>(), "users()"),
            graphql_type: Type::list(Type::named("User")),
            provided_kind: Some(MappingType::CustomClass),
            required_kind: Some(MappingType::Iterable),
            provided: HostClass::of::<User>(),
            supported: vec![],
        },
    );
    assert!(
        err.to_string()
            .starts_with("The field is mapped to a custom class, when required a list."),
        "{err}",
    );
}

#[test]
fn rejects_builtin_class_for_object() {
    let fixture = fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! }",
        HostType::of::<i32>(),
    );

    let err = fixture.generate().unwrap_err();

    assert!(
        err.to_string()
            .starts_with("The field is mapped to a built-in class, when required a custom class."),
        "{err}",
    );
}

#[test]
fn rejects_undescribed_class() {
    let fixture = fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! }",
        HostType::of::<User>(),
    );

    assert_eq!(
        fixture.generate().unwrap_err(),
        MappingError::NotIntrospectable {
            context: member_ctx("Query", "user", HostClass::of::<QueryResolver>(), "user()"),
            class: HostClass::of::<User>(),
            marker: Marker::Type,
        },
    );
}

#[test]
fn binds_single_capability_implementation() {
    let mut fixture = fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! }",
        HostType::of::<dyn Account>(),
    );
    fixture
        .descriptors
        .register(user_descriptor().implements::<dyn Account>())
        .unwrap();

    let wiring = fixture.generate().unwrap();

    assert_eq!(
        wiring.binding("User"),
        Some(MappingItem::Object(HostClass::of::<User>())),
    );
}

#[test]
fn rejects_multiple_capability_implementations() {
    let mut fixture = fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! }",
        HostType::of::<dyn Account>(),
    );
    fixture
        .descriptors
        .register(user_descriptor().implements::<dyn Account>())
        .unwrap()
        .register(TypeDescriptor::object::<Admin>().implements::<dyn Account>())
        .unwrap();

    let err = fixture.generate().unwrap_err();

    assert_eq!(
        err,
        MappingError::MultipleImplementations {
            context: member_ctx("Query", "user", HostClass::of::<QueryResolver>(), "user()"),
            capability: HostClass::of::<dyn Account>(),
            implementations: vec![HostClass::of::<Admin>(), HostClass::of::<User>()],
        },
    );
}

#[test]
fn binds_capability_resolver_method() {
    let mut fixture = user_fixture(
        "schema { query: Query }
         type Query { user: User }
         type User { id: ID! kind: String! }",
    );
    fixture.descriptors = crate::host::TypeDescriptorRegistry::new();
    fixture
        .descriptors
        .register(user_descriptor().implements::<dyn Account>())
        .unwrap();
    fixture.resolvers.register_type_resolver::<dyn Account>(user_resolver(
        MethodDescriptor::on::<UserResolver, _>("kind", HostType::of::<String>(), |_, _| {
            Ok(Value::from("account").into())
        })
        .param("account", HostType::of::<dyn Account>()),
    ));
    fixture.instances.insert(UserResolver);

    let wiring = fixture.generate().unwrap();

    assert_eq!(
        wiring.dispatcher("User", "kind").unwrap().arguments(),
        [ArgumentDefinition::Source],
    );
    assert_eq!(
        resolve(&wiring, "User", "kind", &Arguments::new(), &Value::new(alice())).as_str(),
        Some("account"),
    );
}
