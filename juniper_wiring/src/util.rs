use std::borrow::Cow;

/// Convert string to camel case.
pub(crate) fn to_camel_case(s: &'_ str) -> Cow<'_, str> {
    let mut dest = Cow::Borrowed(s);

    // handle '_' to be more friendly with the
    // _var convention for unused variables
    let s_iter = s.strip_prefix('_').unwrap_or(s).split('_').enumerate();

    for (i, part) in s_iter {
        let mut chars = part.chars();
        match (i, chars.next()) {
            (0, _) => dest = Cow::Borrowed(part),
            (_, Some(first)) => {
                dest += Cow::Owned(first.to_uppercase().collect::<String>());
                dest += chars.as_str();
            }
            (_, None) => {}
        }
    }

    dest
}

/// Checks whether a Rust member name denotes the given GraphQL name.
///
/// Both the verbatim name and its camelCase form are accepted, so `first_name`
/// resolves the `firstName` field.
pub(crate) fn names_match(member: &str, graphql: &str) -> bool {
    member == graphql || to_camel_case(member) == graphql
}

/// Lowercases the first character of a GraphQL type name, producing a
/// parameter name suggestion (`User` becomes `user`).
pub(crate) fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|c| c.to_lowercase().chain(chars).collect())
        .unwrap_or_default()
}

#[test]
fn test_to_camel_case() {
    assert_eq!(&to_camel_case("test")[..], "test");
    assert_eq!(&to_camel_case("_test")[..], "test");
    assert_eq!(&to_camel_case("first_second")[..], "firstSecond");
    assert_eq!(&to_camel_case("first_")[..], "first");
    assert_eq!(&to_camel_case("a_b_c")[..], "aBC");
    assert_eq!(&to_camel_case("a_bc")[..], "aBc");
    assert_eq!(&to_camel_case("a_b")[..], "aB");
    assert_eq!(&to_camel_case("a")[..], "a");
    assert_eq!(&to_camel_case("")[..], "");
}

#[test]
fn test_names_match() {
    assert!(names_match("hello", "hello"));
    assert!(names_match("first_name", "firstName"));
    assert!(names_match("firstName", "firstName"));
    assert!(!names_match("first_name", "first"));
    assert!(!names_match("name", "firstName"));
}

#[test]
fn test_lower_first() {
    assert_eq!(lower_first("User"), "user");
    assert_eq!(lower_first("ID"), "iD");
    assert_eq!(lower_first(""), "");
}
