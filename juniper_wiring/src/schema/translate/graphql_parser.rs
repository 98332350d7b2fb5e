use graphql_parser::{
    query::{Number as ExternalNumber, Type as ExternalType, Value as ExternalValue},
    schema::{
        Definition, Document, EnumType as ExternalEnum, Field as ExternalField,
        InputObjectType as ExternalInputObjectType, InputValue as ExternalInputValue,
        InterfaceType as ExternalInterfaceType, ObjectType as ExternalObjectType,
        ObjectTypeExtension as ExternalObjectTypeExtension, ScalarType as ExternalScalarType,
        SchemaDefinition as ExternalSchemaDefinition, TypeDefinition as ExternalTypeDefinition,
        TypeExtension as ExternalTypeExtension, UnionType as ExternalUnionType,
    },
};

use crate::{
    ast::Type,
    schema::{
        meta::{
            Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta, MetaType,
            ObjectMeta, ScalarMeta, UnionMeta,
        },
        model::{SchemaDefinition, SchemaDocument},
        translate::TranslateError,
    },
};

pub(crate) struct GraphQLParserTranslator;

impl<'a> TryFrom<&Document<'a, String>> for SchemaDocument {
    type Error = TranslateError;

    fn try_from(input: &Document<'a, String>) -> Result<Self, Self::Error> {
        GraphQLParserTranslator::translate_document(input)
    }
}

impl GraphQLParserTranslator {
    pub(crate) fn translate_document(
        input: &Document<'_, String>,
    ) -> Result<SchemaDocument, TranslateError> {
        let mut doc = SchemaDocument::new();

        for definition in &input.definitions {
            if let Definition::TypeDefinition(def) = definition {
                let meta = Self::translate_type_definition(def);
                let name = meta.name().clone();
                if doc.add_type(meta).is_some() {
                    return Err(TranslateError::DuplicateType(name));
                }
            }
        }

        for definition in &input.definitions {
            match definition {
                Definition::SchemaDefinition(def) => {
                    if doc.schema_definition().is_some() {
                        return Err(TranslateError::DuplicateSchemaDefinition);
                    }
                    doc.set_schema_definition(Self::translate_schema_definition(def));
                }
                Definition::TypeExtension(ExternalTypeExtension::Object(ext)) => {
                    Self::extend_object(&mut doc, ext)?;
                }
                Definition::TypeExtension(_) | Definition::DirectiveDefinition(_) => {
                    __wiring_trace!("ignoring unsupported schema definition");
                }
                Definition::TypeDefinition(_) => {}
            }
        }

        Ok(doc)
    }

    fn extend_object(
        doc: &mut SchemaDocument,
        input: &ExternalObjectTypeExtension<'_, String>,
    ) -> Result<(), TranslateError> {
        let ExternalObjectTypeExtension {
            name,
            implements_interfaces,
            fields,
            ..
        } = input;

        match doc.type_by_name(name).cloned() {
            Some(MetaType::Object(mut object)) => {
                object
                    .interface_names
                    .extend(implements_interfaces.iter().map(|i| i.as_str().into()));
                object
                    .fields
                    .extend(fields.iter().map(Self::translate_field));
                doc.add_type(MetaType::Object(object));
                Ok(())
            }
            _ => Err(TranslateError::UnknownExtendedType(name.as_str().into())),
        }
    }

    fn translate_schema_definition(
        input: &ExternalSchemaDefinition<'_, String>,
    ) -> SchemaDefinition {
        let ExternalSchemaDefinition {
            query,
            mutation,
            subscription,
            ..
        } = input;

        SchemaDefinition {
            query: query.as_deref().map(Into::into),
            mutation: mutation.as_deref().map(Into::into),
            subscription: subscription.as_deref().map(Into::into),
        }
    }

    fn translate_type_definition(input: &ExternalTypeDefinition<'_, String>) -> MetaType {
        match input {
            ExternalTypeDefinition::Scalar(ExternalScalarType {
                name, description, ..
            }) => MetaType::Scalar(ScalarMeta {
                name: name.as_str().into(),
                description: description.as_deref().map(Into::into),
            }),
            ExternalTypeDefinition::Object(ExternalObjectType {
                name,
                description,
                implements_interfaces,
                fields,
                ..
            }) => MetaType::Object(ObjectMeta {
                name: name.as_str().into(),
                description: description.as_deref().map(Into::into),
                fields: fields.iter().map(Self::translate_field).collect(),
                interface_names: implements_interfaces
                    .iter()
                    .map(|i| i.as_str().into())
                    .collect(),
            }),
            ExternalTypeDefinition::Interface(ExternalInterfaceType {
                name,
                description,
                fields,
                ..
            }) => MetaType::Interface(InterfaceMeta {
                name: name.as_str().into(),
                description: description.as_deref().map(Into::into),
                fields: fields.iter().map(Self::translate_field).collect(),
            }),
            ExternalTypeDefinition::Union(ExternalUnionType {
                name,
                description,
                types,
                ..
            }) => MetaType::Union(UnionMeta {
                name: name.as_str().into(),
                description: description.as_deref().map(Into::into),
                of_type_names: types.iter().map(|t| t.as_str().into()).collect(),
            }),
            ExternalTypeDefinition::Enum(ExternalEnum {
                name,
                description,
                values,
                ..
            }) => MetaType::Enum(EnumMeta {
                name: name.as_str().into(),
                description: description.as_deref().map(Into::into),
                values: values
                    .iter()
                    .map(|v| EnumValue {
                        name: v.name.as_str().into(),
                        description: v.description.as_deref().map(Into::into),
                    })
                    .collect(),
            }),
            ExternalTypeDefinition::InputObject(ExternalInputObjectType {
                name,
                description,
                fields,
                ..
            }) => MetaType::InputObject(InputObjectMeta {
                name: name.as_str().into(),
                description: description.as_deref().map(Into::into),
                input_fields: fields.iter().map(Self::translate_argument).collect(),
            }),
        }
    }

    fn translate_field(input: &ExternalField<'_, String>) -> Field {
        let ExternalField {
            name,
            description,
            arguments,
            field_type,
            ..
        } = input;

        Field {
            name: name.as_str().into(),
            description: description.as_deref().map(Into::into),
            arguments: arguments.iter().map(Self::translate_argument).collect(),
            field_type: Self::translate_type(field_type),
        }
    }

    fn translate_argument(input: &ExternalInputValue<'_, String>) -> Argument {
        let ExternalInputValue {
            name,
            description,
            value_type,
            default_value,
            ..
        } = input;

        Argument {
            name: name.as_str().into(),
            description: description.as_deref().map(Into::into),
            arg_type: Self::translate_type(value_type),
            default_value: default_value.as_ref().map(Self::translate_value),
        }
    }

    fn translate_type(input: &ExternalType<'_, String>) -> Type {
        match input {
            ExternalType::NamedType(x) => Type::Named(x.as_str().into()),
            ExternalType::ListType(x) => Type::List(Box::new(Self::translate_type(x))),
            ExternalType::NonNullType(x) => Type::NonNull(Box::new(Self::translate_type(x))),
        }
    }

    fn translate_value(input: &ExternalValue<'_, String>) -> serde_json::Value {
        match input {
            // Variables can't be referenced by SDL default values.
            ExternalValue::Null | ExternalValue::Variable(_) => serde_json::Value::Null,
            ExternalValue::Int(x) => Self::translate_number(x),
            ExternalValue::Float(x) => serde_json::Number::from_f64(*x)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            ExternalValue::String(x) => serde_json::Value::String(x.clone()),
            ExternalValue::Boolean(x) => serde_json::Value::Bool(*x),
            ExternalValue::Enum(x) => serde_json::Value::String(x.clone()),
            ExternalValue::List(x) => {
                serde_json::Value::Array(x.iter().map(Self::translate_value).collect())
            }
            ExternalValue::Object(x) => serde_json::Value::Object(
                x.iter()
                    .map(|(k, v)| (k.clone(), Self::translate_value(v)))
                    .collect(),
            ),
        }
    }

    fn translate_number(input: &ExternalNumber) -> serde_json::Value {
        input
            .as_i64()
            .map_or(serde_json::Value::Null, serde_json::Value::from)
    }
}
