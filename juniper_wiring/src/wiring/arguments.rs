use itertools::Itertools as _;

use crate::{
    ast::Type,
    dispatch::ArgumentDefinition,
    host::{HostClass, HostType, Marker, MethodDescriptor, Parameter, TypeDescriptor},
    mapping::{CandidateKind, MappingContext, MappingError, MappingType},
    schema::meta::{DefinitionKind, Field, InputObjectMeta, MetaType},
    util::lower_first,
    value::Environment,
};

use super::{MappingItem, Pending, Recorded, RuntimeWiringGenerator, SourceClasses};

impl<'a> RuntimeWiringGenerator<'a> {
    /// Pairs the parameters of the bound method with the arguments of the
    /// field.
    pub(super) fn process_arguments(
        &mut self,
        ctx: &MappingContext,
        kind: CandidateKind,
        field: &'a Field,
        method: &MethodDescriptor,
        source: Option<SourceClasses>,
    ) -> Result<Vec<ArgumentDefinition>, MappingError> {
        let mut params = method.parameters();

        let environment = params
            .last()
            .is_some_and(|p| p.ty().class() == Some(HostClass::of::<Environment>()));
        if environment {
            params = &params[..params.len() - 1];
        }

        let with_source = match (source, params.first()) {
            (Some(source), Some(first)) => self.is_source(ctx, source, first)?,
            _ => false,
        };
        if with_source {
            params = &params[1..];
        }

        if params.len() != field.arguments.len() {
            let shift = usize::from(with_source);
            return Err(MappingError::IncorrectArgumentCount {
                context: ctx.clone(),
                kind,
                provided: params.len() + shift,
                required: field.arguments.len() + shift,
                suggested: suggest_signature(
                    source
                        .filter(|_| with_source)
                        .map(|s| (s.key, ctx.type_name().as_str())),
                    field,
                ),
            });
        }

        let mut definitions = Vec::with_capacity(method.parameters().len());
        if with_source {
            definitions.push(ArgumentDefinition::Source);
        }
        for (argument, param) in field.arguments.iter().zip(params) {
            let ctx = ctx.for_argument(&argument.name);
            self.process_input_type(&ctx, &argument.arg_type, param.ty())?;
            if !self.coercer.supports(param.ty()) {
                return Err(MappingError::UnsupportedInputClass {
                    context: ctx,
                    ty: param.ty().clone(),
                });
            }
            definitions.push(ArgumentDefinition::Input {
                name: argument.name.clone(),
                ty: param.ty().clone(),
                default: argument.default_value.clone(),
            });
        }
        if environment {
            definitions.push(ArgumentDefinition::Environment);
        }
        Ok(definitions)
    }

    /// Checks whether the leading parameter of a resolver method accepts the
    /// value owning the field.
    fn is_source(
        &self,
        ctx: &MappingContext,
        source: SourceClasses,
        first: &Parameter,
    ) -> Result<bool, MappingError> {
        let Some(class) = first.ty().required().class() else {
            return Ok(false);
        };
        if class == source.bound || class == source.key {
            return Ok(true);
        }
        if self.descriptors.describe(class, Marker::Type).is_ok()
            || self.descriptors.is_capability(class)
        {
            return Err(MappingError::InvalidSourceArgument {
                context: ctx.clone(),
                provided: class,
                required: source.key,
            });
        }
        Ok(false)
    }

    /// Reconciles the GraphQL type of an input value with the Rust type
    /// accepting it.
    fn process_input_type(
        &mut self,
        ctx: &MappingContext,
        schema_ty: &'a Type,
        host_ty: &HostType,
    ) -> Result<(), MappingError> {
        let (mut schema_ty, mut host_ty) = (schema_ty, host_ty);
        loop {
            match (schema_ty.nullable(), host_ty.required()) {
                (Type::List(s), HostType::List(h)) => {
                    schema_ty = s.as_ref();
                    host_ty = h.as_ref();
                }
                (Type::List(_), other) => {
                    return Err(self.incorrect_list(ctx, schema_ty, other));
                }
                (_, HostType::Class(class)) => {
                    return self.process_input_leaf(ctx, schema_ty, *class);
                }
                (_, other) => return Err(self.incorrect_list(ctx, schema_ty, other)),
            }
        }
    }

    fn process_input_leaf(
        &mut self,
        ctx: &MappingContext,
        ty: &'a Type,
        class: HostClass,
    ) -> Result<(), MappingError> {
        let name = ty.innermost_name();
        if self.scalars.contains(name) {
            return self.check_scalar(ctx, ty, class);
        }
        match self.type_definition(ctx, name)? {
            MetaType::Scalar(s) => Err(MappingError::ScalarNotSupported {
                context: ctx.clone(),
                scalar: s.name.clone(),
            }),
            MetaType::Enum(e) => self.process_enum(ctx, ty, e, class),
            MetaType::InputObject(i) => self.process_input_object(ctx, ty, i, class),
            other @ (MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_)) => {
                Err(MappingError::UnsupportedTypeDefinition {
                    context: Some(ctx.clone()),
                    kind: other.kind(),
                    type_name: other.name().clone(),
                    usage: "an input type",
                })
            }
        }
    }

    fn process_input_object(
        &mut self,
        ctx: &MappingContext,
        ty: &Type,
        definition: &'a InputObjectMeta,
        class: HostClass,
    ) -> Result<(), MappingError> {
        if self.classify(class) != MappingType::CustomClass {
            return Err(self.incorrect_class(ctx, ty, class, MappingType::CustomClass, vec![]));
        }
        let descriptors = self.descriptors;
        let descriptor = descriptors
            .describe(class, Marker::Input)
            .map_err(|e| MappingError::from_lookup(e, ctx))?;

        let recorded = self.ledger.record(
            &definition.name,
            DefinitionKind::InputObject,
            MappingItem::InputObject(class),
            Some(ctx),
        )?;
        if recorded == Recorded::New {
            self.pending.push_back(Pending::InputObject {
                definition,
                descriptor,
            });
        }
        Ok(())
    }

    pub(super) fn process_input_object_fields(
        &mut self,
        definition: &'a InputObjectMeta,
        descriptor: &'a TypeDescriptor,
    ) -> Result<(), MappingError> {
        let class = descriptor.class();

        __wiring_trace_debug!("binding input type `{}` to `{class}`", definition.name);

        for value in &definition.input_fields {
            let Some(property) = descriptor.properties_named(&value.name).next() else {
                return Err(MappingError::InputFieldNotFound {
                    context: MappingContext::for_input(&definition.name, &value.name, class, None),
                    class,
                });
            };
            let ctx = MappingContext::for_input(
                &definition.name,
                &value.name,
                class,
                Some(property.name()),
            );
            self.process_input_type(&ctx, &value.arg_type, property.ty())?;
        }
        Ok(())
    }
}

/// Renders the parameter list a bound member is expected to declare.
pub(super) fn suggest_signature(source: Option<(HostClass, &str)>, field: &Field) -> String {
    source
        .map(|(class, type_name)| format!("{class} {}", lower_first(type_name)))
        .into_iter()
        .chain(
            field
                .arguments
                .iter()
                .map(|a| format!("{} {}", a.arg_type.nullable(), a.name)),
        )
        .join(", ")
}
