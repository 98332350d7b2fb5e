//! Binding of a schema to Rust code.

mod arguments;
pub mod ledger;

use std::{collections::VecDeque, sync::Arc};

use arcstr::ArcStr;

use crate::{
    ast::Type,
    coercion::{InputCoercer, JsonCoercer},
    dictionary::SchemaMappingDictionary,
    dispatch::{FieldDispatcher, Receiver, RuntimeWiring, RuntimeWiringBuilder, TypeResolver},
    host::{
        Accessor, HostClass, HostType, Marker, MethodDescriptor, PropertyDescriptor,
        TypeDescriptor, TypeDescriptorRegistry,
    },
    mapping::{Candidate, CandidateKind, MappingContext, MappingError, MappingType},
    resolvers::{Handler, HandlerRegistry, InstanceProvider},
    scalars::ScalarTable,
    schema::{
        meta::{
            DefinitionKind, EnumMeta, Field, InputObjectMeta, InterfaceMeta, MetaType,
            ObjectMeta, UnionMeta,
        },
        model::SchemaDocument,
    },
    value::Value,
};

use self::ledger::Recorded;

pub use self::ledger::{MappingItem, MappingRegistry};

/// Type definition waiting for its fields to be bound.
enum Pending<'a> {
    Object {
        definition: &'a ObjectMeta,
        descriptor: &'a TypeDescriptor,
    },
    InputObject {
        definition: &'a InputObjectMeta,
        descriptor: &'a TypeDescriptor,
    },
}

/// Classes a leading source parameter of a resolver method may be declared
/// as.
#[derive(Clone, Copy, Debug)]
struct SourceClasses {
    /// Class bound to the GraphQL type.
    bound: HostClass,
    /// Capability key of the bound class.
    key: HostClass,
}

/// Member competing for a GraphQL field.
enum Found<'a, 'r> {
    Property(&'a PropertyDescriptor, &'a Accessor),
    Method(&'a MethodDescriptor),
    Resolver(&'r Handler, &'r MethodDescriptor),
}

impl Found<'_, '_> {
    fn describe(&self, class: HostClass) -> Candidate {
        match self {
            Self::Property(p, _) => Candidate {
                class,
                kind: CandidateKind::Property,
                member: format!("{}: {}", p.name(), p.ty().short()),
            },
            Self::Method(m) => Candidate {
                class,
                kind: CandidateKind::Method,
                member: m.signature(),
            },
            Self::Resolver(h, m) => Candidate {
                class: h.class(),
                kind: CandidateKind::Resolver,
                member: m.signature(),
            },
        }
    }
}

/// Member chosen to resolve a GraphQL field.
enum Chosen<'a> {
    Property(&'a PropertyDescriptor, &'a Accessor),
    Method(&'a MethodDescriptor),
    Resolver {
        handler: HostClass,
        method: MethodDescriptor,
        instance: Value,
    },
}

/// Generator of a [`RuntimeWiring`] out of a schema and the Rust code
/// described for it.
///
/// Walks every type reachable from the root operation types, binding each
/// field to exactly one Rust member and checking that the shapes of both
/// agree. Consumed by [`RuntimeWiringGenerator::generate()`], so a schema can't
/// be bound twice with the same generator.
pub struct RuntimeWiringGenerator<'a> {
    schema: &'a SchemaDocument,
    descriptors: &'a TypeDescriptorRegistry,
    resolvers: HandlerRegistry,
    dictionary: &'a SchemaMappingDictionary,
    instances: &'a dyn InstanceProvider,
    scalars: ScalarTable,
    coercer: Arc<dyn InputCoercer>,
    ledger: MappingRegistry,
    wiring: RuntimeWiringBuilder,
    pending: VecDeque<Pending<'a>>,
}

impl<'a> RuntimeWiringGenerator<'a> {
    /// Constructs a new [`RuntimeWiringGenerator`] using the default
    /// [`ScalarTable`] and a default [`JsonCoercer`].
    pub fn new(
        schema: &'a SchemaDocument,
        descriptors: &'a TypeDescriptorRegistry,
        resolvers: HandlerRegistry,
        dictionary: &'a SchemaMappingDictionary,
        instances: &'a dyn InstanceProvider,
    ) -> Self {
        Self {
            schema,
            descriptors,
            resolvers,
            dictionary,
            instances,
            scalars: ScalarTable::default(),
            coercer: Arc::new(JsonCoercer::default()),
            ledger: MappingRegistry::default(),
            wiring: RuntimeWiringBuilder::default(),
            pending: VecDeque::new(),
        }
    }

    /// Replaces the [`ScalarTable`] to check scalars against.
    #[must_use]
    pub fn with_scalars(mut self, scalars: ScalarTable) -> Self {
        self.scalars = scalars;
        self
    }

    /// Replaces the [`InputCoercer`] converting argument values.
    #[must_use]
    pub fn with_coercer(mut self, coercer: impl InputCoercer + 'static) -> Self {
        self.coercer = Arc::new(coercer);
        self
    }

    /// Binds the schema, producing its [`RuntimeWiring`].
    ///
    /// # Errors
    ///
    /// With the first [`MappingError`] encountered. No partial wiring is ever
    /// produced.
    pub fn generate(mut self) -> Result<RuntimeWiring, MappingError> {
        __wiring_span_debug!("generate_runtime_wiring");

        let schema = self.schema;
        let definition = schema
            .schema_definition()
            .ok_or(MappingError::SchemaDefinitionNotProvided)?;
        if !self.resolvers.has_root_resolvers() {
            return Err(MappingError::RootResolversNotRegistered);
        }

        for (_, root) in definition.operation_types() {
            __wiring_trace_debug!("binding root type `{root}`");

            let object = match schema.type_by_name(root) {
                Some(MetaType::Object(o)) => o,
                Some(other) => {
                    return Err(MappingError::UnsupportedTypeDefinition {
                        context: None,
                        kind: other.kind(),
                        type_name: root.clone(),
                        usage: "a root operation type",
                    });
                }
                None => {
                    return Err(MappingError::TypeDefinitionNotFound {
                        type_name: root.clone(),
                        context: None,
                    });
                }
            };
            for field in &object.fields {
                self.process_root_field(object, field)?;
            }
            self.drain()?;
        }

        __wiring_trace_debug!("bound {} types", self.ledger.len());

        let bindings = self.ledger.snapshot();
        Ok(self.wiring.build(bindings))
    }

    fn drain(&mut self) -> Result<(), MappingError> {
        while let Some(pending) = self.pending.pop_front() {
            match pending {
                Pending::Object {
                    definition,
                    descriptor,
                } => self.process_object_fields(definition, descriptor)?,
                Pending::InputObject {
                    definition,
                    descriptor,
                } => self.process_input_object_fields(definition, descriptor)?,
            }
        }
        Ok(())
    }

    fn process_root_field(
        &mut self,
        object: &'a ObjectMeta,
        field: &'a Field,
    ) -> Result<(), MappingError> {
        let ctx = MappingContext::for_field(&object.name, &field.name);

        let (handler, method) = match self.resolvers.root_candidates(&field.name).as_slice() {
            [] => {
                return Err(MappingError::HandlerNotFound {
                    context: ctx,
                    resolvers: self.resolvers.root_classes(),
                });
            }
            [(handler, method)] => (*handler, *method),
            many => {
                return Err(MappingError::AmbiguousField {
                    context: ctx,
                    candidates: many
                        .iter()
                        .map(|(h, m)| Found::Resolver(h, m).describe(h.class()))
                        .collect(),
                });
            }
        };
        let instance = self
            .instances
            .instance(handler)
            .map_err(|source| MappingError::InstanceUnavailable {
                context: ctx.clone(),
                source,
            })?;
        let (class, method) = (handler.class(), method.clone());

        self.process_method(
            object,
            field,
            class,
            &method,
            None,
            Receiver::Instance(instance),
        )
    }

    fn process_object_fields(
        &mut self,
        object: &'a ObjectMeta,
        descriptor: &'a TypeDescriptor,
    ) -> Result<(), MappingError> {
        __wiring_trace_debug!("binding type `{}` to `{}`", object.name, descriptor.class());

        for field in &object.fields {
            self.process_field(object, descriptor, field)?;
        }
        Ok(())
    }

    fn process_field(
        &mut self,
        object: &'a ObjectMeta,
        descriptor: &'a TypeDescriptor,
        field: &'a Field,
    ) -> Result<(), MappingError> {
        let ctx = MappingContext::for_field(&object.name, &field.name);
        let class = descriptor.class();
        let key = self.descriptors.capability_of(class);
        let keys = if key == class { vec![class] } else { vec![key, class] };

        let chosen = {
            let mut found = descriptor
                .properties_named(&field.name)
                .filter_map(|p| Some(Found::Property(p, p.accessor()?)))
                .chain(descriptor.methods_named(&field.name).map(Found::Method))
                .collect::<Vec<_>>();
            found.extend(
                self.resolvers
                    .type_candidates(&keys, &field.name)
                    .into_iter()
                    .map(|(h, m)| Found::Resolver(h, m)),
            );

            match found.as_slice() {
                [] => {
                    return Err(MappingError::FieldNotFound {
                        context: ctx,
                        class,
                        resolvers: self.resolvers.type_classes(&keys),
                    });
                }
                [Found::Property(p, accessor)] => Chosen::Property(*p, *accessor),
                [Found::Method(m)] => Chosen::Method(*m),
                [Found::Resolver(handler, method)] => Chosen::Resolver {
                    handler: handler.class(),
                    method: (*method).clone(),
                    instance: self.instances.instance(handler).map_err(|source| {
                        MappingError::InstanceUnavailable {
                            context: ctx.clone(),
                            source,
                        }
                    })?,
                },
                many => {
                    return Err(MappingError::AmbiguousField {
                        context: ctx,
                        candidates: many.iter().map(|f| f.describe(class)).collect(),
                    });
                }
            }
        };

        match chosen {
            Chosen::Property(property, accessor) => {
                let ctx = ctx.with_member(class, property.name().as_str());
                if !field.arguments.is_empty() {
                    return Err(MappingError::IncorrectArgumentCount {
                        kind: CandidateKind::Property,
                        provided: 0,
                        required: field.arguments.len(),
                        suggested: arguments::suggest_signature(None, field),
                        context: ctx,
                    });
                }

                __wiring_trace!("bound `{}.{}` to property of `{class}`", object.name, field.name);

                self.wiring.field(FieldDispatcher::property(
                    &object.name,
                    &field.name,
                    accessor.clone(),
                    property.ty(),
                ));
                self.process_field_return_type(&ctx, &field.field_type, property.ty())
            }
            Chosen::Method(method) => {
                self.process_method(object, field, class, method, None, Receiver::Source)
            }
            Chosen::Resolver {
                handler,
                method,
                instance,
            } => self.process_method(
                object,
                field,
                handler,
                &method,
                Some(SourceClasses { bound: class, key }),
                Receiver::Instance(instance),
            ),
        }
    }

    fn process_method(
        &mut self,
        object: &'a ObjectMeta,
        field: &'a Field,
        declaring: HostClass,
        method: &MethodDescriptor,
        source: Option<SourceClasses>,
        receiver: Receiver,
    ) -> Result<(), MappingError> {
        let ctx = MappingContext::for_field(&object.name, &field.name)
            .with_member(declaring, method.signature());
        let kind = match receiver {
            Receiver::Source => CandidateKind::Method,
            Receiver::Instance(_) => CandidateKind::Resolver,
        };
        let arguments = self.process_arguments(&ctx, kind, field, method, source)?;

        __wiring_trace!(
            "bound `{}.{}` to `{declaring}::{}`",
            object.name,
            field.name,
            method.name(),
        );

        self.wiring.field(FieldDispatcher::method(
            &object.name,
            &field.name,
            Arc::clone(method.invoker()),
            receiver,
            arguments,
            Arc::clone(&self.coercer),
            method.return_type(),
        ));
        self.process_field_return_type(&ctx, &field.field_type, method.return_type())
    }

    fn process_field_return_type(
        &mut self,
        ctx: &MappingContext,
        schema_ty: &'a Type,
        host_ty: &HostType,
    ) -> Result<(), MappingError> {
        let (mut schema_ty, mut host_ty) = (schema_ty, host_ty.resolved());
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
                    return self.process_output_leaf(ctx, schema_ty, *class);
                }
                (_, other) => return Err(self.incorrect_list(ctx, schema_ty, other)),
            }
        }
    }

    fn process_output_leaf(
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
            MetaType::Union(u) => self.process_union(ctx, ty, u, class),
            MetaType::Interface(i) => self.process_interface(ctx, ty, i, class),
            MetaType::Object(o) => self.process_object(ctx, ty, o, class),
            other @ MetaType::InputObject(_) => Err(MappingError::UnsupportedTypeDefinition {
                context: Some(ctx.clone()),
                kind: other.kind(),
                type_name: other.name().clone(),
                usage: "an output type",
            }),
        }
    }

    fn check_scalar(
        &self,
        ctx: &MappingContext,
        ty: &Type,
        class: HostClass,
    ) -> Result<(), MappingError> {
        let supported = self
            .scalars
            .supported_classes(ty.innermost_name())
            .unwrap_or_default();
        if supported.contains(&class) {
            Ok(())
        } else {
            Err(self.incorrect_class(
                ctx,
                ty,
                class,
                MappingType::BuiltInClass,
                supported.to_vec(),
            ))
        }
    }

    fn process_enum(
        &mut self,
        ctx: &MappingContext,
        ty: &Type,
        definition: &'a EnumMeta,
        class: HostClass,
    ) -> Result<(), MappingError> {
        let descriptors = self.descriptors;
        let Some(descriptor) = descriptors.enumeration(class) else {
            return Err(self.incorrect_class(ctx, ty, class, MappingType::Enum, vec![]));
        };
        let recorded = self.ledger.record(
            &definition.name,
            DefinitionKind::Enum,
            MappingItem::Enum(class),
            Some(ctx),
        )?;
        if recorded == Recorded::Existing {
            return Ok(());
        }

        let mut missing = definition
            .values
            .iter()
            .filter(|v| !descriptor.has_value(&v.name))
            .map(|v| v.name.clone())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return Err(MappingError::MissingEnumValues {
                context: ctx.clone(),
                enum_name: definition.name.clone(),
                class,
                missing,
            });
        }

        __wiring_trace_debug!("bound enum `{}` to `{class}`", definition.name);

        Ok(())
    }

    fn process_union(
        &mut self,
        ctx: &MappingContext,
        ty: &Type,
        definition: &'a UnionMeta,
        class: HostClass,
    ) -> Result<(), MappingError> {
        let members = definition.of_type_names.iter().collect();
        self.process_abstract(ctx, ty, &definition.name, DefinitionKind::Union, members, class)
    }

    fn process_interface(
        &mut self,
        ctx: &MappingContext,
        ty: &Type,
        definition: &'a InterfaceMeta,
        class: HostClass,
    ) -> Result<(), MappingError> {
        let schema = self.schema;
        let members = schema
            .implementers_of(&definition.name)
            .map(|o| &o.name)
            .collect();
        self.process_abstract(
            ctx,
            ty,
            &definition.name,
            DefinitionKind::Interface,
            members,
            class,
        )
    }

    fn process_abstract(
        &mut self,
        ctx: &MappingContext,
        ty: &Type,
        name: &'a ArcStr,
        kind: DefinitionKind,
        members: Vec<&'a ArcStr>,
        capability: HostClass,
    ) -> Result<(), MappingError> {
        if !self.descriptors.is_capability(capability) {
            return Err(self.incorrect_class(ctx, ty, capability, MappingType::Interface, vec![]));
        }
        if let Some(registered) = self
            .dictionary
            .union_capability(name)
            .filter(|c| *c != capability)
        {
            return Err(MappingError::MappingConflict {
                context: Some(ctx.clone()),
                kind,
                type_name: name.clone(),
                provided: capability,
                registered,
                registered_at: None,
            });
        }
        let recorded = self.ledger.record(
            name,
            kind,
            MappingItem::Capability(capability),
            Some(ctx),
        )?;
        if recorded == Recorded::Existing {
            return Ok(());
        }

        let mut resolver = TypeResolver::new(name);
        for member in members {
            let definition = match self.type_definition(ctx, member)? {
                MetaType::Object(o) => o,
                other => {
                    return Err(MappingError::UnsupportedTypeDefinition {
                        context: Some(ctx.clone()),
                        kind: other.kind(),
                        type_name: other.name().clone(),
                        usage: "a union member",
                    });
                }
            };
            let member_class = self.dictionary.type_class(member).ok_or_else(|| {
                MappingError::UnionMemberNotMapped {
                    context: ctx.clone(),
                    object_type: member.clone(),
                    union_type: name.clone(),
                }
            })?;
            let descriptors = self.descriptors;
            let descriptor = descriptors
                .describe(member_class, Marker::Type)
                .map_err(|e| MappingError::from_lookup(e, ctx))?;
            if descriptor.capability() != Some(capability) {
                return Err(MappingError::IncorrectImplementation {
                    context: ctx.clone(),
                    object_type: member.clone(),
                    implementation: member_class,
                    capability,
                });
            }
            self.bind_object(ctx, definition, descriptor)?;
            resolver.insert(member_class, member);
        }

        __wiring_trace_debug!(
            "bound {kind} `{name}` to `{capability}` with {} members",
            resolver.len(),
        );

        self.wiring.type_resolver(resolver);
        Ok(())
    }

    fn process_object(
        &mut self,
        ctx: &MappingContext,
        ty: &Type,
        definition: &'a ObjectMeta,
        class: HostClass,
    ) -> Result<(), MappingError> {
        if matches!(
            self.classify(class),
            MappingType::BuiltInClass | MappingType::Enum,
        ) {
            return Err(self.incorrect_class(ctx, ty, class, MappingType::CustomClass, vec![]));
        }
        let descriptors = self.descriptors;
        let descriptor = if descriptors.is_capability(class) {
            descriptors.implementation_of(class)
        } else {
            descriptors.describe(class, Marker::Type)
        }
        .map_err(|e| MappingError::from_lookup(e, ctx))?;

        self.bind_object(ctx, definition, descriptor)
    }

    fn bind_object(
        &mut self,
        ctx: &MappingContext,
        definition: &'a ObjectMeta,
        descriptor: &'a TypeDescriptor,
    ) -> Result<(), MappingError> {
        let class = descriptor.class();
        if let Some(registered) = self
            .dictionary
            .type_class(&definition.name)
            .filter(|c| *c != class)
        {
            return Err(MappingError::MappingConflict {
                context: Some(ctx.clone()),
                kind: DefinitionKind::Object,
                type_name: definition.name.clone(),
                provided: class,
                registered,
                registered_at: None,
            });
        }
        let recorded = self.ledger.record(
            &definition.name,
            DefinitionKind::Object,
            MappingItem::Object(class),
            Some(ctx),
        )?;
        if recorded == Recorded::New {
            self.pending.push_back(Pending::Object {
                definition,
                descriptor,
            });
        }
        Ok(())
    }

    /// Returns the definition of the named type.
    fn type_definition(
        &self,
        ctx: &MappingContext,
        name: &str,
    ) -> Result<&'a MetaType, MappingError> {
        let schema = self.schema;
        schema
            .type_by_name(name)
            .ok_or_else(|| MappingError::TypeDefinitionNotFound {
                type_name: name.into(),
                context: Some(ctx.clone()),
            })
    }

    /// Returns the category of the class.
    fn classify(&self, class: HostClass) -> MappingType {
        if self.scalars.is_builtin_class(class) {
            MappingType::BuiltInClass
        } else if self.descriptors.enumeration(class).is_some() {
            MappingType::Enum
        } else if self.descriptors.is_capability(class) {
            MappingType::Interface
        } else {
            MappingType::CustomClass
        }
    }

    /// Returns the category of class the named GraphQL type requires.
    fn required_kind(&self, name: &str) -> MappingType {
        if self.scalars.contains(name) {
            return MappingType::BuiltInClass;
        }
        match self.schema.type_by_name(name) {
            Some(MetaType::Scalar(_)) => MappingType::BuiltInClass,
            Some(MetaType::Enum(_)) => MappingType::Enum,
            Some(MetaType::Union(_) | MetaType::Interface(_)) => MappingType::Interface,
            Some(MetaType::Object(_) | MetaType::InputObject(_)) | None => {
                MappingType::CustomClass
            }
        }
    }

    fn incorrect_class(
        &self,
        ctx: &MappingContext,
        ty: &Type,
        provided: HostClass,
        required_kind: MappingType,
        supported: Vec<HostClass>,
    ) -> MappingError {
        let provided_kind = self.classify(provided);
        let differs = provided_kind != required_kind;
        MappingError::IncorrectClassMapping {
            context: ctx.clone(),
            graphql_type: ty.clone(),
            provided_kind: differs.then_some(provided_kind),
            required_kind: differs.then_some(required_kind),
            provided,
            supported,
        }
    }

    /// Builds the error of list layers of the GraphQL and the Rust types not
    /// matching each other.
    fn incorrect_list(&self, ctx: &MappingContext, ty: &Type, host_ty: &HostType) -> MappingError {
        let provided = host_ty.innermost_class();
        let (provided_kind, required_kind) = match (ty.nullable(), host_ty) {
            (Type::List(_), _) => (self.classify(provided), MappingType::Iterable),
            (_, HostType::List(_)) => (
                MappingType::Iterable,
                self.required_kind(ty.innermost_name()),
            ),
            _ => (
                self.classify(provided),
                self.required_kind(ty.innermost_name()),
            ),
        };
        let differs = provided_kind != required_kind;
        MappingError::IncorrectClassMapping {
            context: ctx.clone(),
            graphql_type: ty.clone(),
            provided_kind: differs.then_some(provided_kind),
            required_kind: differs.then_some(required_kind),
            provided,
            supported: vec![],
        }
    }
}
