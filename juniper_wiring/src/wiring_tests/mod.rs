mod enums;
mod objects;
mod roots;

use arcstr::ArcStr;

use crate::{
    dictionary::SchemaMappingDictionary,
    dispatch::RuntimeWiring,
    host::{HostClass, TypeDescriptorRegistry},
    mapping::{MappingContext, MappingError},
    resolvers::{HandlerRegistry, Instances},
    schema::model::SchemaDocument,
    value::{Arguments, Environment, Value},
    wiring::RuntimeWiringGenerator,
};

/// Everything a schema is bound with.
struct Fixture {
    schema: SchemaDocument,
    descriptors: TypeDescriptorRegistry,
    resolvers: HandlerRegistry,
    dictionary: SchemaMappingDictionary,
    instances: Instances,
}

impl Fixture {
    fn new(sdl: &str) -> Self {
        Self {
            schema: SchemaDocument::from_sdl(sdl).expect("valid SDL"),
            descriptors: TypeDescriptorRegistry::new(),
            resolvers: HandlerRegistry::new(),
            dictionary: SchemaMappingDictionary::new(),
            instances: Instances::new(),
        }
    }

    fn generator(&self) -> RuntimeWiringGenerator<'_> {
        RuntimeWiringGenerator::new(
            &self.schema,
            &self.descriptors,
            self.resolvers.clone(),
            &self.dictionary,
            &self.instances,
        )
    }

    fn generate(&self) -> Result<RuntimeWiring, MappingError> {
        self.generator().generate()
    }
}

fn field_ctx(type_name: &str, field: &str) -> MappingContext {
    MappingContext::for_field(&ArcStr::from(type_name), &ArcStr::from(field))
}

fn member_ctx(type_name: &str, field: &str, class: HostClass, member: &str) -> MappingContext {
    field_ctx(type_name, field).with_member(class, member)
}

/// Resolves the field synchronously.
fn resolve(
    wiring: &RuntimeWiring,
    type_name: &str,
    field: &str,
    arguments: &Arguments,
    source: &Value,
) -> Value {
    wiring
        .dispatcher(type_name, field)
        .unwrap_or_else(|| panic!("`{type_name}.{field}` is not bound"))
        .resolve(arguments, source, &Environment::default())
        .unwrap_or_else(|e| panic!("`{type_name}.{field}` failed: {}", e.message()))
        .into_ready()
        .unwrap_or_else(|| panic!("`{type_name}.{field}` is not synchronous"))
}
