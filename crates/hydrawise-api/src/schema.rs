// Declarative schema descriptor for the Hydrawise GraphQL API
//
// The descriptor is a static table: entity types (field sets come from the
// model's `Decode` impls), plus the queries and mutations the client issues
// with their argument shapes and return types. It is validated once when
// built; every request is checked against it before anything goes on the wire.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::error::Error;
use crate::graphql::{ArgValue, Operation, OperationKind, Selection};
use crate::model::{
    Controller, ControllerHardware, DateTime, Decode, StatusCodeAndSummary, User, Zone,
    ZoneSuspension,
};

// ── Descriptor types ────────────────────────────────────────────────

/// Leaf value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int,
    String,
    Boolean,
}

impl ScalarType {
    fn accepts(self, value: &ArgValue) -> bool {
        matches!(
            (self, value),
            (Self::Int, ArgValue::Int(_))
                | (Self::String, ArgValue::String(_))
                | (Self::Boolean, ArgValue::Boolean(_))
        )
    }
}

/// Shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    /// A single nested entity, named by type.
    Object(&'static str),
    /// A list of nested entities, named by type.
    List(&'static str),
}

impl FieldKind {
    /// The nested entity type, if this field has a sub-selection.
    pub fn target(self) -> Option<&'static str> {
        match self {
            Self::Scalar(_) => None,
            Self::Object(t) | Self::List(t) => Some(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn scalar(name: &'static str, ty: ScalarType) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar(ty),
        }
    }

    pub const fn object(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Object(type_name),
        }
    }

    pub const fn list(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::List(type_name),
        }
    }
}

/// An entity type.
///
/// `fields` is the declared field set: what the default selection requests
/// and what the decoder reads. `relations` are fields the API exposes but the
/// client only selects when a call site asks for them explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
    pub relations: &'static [FieldDef],
}

impl TypeDef {
    pub fn entity<T: Decode>() -> Self {
        Self {
            name: T::TYPE_NAME,
            fields: T::FIELDS,
            relations: &[],
        }
    }

    #[must_use]
    pub fn with_relations(mut self, relations: &'static [FieldDef]) -> Self {
        self.relations = relations;
        self
    }

    /// Find a declared field or relation by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .chain(self.relations)
            .find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgDef {
    pub name: &'static str,
    pub ty: ScalarType,
    pub required: bool,
}

impl ArgDef {
    pub const fn required(name: &'static str, ty: ScalarType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ty: ScalarType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    /// Returns an entity; a non-empty selection is required.
    Object(&'static str),
    /// Returns a bare scalar; no selection allowed.
    Scalar(ScalarType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDef {
    pub name: &'static str,
    pub args: &'static [ArgDef],
    pub returns: ReturnType,
}

impl OperationDef {
    pub const fn new(name: &'static str, args: &'static [ArgDef], returns: ReturnType) -> Self {
        Self {
            name,
            args,
            returns,
        }
    }
}

// ── Declarations ────────────────────────────────────────────────────

use ScalarType::{Boolean, Int, String as Str};

const USER_RELATIONS: &[FieldDef] = &[FieldDef::list("controllers", Controller::TYPE_NAME)];
const CONTROLLER_RELATIONS: &[FieldDef] = &[FieldDef::list("zones", Zone::TYPE_NAME)];

const QUERIES: &[OperationDef] = &[
    OperationDef::new("me", &[], ReturnType::Object(User::TYPE_NAME)),
    OperationDef::new(
        "controller",
        &[ArgDef::required("controllerId", Int)],
        ReturnType::Object(Controller::TYPE_NAME),
    ),
    OperationDef::new(
        "zone",
        &[ArgDef::required("zoneId", Int)],
        ReturnType::Object(Zone::TYPE_NAME),
    ),
];

const STATUS: ReturnType = ReturnType::Object(StatusCodeAndSummary::TYPE_NAME);

const MUTATIONS: &[OperationDef] = &[
    OperationDef::new(
        "startZone",
        &[
            ArgDef::required("zoneId", Int),
            ArgDef::optional("markRunAsScheduled", Boolean),
            ArgDef::optional("customRunDuration", Int),
        ],
        STATUS,
    ),
    OperationDef::new("stopZone", &[ArgDef::required("zoneId", Int)], STATUS),
    OperationDef::new(
        "startAllZones",
        &[
            ArgDef::required("controllerId", Int),
            ArgDef::optional("markRunAsScheduled", Boolean),
            ArgDef::optional("customRunDuration", Int),
        ],
        STATUS,
    ),
    OperationDef::new(
        "stopAllZones",
        &[ArgDef::required("controllerId", Int)],
        STATUS,
    ),
    OperationDef::new(
        "suspendZone",
        &[
            ArgDef::required("zoneId", Int),
            ArgDef::required("until", Str),
        ],
        STATUS,
    ),
    OperationDef::new("resumeZone", &[ArgDef::required("zoneId", Int)], STATUS),
    OperationDef::new(
        "suspendAllZones",
        &[
            ArgDef::required("controllerId", Int),
            ArgDef::required("until", Str),
        ],
        STATUS,
    ),
    OperationDef::new(
        "resumeAllZones",
        &[ArgDef::required("controllerId", Int)],
        STATUS,
    ),
    OperationDef::new(
        "deleteZoneSuspension",
        &[ArgDef::required("id", Int)],
        ReturnType::Scalar(Boolean),
    ),
];

fn declared_types() -> Vec<TypeDef> {
    vec![
        TypeDef::entity::<User>().with_relations(USER_RELATIONS),
        TypeDef::entity::<Controller>().with_relations(CONTROLLER_RELATIONS),
        TypeDef::entity::<ControllerHardware>(),
        TypeDef::entity::<Zone>(),
        TypeDef::entity::<ZoneSuspension>(),
        TypeDef::entity::<StatusCodeAndSummary>(),
        TypeDef::entity::<DateTime>(),
    ]
}

// ── Schema ──────────────────────────────────────────────────────────

static SHARED: OnceLock<Result<Arc<Schema>, String>> = OnceLock::new();

/// Validated schema descriptor.
#[derive(Debug, Clone)]
pub struct Schema {
    types: IndexMap<&'static str, TypeDef>,
    queries: IndexMap<&'static str, OperationDef>,
    mutations: IndexMap<&'static str, OperationDef>,
}

impl Schema {
    /// The process-wide descriptor, built and validated on first use.
    ///
    /// Every call returns the same `Arc`; nothing is rebuilt or re-validated.
    pub fn shared() -> Result<Arc<Self>, Error> {
        match SHARED.get_or_init(|| Self::build().map(Arc::new).map_err(|e| e.to_string())) {
            Ok(schema) => Ok(Arc::clone(schema)),
            Err(message) => Err(Error::Schema(message.clone())),
        }
    }

    /// Build and validate a fresh descriptor from the built-in declarations.
    pub fn build() -> Result<Self, Error> {
        Self::from_parts(declared_types(), QUERIES, MUTATIONS)
    }

    /// Build and validate a descriptor from explicit declarations.
    pub fn from_parts(
        types: Vec<TypeDef>,
        queries: &[OperationDef],
        mutations: &[OperationDef],
    ) -> Result<Self, Error> {
        let mut type_map = IndexMap::new();
        for def in types {
            let name = def.name;
            if type_map.insert(name, def).is_some() {
                return Err(Error::Schema(format!("duplicate type {name}")));
            }
        }

        let schema = Self {
            types: type_map,
            queries: index_operations(queries, "query")?,
            mutations: index_operations(mutations, "mutation")?,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<(), Error> {
        for def in self.types.values() {
            let mut seen = HashSet::new();
            for field in def.fields.iter().chain(def.relations) {
                if !seen.insert(field.name) {
                    return Err(Error::Schema(format!(
                        "duplicate field {}.{}",
                        def.name, field.name
                    )));
                }
                if let Some(target) = field.kind.target() {
                    if !self.types.contains_key(target) {
                        return Err(Error::Schema(format!(
                            "{}.{} references unknown type {target}",
                            def.name, field.name
                        )));
                    }
                }
            }
            self.check_acyclic(def.name, &mut Vec::new())?;
        }

        for op in self.queries.values().chain(self.mutations.values()) {
            let mut seen = HashSet::new();
            for arg in op.args {
                if !seen.insert(arg.name) {
                    return Err(Error::Schema(format!(
                        "duplicate argument {}({})",
                        op.name, arg.name
                    )));
                }
            }
            if let ReturnType::Object(target) = op.returns {
                if !self.types.contains_key(target) {
                    return Err(Error::Schema(format!(
                        "{} returns unknown type {target}",
                        op.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Default selections recurse through declared fields, so those must not loop.
    fn check_acyclic(&self, name: &'static str, stack: &mut Vec<&'static str>) -> Result<(), Error> {
        if stack.contains(&name) {
            stack.push(name);
            return Err(Error::Schema(format!(
                "declared fields form a cycle: {}",
                stack.join(" -> ")
            )));
        }
        let Some(def) = self.types.get(name) else {
            return Ok(());
        };
        stack.push(name);
        for target in def.fields.iter().filter_map(|f| f.kind.target()) {
            self.check_acyclic(target, stack)?;
        }
        stack.pop();
        Ok(())
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn query_def(&self, name: &str) -> Option<&OperationDef> {
        self.queries.get(name)
    }

    pub fn mutation_def(&self, name: &str) -> Option<&OperationDef> {
        self.mutations.get(name)
    }

    // ── Operation construction ───────────────────────────────────────

    /// Build a query operation, checking arguments and selection.
    pub fn query(
        &self,
        name: &str,
        args: Vec<(&'static str, ArgValue)>,
        selection: Vec<Selection>,
    ) -> Result<Operation, Error> {
        let def = self
            .query_def(name)
            .ok_or_else(|| Error::Schema(format!("unknown query {name}")))?;
        self.operation(OperationKind::Query, def, args, selection)
    }

    /// Build a mutation operation, checking arguments and selection.
    pub fn mutation(
        &self,
        name: &str,
        args: Vec<(&'static str, ArgValue)>,
        selection: Vec<Selection>,
    ) -> Result<Operation, Error> {
        let def = self
            .mutation_def(name)
            .ok_or_else(|| Error::Schema(format!("unknown mutation {name}")))?;
        self.operation(OperationKind::Mutation, def, args, selection)
    }

    fn operation(
        &self,
        kind: OperationKind,
        def: &OperationDef,
        args: Vec<(&'static str, ArgValue)>,
        selection: Vec<Selection>,
    ) -> Result<Operation, Error> {
        for (name, value) in &args {
            let arg = def
                .args
                .iter()
                .find(|a| a.name == *name)
                .ok_or_else(|| Error::Schema(format!("{} has no argument {name}", def.name)))?;
            if !arg.ty.accepts(value) {
                return Err(Error::Schema(format!(
                    "{}({name}) expects {:?}, got {value}",
                    def.name, arg.ty
                )));
            }
        }
        for arg in def.args.iter().filter(|a| a.required) {
            if !args.iter().any(|(name, _)| *name == arg.name) {
                return Err(Error::Schema(format!(
                    "{} requires argument {}",
                    def.name, arg.name
                )));
            }
        }

        match def.returns {
            ReturnType::Object(target) => {
                if selection.is_empty() {
                    return Err(Error::Schema(format!(
                        "{} returns {target} and needs a selection",
                        def.name
                    )));
                }
                self.validate_selection(target, &selection)?;
            }
            ReturnType::Scalar(_) => {
                if !selection.is_empty() {
                    return Err(Error::Schema(format!(
                        "{} returns a scalar and takes no selection",
                        def.name
                    )));
                }
            }
        }

        Ok(Operation {
            kind,
            root: Selection {
                name: def.name,
                args,
                children: selection,
            },
        })
    }

    /// Check every selected field exists on `type_name`, recursively.
    pub fn validate_selection(&self, type_name: &str, selection: &[Selection]) -> Result<(), Error> {
        let def = self
            .type_def(type_name)
            .ok_or_else(|| Error::Schema(format!("unknown type {type_name}")))?;

        for sel in selection {
            let field = def
                .field(sel.name)
                .ok_or_else(|| Error::Schema(format!("{type_name} has no field {}", sel.name)))?;
            if !sel.args.is_empty() {
                return Err(Error::Schema(format!(
                    "{type_name}.{} takes no arguments",
                    sel.name
                )));
            }
            match field.kind.target() {
                Some(target) if sel.children.is_empty() => {
                    return Err(Error::Schema(format!(
                        "{type_name}.{} is a {target} and needs a selection",
                        sel.name
                    )));
                }
                Some(target) => self.validate_selection(target, &sel.children)?,
                None if !sel.children.is_empty() => {
                    return Err(Error::Schema(format!(
                        "{type_name}.{} is a scalar",
                        sel.name
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }
}

fn index_operations(
    ops: &[OperationDef],
    what: &str,
) -> Result<IndexMap<&'static str, OperationDef>, Error> {
    let mut map = IndexMap::new();
    for op in ops {
        if map.insert(op.name, *op).is_some() {
            return Err(Error::Schema(format!("duplicate {what} {}", op.name)));
        }
    }
    Ok(map)
}
