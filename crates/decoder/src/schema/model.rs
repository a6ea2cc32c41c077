// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory schema built from a [`SchemaDocument`].

use super::SchemaError;
use super::document::{SchemaDocument, StructDef, TableDef};
use crate::codec::{BinaryCursor, BinaryDecoder, Primitive, VariantRegistry};
use std::collections::{HashMap, HashSet};

const ABI_DEF_JSON: &str = include_str!("abi_def.json");

/// Suffix marking a sequence type, e.g. `permission_level[]`.
pub const SEQUENCE_SUFFIX: &str = "[]";
/// Suffix marking an optional type, e.g. `string?`.
pub const OPTIONAL_SUFFIX: &str = "?";
/// Suffix marking a binary extension, e.g. `variant_def[]$`.
pub const EXTENSION_SUFFIX: &str = "$";

/// A type name split into its outermost modifier and the inner name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape<'a> {
    Sequence(&'a str),
    Optional(&'a str),
    Extension(&'a str),
    Plain(&'a str),
}

impl<'a> TypeShape<'a> {
    pub fn of(type_name: &'a str) -> Self {
        if let Some(inner) = type_name.strip_suffix(SEQUENCE_SUFFIX) {
            TypeShape::Sequence(inner)
        } else if let Some(inner) = type_name.strip_suffix(OPTIONAL_SUFFIX) {
            TypeShape::Optional(inner)
        } else if let Some(inner) = type_name.strip_suffix(EXTENSION_SUFFIX) {
            TypeShape::Extension(inner)
        } else {
            TypeShape::Plain(type_name)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaModel {
    version: String,
    aliases: HashMap<String, String>,
    /// Declaration order is kept; `struct_index` points into it.
    structs: Vec<StructDef>,
    struct_index: HashMap<String, usize>,
    variants: HashMap<String, Vec<String>>,
    tables: Vec<TableDef>,
    actions: HashMap<String, String>,
}

impl SchemaModel {
    /// Builds and validates a model. Every type referenced by an alias, a
    /// struct base or field, a variant member, a table row or an action must
    /// resolve to a primitive, an alias, a struct or a variant of the model.
    pub fn from_document(doc: SchemaDocument) -> Result<Self, SchemaError> {
        let mut aliases = HashMap::with_capacity(doc.types.len());
        for def in doc.types {
            if aliases
                .insert(def.new_type_name.clone(), def.type_name)
                .is_some()
            {
                return Err(SchemaError::Duplicate(def.new_type_name));
            }
        }

        let mut struct_index = HashMap::with_capacity(doc.structs.len());
        for (idx, def) in doc.structs.iter().enumerate() {
            if struct_index.insert(def.name.clone(), idx).is_some() {
                return Err(SchemaError::Duplicate(def.name.clone()));
            }
        }

        let mut variants = HashMap::with_capacity(doc.variants.len());
        for def in doc.variants {
            if variants.insert(def.name.clone(), def.types).is_some() {
                return Err(SchemaError::Duplicate(def.name));
            }
        }

        let actions = doc
            .actions
            .into_iter()
            .map(|a| (a.name, a.type_name))
            .collect();

        let model = Self {
            version: doc.version,
            aliases,
            structs: doc.structs,
            struct_index,
            variants,
            tables: doc.tables,
            actions,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let doc: SchemaDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Builds a model from a stored schema blob: either the JSON document or
    /// the binary-packed `abi_def` a contract publishes on chain.
    pub fn from_blob(blob: &[u8]) -> Result<Self, SchemaError> {
        let is_json = blob
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b'{');

        if is_json {
            let doc: SchemaDocument = serde_json::from_slice(blob)?;
            return Self::from_document(doc);
        }

        Self::from_document(decode_binary_document(blob)?)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructDef> {
        self.struct_index.get(name).map(|idx| &self.structs[*idx])
    }

    pub fn get_variant(&self, name: &str) -> Option<&[String]> {
        self.variants.get(name).map(Vec::as_slice)
    }

    pub fn structs(&self) -> &[StructDef] {
        &self.structs
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Payload type of an action. Falls back to the action name when the
    /// schema does not list the action.
    pub fn action_type<'a>(&'a self, action_name: &'a str) -> &'a str {
        self.actions
            .get(action_name)
            .map(String::as_str)
            .unwrap_or(action_name)
    }

    /// Whether `type_name` resolves within this model.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.check_type(type_name, &mut HashSet::new()).is_ok()
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for (alias, target) in &self.aliases {
            self.check_reference(alias, target)?;
        }

        for def in &self.structs {
            if !def.base.is_empty() {
                self.check_reference(&def.name, &def.base)?;
                if self.get_struct(&def.base).is_none() {
                    return Err(SchemaError::InvalidBase {
                        name: def.name.clone(),
                        base: def.base.clone(),
                    });
                }
                self.check_base_chain(def)?;
            }
            for field in &def.fields {
                self.check_reference(&def.name, &field.type_name)?;
            }
        }

        for (name, members) in &self.variants {
            for member in members {
                self.check_reference(name, member)?;
            }
        }

        for table in &self.tables {
            self.check_reference(&table.name, &table.row_type)?;
        }

        for (action, type_name) in &self.actions {
            self.check_reference(action, type_name)?;
        }

        Ok(())
    }

    fn check_reference(&self, referenced_by: &str, type_name: &str) -> Result<(), SchemaError> {
        self.check_type(type_name, &mut HashSet::new())
            .map_err(|err| match err {
                TypeCheck::Unresolved => SchemaError::UnresolvedType {
                    referenced_by: referenced_by.to_string(),
                    type_name: type_name.to_string(),
                },
                TypeCheck::AliasCycle(alias) => SchemaError::AliasCycle(alias),
            })
    }

    fn check_type<'a>(
        &'a self,
        type_name: &'a str,
        seen_aliases: &mut HashSet<&'a str>,
    ) -> Result<(), TypeCheck> {
        match TypeShape::of(type_name) {
            TypeShape::Sequence(inner)
            | TypeShape::Optional(inner)
            | TypeShape::Extension(inner) => self.check_type(inner, seen_aliases),
            TypeShape::Plain(name) => {
                if let Some(target) = self.alias(name) {
                    if !seen_aliases.insert(name) {
                        return Err(TypeCheck::AliasCycle(name.to_string()));
                    }
                    return self.check_type(target, seen_aliases);
                }
                if Primitive::from_name(name).is_some()
                    || self.struct_index.contains_key(name)
                    || self.variants.contains_key(name)
                {
                    Ok(())
                } else {
                    Err(TypeCheck::Unresolved)
                }
            }
        }
    }

    fn check_base_chain(&self, def: &StructDef) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        let mut current = def;
        while !current.base.is_empty() {
            if !seen.insert(current.name.as_str()) {
                return Err(SchemaError::BaseCycle(def.name.clone()));
            }
            match self.get_struct(&current.base) {
                Some(base) => current = base,
                None => break,
            }
        }
        Ok(())
    }
}

enum TypeCheck {
    Unresolved,
    AliasCycle(String),
}

/// Decodes a binary `abi_def` with the built-in `abi_def` schema and maps it
/// onto [`SchemaDocument`] through its JSON form.
fn decode_binary_document(blob: &[u8]) -> Result<SchemaDocument, SchemaError> {
    let abi_def = SchemaModel::from_json(ABI_DEF_JSON)?;
    let registry = VariantRegistry::empty();
    let decoder = BinaryDecoder::new(&abi_def, &registry);

    let mut cursor = BinaryCursor::new(blob);
    let value = decoder.decode_exact("abi_def", &mut cursor)?;

    let mut json = serde_json::to_value(&value)?;
    // Absent binary extensions decode to null; the document expects them missing.
    if let Some(obj) = json.as_object_mut() {
        obj.retain(|_, v| !v.is_null());
    }
    Ok(serde_json::from_value(json)?)
}
