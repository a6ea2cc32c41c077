// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Serialized shape of a schema document.
//!
//! The JSON form is the one published by contracts and used for the
//! state-history base schema:
//!
//! ```json
//! {
//!   "version": "eosio::abi/1.1",
//!   "types":    [{ "new_type_name": "...", "type": "..." }],
//!   "structs":  [{ "name": "...", "base": "...", "fields": [{ "name": "...", "type": "..." }] }],
//!   "variants": [{ "name": "...", "types": ["..."] }],
//!   "tables":   [{ "name": "...", "type": "...", "key_names": ["..."] }]
//! }
//! ```
//!
//! Unknown keys (`ricardian_clauses`, `error_messages`, ...) are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub structs: Vec<StructDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    #[serde(default)]
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    /// Empty when the struct has no base.
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    #[serde(rename = "type")]
    pub row_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(default)]
    pub index_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_defaults() {
        let doc: SchemaDocument = serde_json::from_str(r#"{"version":"eosio::abi/1.0"}"#).unwrap();
        assert_eq!(doc.version, "eosio::abi/1.0");
        assert!(doc.structs.is_empty());
        assert!(doc.variants.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let doc: SchemaDocument = serde_json::from_str(
            r#"{
                "version": "eosio::abi/1.1",
                "structs": [{"name": "hi", "fields": [{"name": "user", "type": "name"}]}],
                "ricardian_clauses": [],
                "error_messages": []
            }"#,
        )
        .unwrap();
        assert_eq!(doc.structs[0].base, "");
        assert_eq!(doc.structs[0].fields[0].type_name, "name");
    }

    #[test]
    fn test_table_row_type_key() {
        let doc: SchemaDocument = serde_json::from_str(
            r#"{"tables": [{"name": "accounts", "type": "account", "key_names": ["balance"]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.tables[0].row_type, "account");
        assert_eq!(doc.tables[0].key_names, vec!["balance"]);
    }
}
