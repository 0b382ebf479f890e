//! Entity models used across the integration tests

#![allow(dead_code)] // Not every test file uses every model

use light_config::{Entity, Field, Rule, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
}

impl Entity for DatabaseConfig {
    fn schema() -> Schema {
        Schema::new("DatabaseConfig")
            .field(Field::new("username").rule(Rule::IsString))
            .field(Field::new("password").rule(Rule::IsString))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfigData {
    pub name: String,
    pub db: DatabaseConfig,
    #[serde(default)]
    pub city: Option<String>,
}

impl Entity for ConfigData {
    fn schema() -> Schema {
        Schema::new("ConfigData")
            .field(Field::new("name").rule(Rule::MinLength(5)))
            .field(Field::new("db").nested::<DatabaseConfig>())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtraConfig {
    pub name: String,
    pub db: DatabaseConfig,
    pub extra: String,
}

impl Entity for ExtraConfig {
    fn schema() -> Schema {
        Schema::new("ExtraConfig")
            .field(Field::new("name").rule(Rule::MinLength(5)))
            .field(Field::new("db").nested::<DatabaseConfig>())
            .field(Field::new("extra").rule(Rule::IsString).rule(Rule::MinLength(5)))
    }
}

/// Shape of the aggregated tree when every file of `etc/local` is loaded
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDataAll {
    pub config: ConfigData,
    pub extra_config: ExtraConfig,
    pub bad_config: serde_json::Value,
    #[serde(default)]
    pub city: Option<String>,
}

impl Entity for ConfigDataAll {
    fn schema() -> Schema {
        Schema::new("ConfigDataAll")
            .field(Field::new("config").nested::<ConfigData>())
            .field(Field::new("extraConfig").nested::<ExtraConfig>())
            .field(Field::new("city").optional().rule(Rule::IsString))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JustName {
    pub name: String,
}

impl Entity for JustName {
    fn schema() -> Schema {
        Schema::new("JustName")
            .field(Field::new("name").rule(Rule::IsString).rule(Rule::MinLength(3)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JustNameWithTestEntry {
    pub name: String,
    pub fp8_test_val: String,
}

impl Entity for JustNameWithTestEntry {
    fn schema() -> Schema {
        Schema::new("JustNameWithTestEntry")
            .field(Field::new("name").rule(Rule::IsString).rule(Rule::MinLength(3)))
            .field(Field::new("fp8TestVal").rule(Rule::IsString).rule(Rule::MinLength(3)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JustNameWithEntry {
    pub name: String,
    pub entry: String,
}

impl Entity for JustNameWithEntry {
    fn schema() -> Schema {
        Schema::new("JustNameWithEntry")
            .field(Field::new("name").rule(Rule::IsString).rule(Rule::MinLength(3)))
            .field(Field::new("entry").rule(Rule::IsString).rule(Rule::MinLength(3)))
    }
}

/// Shape of the aggregated, template expanded `test-yaml` directory
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfigDataYaml {
    pub app: JustNameWithTestEntry,
    pub config: JustName,
    pub extra: JustNameWithEntry,
}

impl Entity for ConfigDataYaml {
    fn schema() -> Schema {
        Schema::new("ConfigDataYaml")
            .field(Field::new("app").nested::<JustNameWithTestEntry>())
            .field(Field::new("config").nested::<JustName>())
            .field(Field::new("extra").nested::<JustNameWithEntry>())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadConfigData {
    pub name: String,
    pub key64: String,
    pub extra: ExtraConfig,
    pub db: DatabaseConfig,
    pub city: String,
}

impl Entity for BadConfigData {
    fn schema() -> Schema {
        Schema::new("BadConfigData")
            .field(Field::new("name").rule(Rule::IsAlpha).rule(Rule::MinLength(5)))
            .field(Field::new("key64").rule(Rule::MinLength(20)).rule(Rule::IsBase64))
            .field(Field::new("extra").nested::<ExtraConfig>().rule(Rule::IsNotEmpty))
            .field(Field::new("db").nested::<DatabaseConfig>())
            .field(Field::new("city").rule(Rule::IsString))
    }
}

/// Only declares a port, with a number rule
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PortConfig {
    pub port: u16,
}

impl Entity for PortConfig {
    fn schema() -> Schema {
        Schema::new("PortConfig").field(Field::new("port").rule(Rule::IsNumber))
    }
}

/// Declares no rules at all
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UndecoratedPortConfig {
    pub port: u16,
}

impl Entity for UndecoratedPortConfig {
    fn schema() -> Schema {
        Schema::new("UndecoratedPortConfig")
    }
}

/// Free-form map of labels, for lookups on typed stores
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Labels {
    pub labels: BTreeMap<String, String>,
}

impl Entity for Labels {
    fn schema() -> Schema {
        Schema::new("Labels").field(Field::new("labels").rule(Rule::IsNotEmpty))
    }
}
