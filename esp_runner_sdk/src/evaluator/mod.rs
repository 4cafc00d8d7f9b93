//! Rule-language evaluators

pub mod toml_rules;

pub use toml_rules::TomlRuleEvaluator;
