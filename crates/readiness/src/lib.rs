//! Readiness gate and pack pre-flight validation.
//!
//! Both checks read the same declarative rule table (`rules::RULES`): the
//! readiness gate evaluates the rules flagged as part of the gate, the pack
//! validator evaluates the rules attached to the requested documents with the
//! severity each document assigns them.

pub mod evaluator;
pub mod rules;
pub mod validator;

pub use evaluator::{NOT_INITIALIZED, ReadinessResult, evaluate_readiness};
pub use rules::{RULES, Rule, RuleContext, RuleField, Severity};
pub use validator::{PackValidation, blocked_documents, validate_pack};
