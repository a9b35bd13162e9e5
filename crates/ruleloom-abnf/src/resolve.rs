//! Binds collected definitions and fills in referenced core rules.

use ruleloom_core::RuleId;

use crate::core_rules::core_rules;
use crate::error::AbnfError;
use crate::interpret::{Definitions, rule_key};

/// Bind every definition. Names that stay open are imported from the core
/// rules when `with_core` is set, otherwise reported as undefined.
pub(crate) fn resolve(mut defs: Definitions, with_core: bool) -> Result<Definitions, AbnfError> {
    defs.bind_defined()?;
    loop {
        let roots: Vec<RuleId> = defs.defined().map(|(_, stub)| stub).collect();
        let open = defs.grammar.unbound(&roots);
        if open.is_empty() {
            return Ok(defs);
        }

        for stub in open {
            let name = defs.grammar.name(stub).unwrap_or_default().to_owned();
            let key = rule_key(&name);
            let core = core_rules();
            let Some(node) = core.find(&key).filter(|_| with_core) else {
                return Err(AbnfError::UndefinedRule {
                    span: defs.first_ref(&key).unwrap_or_default(),
                    name,
                });
            };
            defs.rule(&core.tree, node)?;
        }
        defs.bind_defined()?;
    }
}
