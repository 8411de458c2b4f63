use crate::compiled::{CompiledException, CompiledRule, CompiledRules, Package};
use crate::condition::Condition;
use crate::parse::{ConditionDef, parse_rule_file};
use confguard_domain::{PolicyCompiler, PolicyError, PolicySource};
use confguard_types::ids;
use serde_json::Value;

/// Compiles TOML rule files into [`CompiledRules`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleCompiler;

impl PolicyCompiler for RuleCompiler {
    type Policy = CompiledRules;

    fn compile(&self, sources: &[PolicySource]) -> Result<CompiledRules, PolicyError> {
        let mut compiled = CompiledRules::default();
        for source in sources {
            compile_into(&mut compiled, source)?;
        }
        tracing::debug!(
            files = sources.len(),
            namespaces = compiled.packages.len(),
            rules = compiled.rule_count(),
            "compiled rule files"
        );
        Ok(compiled)
    }
}

/// Compile a single rule file given as text.
pub fn compile_str(path: &str, text: &str) -> Result<CompiledRules, PolicyError> {
    RuleCompiler.compile(&[PolicySource::new(path, text)])
}

fn compile_into(compiled: &mut CompiledRules, source: &PolicySource) -> Result<(), PolicyError> {
    let path = source.path.as_str();
    let file = parse_rule_file(&source.text).map_err(|e| PolicyError::compilation(path, e))?;

    let namespace = file
        .package
        .unwrap_or_else(|| ids::DEFAULT_NAMESPACE.to_string());
    validate_identifier(&namespace)
        .map_err(|reason| PolicyError::compilation(path, format!("package: {reason}")))?;

    let mut package = Package::default();
    for rule in &file.rules {
        validate_identifier(&rule.name)
            .map_err(|reason| PolicyError::compilation(path, format!("rule name: {reason}")))?;
        let when = compile_conditions(&rule.when)
            .map_err(|reason| PolicyError::compilation(path, format!("rule '{}': {reason}", rule.name)))?;
        package
            .rules
            .entry(rule.name.clone())
            .or_default()
            .push(CompiledRule {
                message: rule.message.clone(),
                metadata: rule.metadata.clone().unwrap_or(Value::Null),
                when,
                origin: source.path.clone(),
            });
    }

    for (i, exception) in file.exceptions.iter().enumerate() {
        if exception.rules.is_empty() {
            return Err(PolicyError::compilation(
                path,
                format!("exception #{}: rules must not be empty", i + 1),
            ));
        }
        let when = compile_conditions(&exception.when).map_err(|reason| {
            PolicyError::compilation(path, format!("exception #{}: {reason}", i + 1))
        })?;
        package.exceptions.push(CompiledException {
            rules: exception.rules.clone(),
            when,
        });
    }

    let target = compiled.packages.entry(namespace).or_default();
    for (name, defs) in package.rules {
        target.rules.entry(name).or_default().extend(defs);
    }
    target.exceptions.extend(package.exceptions);
    compiled.sources.push(source.path.clone());
    Ok(())
}

fn compile_conditions(defs: &[ConditionDef]) -> Result<Vec<Condition>, String> {
    defs.iter()
        .enumerate()
        .map(|(i, def)| Condition::compile(def).map_err(|e| format!("condition #{}: {e}", i + 1)))
        .collect()
}

/// Namespaces and rule names: non-empty, ASCII alphanumerics, `_` and `.` only.
fn validate_identifier(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("must not be empty".to_string());
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Err(format!("'{name}' contains invalid character {c:?}"));
    }
    Ok(())
}
