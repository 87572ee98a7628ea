use anyhow::{Context, Result};
use blake3::Hasher;

use crate::graph::{Fingerprint, ResolvedInputs};

/// A node-type change-detection hook.
///
/// Hooks must be pure: the returned fingerprint is their only effect. A hook
/// that mutates external state is a contract violation on the host's side.
pub trait ChangeHook: Send + Sync {
    fn fingerprint(&self, inputs: &ResolvedInputs) -> Result<Fingerprint>;
}

impl<F> ChangeHook for F
where
    F: Fn(&ResolvedInputs) -> Result<Fingerprint> + Send + Sync,
{
    fn fingerprint(&self, inputs: &ResolvedInputs) -> Result<Fingerprint> {
        self(inputs)
    }
}

/// Built-in hook: hash the node's fully resolved input values.
///
/// Inputs are fed to the hasher in name order (the resolved map is a
/// `BTreeMap`), so the fingerprint is stable across runs for identical
/// values.
pub struct InputHashHook;

impl ChangeHook for InputHashHook {
    fn fingerprint(&self, inputs: &ResolvedInputs) -> Result<Fingerprint> {
        let mut hasher = Hasher::new();

        for (name, value) in inputs {
            let bytes = serde_json::to_vec(value)
                .with_context(|| format!("serializing resolved input '{name}' for hashing"))?;
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
            hasher.update(&bytes);
            hasher.update(&[0]);
        }

        Ok(Fingerprint::new(hasher.finalize().to_hex().to_string()))
    }
}
